//! Blocking variant of `user_admin`.
//!
//! ```bash
//! cargo run --example user_admin_blocking --no-default-features --features blocking,rustls
//! ```

use jenkins_users::{BlockingClient, NewUser};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let base_url = env_or("JENKINS_URL", "https://jenkins.example.com");
    let username = env_or("JENKINS_DEMO_USER", "demo-user");

    let mut builder = BlockingClient::builder(&base_url)?
        .timeout(Duration::from_secs(30))
        .with_crumb(Duration::from_secs(300));

    if let (Some(user), Some(token)) = (env_opt("JENKINS_USER"), env_opt("JENKINS_TOKEN")) {
        builder = builder.auth_basic(user, token);
    }

    let client = builder.build()?;
    let users = client.users();

    let mut user = users.create(&NewUser::new(
        username.as_str(),
        "change-me",
        "Demo User",
        "demo@example.com",
    ))?;
    user.refresh()?;
    println!("{user:#?}");

    user.delete()?;
    match users.get(username.as_str()) {
        Ok(_) => println!("{username} still exists"),
        Err(err) if err.is_not_found() => println!("{username} is gone"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
