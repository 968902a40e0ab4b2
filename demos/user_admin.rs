//! Create, inspect, poll and delete a throwaway account.
//!
//! ```bash
//! cargo run --example user_admin
//! ```
//!
//! Env vars:
//! - `JENKINS_URL`
//! - `JENKINS_USER`, `JENKINS_TOKEN` (admin credentials)
//! - `JENKINS_DEMO_USER` (optional, defaults to `demo-user`)

use jenkins_users::{Client, NewUser, UserRecord};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = env_or("JENKINS_URL", "https://jenkins.example.com");
    let username = env_or("JENKINS_DEMO_USER", "demo-user");

    let mut builder = Client::builder(&base_url)?
        .no_system_proxy()
        .timeout(Duration::from_secs(30))
        .with_crumb(Duration::from_secs(300));

    if let (Some(user), Some(token)) = (env_opt("JENKINS_USER"), env_opt("JENKINS_TOKEN")) {
        builder = builder.auth_basic(user, token);
    }

    let client = builder.build()?;
    let users = client.users();

    let created = users
        .create(&NewUser::new(
            username.as_str(),
            "change-me",
            "Demo User",
            "demo@example.com",
        ))
        .await?;
    println!("created {}", created.username());

    let fetched = users.get(username.as_str()).await?;
    println!("fetched {} ({})", fetched.username(), fetched.full_name());

    let mut resource =
        users.resource::<UserRecord>(format!("securityRealm/user/{username}/api/json"));
    println!("poll -> {}", resource.poll().await?);

    created.delete().await?;
    println!("deleted {username}");

    println!("poll after delete -> {}", resource.poll().await?);
    Ok(())
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
