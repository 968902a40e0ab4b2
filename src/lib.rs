//! Jenkins user-account administration.
//!
//! Create, delete and fetch accounts through the `securityRealm` endpoints,
//! or poll an arbitrary JSON endpoint for its status code. Pick the async
//! [`Client`] (default) or the [`BlockingClient`] at compile time.
//!
//! ```no_run
//! # #[cfg(feature = "async")]
//! # async fn demo() -> Result<(), jenkins_users::Error> {
//! use jenkins_users::{Client, NewUser};
//!
//! let client = Client::builder("https://jenkins.example.com")?
//!     .auth_basic("admin", "api-token")
//!     .build()?;
//!
//! let alice = client
//!     .users()
//!     .create(&NewUser::new("alice", "s3cret", "Alice A", "alice@example.com"))
//!     .await?;
//! alice.delete().await?;
//! # Ok(())
//! # }
//! ```

// compile-time guard: enable at least one client kind.
#[cfg(not(any(feature = "async", feature = "blocking")))]
compile_error!("Enable at least one of: `async` (default) or `blocking`.");

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

mod util {
    pub(crate) mod diagnostics;
    pub(crate) mod url;
}

pub use api::*;
pub use auth::{Auth, SecretString};
pub use error::{
    BodySnippetConfig, Error, ErrorKind, HttpError, Result, TransportErrorKind, UserOperation,
};
pub use types::*;

#[cfg(feature = "async")]
pub use client::{Client, ClientBuilder};
#[cfg(feature = "blocking")]
pub use client::{BlockingClient, BlockingClientBuilder};
