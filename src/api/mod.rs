//! High-level Jenkins account services.
//!
//! The primary surface is exposed via `Client::users()` /
//! `BlockingClient::users()`.

pub mod resource;
pub mod users;

pub use resource::*;
pub use users::*;
