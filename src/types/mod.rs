//! Identifiers and payloads.

mod common;
mod users;

pub use common::UserId;
pub use users::{NewUser, UserAccount, UserRecord};
