//! Pollable JSON resources.
//!
//! A resource re-reads one path on every [`poll`](UserResource::poll) and
//! hands back the raw status. What counts as "up" or "gone" is the
//! caller's call.
//!
//! When a body reads as a Jenkins user profile (it has a non-empty `id`),
//! `username`, `id` and `full_name` are copied from it. `email` is never
//! reported by Jenkins and keeps whatever the caller put there.

use crate::transport::request::{Request, Response};
use crate::{Error, UserId, UserRecord};
use http::StatusCode;
use serde::de::DeserializeOwned;

/// Decode `resp` into `T`, or `None` when the body doesn't fit (HTML error
/// pages, empty bodies).
fn decode_best_effort<T: DeserializeOwned>(
    core: &crate::client::common::ClientCore,
    req: &Request,
    resp: &Response,
) -> Option<T> {
    match core.decode(req, resp) {
        Ok(value) => Some(value),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_err, "poll response did not decode");
            None
        }
    }
}

/// The profile fields of `body`, if it is a user profile at all.
fn profile(body: &[u8]) -> Option<UserRecord> {
    serde_json::from_slice::<UserRecord>(body)
        .ok()
        .filter(|record| !record.id.is_empty())
}

/// A user-shaped resource polled from a fixed path.
#[cfg(feature = "async")]
#[derive(Clone)]
pub struct UserResource<T = UserRecord> {
    client: crate::Client,
    base: String,
    raw: Option<T>,
    /// From the last profile-shaped poll.
    pub username: UserId,
    /// From the last profile-shaped poll.
    pub full_name: String,
    /// Set by the caller only.
    pub email: String,
    /// From the last profile-shaped poll.
    pub id: String,
}

#[cfg(feature = "async")]
impl<T> UserResource<T> {
    /// `base_path` is relative to the client base URL and may carry a query,
    /// e.g. `securityRealm/user/alice/api/json?tree=id,fullName`.
    #[must_use]
    pub fn new(client: crate::Client, base_path: impl Into<String>) -> Self {
        Self {
            client,
            base: base_path.into(),
            raw: None,
            username: UserId::default(),
            full_name: String::new(),
            email: String::new(),
            id: String::new(),
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base
    }

    /// Payload of the last poll that decoded.
    #[must_use]
    pub fn raw(&self) -> Option<&T> {
        self.raw.as_ref()
    }

    #[must_use]
    pub fn client(&self) -> &crate::Client {
        &self.client
    }
}

#[cfg(feature = "async")]
impl<T: DeserializeOwned> UserResource<T> {
    /// `GET` the base path once and return its status, whatever it is.
    ///
    /// The body replaces [`raw`](Self::raw); a body that doesn't decode
    /// leaves `raw` empty without failing the poll. Only transport failures
    /// are errors.
    pub async fn poll(&mut self) -> Result<StatusCode, Error> {
        let req = Request::get_path(&self.base);
        let resp = self.client.dispatch(&req).await?;
        self.raw = decode_best_effort(self.client.core(), &req, &resp);
        if let Some(record) = profile(&resp.body) {
            self.id = record.id.to_string();
            self.username = record.id;
            self.full_name = record.full_name;
        }
        Ok(resp.status)
    }
}

/// Blocking counterpart of [`UserResource`].
#[cfg(feature = "blocking")]
#[derive(Clone)]
pub struct BlockingUserResource<T = UserRecord> {
    client: crate::BlockingClient,
    base: String,
    raw: Option<T>,
    /// From the last profile-shaped poll.
    pub username: UserId,
    /// From the last profile-shaped poll.
    pub full_name: String,
    /// Set by the caller only.
    pub email: String,
    /// From the last profile-shaped poll.
    pub id: String,
}

#[cfg(feature = "blocking")]
impl<T> BlockingUserResource<T> {
    #[must_use]
    pub fn new(client: crate::BlockingClient, base_path: impl Into<String>) -> Self {
        Self {
            client,
            base: base_path.into(),
            raw: None,
            username: UserId::default(),
            full_name: String::new(),
            email: String::new(),
            id: String::new(),
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn raw(&self) -> Option<&T> {
        self.raw.as_ref()
    }

    #[must_use]
    pub fn client(&self) -> &crate::BlockingClient {
        &self.client
    }
}

#[cfg(feature = "blocking")]
impl<T: DeserializeOwned> BlockingUserResource<T> {
    pub fn poll(&mut self) -> Result<StatusCode, Error> {
        let req = Request::get_path(&self.base);
        let resp = self.client.dispatch(&req)?;
        self.raw = decode_best_effort(self.client.core(), &req, &resp);
        if let Some(record) = profile(&resp.body) {
            self.id = record.id.to_string();
            self.username = record.id;
            self.full_name = record.full_name;
        }
        Ok(resp.status)
    }
}
