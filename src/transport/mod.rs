//! HTTP plumbing underneath the clients.
//!
//! A transport sends one [`TransportRequest`] and hands back whatever the
//! server answered. Status codes are never judged at this layer.

use http::{HeaderMap, HeaderValue, Method, StatusCode};
use std::time::Duration;
use url::Url;

#[cfg(feature = "async")]
pub mod async_transport;
#[cfg(feature = "blocking")]
pub mod blocking_transport;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;
pub mod middleware;
pub mod request;

/// Connection settings for the bundled `reqwest`/`ureq` transports.
#[derive(Clone, Debug)]
pub struct TransportOptions {
    pub user_agent: String,
    /// Upper bound for a whole exchange; requests may lower it.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Body read limit (`ureq` only).
    pub read_timeout: Duration,
    pub accept_invalid_certs: bool,
    pub ignore_system_proxy: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            ignore_system_proxy: false,
        }
    }
}

/// Raw body with an optional `Content-Type`.
#[derive(Clone, Debug)]
pub struct TransportBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<HeaderValue>,
}

/// Payload of a [`TransportRequest`].
#[derive(Clone, Debug, Default)]
pub enum Payload {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs, in order.
    Form(Vec<(String, String)>),
    Raw(TransportBody),
}

/// A request resolved against the base URL, auth already applied.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub payload: Payload,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}
