use super::{Payload, TransportResponse};
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use std::{borrow::Cow, time::Duration};

#[cfg(feature = "unstable-raw")]
use {
    super::TransportBody,
    http::{HeaderName, HeaderValue},
};

/// A request relative to the client's base URL.
///
/// Each entry of `segments` becomes exactly one path segment, so an account
/// named `ops/bot` is sent as `ops%2Fbot`.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub payload: Payload,
    /// Overrides the client timeout for this request only.
    pub timeout: Option<Duration>,
}

/// A fully read response of any status.
pub type Response = TransportResponse;

impl Request {
    #[must_use]
    pub fn new<S: Into<String>>(method: Method, segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            payload: Payload::Empty,
            timeout: None,
        }
    }

    #[must_use]
    pub fn get<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self::new(Method::GET, segments)
    }

    #[must_use]
    pub fn post<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self::new(Method::POST, segments)
    }

    /// `GET` a slash-separated path as a caller would write it, e.g.
    /// `/user/j%20doe/api/json?tree=id`. Escapes already present in the
    /// path are kept as they are.
    #[must_use]
    pub fn get_path(path: &str) -> Self {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let mut req = Self::get(crate::util::url::path_segments(path));
        req.query = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        req
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Send `pairs` as an urlencoded form, replacing any previous payload.
    #[must_use]
    pub fn form<K: Into<String>, V: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.payload = Payload::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    #[must_use]
    #[cfg(feature = "unstable-raw")]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    #[cfg(feature = "unstable-raw")]
    pub fn body(mut self, bytes: impl Into<Vec<u8>>, content_type: Option<HeaderValue>) -> Self {
        self.payload = Payload::Raw(TransportBody {
            bytes: bytes.into(),
            content_type,
        });
        self
    }

    #[must_use]
    #[cfg(feature = "unstable-raw")]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl TransportResponse {
    #[must_use]
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
