//! Turning unwanted responses into error values without leaking secrets.

use crate::{BodySnippetConfig, Error, HttpError, transport::TransportResponse};
use http::{HeaderMap, Method};
use url::Url;

use super::url::sanitize_url_for_error;

const REDACTED: &str = "<redacted>";

pub(crate) fn request_id(headers: &HeaderMap) -> Option<Box<str>> {
    ["x-request-id", "x-correlation-id", "x-jenkins-session"]
        .into_iter()
        .filter_map(|name| headers.get(name)?.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(Into::into)
}

/// `message`-like field of a JSON error body. Jenkins mostly answers with
/// HTML, in which case there is none.
fn json_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error", "errorMessage"]
        .into_iter()
        .filter_map(|key| value.get(key)?.as_str())
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_owned)
}

/// Longest prefix of `text` that fits in `max_bytes` without splitting a char.
fn clip(text: &str, max_bytes: usize) -> &str {
    let end = text
        .char_indices()
        .map(|(at, ch)| at + ch.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &text[..end]
}

/// Error construction for one client: snippet settings plus every secret
/// that must not appear in messages or snippets.
pub(crate) struct Diagnostics<'a> {
    pub(crate) snippet: BodySnippetConfig,
    pub(crate) secrets: Vec<&'a str>,
}

impl Diagnostics<'_> {
    fn scrub(&self, text: &str) -> String {
        self.secrets
            .iter()
            .filter(|secret| !secret.is_empty())
            .fold(text.to_owned(), |text, secret| text.replace(secret, REDACTED))
    }

    /// Scrubbed first, then clipped, so a secret cut in half cannot leak.
    pub(crate) fn snippet(&self, body: &[u8]) -> Option<Box<str>> {
        if !self.snippet.enabled {
            return None;
        }
        let scrubbed = self.scrub(&String::from_utf8_lossy(body));
        Some(clip(&scrubbed, self.snippet.max_bytes).into())
    }

    pub(crate) fn http_error(
        &self,
        method: &Method,
        url: &Url,
        resp: &TransportResponse,
    ) -> HttpError {
        HttpError {
            status: resp.status,
            method: method.clone(),
            url: Box::new(sanitize_url_for_error(url)),
            message: json_message(&resp.body).map(|msg| self.scrub(&msg).into()),
            request_id: request_id(&resp.headers),
            body_snippet: self.snippet(&resp.body),
        }
    }

    pub(crate) fn decode_error(
        &self,
        method: &Method,
        url: &Url,
        resp: &TransportResponse,
        source: serde_json::Error,
    ) -> Error {
        Error::Decode {
            status: resp.status,
            method: method.clone(),
            path: url.path().into(),
            request_id: request_id(&resp.headers),
            body_snippet: self.snippet(&resp.body),
            source: Box::new(source),
        }
    }
}
