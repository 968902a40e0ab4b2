//! Pieces shared by [`Client`](crate::Client) and
//! [`BlockingClient`](crate::BlockingClient).

use crate::{
    Auth, BodySnippetConfig, Error, UserId, UserOperation,
    transport::{
        TransportOptions, TransportRequest,
        middleware::crumb::CrumbSettings,
        request::{Request, Response},
    },
    util::{
        diagnostics::Diagnostics,
        url::{normalize_base_url, resolve},
    },
};
use http::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Builder state common to both client kinds.
pub(crate) struct Settings {
    pub(crate) base: Url,
    pub(crate) auth: Option<Auth>,
    pub(crate) transport: TransportOptions,
    pub(crate) crumb_ttl: Option<Duration>,
    pub(crate) body_snippet: BodySnippetConfig,
}

impl Settings {
    pub(crate) fn new(base: &str) -> Result<Self, Error> {
        Ok(Self {
            base: normalize_base_url(base)?,
            auth: None,
            transport: TransportOptions::default(),
            crumb_ttl: None,
            body_snippet: BodySnippetConfig::default(),
        })
    }

    /// Split into the request-side core and, when enabled, crumb settings.
    pub(crate) fn into_core(self) -> (ClientCore, TransportOptions, Option<CrumbSettings>) {
        let crumb = self.crumb_ttl.map(|ttl| CrumbSettings {
            base_url: self.base.clone(),
            auth: self.auth.clone(),
            ttl,
            fetch_timeout: self.transport.timeout,
            body_snippet: self.body_snippet,
        });
        let core = ClientCore {
            base: self.base,
            auth: self.auth,
            timeout: self.transport.timeout,
            body_snippet: self.body_snippet,
        };
        (core, self.transport, crumb)
    }
}

/// Everything a client needs besides its transport.
pub(crate) struct ClientCore {
    pub(crate) base: Url,
    auth: Option<Auth>,
    timeout: Duration,
    body_snippet: BodySnippetConfig,
}

impl ClientCore {
    fn diagnostics<'a>(&'a self, extra_secrets: &[&'a str]) -> Diagnostics<'a> {
        Diagnostics {
            snippet: self.body_snippet,
            secrets: self
                .auth
                .iter()
                .map(Auth::secret)
                .chain(extra_secrets.iter().copied())
                .collect(),
        }
    }

    fn url_for(&self, req: &Request) -> Result<Url, Error> {
        resolve(
            &self.base,
            req.segments.iter().map(String::as_str),
            &req.query,
        )
    }

    /// Resolve `req` against the base URL and authenticate it.
    pub(crate) fn prepare(&self, req: &Request) -> Result<TransportRequest, Error> {
        let mut headers = req.headers.clone();
        if let Some(auth) = &self.auth {
            auth.apply(&mut headers)?;
        }
        Ok(TransportRequest {
            method: req.method.clone(),
            url: self.url_for(req)?,
            headers,
            payload: req.payload.clone(),
            timeout: req.timeout.unwrap_or(self.timeout),
        })
    }

    /// Pass `resp` through if it is exactly `200 OK`.
    pub(crate) fn expect_ok(
        &self,
        req: &Request,
        resp: Response,
        operation: UserOperation,
        username: &UserId,
        extra_secrets: &[&str],
    ) -> Result<Response, Error> {
        if resp.status == StatusCode::OK {
            return Ok(resp);
        }
        let url = self.url_for(req)?;
        Err(Error::User {
            operation,
            username: username.clone(),
            error: self
                .diagnostics(extra_secrets)
                .http_error(&req.method, &url, &resp),
            account: None,
        })
    }

    pub(crate) fn decode<T: DeserializeOwned>(
        &self,
        req: &Request,
        resp: &Response,
    ) -> Result<T, Error> {
        resp.json().or_else(|source| {
            let url = self.url_for(req)?;
            Err(self
                .diagnostics(&[])
                .decode_error(&req.method, &url, resp, source))
        })
    }
}

#[cfg(feature = "tracing")]
pub(crate) mod trace {
    use crate::{Error, transport::TransportRequest, transport::request::Response};
    use std::time::Instant;
    use tracing::{Span, field};

    pub(crate) fn request_span(req: &TransportRequest) -> Span {
        tracing::info_span!(
            "jenkins.request",
            http.method = %req.method,
            http.path = %req.url.path(),
            http.status = field::Empty,
            request_id = field::Empty,
            latency_ms = field::Empty,
        )
    }

    pub(crate) fn finish(span: &Span, started: Instant, result: &Result<Response, Error>) {
        span.record("latency_ms", started.elapsed().as_millis() as u64);
        match result {
            Ok(resp) => {
                span.record("http.status", resp.status.as_u16());
                if let Some(id) = crate::util::diagnostics::request_id(&resp.headers) {
                    span.record("request_id", &*id);
                }
            }
            Err(err) => tracing::debug!(parent: span, error = %err, "request failed"),
        }
    }
}
