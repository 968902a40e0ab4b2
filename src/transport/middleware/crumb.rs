//! CSRF crumbs.
//!
//! Jenkins rejects state-changing requests from cookie sessions unless they
//! carry the crumb issued at `crumbIssuer/api/json`. The wrappers in
//! [`super::crumb_async`] and [`super::crumb_blocking`] fetch one lazily on
//! the first unsafe request, reuse it until `ttl` runs out and add it as a
//! header.

use crate::{
    Auth, BodySnippetConfig, Error,
    transport::{Payload, TransportRequest, TransportResponse},
    util::{diagnostics::Diagnostics, url::resolve},
};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Deserialize;
use std::time::{Duration, Instant};
use url::Url;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuedCrumb {
    crumb_request_field: String,
    crumb: String,
}

/// Where to fetch crumbs and how long to keep them.
#[derive(Clone, Debug)]
pub struct CrumbSettings {
    pub base_url: Url,
    pub auth: Option<Auth>,
    pub ttl: Duration,
    pub fetch_timeout: Duration,
    pub body_snippet: BodySnippetConfig,
}

pub(crate) struct CachedCrumb {
    name: HeaderName,
    value: HeaderValue,
    expires_at: Instant,
}

impl CachedCrumb {
    pub(crate) fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }

    pub(crate) fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(self.name.clone(), self.value.clone());
    }
}

pub(crate) fn needs_crumb(method: &Method) -> bool {
    !method.is_safe()
}

/// Attach a cached crumb to `req`, if it needs one. Returns `false` when the
/// cache has nothing usable and a fetch is due.
pub(crate) fn attach(cached: Option<&CachedCrumb>, req: &mut TransportRequest) -> bool {
    match cached {
        Some(crumb) if crumb.is_fresh() => {
            crumb.apply(&mut req.headers);
            true
        }
        _ => false,
    }
}

impl CrumbSettings {
    fn diagnostics(&self) -> Diagnostics<'_> {
        Diagnostics {
            snippet: self.body_snippet,
            secrets: self.auth.iter().map(Auth::secret).collect(),
        }
    }

    pub(crate) fn issuer_request(&self) -> Result<TransportRequest, Error> {
        let mut headers = HeaderMap::new();
        if let Some(auth) = &self.auth {
            auth.apply(&mut headers)?;
        }
        Ok(TransportRequest {
            method: Method::GET,
            url: resolve(&self.base_url, ["crumbIssuer", "api", "json"], &[])?,
            headers,
            payload: Payload::Empty,
            timeout: self.fetch_timeout,
        })
    }

    pub(crate) fn parse_issuer_response(
        &self,
        url: &Url,
        resp: &TransportResponse,
    ) -> Result<CachedCrumb, Error> {
        if !resp.status.is_success() {
            return Err(Error::Api(self.diagnostics().http_error(
                &Method::GET,
                url,
                resp,
            )));
        }

        let issued: IssuedCrumb = serde_json::from_slice(&resp.body)
            .map_err(|err| self.diagnostics().decode_error(&Method::GET, url, resp, err))?;
        let invalid = |what: &str, err: Box<dyn std::error::Error + Send + Sync>| {
            Error::InvalidConfig {
                message: format!("crumb issuer returned an unusable {what}").into(),
                source: Some(err),
            }
        };

        Ok(CachedCrumb {
            name: HeaderName::try_from(issued.crumb_request_field)
                .map_err(|err| invalid("header name", Box::new(err)))?,
            value: HeaderValue::try_from(issued.crumb)
                .map_err(|err| invalid("header value", Box::new(err)))?,
            expires_at: Instant::now() + self.ttl,
        })
    }
}
