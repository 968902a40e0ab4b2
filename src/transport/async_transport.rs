use super::{Payload, TransportOptions, TransportRequest, TransportResponse};
use crate::error::{Error, TransportErrorKind};
use async_trait::async_trait;
use std::sync::Arc;

/// Sends one request and returns the response, whatever its status.
#[async_trait]
pub trait AsyncTransport: Send + Sync + 'static {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error>;
}

pub type DynAsyncTransport = Arc<dyn AsyncTransport>;

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for Arc<T> {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        T::send(self, req).await
    }
}

/// `reqwest`-backed transport with a cookie store, so the session a crumb
/// is bound to survives between requests.
#[derive(Clone)]
pub struct ReqwestAsync {
    http: reqwest::Client,
}

impl ReqwestAsync {
    pub fn try_new(options: &TransportOptions) -> Result<Self, Error> {
        #[cfg(feature = "rustls")]
        install_ring_provider();

        let mut builder = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .cookie_store(true)
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs);
        if options.ignore_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder.build().map_err(|err| Error::InvalidConfig {
            message: "cannot build reqwest client".into(),
            source: Some(Box::new(err)),
        })?;
        Ok(Self { http })
    }
}

#[cfg(feature = "rustls")]
fn install_ring_provider() {
    static INSTALLED: std::sync::OnceLock<()> = std::sync::OnceLock::new();
    INSTALLED.get_or_init(|| {
        // Another provider may already be installed by the application.
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

fn classify(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    }
}

#[async_trait]
impl AsyncTransport for ReqwestAsync {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        let TransportRequest {
            method,
            url,
            headers,
            payload,
            timeout,
        } = req;
        let fail = |err: reqwest::Error| Error::Transport {
            method: method.clone(),
            path: url.path().into(),
            kind: classify(&err),
            source: Box::new(err),
        };

        let builder = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers)
            .timeout(timeout);
        let builder = match payload {
            Payload::Empty => builder,
            Payload::Form(pairs) => builder.form(&pairs),
            Payload::Raw(body) => match body.content_type {
                Some(content_type) => builder
                    .header(http::header::CONTENT_TYPE, content_type)
                    .body(body.bytes),
                None => builder.body(body.bytes),
            },
        };

        let resp = builder.send().await.map_err(fail)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(fail)?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
