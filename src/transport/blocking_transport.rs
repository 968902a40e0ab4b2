use super::{Payload, TransportOptions, TransportRequest, TransportResponse};
use crate::error::{Error, TransportErrorKind};
use http::{HeaderMap, Method};
use std::{io, sync::Arc, time::Duration};
use ureq::{Agent, RequestBuilder};

/// Blocking twin of [`AsyncTransport`](super::async_transport::AsyncTransport).
pub trait BlockingTransport: Send + Sync + 'static {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error>;
}

pub type DynBlockingTransport = Arc<dyn BlockingTransport>;

impl<T: BlockingTransport + ?Sized> BlockingTransport for Arc<T> {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        T::send(self, req)
    }
}

/// `ureq`-backed transport. Non-2xx answers come back as responses.
#[derive(Clone)]
pub struct UreqBlocking {
    agent: Agent,
}

impl UreqBlocking {
    pub fn try_new(options: &TransportOptions) -> Result<Self, Error> {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .user_agent(options.user_agent.as_str())
            .timeout_global(Some(options.timeout))
            .timeout_connect(Some(options.connect_timeout))
            .timeout_recv_body(Some(options.read_timeout));
        if options.ignore_system_proxy {
            config = config.proxy(None);
        }
        if options.accept_invalid_certs {
            let tls = ureq::tls::TlsConfig::builder()
                .disable_verification(true)
                .build();
            config = config.tls_config(tls);
        }
        Ok(Self {
            agent: Agent::new_with_config(config.build()),
        })
    }
}

fn classify(err: &ureq::Error) -> TransportErrorKind {
    match err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
        ureq::Error::Io(io) => match io.kind() {
            io::ErrorKind::TimedOut => TransportErrorKind::Timeout,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected => TransportErrorKind::Connect,
            _ => TransportErrorKind::Other,
        },
        _ => TransportErrorKind::Other,
    }
}

/// Copy headers and the per-request timeout onto a `ureq` builder.
fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &HeaderMap,
    timeout: Duration,
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder.config().timeout_global(Some(timeout)).build()
}

impl BlockingTransport for UreqBlocking {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        let fail = |err: ureq::Error| Error::Transport {
            method: req.method.clone(),
            path: req.url.path().into(),
            kind: classify(&err),
            source: Box::new(err),
        };
        let url = req.url.as_str();

        let sent = match req.method {
            Method::GET => with_headers(self.agent.get(url), &req.headers, req.timeout).call(),
            Method::POST => {
                let post = with_headers(self.agent.post(url), &req.headers, req.timeout);
                match &req.payload {
                    Payload::Empty => post.send_empty(),
                    Payload::Form(pairs) => {
                        post.send_form(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    }
                    Payload::Raw(body) => match &body.content_type {
                        Some(content_type) => post
                            .header(http::header::CONTENT_TYPE, content_type)
                            .send(&body.bytes[..]),
                        None => post.send(&body.bytes[..]),
                    },
                }
            }
            ref other => {
                return Err(Error::InvalidConfig {
                    message: format!("blocking transport only sends GET and POST, not {other}")
                        .into(),
                    source: None,
                });
            }
        };

        let mut resp = sent.map_err(fail)?;
        let body = resp.body_mut().read_to_vec().map_err(fail)?;
        Ok(TransportResponse {
            status: resp.status(),
            headers: resp.headers().clone(),
            body,
        })
    }
}
