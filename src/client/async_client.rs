use super::common::{ClientCore, Settings};
use crate::{
    Auth, Error, SecretString, UserId, UserOperation, api,
    transport::{
        TransportOptions,
        async_transport::{AsyncTransport, DynAsyncTransport, ReqwestAsync},
        middleware::CrumbAsync,
        request::{Request, Response},
    },
};
use std::{sync::Arc, time::Duration};
use url::Url;

/// Configures a [`Client`]. Obtained from [`Client::builder`].
pub struct ClientBuilder {
    settings: Settings,
    transport: Option<DynAsyncTransport>,
}

impl ClientBuilder {
    pub fn auth(mut self, auth: Auth) -> Self {
        self.settings.auth = Some(auth);
        self
    }

    /// User name plus API token (or password).
    pub fn auth_basic(self, user: impl Into<String>, token: impl Into<SecretString>) -> Self {
        self.auth(Auth::basic(user, token))
    }

    /// Default per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.transport.timeout = timeout;
        self
    }

    pub fn no_system_proxy(mut self) -> Self {
        self.settings.transport.ignore_system_proxy = true;
        self
    }

    /// Skip TLS certificate checks. Only for throwaway test instances.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.settings.transport.accept_invalid_certs = accept;
        self
    }

    /// Replace every connection setting at once.
    pub fn transport_options(mut self, options: TransportOptions) -> Self {
        self.settings.transport = options;
        self
    }

    /// Keep response bodies out of errors.
    pub fn capture_body_snippet(mut self, enabled: bool) -> Self {
        self.settings.body_snippet.enabled = enabled;
        self
    }

    /// Send a CSRF crumb with every POST, refetched after `ttl`.
    pub fn with_crumb(mut self, ttl: Duration) -> Self {
        self.settings.crumb_ttl = Some(ttl);
        self
    }

    /// Send through `transport` instead of `reqwest`. Connection settings
    /// are then up to that transport; the request timeout still applies.
    pub fn transport(mut self, transport: impl AsyncTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let (core, options, crumb) = self.settings.into_core();
        let base: DynAsyncTransport = match self.transport {
            Some(custom) => custom,
            None => Arc::new(ReqwestAsync::try_new(&options)?),
        };
        let transport = match crumb {
            Some(settings) => Arc::new(CrumbAsync::new(base, settings)),
            None => base,
        };
        Ok(Client {
            inner: Arc::new(Inner { core, transport }),
        })
    }
}

/// Async Jenkins client. Clones share configuration and connections.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    core: ClientCore,
    transport: DynAsyncTransport,
}

impl Client {
    /// Start configuring a client for the Jenkins root at `base`, e.g.
    /// `https://ci.example.com/jenkins`.
    pub fn builder(base: impl AsRef<str>) -> Result<ClientBuilder, Error> {
        Ok(ClientBuilder {
            settings: Settings::new(base.as_ref())?,
            transport: None,
        })
    }

    pub fn new(base: impl AsRef<str>) -> Result<Self, Error> {
        Self::builder(base)?.build()
    }

    /// Base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.core.base
    }

    #[must_use]
    pub fn users(&self) -> api::UsersService {
        api::UsersService::new(self.clone())
    }

    /// Whether `other` is a clone of this client.
    #[must_use]
    pub fn same_client(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn core(&self) -> &ClientCore {
        &self.inner.core
    }

    pub(crate) async fn send_expect_ok(
        &self,
        req: &Request,
        operation: UserOperation,
        username: &UserId,
        extra_secrets: &[&str],
    ) -> Result<Response, Error> {
        let result = self.dispatch(req).await.and_then(|resp| {
            self.core()
                .expect_ok(req, resp, operation, username, extra_secrets)
        });

        #[cfg(feature = "metrics")]
        crate::transport::metrics::record_user_operation(operation, &result);

        result
    }

    /// Send `req` and return the response whatever its status.
    #[cfg(feature = "unstable-raw")]
    pub async fn execute(&self, req: &Request) -> Result<Response, Error> {
        self.dispatch(req).await
    }

    /// One exchange; only a missing response is an error here.
    pub(crate) async fn dispatch(&self, req: &Request) -> Result<Response, Error> {
        let prepared = self.core().prepare(req)?;

        #[cfg(feature = "metrics")]
        let timer = crate::transport::metrics::RequestTimer::start(&prepared.method);
        #[cfg(feature = "tracing")]
        let (span, started) = (
            super::common::trace::request_span(&prepared),
            std::time::Instant::now(),
        );

        let sent = self.inner.transport.send(prepared);
        #[cfg(feature = "tracing")]
        let sent = tracing::Instrument::instrument(sent, span.clone());
        let result = sent.await;

        #[cfg(feature = "tracing")]
        super::common::trace::finish(&span, started, &result);
        #[cfg(feature = "metrics")]
        timer.finish(result.as_ref().map(|resp| resp.status).map_err(Error::kind));

        result
    }
}
