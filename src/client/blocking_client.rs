use super::common::{ClientCore, Settings};
use crate::{
    Auth, Error, SecretString, UserId, UserOperation, api,
    transport::{
        TransportOptions,
        blocking_transport::{BlockingTransport, DynBlockingTransport, UreqBlocking},
        middleware::CrumbBlocking,
        request::{Request, Response},
    },
};
use std::{sync::Arc, time::Duration};
use url::Url;

/// Configures a [`BlockingClient`].
pub struct BlockingClientBuilder {
    settings: Settings,
    transport: Option<DynBlockingTransport>,
}

impl BlockingClientBuilder {
    pub fn auth(mut self, auth: Auth) -> Self {
        self.settings.auth = Some(auth);
        self
    }

    pub fn auth_basic(self, user: impl Into<String>, token: impl Into<SecretString>) -> Self {
        self.auth(Auth::basic(user, token))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.transport.timeout = timeout;
        self
    }

    pub fn no_system_proxy(mut self) -> Self {
        self.settings.transport.ignore_system_proxy = true;
        self
    }

    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.settings.transport.accept_invalid_certs = accept;
        self
    }

    pub fn transport_options(mut self, options: TransportOptions) -> Self {
        self.settings.transport = options;
        self
    }

    pub fn capture_body_snippet(mut self, enabled: bool) -> Self {
        self.settings.body_snippet.enabled = enabled;
        self
    }

    pub fn with_crumb(mut self, ttl: Duration) -> Self {
        self.settings.crumb_ttl = Some(ttl);
        self
    }

    /// Send through `transport` instead of `ureq`.
    pub fn transport(mut self, transport: impl BlockingTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<BlockingClient, Error> {
        let (core, options, crumb) = self.settings.into_core();
        let base: DynBlockingTransport = match self.transport {
            Some(custom) => custom,
            None => Arc::new(UreqBlocking::try_new(&options)?),
        };
        let transport = match crumb {
            Some(settings) => Arc::new(CrumbBlocking::new(base, settings)),
            None => base,
        };
        Ok(BlockingClient {
            inner: Arc::new(Inner { core, transport }),
        })
    }
}

/// Blocking Jenkins client, for code without an async runtime.
#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<Inner>,
}

struct Inner {
    core: ClientCore,
    transport: DynBlockingTransport,
}

impl BlockingClient {
    pub fn builder(base: impl AsRef<str>) -> Result<BlockingClientBuilder, Error> {
        Ok(BlockingClientBuilder {
            settings: Settings::new(base.as_ref())?,
            transport: None,
        })
    }

    pub fn new(base: impl AsRef<str>) -> Result<Self, Error> {
        Self::builder(base)?.build()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.core.base
    }

    #[must_use]
    pub fn users(&self) -> api::BlockingUsersService {
        api::BlockingUsersService::new(self.clone())
    }

    #[must_use]
    pub fn same_client(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn core(&self) -> &ClientCore {
        &self.inner.core
    }

    pub(crate) fn send_expect_ok(
        &self,
        req: &Request,
        operation: UserOperation,
        username: &UserId,
        extra_secrets: &[&str],
    ) -> Result<Response, Error> {
        let result = self.dispatch(req).and_then(|resp| {
            self.core()
                .expect_ok(req, resp, operation, username, extra_secrets)
        });

        #[cfg(feature = "metrics")]
        crate::transport::metrics::record_user_operation(operation, &result);

        result
    }

    #[cfg(feature = "unstable-raw")]
    pub fn execute(&self, req: &Request) -> Result<Response, Error> {
        self.dispatch(req)
    }

    pub(crate) fn dispatch(&self, req: &Request) -> Result<Response, Error> {
        let prepared = self.core().prepare(req)?;

        #[cfg(feature = "metrics")]
        let timer = crate::transport::metrics::RequestTimer::start(&prepared.method);
        #[cfg(feature = "tracing")]
        let span = super::common::trace::request_span(&prepared);
        #[cfg(feature = "tracing")]
        let (_entered, started) = (span.enter(), std::time::Instant::now());

        let result = self.inner.transport.send(prepared);

        #[cfg(feature = "tracing")]
        super::common::trace::finish(&span, started, &result);
        #[cfg(feature = "metrics")]
        timer.finish(result.as_ref().map(|resp| resp.status).map_err(Error::kind));

        result
    }
}
