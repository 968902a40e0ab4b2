use super::crumb::{CachedCrumb, CrumbSettings, attach, needs_crumb};
use crate::{
    Error,
    transport::{TransportRequest, TransportResponse, blocking_transport::BlockingTransport},
};
use std::sync::{Mutex, PoisonError};

/// Blocking counterpart of [`super::CrumbAsync`].
pub struct CrumbBlocking<T> {
    inner: T,
    settings: CrumbSettings,
    cache: Mutex<Option<CachedCrumb>>,
}

impl<T: BlockingTransport> CrumbBlocking<T> {
    pub fn new(inner: T, settings: CrumbSettings) -> Self {
        Self {
            inner,
            settings,
            cache: Mutex::new(None),
        }
    }
}

impl<T: BlockingTransport> BlockingTransport for CrumbBlocking<T> {
    fn send(&self, mut req: TransportRequest) -> Result<TransportResponse, Error> {
        if needs_crumb(&req.method) {
            // A panic elsewhere cannot leave a half-written crumb behind.
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if !attach(cache.as_ref(), &mut req) {
                let issuer = self.settings.issuer_request()?;
                let url = issuer.url.clone();
                let resp = self.inner.send(issuer)?;
                let fresh = cache.insert(self.settings.parse_issuer_response(&url, &resp)?);
                fresh.apply(&mut req.headers);
            }
        }
        self.inner.send(req)
    }
}
