use super::crumb::{CachedCrumb, CrumbSettings, attach, needs_crumb};
use crate::{
    Error,
    transport::{TransportRequest, TransportResponse, async_transport::AsyncTransport},
};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Adds a Jenkins crumb to every unsafe request sent through `inner`.
///
/// Concurrent requests that find the cache empty queue on one fetch.
pub struct CrumbAsync<T> {
    inner: T,
    settings: CrumbSettings,
    cache: Mutex<Option<CachedCrumb>>,
}

impl<T: AsyncTransport> CrumbAsync<T> {
    pub fn new(inner: T, settings: CrumbSettings) -> Self {
        Self {
            inner,
            settings,
            cache: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<T: AsyncTransport> AsyncTransport for CrumbAsync<T> {
    async fn send(&self, mut req: TransportRequest) -> Result<TransportResponse, Error> {
        if needs_crumb(&req.method) {
            let mut cache = self.cache.lock().await;
            if !attach(cache.as_ref(), &mut req) {
                let issuer = self.settings.issuer_request()?;
                let url = issuer.url.clone();
                let resp = self.inner.send(issuer).await?;
                let fresh = cache.insert(self.settings.parse_issuer_response(&url, &resp)?);
                fresh.apply(&mut req.headers);
            }
        }
        self.inner.send(req).await
    }
}
