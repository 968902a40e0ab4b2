//! Transport wrappers.

pub mod crumb;

#[cfg(feature = "async")]
pub mod crumb_async;
#[cfg(feature = "blocking")]
pub mod crumb_blocking;

#[cfg(feature = "async")]
pub use crumb_async::CrumbAsync;
#[cfg(feature = "blocking")]
pub use crumb_blocking::CrumbBlocking;
