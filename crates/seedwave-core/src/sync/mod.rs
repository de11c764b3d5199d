//! Resource synchronization layer.
//!
//! Keeps a fixed set of remote resources fresh in a local cache through a
//! periodic refresh loop and an on-demand refresh. Partial failures degrade
//! the observable status instead of propagating to callers.

pub mod cache;
pub mod controller;
pub mod error_log;
pub mod resources;
pub mod transport;
pub mod types;

#[cfg(test)]
mod transport_tests;

pub use cache::{CachedResource, MemoryCache, ResourceCache};
pub use controller::{SyncController, SyncHandle};
pub use error_log::{ErrorLog, DEFAULT_ERROR_CAPACITY};
pub use resources::{default_endpoints, Endpoint};
pub use transport::{HttpTransport, Transport, DEFAULT_REQUEST_TIMEOUT};
pub use types::{
    BatchOutcome, CacheOp, SyncSettings, SyncStatus, SyncTrigger, TrackedResourceSet,
    DEFAULT_SYNC_INTERVAL,
};
