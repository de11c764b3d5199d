//! # Seedwave Core Library
//!
//! Client-side synchronization for the Seedwave brand/sector portal. The CLI
//! binary is a thin presentation layer over the same library.
//!
//! ## Architecture
//!
//! - **Sync Controller**: periodic and on-demand refresh of a fixed set of
//!   resource keys, publishing one atomic status update per batch
//! - **Resource Cache**: key -> JSON value store with staleness tracking
//! - **Transport**: JSON-over-HTTP fetches for each resource key
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SyncController`]: starts the periodic loop and returns a [`SyncHandle`]
//! - [`SyncStatus`]: observable connectivity, counters and recent errors
//! - [`MemoryCache`]: in-memory [`ResourceCache`] over a [`Transport`]
//! - [`Config`]: application configuration management

pub mod error;
pub mod storage;
pub mod sync;

pub use error::{ConfigError, CoreError, SyncError};
pub use storage::Config;
pub use sync::{
    BatchOutcome, Endpoint, ErrorLog, HttpTransport, MemoryCache, ResourceCache, SyncController,
    SyncHandle, SyncSettings, SyncStatus, SyncTrigger, Transport,
};
