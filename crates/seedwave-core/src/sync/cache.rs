//! Resource cache keyed by resource identifier.
//!
//! The sync controller only needs two per-key operations from a cache:
//! invalidate (mark stale, then refetch) and force refetch. Both resolve once
//! the underlying fetch settles.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::sync::transport::Transport;
use crate::sync::types::CacheOp;

/// Cache operations consumed by the sync controller.
#[async_trait]
pub trait ResourceCache: Send + Sync {
    /// Mark `key` stale and refetch it.
    async fn invalidate(&self, key: &str) -> Result<(), SyncError>;

    /// Refetch `key` regardless of staleness.
    async fn refetch(&self, key: &str) -> Result<(), SyncError>;

    /// Keys this cache currently tracks.
    fn tracked_keys(&self) -> Vec<String>;

    /// Refetch every tracked key concurrently and report the last failure.
    async fn refetch_all(&self) -> Result<(), SyncError> {
        let keys = self.tracked_keys();
        let results = join_all(keys.iter().map(|key| self.refetch(key))).await;
        match results.into_iter().filter_map(Result::err).last() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Dispatch `op` for `key`.
    async fn apply(&self, op: CacheOp, key: &str) -> Result<(), SyncError> {
        match op {
            CacheOp::Invalidate => self.invalidate(key).await,
            CacheOp::Refetch => self.refetch(key).await,
        }
    }
}

/// A cached value and its freshness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResource {
    pub value: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
}

/// In-memory cache that refreshes entries through a [`Transport`].
///
/// A failed refresh keeps the previous value and leaves it marked stale.
pub struct MemoryCache<T> {
    transport: T,
    keys: Vec<String>,
    entries: RwLock<HashMap<String, CachedResource>>,
}

impl<T: Transport> MemoryCache<T> {
    pub fn new<I, S>(transport: T, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            transport,
            keys: keys.into_iter().map(Into::into).collect(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Current entry for `key`, if it has ever been fetched.
    pub fn get(&self, key: &str) -> Option<CachedResource> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Whether `key` is stale. Never-fetched keys count as stale.
    pub fn is_stale(&self, key: &str) -> bool {
        self.get(key).map_or(true, |entry| entry.stale)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn mark_stale(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(key) {
            entry.stale = true;
        }
    }

    async fn fetch_into(&self, key: &str) -> Result<(), SyncError> {
        match self.transport.fetch(key).await {
            Ok(value) => {
                let entry = CachedResource {
                    value,
                    fetched_at: Utc::now(),
                    stale: false,
                };
                self.entries
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.to_string(), entry);
                Ok(())
            }
            Err(err) => {
                self.mark_stale(key);
                Err(err)
            }
        }
    }
}

#[async_trait]
impl<T: Transport> ResourceCache for MemoryCache<T> {
    async fn invalidate(&self, key: &str) -> Result<(), SyncError> {
        self.mark_stale(key);
        self.fetch_into(key).await
    }

    async fn refetch(&self, key: &str) -> Result<(), SyncError> {
        self.fetch_into(key).await
    }

    fn tracked_keys(&self) -> Vec<String> {
        self.keys.clone()
    }
}
