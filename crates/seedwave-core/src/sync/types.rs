//! Core types for resource synchronization.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::sync::error_log::{ErrorLog, DEFAULT_ERROR_CAPACITY};

/// Default period between automatic sync batches.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(3000);

/// What started a sync batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    /// Timer tick of an active controller.
    Periodic,
    /// Explicit `force_sync` call.
    Manual,
}

impl SyncTrigger {
    /// Prefix used for the aggregated error message of a failed batch.
    pub fn error_prefix(&self) -> &'static str {
        match self {
            SyncTrigger::Periodic => "Sync error: ",
            SyncTrigger::Manual => "Force sync error: ",
        }
    }

    /// Cache operation issued for each key by this trigger.
    pub fn cache_op(&self) -> CacheOp {
        match self {
            SyncTrigger::Periodic => CacheOp::Invalidate,
            SyncTrigger::Manual => CacheOp::Refetch,
        }
    }
}

/// Per-key cache operation dispatched during a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOp {
    /// Mark stale and refetch in the background.
    Invalidate,
    /// Refetch regardless of staleness.
    Refetch,
}

/// Ordered, duplicate-free, non-empty list of resource keys.
///
/// Order is the dispatch order of every batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedResourceSet(Vec<String>);

impl TrackedResourceSet {
    pub fn new<I, S>(keys: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if key.trim().is_empty() {
                return Err(SyncError::InvalidSettings("resource key is empty".into()));
            }
            if out.contains(&key) {
                return Err(SyncError::InvalidSettings(format!(
                    "resource key '{key}' is tracked twice"
                )));
            }
            out.push(key);
        }
        if out.is_empty() {
            return Err(SyncError::InvalidSettings(
                "at least one resource key is required".into(),
            ));
        }
        Ok(Self(out))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Controller settings, validated at activation.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub keys: Vec<String>,
    pub interval: Duration,
    pub error_capacity: usize,
}

impl SyncSettings {
    pub fn new<I, S>(keys: I, interval: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            interval,
            error_capacity: DEFAULT_ERROR_CAPACITY,
        }
    }

    pub fn with_error_capacity(mut self, capacity: usize) -> Self {
        self.error_capacity = capacity;
        self
    }

    /// Check preconditions and produce the tracked set.
    pub fn validate(&self) -> Result<TrackedResourceSet, SyncError> {
        if self.interval.is_zero() {
            return Err(SyncError::InvalidSettings(
                "sync interval must be greater than zero".into(),
            ));
        }
        if self.error_capacity == 0 {
            return Err(SyncError::InvalidSettings(
                "error capacity must be at least 1".into(),
            ));
        }
        TrackedResourceSet::new(self.keys.iter().cloned())
    }
}

/// Observable sync status.
///
/// Replaced as a whole at the end of every batch; readers never see a
/// timestamp from one batch paired with the counter of another.
///
/// Serialized with an `error_capacity` field next to `errors` so a snapshot
/// restores with the same log bound it was taken with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StatusRecord", from = "StatusRecord")]
pub struct SyncStatus {
    /// Whether the most recent batch completed without error.
    pub connected: bool,
    /// When the most recent batch finished, success or failure.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Completed batches since activation.
    pub sync_count: u64,
    /// Most recent failure messages, oldest first.
    pub errors: ErrorLog,
}

impl SyncStatus {
    /// Fresh status for a newly activated controller.
    pub fn new(error_capacity: usize) -> Self {
        Self {
            connected: true,
            last_sync_at: None,
            sync_count: 0,
            errors: ErrorLog::with_capacity(error_capacity),
        }
    }

    /// Fold one finished batch into the status.
    pub fn record(&mut self, outcome: &BatchOutcome) {
        self.connected = outcome.is_success();
        self.last_sync_at = Some(outcome.finished_at);
        self.sync_count += 1;
        if let Some(detail) = &outcome.error {
            self.errors
                .push(format!("{}{}", outcome.trigger.error_prefix(), detail));
        }
    }

    /// Badge text for presentation surfaces.
    pub fn badge(&self) -> &'static str {
        if self.connected {
            "ONLINE"
        } else {
            "OFFLINE"
        }
    }
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_CAPACITY)
    }
}

/// Wire form of [`SyncStatus`].
#[derive(Serialize, Deserialize)]
struct StatusRecord {
    connected: bool,
    last_sync_at: Option<DateTime<Utc>>,
    sync_count: u64,
    errors: Vec<String>,
    #[serde(default = "default_error_capacity")]
    error_capacity: usize,
}

fn default_error_capacity() -> usize {
    DEFAULT_ERROR_CAPACITY
}

impl From<SyncStatus> for StatusRecord {
    fn from(status: SyncStatus) -> Self {
        Self {
            connected: status.connected,
            last_sync_at: status.last_sync_at,
            sync_count: status.sync_count,
            error_capacity: status.errors.capacity(),
            errors: status.errors.to_vec(),
        }
    }
}

impl From<StatusRecord> for SyncStatus {
    fn from(record: StatusRecord) -> Self {
        Self {
            connected: record.connected,
            last_sync_at: record.last_sync_at,
            sync_count: record.sync_count,
            errors: ErrorLog::from_entries(record.error_capacity, record.errors),
        }
    }
}

/// Result of one sync batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub trigger: SyncTrigger,
    /// Number of keys dispatched.
    pub dispatched: usize,
    /// Keys whose operation failed, in dispatch order.
    pub failed_keys: Vec<String>,
    /// Detail of the last failing key, if any key failed.
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
