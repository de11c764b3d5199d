//! Synchronization controller.
//!
//! Keeps a fixed set of resource keys fresh in a [`ResourceCache`] through
//! two paths: a periodic timer that invalidates every key, and an explicit
//! [`SyncHandle::force_sync`] that force-refetches every key.
//!
//! Every sync batch dispatches one cache operation per key, joins all of them
//! without short-circuiting, and then publishes exactly one status update.
//!
//! ```text
//! tick ──> dispatch(k1..kn) ──> join all ──> record(outcome) ──> watch
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::sync::cache::ResourceCache;
use crate::sync::types::{BatchOutcome, SyncSettings, SyncStatus, SyncTrigger, TrackedResourceSet};

/// State shared between the periodic task and every handle.
struct Shared {
    cache: Arc<dyn ResourceCache>,
    keys: TrackedResourceSet,
    interval: Duration,
    status: watch::Sender<SyncStatus>,
}

impl Shared {
    async fn run_batch(&self, trigger: SyncTrigger) -> BatchOutcome {
        let op = trigger.cache_op();
        debug!(?trigger, ?op, keys = self.keys.len(), "dispatching sync batch");

        let pending: Vec<_> = self
            .keys
            .iter()
            .map(|key| self.cache.apply(op, key))
            .collect();
        let results = join_all(pending).await;

        let mut failed_keys = Vec::new();
        let mut error = None;
        for (key, result) in self.keys.iter().zip(results) {
            if let Err(err) = result {
                warn!(key, ?trigger, error = %err, "resource refresh failed");
                failed_keys.push(key.to_string());
                error = Some(err.detail());
            }
        }

        let outcome = BatchOutcome {
            trigger,
            dispatched: self.keys.len(),
            failed_keys,
            error,
            finished_at: Utc::now(),
        };
        self.publish(&outcome);
        outcome
    }

    fn publish(&self, outcome: &BatchOutcome) {
        let mut was_connected = true;
        let mut sync_count = 0;
        self.status.send_modify(|status| {
            was_connected = status.connected;
            status.record(outcome);
            sync_count = status.sync_count;
        });

        match (was_connected, outcome.is_success()) {
            (true, false) => warn!(
                sync_count,
                failed = outcome.failed_keys.len(),
                "sync went offline"
            ),
            (false, true) => info!(sync_count, "sync recovered"),
            _ => debug!(sync_count, success = outcome.is_success(), "sync batch finished"),
        }
    }
}

/// Entry point for starting a synchronization loop.
pub struct SyncController;

impl SyncController {
    /// Validate `settings` and start the periodic sync task.
    ///
    /// The first periodic batch runs one full interval after activation.
    /// Must be called from within a tokio runtime.
    pub fn activate(
        cache: Arc<dyn ResourceCache>,
        settings: SyncSettings,
    ) -> Result<SyncHandle, SyncError> {
        let keys = settings.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SyncError::Runtime(e.to_string()))?;

        let (status, _) = watch::channel(SyncStatus::new(settings.error_capacity));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let shared = Arc::new(Shared {
            cache,
            keys,
            interval: settings.interval,
            status,
        });

        runtime.spawn(periodic_loop(Arc::clone(&shared), shutdown_rx));
        info!(
            keys = shared.keys.len(),
            interval = ?settings.interval,
            "sync controller activated"
        );

        Ok(SyncHandle {
            shared,
            shutdown: Arc::new(shutdown),
        })
    }
}

async fn periodic_loop(shared: Arc<Shared>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = interval_at(Instant::now() + shared.interval, shared.interval);
    // One periodic batch in flight at a time; late ticks are pushed back, not burst.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                shared.run_batch(SyncTrigger::Periodic).await;
            }
        }
    }

    debug!("periodic sync loop stopped");
}

/// Handle to an active controller.
///
/// Clones share the same controller. The periodic task stops on
/// [`deactivate`](Self::deactivate) or when the last handle is dropped.
#[derive(Clone)]
pub struct SyncHandle {
    shared: Arc<Shared>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl SyncHandle {
    /// Stop scheduling periodic batches. Idempotent.
    ///
    /// A batch already in flight runs to completion and still updates the
    /// status.
    pub fn deactivate(&self) {
        let was_stopped = self.shutdown.send_replace(true);
        if !was_stopped {
            info!("sync controller deactivated");
        }
    }

    pub fn is_active(&self) -> bool {
        !*self.shutdown.borrow()
    }

    /// Run one batch now with force-refetch semantics.
    ///
    /// Never fails: per-key errors are folded into the status and the
    /// returned outcome.
    ///
    /// Issues a per-key [`ResourceCache::refetch`] for every tracked key
    /// rather than [`ResourceCache::refetch_all`], so each failing key is
    /// reported the same way the periodic path reports it.
    pub async fn force_sync(&self) -> BatchOutcome {
        self.shared.run_batch(SyncTrigger::Manual).await
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> SyncStatus {
        self.shared.status.borrow().clone()
    }

    /// Alias for `status().connected`.
    pub fn is_online(&self) -> bool {
        self.shared.status.borrow().connected
    }

    /// Receiver notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.shared.status.subscribe()
    }

    pub fn resource_keys(&self) -> &[String] {
        self.shared.keys.as_slice()
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }
}

impl std::fmt::Debug for SyncHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncHandle")
            .field("keys", &self.shared.keys)
            .field("interval", &self.shared.interval)
            .field("active", &self.is_active())
            .finish()
    }
}
