//! Sync subcommand: run and observe the resource sync loop.
//!
//! This is the status indicator surface of the CLI: it renders the
//! controller's status as an ONLINE/OFFLINE badge with the latest error.

use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use seedwave_core::error::Result;
use seedwave_core::{Config, MemoryCache, SyncController, SyncHandle, SyncStatus};

/// Sync actions.
#[derive(Subcommand)]
pub enum SyncAction {
    /// Refresh every tracked resource once and print the resulting status
    Once {
        /// Output status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the periodic sync loop and print each status change
    Watch {
        /// Override the configured interval
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Stop after this many batches
        #[arg(long)]
        ticks: Option<u64>,
        /// Output each status as a JSON line
        #[arg(long)]
        json: bool,
    },
    /// Show the configured sync settings without touching the network
    Status,
}

/// Run the sync command.
pub fn run(action: SyncAction) -> Result<()> {
    let config = Config::load()?;

    match action {
        SyncAction::Once { json } => {
            let rt = tokio::runtime::Runtime::new()?;
            let status = rt.block_on(run_once(&config))?;
            print_status(&status, json)?;
        }
        SyncAction::Watch {
            interval_ms,
            ticks,
            json,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_watch(&config, interval_ms, ticks, json))?;
        }
        SyncAction::Status => show_settings(&config),
    }
    Ok(())
}

fn activate(
    config: &Config,
    interval_ms: Option<u64>,
) -> Result<SyncHandle> {
    let transport = config.http_transport()?;
    let cache = Arc::new(MemoryCache::new(transport, config.sync_settings().keys));

    let mut settings = config.sync_settings();
    if let Some(ms) = interval_ms {
        settings.interval = Duration::from_millis(ms);
    }
    tracing::debug!(base_url = %config.api.base_url, keys = settings.keys.len(), "activating sync");
    Ok(SyncController::activate(cache, settings)?)
}

async fn run_once(config: &Config) -> Result<SyncStatus> {
    let handle = activate(config, None)?;
    handle.force_sync().await;
    handle.deactivate();
    Ok(handle.status())
}

async fn run_watch(
    config: &Config,
    interval_ms: Option<u64>,
    ticks: Option<u64>,
    json: bool,
) -> Result<()> {
    let handle = activate(config, interval_ms)?;
    let mut rx = handle.subscribe();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = rx.borrow_and_update().clone();
                print_status(&status, json)?;
                if ticks.is_some_and(|limit| status.sync_count >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.deactivate();
    Ok(())
}

fn print_status(status: &SyncStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(status)?);
    } else {
        println!("{}", render_status(status));
    }
    Ok(())
}

/// One-line badge rendering of a status.
pub fn render_status(status: &SyncStatus) -> String {
    let last = status
        .last_sync_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut line = format!("[{}] syncs={} last={}", status.badge(), status.sync_count, last);
    if !status.connected {
        if let Some(err) = status.errors.latest() {
            line.push_str(" | ");
            line.push_str(err);
        }
    }
    line
}

fn show_settings(config: &Config) {
    println!("interval:       {} ms", config.sync.interval_ms);
    println!("error capacity: {}", config.sync.error_capacity);
    println!("base url:       {}", config.api.base_url);
    println!("timeout:        {} ms", config.api.request_timeout_ms);
    println!("resources:");
    for endpoint in &config.resources {
        println!("  {} -> {}", endpoint.key, endpoint.path);
    }
}
