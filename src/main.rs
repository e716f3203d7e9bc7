mod config;
mod engine;
mod model;
mod normalizer;
mod provider;
mod service;
#[cfg(test)]
mod testkit;

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Notify;
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};

use config::{AppConfig, ProductConfig, load_config};
use engine::EngineWindows;
use model::{DealView, Trend};
use provider::SnapshotProvider;
use service::{DealService, RefreshOutcome};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Log details about any panic before the process dies
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {panic_info:?}");
    }));

    // Load configuration from file
    let config: Arc<AppConfig> = match load_config("config.json") {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {e}");
            return;
        }
    };

    let windows = EngineWindows {
        staleness: chrono::Duration::hours(config.staleness_hours),
        trend: chrono::Duration::days(config.trend_window_days),
    };
    let provider = Arc::new(SnapshotProvider::new(config.snapshot_dir.clone()));
    let service = Arc::new(DealService::new(provider, windows));

    // Manual refresh (SIGHUP) rides the same Notify the timer races against
    let refresh_notify = Arc::new(Notify::new());
    spawn_refresh_listener(refresh_notify.clone());

    info!(
        "🚀 deal-radar started, watching {} products",
        config.products.len()
    );

    // Main processing loop
    loop {
        // A new cycle supersedes whatever is still in flight from the last one
        let cycle = service.begin_cycle();

        let tasks: Vec<_> = config
            .products
            .iter()
            .map(|product| process_product(product, service.clone(), cycle))
            .collect();
        join_all(tasks).await;

        info!(
            "Waiting for timer ({}s) or manual refresh...",
            config.check_interval_seconds
        );
        tokio::select! {
            _ = sleep(Duration::from_secs(config.check_interval_seconds)) => {
                info!("Timer triggered.");
            }
            _ = refresh_notify.notified() => {
                info!("Manual refresh triggered.");
            }
        }
    }
}

#[cfg(unix)]
fn spawn_refresh_listener(notify: Arc<Notify>) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("SIGHUP listener unavailable: {e}");
                return;
            }
        };
        while hangup.recv().await.is_some() {
            notify.notify_one();
        }
    });
}

#[cfg(not(unix))]
fn spawn_refresh_listener(_notify: Arc<Notify>) {}

/// Refreshes one product and reports the resulting deal view. Superseded
/// refreshes are dropped on the floor by design.
async fn process_product(
    product: &ProductConfig,
    service: Arc<DealService<SnapshotProvider>>,
    cycle: u64,
) {
    info!("Processing product: {}", product.name);
    match service.refresh(product, cycle, Utc::now()).await {
        Ok(RefreshOutcome::View(view)) => report_view(product, &view),
        Ok(RefreshOutcome::Superseded) => {
            info!("Discarding superseded refresh for {}", product.product_id);
        }
        Err(e) => {
            warn!("Listings fetch failed for {}: {e}", product.product_id);
        }
    }
}

fn report_view(product: &ProductConfig, view: &DealView) {
    if view.annotations.is_empty() {
        info!("{}: no active listings", product.name);
        return;
    }
    if view.is_stale {
        warn!(
            "{}: price data is stale (last checked {:?})",
            product.name, view.last_checked_overall
        );
    }
    if let Some(lowest) = view.global_lowest {
        info!("{}: lowest current price {:.2}", product.name, lowest);
    }

    for annotation in &view.annotations {
        let offer = &annotation.offer;
        let insight_note = match &annotation.insight {
            Some(insight) => {
                let trend = match insight.trend {
                    Trend::Up => "up",
                    Trend::Down => "down",
                    Trend::Stable => "stable",
                };
                let low = if insight.is_all_time_low {
                    ", all-time low"
                } else {
                    ""
                };
                format!(" | trend {trend}{low}")
            }
            None => String::new(),
        };
        info!(
            "  {} — {:.2} {} | {} variant(s), {} coupon(s), {} bundle(s){}",
            offer.retailer.name,
            offer.best.price,
            offer.best.currency,
            offer.variants.len(),
            annotation.coupons.len(),
            annotation.bundles.len(),
            insight_note
        );
    }
}
