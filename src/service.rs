use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config::ProductConfig;
use crate::engine::{EngineWindows, build_deal_view};
use crate::model::{DealView, ProviderError};
use crate::provider::DealDataProvider;

/// Result of one refresh. A refresh that lost the race to a newer cycle is
/// discarded, not an error: its view must never overwrite newer state.
#[derive(Debug)]
pub enum RefreshOutcome {
    View(DealView),
    Superseded,
}

/// Runs the four snapshot fetches for a product concurrently and folds them
/// through the engine. Only a listings failure is user-visible; the other
/// three row sets degrade to empty so the rest of the view still renders.
pub struct DealService<P> {
    provider: Arc<P>,
    windows: EngineWindows,
    generation: AtomicU64,
}

impl<P: DealDataProvider> DealService<P> {
    pub fn new(provider: Arc<P>, windows: EngineWindows) -> Self {
        Self {
            provider,
            windows,
            generation: AtomicU64::new(0),
        }
    }

    /// Starts a new refresh cycle. Any refresh still in flight from an older
    /// cycle will come back as `Superseded`.
    pub fn begin_cycle(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn refresh(
        &self,
        product: &ProductConfig,
        cycle: u64,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome, ProviderError> {
        let product_id = product.product_id.as_str();

        let (listings, history, bundles, coupons) = tokio::join!(
            self.provider.fetch_listings(product_id),
            self.provider.fetch_price_history(product_id),
            self.provider.fetch_bundle_candidates(product_id),
            self.provider.fetch_coupons(product_id),
        );

        // The primary fetch: its failure is the error state, distinct from
        // the legitimate "fetched successfully, zero rows".
        let listings = listings?;

        let history = history.unwrap_or_else(|e| {
            warn!("price history fetch failed for {product_id}: {e}");
            Vec::new()
        });
        let bundles = bundles.unwrap_or_else(|e| {
            warn!("bundle fetch failed for {product_id}: {e}");
            Vec::new()
        });
        let coupons = coupons.unwrap_or_else(|e| {
            warn!("coupon fetch failed for {product_id}: {e}");
            Vec::new()
        });

        if self.generation.load(Ordering::SeqCst) != cycle {
            return Ok(RefreshOutcome::Superseded);
        }

        Ok(RefreshOutcome::View(build_deal_view(
            listings,
            history,
            bundles,
            coupons,
            &product.name,
            now,
            self.windows,
        )))
    }
}
