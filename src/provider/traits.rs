use crate::model::{BundleCandidate, Coupon, ListingRow, PriceHistoryPoint, ProviderError};

/// The four independent row-set fetches for one product. Implementations are
/// queried concurrently; each call returns a complete immutable snapshot.
#[async_trait::async_trait]
pub trait DealDataProvider: Send + Sync {
    /// Listing rows joined with retailer metadata, one product.
    async fn fetch_listings(&self, product_id: &str) -> Result<Vec<ListingRow>, ProviderError>;

    /// Full price history for the product, all retailers, ascending by time.
    async fn fetch_price_history(
        &self,
        product_id: &str,
    ) -> Result<Vec<PriceHistoryPoint>, ProviderError>;

    /// Store-product rows associated with the product that may be bundles.
    async fn fetch_bundle_candidates(
        &self,
        product_id: &str,
    ) -> Result<Vec<BundleCandidate>, ProviderError>;

    /// Coupon rows for the product's retailers. The engine re-filters by the
    /// retailers actually present in the view, so over-fetching is fine.
    async fn fetch_coupons(&self, product_id: &str) -> Result<Vec<Coupon>, ProviderError>;
}
