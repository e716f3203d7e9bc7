use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;

use crate::model::{BundleCandidate, Coupon, ListingRow, PriceHistoryPoint, ProviderError};
use crate::provider::traits::DealDataProvider;

/// On-disk snapshot document for one product: the four row sets the
/// out-of-scope data layer would have queried.
#[derive(Debug, Default, Deserialize)]
pub struct ProductSnapshot {
    #[serde(default)]
    pub listings: Vec<ListingRow>,
    #[serde(default)]
    pub price_history: Vec<PriceHistoryPoint>,
    #[serde(default)]
    pub bundle_candidates: Vec<BundleCandidate>,
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

/// Reads `<dir>/<product_id>.json` per fetch. Each of the four fetches loads
/// the file independently, matching the four-independent-queries contract.
pub struct SnapshotProvider {
    dir: PathBuf,
}

impl SnapshotProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn load(&self, product_id: &str) -> Result<ProductSnapshot, ProviderError> {
        let path = self.dir.join(format!("{product_id}.json"));
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ProviderError::NotFound(product_id.to_string())
            } else {
                ProviderError::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait::async_trait]
impl DealDataProvider for SnapshotProvider {
    async fn fetch_listings(&self, product_id: &str) -> Result<Vec<ListingRow>, ProviderError> {
        Ok(self.load(product_id).await?.listings)
    }

    async fn fetch_price_history(
        &self,
        product_id: &str,
    ) -> Result<Vec<PriceHistoryPoint>, ProviderError> {
        Ok(self.load(product_id).await?.price_history)
    }

    async fn fetch_bundle_candidates(
        &self,
        product_id: &str,
    ) -> Result<Vec<BundleCandidate>, ProviderError> {
        Ok(self.load(product_id).await?.bundle_candidates)
    }

    async fn fetch_coupons(&self, product_id: &str) -> Result<Vec<Coupon>, ProviderError> {
        Ok(self.load(product_id).await?.coupons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json() -> &'static str {
        r#"{
            "listings": [
                {
                    "listing": {
                        "id": "l1",
                        "product_id": "p1",
                        "retailer_id": "r1",
                        "price": 199.0,
                        "currency": "USD",
                        "in_stock": true,
                        "external_id": "ext-1",
                        "last_checked": "2025-06-01T12:00:00Z",
                        "offer_title": "Widget X200 - Matte Black"
                    },
                    "retailer": {
                        "id": "r1",
                        "name": "Audio Haus",
                        "base_url": "https://audiohaus.example.com",
                        "is_active": true
                    }
                }
            ],
            "price_history": [
                { "retailer_id": "r1", "price": 220.0, "recorded_at": "2025-04-01T00:00:00Z" }
            ],
            "coupons": [
                {
                    "id": "c1",
                    "retailer_id": "r1",
                    "code": "SAVE10",
                    "description": "10% off",
                    "discount_type": "percentage",
                    "discount_value": 10.0
                }
            ]
        }"#
    }

    #[tokio::test]
    async fn loads_all_row_sets_from_a_product_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("p1.json"), snapshot_json()).unwrap();
        let provider = SnapshotProvider::new(dir.path());

        let listings = provider.fetch_listings("p1").await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(
            listings[0].listing.offer_title.as_deref(),
            Some("Widget X200 - Matte Black")
        );

        let history = provider.fetch_price_history("p1").await.unwrap();
        assert_eq!(history.len(), 1);

        // Absent sections deserialize as empty row sets, not as errors.
        let bundles = provider.fetch_bundle_candidates("p1").await.unwrap();
        assert!(bundles.is_empty());

        let coupons = provider.fetch_coupons("p1").await.unwrap();
        assert_eq!(coupons[0].code, "SAVE10");
        assert!(coupons[0].is_active);
    }

    #[tokio::test]
    async fn missing_product_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SnapshotProvider::new(dir.path());

        let err = provider.fetch_listings("nope").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn malformed_snapshot_maps_to_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("p1.json"), "{ not json").unwrap();
        let provider = SnapshotProvider::new(dir.path());

        let err = provider.fetch_listings("p1").await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
