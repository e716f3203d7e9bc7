// Deal engine: pure transformations from row snapshots to the ranked,
// annotated per-retailer view. Submodules own one concern each; this module
// runs the merge.

pub mod best_offer;
pub mod bundles;
pub mod coupons;
pub mod insights;
pub mod variants;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::model::{
    BundleCandidate, BundleOffer, Coupon, DealAnnotation, DealView, ListingRow, PriceHistoryPoint,
};
use crate::normalizer::normalize_listings;

/// Time windows the engine evaluates against. Defaults are the product
/// contract: 72h staleness, 30-day trend reference.
#[derive(Debug, Clone, Copy)]
pub struct EngineWindows {
    pub staleness: Duration,
    pub trend: Duration,
}

impl Default for EngineWindows {
    fn default() -> Self {
        Self {
            staleness: Duration::hours(72),
            trend: Duration::days(30),
        }
    }
}

/// Most recent price check across the product's active listings.
pub fn last_checked_overall(rows: &[ListingRow]) -> Option<DateTime<Utc>> {
    rows.iter().map(|row| row.listing.last_checked).max()
}

/// A product with listings is stale once the freshest check falls out of the
/// staleness window. A product with no listings is never stale.
pub fn is_stale(
    last_checked: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    matches!(last_checked, Some(t) if t < now - window)
}

/// Builds the decision-ready view for one product from the four row
/// snapshots. Pure: same snapshots and `now` always produce the same view.
pub fn build_deal_view(
    listings: Vec<ListingRow>,
    history: Vec<PriceHistoryPoint>,
    bundle_candidates: Vec<BundleCandidate>,
    coupons: Vec<Coupon>,
    product_name: &str,
    now: DateTime<Utc>,
    windows: EngineWindows,
) -> DealView {
    let rows = normalize_listings(listings);
    let last_checked = last_checked_overall(&rows);
    let stale = is_stale(last_checked, now, windows.staleness);

    let offers = variants::group_offers(rows);

    let mut insight_map = insights::compute_insights(&history, &offers, now, windows.trend);
    let global_lowest = insights::global_lowest(&insight_map);

    let retailer_ids: HashSet<String> = offers.iter().map(|o| o.retailer.id.clone()).collect();
    let mut coupon_map = coupons::match_coupons(coupons, &retailer_ids, now);

    let mut bundle_map: HashMap<String, Vec<BundleOffer>> = HashMap::new();
    for bundle in bundles::classify_bundles(bundle_candidates, product_name) {
        bundle_map
            .entry(bundle.candidate.retailer_id.clone())
            .or_default()
            .push(bundle);
    }

    // One annotation per logical offer; a retailer's coupons, bundles and
    // insight ride on its top-ranked offer so nothing shows twice.
    let mut seen_retailers: HashSet<String> = HashSet::new();
    let annotations: Vec<DealAnnotation> = offers
        .into_iter()
        .map(|offer| {
            let retailer_id = offer.retailer.id.clone();
            let first_for_retailer = seen_retailers.insert(retailer_id.clone());
            DealAnnotation {
                insight: if first_for_retailer {
                    insight_map.remove(&retailer_id)
                } else {
                    None
                },
                coupons: if first_for_retailer {
                    coupon_map.remove(&retailer_id).unwrap_or_default()
                } else {
                    Vec::new()
                },
                bundles: if first_for_retailer {
                    bundle_map.remove(&retailer_id).unwrap_or_default()
                } else {
                    Vec::new()
                },
                offer,
            }
        })
        .collect();

    DealView {
        annotations,
        global_lowest,
        last_checked_overall: last_checked,
        is_stale: stale,
    }
}
