use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::model::Coupon;

/// Groups active, unexpired coupons by retailer, restricted to the retailers
/// present in the view. Source order is kept within a retailer's list.
pub fn match_coupons(
    coupons: Vec<Coupon>,
    retailer_ids: &HashSet<String>,
    now: DateTime<Utc>,
) -> HashMap<String, Vec<Coupon>> {
    let mut grouped: HashMap<String, Vec<Coupon>> = HashMap::new();

    for coupon in coupons {
        if !coupon.is_active || !retailer_ids.contains(&coupon.retailer_id) {
            continue;
        }
        if let Some(expires_at) = coupon.expires_at {
            if expires_at <= now {
                continue;
            }
        }
        grouped
            .entry(coupon.retailer_id.clone())
            .or_default()
            .push(coupon);
    }

    grouped
}
