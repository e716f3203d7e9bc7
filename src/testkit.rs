// Shared fixtures for unit tests.
use chrono::{DateTime, TimeZone, Utc};

use crate::model::{
    BundleCandidate, BundleFlags, Coupon, DiscountType, ListingRow, PriceHistoryPoint, RawListing,
    RetailerMeta,
};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn retailer(id: &str, name: &str) -> RetailerMeta {
    RetailerMeta {
        id: id.to_string(),
        name: name.to_string(),
        base_url: format!("https://{id}.example.com"),
        is_active: true,
        description: None,
        ships_from: None,
        return_policy: None,
        authorized_dealer: true,
    }
}

pub fn listing(id: &str, retailer_id: &str, price: f64) -> RawListing {
    RawListing {
        id: id.to_string(),
        product_id: "p1".to_string(),
        retailer_id: retailer_id.to_string(),
        price,
        compare_at_price: None,
        currency: "USD".to_string(),
        in_stock: true,
        on_sale: false,
        product_url: Some(format!("https://shop.example.com/{id}")),
        affiliate_url: None,
        external_id: format!("ext-{id}"),
        last_checked: base_time(),
        offer_title: None,
    }
}

pub fn titled_listing(id: &str, retailer_id: &str, price: f64, title: &str) -> RawListing {
    let mut l = listing(id, retailer_id, price);
    l.offer_title = Some(title.to_string());
    l
}

pub fn row(listing: RawListing, retailer: RetailerMeta) -> ListingRow {
    ListingRow { listing, retailer }
}

pub fn history_point(retailer_id: &str, price: f64, recorded_at: DateTime<Utc>) -> PriceHistoryPoint {
    PriceHistoryPoint {
        retailer_id: retailer_id.to_string(),
        price,
        recorded_at,
    }
}

pub fn coupon(id: &str, retailer_id: &str, expires_at: Option<DateTime<Utc>>) -> Coupon {
    Coupon {
        id: id.to_string(),
        retailer_id: retailer_id.to_string(),
        code: format!("CODE-{id}"),
        description: "10% off".to_string(),
        discount_type: DiscountType::Percentage,
        discount_value: 10.0,
        auto_apply_url: None,
        expires_at,
        is_active: true,
    }
}

pub fn bundle_candidate(id: &str, retailer_id: &str, title: &str) -> BundleCandidate {
    BundleCandidate {
        id: id.to_string(),
        retailer_id: retailer_id.to_string(),
        title: title.to_string(),
        price: Some(299.0),
        in_stock: true,
        product_url: Some(format!("https://shop.example.com/bundle/{id}")),
        affiliate_url: None,
        flags: BundleFlags::default(),
    }
}
