// Core structs: retailer/listing rows in, deal view model out.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerMeta {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ships_from: Option<String>,
    #[serde(default)]
    pub return_policy: Option<String>,
    #[serde(default)]
    pub authorized_dealer: bool,
}

/// One retailer's current offer row for a product. Several rows may share a
/// `retailer_id` when the retailer lists SKU variants under separate rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    pub id: String,
    pub product_id: String,
    pub retailer_id: String,
    pub price: f64,
    #[serde(default)]
    pub compare_at_price: Option<f64>,
    pub currency: String,
    pub in_stock: bool,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub affiliate_url: Option<String>,
    pub external_id: String,
    pub last_checked: DateTime<Utc>,
    #[serde(default)]
    pub offer_title: Option<String>,
}

/// Listing row as the data layer returns it: joined with its retailer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRow {
    pub listing: RawListing,
    pub retailer: RetailerMeta,
}

/// Append-only price observation, one series per (product, retailer),
/// supplied ascending by `recorded_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryPoint {
    pub retailer_id: String,
    pub price: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
    FreeShipping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub retailer_id: String,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub auto_apply_url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleFlags {
    #[serde(default)]
    pub discontinued: bool,
}

/// A store-product row associated with the product that may turn out to be a
/// kit/bundle rather than a plain listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleCandidate {
    pub id: String,
    pub retailer_id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    pub in_stock: bool,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub affiliate_url: Option<String>,
    #[serde(default)]
    pub flags: BundleFlags,
}

/// One labeled row inside a logical offer. Labels are unique per offer.
#[derive(Debug, Clone, Serialize)]
pub struct OfferVariant {
    pub label: String,
    pub listing: RawListing,
}

/// One retailer's listing after grouping same-SKU-family variants together.
/// All variant listings carry this retailer's id; `best` is picked by the
/// best-offer order over the variants.
#[derive(Debug, Clone, Serialize)]
pub struct LogicalOffer {
    pub retailer: RetailerMeta,
    pub base_title: Option<String>,
    pub model_label: Option<String>,
    pub variants: Vec<OfferVariant>,
    pub best: RawListing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Historical deal insight for one retailer; only exists when the retailer
/// has at least one history point.
#[derive(Debug, Clone, Serialize)]
pub struct PriceInsight {
    pub retailer_id: String,
    pub current_price: f64,
    pub lowest_ever: f64,
    pub lowest_ever_date: DateTime<Utc>,
    pub is_all_time_low: bool,
    pub price_change_pct: Option<f64>,
    pub trend: Trend,
}

/// Bundle row plus the extracted "what does the bundle add" text.
#[derive(Debug, Clone, Serialize)]
pub struct BundleOffer {
    pub candidate: BundleCandidate,
    pub description: String,
}

/// Final per-retailer view model: the grouped offer with its insight,
/// coupons and bundle sub-rows attached.
#[derive(Debug, Clone, Serialize)]
pub struct DealAnnotation {
    pub offer: LogicalOffer,
    pub insight: Option<PriceInsight>,
    pub coupons: Vec<Coupon>,
    pub bundles: Vec<BundleOffer>,
}

/// The decision-ready view for one product.
#[derive(Debug, Clone, Serialize)]
pub struct DealView {
    pub annotations: Vec<DealAnnotation>,
    pub global_lowest: Option<f64>,
    pub last_checked_overall: Option<DateTime<Utc>>,
    pub is_stale: bool,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("snapshot read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no snapshot for product {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
