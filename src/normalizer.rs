use crate::model::ListingRow;

/// Drops rows whose retailer is inactive. Inactive retailers never reach the
/// grouping, insight or coupon stages; the row shape is otherwise untouched.
pub fn normalize_listings(rows: Vec<ListingRow>) -> Vec<ListingRow> {
    rows.into_iter()
        .filter(|row| row.retailer.is_active)
        .collect()
}
