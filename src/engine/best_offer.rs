use std::cmp::Ordering;

use crate::model::RawListing;

/// Total order used everywhere a single "best" row has to be picked: in-stock
/// rows first, then lower price, then more recently checked. Full ties are
/// left unresolved; either side is an acceptable winner.
pub fn compare_listings(a: &RawListing, b: &RawListing) -> Ordering {
    b.in_stock
        .cmp(&a.in_stock)
        .then_with(|| a.price.total_cmp(&b.price))
        .then_with(|| b.last_checked.cmp(&a.last_checked))
}

/// Picks the best listing among competing rows. None only on empty input.
pub fn select_best<'a, I>(listings: I) -> Option<&'a RawListing>
where
    I: IntoIterator<Item = &'a RawListing>,
{
    listings.into_iter().min_by(|a, b| compare_listings(a, b))
}
