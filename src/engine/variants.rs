use std::collections::{HashMap, HashSet};

use crate::engine::best_offer::{compare_listings, select_best};
use crate::model::{ListingRow, LogicalOffer, OfferVariant, RawListing, RetailerMeta};

/// Retailers list color/trim variants as separate rows whose titles differ
/// only in a trailing segment, e.g. "Widget X200 - Matte Black".
const TITLE_SEPARATOR: &str = " - ";

/// Finish names that count as an actual color. A trailing segment only
/// becomes a variant label when at least one of its tokens is in this list.
const COLOR_WORDS: &[&str] = &[
    "black", "white", "silver", "gold", "red", "blue", "green", "gray", "grey", "orange",
    "yellow", "purple", "violet", "pink", "brown", "tan", "beige", "cream", "ivory", "bronze",
    "copper", "chrome", "nickel", "gunmetal", "graphite", "charcoal", "slate", "teal",
    "turquoise", "burgundy", "maroon", "navy", "olive", "champagne", "rose", "walnut", "oak",
    "cherry", "maple", "mahogany", "ebony", "rosewood", "bamboo", "clear", "transparent",
    "smoke",
];

/// Modifiers that may accompany a color in a finish label ("Matte Black",
/// "Midnight Blue") but are never a variant label on their own.
const FINISH_WORDS: &[&str] = &[
    "matte", "matt", "gloss", "glossy", "satin", "brushed", "polished", "anodized", "metallic",
    "dark", "light", "deep", "midnight", "space", "natural", "vintage", "arctic",
];

/// True when every token of the segment is the conjunction "and" or a known
/// color/finish word, and at least one token is an actual color.
fn is_color_label(segment: &str) -> bool {
    let mut saw_color = false;
    for token in segment
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
    {
        let token = token.to_lowercase();
        if COLOR_WORDS.contains(&token.as_str()) {
            saw_color = true;
        } else if token != "and" && !FINISH_WORDS.contains(&token.as_str()) {
            return false;
        }
    }
    saw_color
}

/// Splits a listing title into (base title, variant label). The label is only
/// present when the title has at least two " - " segments and the last one
/// passes the color/finish test; otherwise the whole title is the base.
fn split_variant_title(title: &str) -> (Option<String>, Option<String>) {
    let segments: Vec<&str> = title
        .split(TITLE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        return (None, None);
    }

    if segments.len() >= 2 {
        let last = segments[segments.len() - 1];
        if is_color_label(last) {
            let base = segments[..segments.len() - 1].join(TITLE_SEPARATOR);
            return (Some(base), Some(last.to_string()));
        }
    }

    (Some(segments.join(TITLE_SEPARATOR)), None)
}

/// Display name for the model itself: the base title with its leading
/// brand/series segment dropped, when the base title is multi-segment.
fn model_label(base_title: &str) -> String {
    let segments: Vec<&str> = base_title.split(TITLE_SEPARATOR).collect();
    if segments.len() >= 2 {
        segments[1..].join(TITLE_SEPARATOR)
    } else {
        base_title.to_string()
    }
}

/// The URL a buyer actually lands on; listing id when no URL is present.
/// Two rows with the same buy target are the same SKU listed twice.
fn buy_target(listing: &RawListing) -> &str {
    listing
        .affiliate_url
        .as_deref()
        .or(listing.product_url.as_deref())
        .unwrap_or(&listing.id)
}

struct GroupDraft {
    retailer: RetailerMeta,
    base_title: Option<String>,
    entries: Vec<(Option<String>, RawListing)>,
}

/// Clusters same-retailer SKU rows into logical offers, ordered for display
/// by each group's best listing (retailer name breaks full ties).
pub fn group_offers(rows: Vec<ListingRow>) -> Vec<LogicalOffer> {
    let mut drafts: Vec<GroupDraft> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let (base_title, label) = match row.listing.offer_title.as_deref() {
            Some(title) => split_variant_title(title),
            None => (None, None),
        };

        // Rows without a usable base title get a per-listing key so they
        // never collapse into each other.
        let key = match &base_title {
            Some(base) => format!("{}|{}", row.retailer.id, base),
            None => format!("{}#{}", row.retailer.id, row.listing.id),
        };

        match index.get(&key) {
            Some(&i) => drafts[i].entries.push((label, row.listing)),
            None => {
                index.insert(key, drafts.len());
                drafts.push(GroupDraft {
                    retailer: row.retailer,
                    base_title,
                    entries: vec![(label, row.listing)],
                });
            }
        }
    }

    let mut offers: Vec<LogicalOffer> = drafts.into_iter().filter_map(build_offer).collect();

    offers.sort_by(|a, b| {
        compare_listings(&a.best, &b.best).then_with(|| a.retailer.name.cmp(&b.retailer.name))
    });
    offers
}

fn build_offer(draft: GroupDraft) -> Option<LogicalOffer> {
    let mut seen_targets: HashSet<String> = HashSet::new();
    let mut label_counts: HashMap<String, usize> = HashMap::new();
    let mut variants: Vec<OfferVariant> = Vec::new();

    for (label, listing) in draft.entries {
        // Retailers sometimes duplicate the exact same SKU under two rows.
        if !seen_targets.insert(buy_target(&listing).to_string()) {
            continue;
        }

        let label = label.unwrap_or_else(|| {
            if listing.offer_title.is_some() {
                "(default)".to_string()
            } else {
                "(listing)".to_string()
            }
        });

        let count = label_counts.entry(label.clone()).or_insert(0);
        *count += 1;
        let label = if *count > 1 {
            format!("{label} ({count})")
        } else {
            label
        };

        variants.push(OfferVariant { label, listing });
    }

    let best = select_best(variants.iter().map(|v| &v.listing))?.clone();
    let model_label = draft.base_title.as_deref().map(model_label);

    Some(LogicalOffer {
        retailer: draft.retailer,
        base_title: draft.base_title,
        model_label,
        variants,
        best,
    })
}
