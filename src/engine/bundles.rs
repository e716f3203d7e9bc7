use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{BundleCandidate, BundleOffer};

/// Title shapes that identify a kit/bundle listing. Kept as a data table so
/// the library can grow without touching the classification cascade.
static BUNDLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(bundle|kit|package|combo)\b",
        r"\binclud(es|ing)\b",
        r"\bfull system\b",
        r"\bstereo pair\b",
        r"\bpodcasting bundle\b",
        r"\bstreaming bundle\b",
        r"\bbroadcasting bundle\b",
        r"\brecording bundle\b",
        r"\bwith free\b",
        r"\bwith \w+ (cable|arm|stand|mount|filter|shock|case|bag|boom|clamp|adapter|windscreen|headphone|tripod|interface)s?\b",
        r"^\s*\+\s*\w+",
        r"\bfree \d",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("bundle pattern"))
    .collect()
});

/// Words that only ever show up in bundle titles for this catalog. A store
/// title containing one that the product name itself lacks is a bundle.
const BUNDLE_KEYWORDS: &[&str] = &[
    "bundle",
    "kit",
    "package",
    "combo",
    "free",
    "includes",
    "complete",
    "full system",
    "upgrade cable",
    "cloudlifter",
    "podcasting",
    "streaming",
    "broadcasting",
    "premium package",
    "starter",
    "stereo pair",
    "boom arm",
    "shock mount",
    "pop filter",
    "carrying case",
    "xlr cable",
];

/// First point inside a title suffix where the "what the bundle adds" text
/// starts: an indicator word, a "+", or an opening parenthesis.
static DESCRIPTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(with|and|bundle|kit|package|combo|set|free|includes?|including|complete|full system|upgrade|stereo)\b|\+|\(",
    )
    .expect("description indicator pattern")
});

static WITH_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bwith\b.*$").expect("with-suffix pattern"));

static PLUS_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\s*\S.*$").expect("plus-suffix pattern"));

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("parenthetical pattern"));

/// Lowercases, cuts everything after a literal '|', replaces non-alphanumeric
/// runs with single spaces.
fn normalize_title(raw: &str) -> String {
    let cut = raw.split('|').next().unwrap_or(raw);
    let mut out = String::with_capacity(cut.len());
    let mut previous_space = true;
    for ch in cut.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            previous_space = false;
        } else if !previous_space {
            out.push(' ');
            previous_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Decides whether a store-product title is a bundle of `product_name` plus
/// extras, or just the product itself. Total: any title yields a verdict.
pub fn is_bundle(store_title: &str, product_name: &str) -> bool {
    let store_norm = normalize_title(store_title);
    let product_norm = normalize_title(product_name);

    if store_norm == product_norm {
        return false;
    }
    // Bundles always add descriptive text; a title barely longer than the
    // product name is a reworded plain listing.
    if store_norm.len() <= product_norm.len() + 5 {
        return false;
    }

    if BUNDLE_PATTERNS.iter().any(|re| re.is_match(store_title)) {
        return true;
    }

    let store_lc = store_title.to_lowercase();
    let product_lc = product_name.to_lowercase();
    BUNDLE_KEYWORDS
        .iter()
        .any(|keyword| store_lc.contains(keyword) && !product_lc.contains(keyword))
}

/// Best-effort extraction of what the bundle adds on top of the product.
/// Never fails; the worst case returns the whole title unchanged.
pub fn extract_bundle_description(store_title: &str, product_name: &str) -> String {
    if !product_name.is_empty() {
        let store_lc = store_title.to_ascii_lowercase();
        let product_lc = product_name.to_ascii_lowercase();
        if let Some(pos) = store_lc.find(&product_lc) {
            let suffix = &store_title[pos + product_name.len()..];
            let from_indicator = match DESCRIPTION_START.find(suffix) {
                Some(m) => &suffix[m.start()..],
                None => suffix,
            };
            let cleaned = tidy_description(from_indicator);
            if !cleaned.is_empty() {
                return cleaned;
            }
        }
    }

    if let Some(m) = WITH_SUFFIX.find(store_title) {
        return tidy_description(m.as_str());
    }
    if let Some(m) = PLUS_SUFFIX.find(store_title) {
        return tidy_description(m.as_str());
    }
    for captures in PARENTHETICAL.captures_iter(store_title) {
        let inner = captures[1].trim();
        let inner_lc = inner.to_lowercase();
        if BUNDLE_KEYWORDS.iter().any(|kw| inner_lc.contains(kw)) {
            return inner.to_string();
        }
    }

    store_title.trim().to_string()
}

fn tidy_description(text: &str) -> String {
    let trimmed = text
        .trim_matches(|c: char| c.is_whitespace())
        .trim_start_matches(|c: char| matches!(c, '-' | '–' | '—' | ':' | '|') || c.is_whitespace())
        .trim();

    if let Some(inner) = trimmed.strip_prefix('(') {
        if let Some(inner) = inner.strip_suffix(')') {
            if !inner.contains('(') && !inner.contains(')') {
                return inner.trim().to_string();
            }
        }
    }
    trimmed.to_string()
}

/// Filters candidate rows down to actual bundle offers for the product,
/// discontinued rows excluded, each with its extracted description attached.
pub fn classify_bundles(candidates: Vec<BundleCandidate>, product_name: &str) -> Vec<BundleOffer> {
    candidates
        .into_iter()
        .filter(|c| !c.flags.discontinued)
        .filter(|c| is_bundle(&c.title, product_name))
        .map(|candidate| {
            let description = extract_bundle_description(&candidate.title, product_name);
            BundleOffer {
                candidate,
                description,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::bundle_candidate;

    #[test]
    fn free_accessory_title_is_a_bundle() {
        assert!(is_bundle(
            "EV RE20 Microphone with FREE 20' XLR Cable",
            "EV RE20 Microphone"
        ));
    }

    #[test]
    fn identical_title_is_not_a_bundle() {
        assert!(!is_bundle("EV RE20 Microphone", "EV RE20 Microphone"));
    }

    #[test]
    fn parenthesized_bundle_phrase_is_a_bundle() {
        assert!(is_bundle(
            "Rode Procaster (Complete Podcasting Bundle)",
            "Rode Procaster"
        ));
    }

    #[test]
    fn barely_longer_title_is_not_a_bundle() {
        // Length gate: reworded plain listings add no descriptive text.
        assert!(!is_bundle("Shure SM7B Mic", "Shure SM7B"));
    }

    #[test]
    fn keyword_present_in_product_name_does_not_trigger() {
        assert!(!is_bundle(
            "Focusrite Scarlett Solo Studio Edition Special",
            "Focusrite Scarlett Solo Studio"
        ));
    }

    #[test]
    fn keyword_unique_to_store_title_triggers() {
        assert!(is_bundle(
            "Shure SM7B Microphone plus Cloudlifter CL-1",
            "Shure SM7B Microphone"
        ));
    }

    #[test]
    fn leading_plus_shape_is_a_bundle() {
        assert!(is_bundle("+ Boom arm for Widget X200 Microphone", "Widget X200"));
    }

    #[test]
    fn pipe_tail_is_ignored_when_comparing() {
        assert!(!is_bundle(
            "EV RE20 Microphone | Free Shipping Available",
            "EV RE20 Microphone"
        ));
    }

    #[test]
    fn description_starts_at_the_with_indicator() {
        let description = extract_bundle_description(
            "EV RE20 Microphone with FREE 20' XLR Cable",
            "EV RE20 Microphone",
        );
        assert!(description.starts_with("with FREE"));
    }

    #[test]
    fn parenthesized_description_loses_its_parentheses() {
        let description = extract_bundle_description(
            "Rode Procaster (Complete Podcasting Bundle)",
            "Rode Procaster",
        );
        assert_eq!(description, "Complete Podcasting Bundle");
    }

    #[test]
    fn description_starts_at_the_first_indicator_in_the_suffix() {
        let description = extract_bundle_description(
            "Widget X200 - Streaming Kit with Stand",
            "Widget X200",
        );
        assert_eq!(description, "Kit with Stand");
    }

    #[test]
    fn indicator_free_suffix_is_returned_without_its_separator() {
        let description =
            extract_bundle_description("Widget X200 - Deluxe Creator Pack", "Widget X200");
        assert_eq!(description, "Deluxe Creator Pack");
    }

    #[test]
    fn unknown_product_name_falls_back_to_with_suffix() {
        let description = extract_bundle_description(
            "Podcast Powerhouse with Boom Arm and Shock Mount",
            "EV RE20 Microphone",
        );
        assert_eq!(description, "with Boom Arm and Shock Mount");
    }

    #[test]
    fn hopeless_title_comes_back_unchanged() {
        let description = extract_bundle_description("Mystery Box", "EV RE20 Microphone");
        assert_eq!(description, "Mystery Box");
    }

    #[test]
    fn discontinued_candidates_are_excluded() {
        let mut discontinued =
            bundle_candidate("b1", "r1", "Widget X200 Podcasting Bundle with Boom Arm");
        discontinued.flags.discontinued = true;
        let live = bundle_candidate("b2", "r1", "Widget X200 Podcasting Bundle with Boom Arm");

        let bundles = classify_bundles(vec![discontinued, live], "Widget X200");
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].candidate.id, "b2");
    }

    #[test]
    fn plain_companion_listing_is_not_classified() {
        let plain = bundle_candidate("b1", "r1", "Widget X200");
        assert!(classify_bundles(vec![plain], "Widget X200").is_empty());
    }
}
