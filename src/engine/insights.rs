use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::model::{LogicalOffer, PriceHistoryPoint, PriceInsight, Trend};

/// Deadband for the 30-day trend, in percent. The boundary is exclusive:
/// exactly ±2.0 still reads as stable.
const TREND_DEADBAND_PCT: f64 = 2.0;

pub fn round10(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classifies a price change against the deadband. No change figure at all
/// reads as stable.
pub fn trend_for_change(change_pct: Option<f64>) -> Trend {
    match change_pct {
        Some(pct) if pct < -TREND_DEADBAND_PCT => Trend::Down,
        Some(pct) if pct > TREND_DEADBAND_PCT => Trend::Up,
        _ => Trend::Stable,
    }
}

/// Computes the insight for one retailer from its full price series and the
/// current best price. None when the series is empty.
fn compute_insight(
    retailer_id: &str,
    current_price: f64,
    series: &[&PriceHistoryPoint],
    now: DateTime<Utc>,
    trend_window: Duration,
) -> Option<PriceInsight> {
    let first = series.first()?;

    // Linear scan; the first occurrence of the minimum wins ties.
    let mut lowest = *first;
    for &point in &series[1..] {
        if point.price < lowest.price {
            lowest = point;
        }
    }

    // Series arrives ascending by time, so the last point at or before the
    // cutoff is the price the product had ~30 days ago.
    let cutoff = now - trend_window;
    let mut reference_price: Option<f64> = None;
    for point in series {
        if point.recorded_at <= cutoff {
            reference_price = Some(point.price);
        }
    }

    let price_change_pct = match reference_price {
        Some(reference) if reference > 0.0 => {
            Some(round10((current_price - reference) / reference * 100.0))
        }
        _ => None,
    };

    Some(PriceInsight {
        retailer_id: retailer_id.to_string(),
        current_price,
        lowest_ever: lowest.price,
        lowest_ever_date: lowest.recorded_at,
        is_all_time_low: current_price <= lowest.price,
        price_change_pct,
        trend: trend_for_change(price_change_pct),
    })
}

/// Joins price history onto the grouped offers by retailer id. Retailers
/// without history get no insight; when a retailer somehow carries several
/// offers, the first (top-ranked) one supplies the current price.
pub fn compute_insights(
    history: &[PriceHistoryPoint],
    offers: &[LogicalOffer],
    now: DateTime<Utc>,
    trend_window: Duration,
) -> HashMap<String, PriceInsight> {
    let mut series: HashMap<&str, Vec<&PriceHistoryPoint>> = HashMap::new();
    for point in history {
        series.entry(point.retailer_id.as_str()).or_default().push(point);
    }

    let mut insights: HashMap<String, PriceInsight> = HashMap::new();
    for offer in offers {
        let retailer_id = offer.retailer.id.as_str();
        if insights.contains_key(retailer_id) {
            continue;
        }
        let Some(points) = series.get(retailer_id) else {
            continue;
        };
        if let Some(insight) =
            compute_insight(retailer_id, offer.best.price, points, now, trend_window)
        {
            insights.insert(retailer_id.to_string(), insight);
        }
    }
    insights
}

/// Minimum current price across all retailers with a computed insight, for
/// the cross-retailer "lowest overall" badge.
pub fn global_lowest(insights: &HashMap<String, PriceInsight>) -> Option<f64> {
    insights
        .values()
        .map(|insight| insight.current_price)
        .min_by(f64::total_cmp)
}
