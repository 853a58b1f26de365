//! Price resolution against gapped series.

use serde::{Deserialize, Serialize};

use dca_core::types::{PricePoint, PriceSeries};

/// How a purchase date is matched against the available observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Minimum absolute timestamp distance, either side of the target.
    /// Tolerates trailing gaps: a non-empty series always resolves.
    #[default]
    Nearest,
    /// First observation at or after the target ("next available date").
    /// Fails for targets past the last observation.
    #[serde(rename = "forward-only")]
    ForwardOnly,
}

/// Pick the price to use for a purchase at `target_ms`.
///
/// Ties on distance go to the first candidate in series order, which for a
/// chronological series is the earlier point.
pub fn resolve_price(
    target_ms: i64,
    series: &PriceSeries,
    mode: MatchMode,
) -> Option<&PricePoint> {
    match mode {
        MatchMode::Nearest => series
            .iter()
            .min_by_key(|p| (p.timestamp - target_ms).abs()),
        MatchMode::ForwardOnly => series.iter().find(|p| p.timestamp >= target_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 86_400_000;

    fn series(days: &[i64]) -> PriceSeries {
        days.iter()
            .map(|d| PricePoint::new(d * DAY_MS, 100.0 + *d as f64))
            .collect()
    }

    #[test]
    fn test_exact_match() {
        let s = series(&[0, 1, 2]);
        let p = resolve_price(DAY_MS, &s, MatchMode::Nearest).unwrap();
        assert_eq!(p.timestamp, DAY_MS);
    }

    #[test]
    fn test_nearest_inside_gap() {
        // Two-week gap; target in the middle resolves to the closer edge
        let s = series(&[0, 14]);
        let p = resolve_price(5 * DAY_MS, &s, MatchMode::Nearest).unwrap();
        assert_eq!(p.timestamp, 0);
        let p = resolve_price(9 * DAY_MS, &s, MatchMode::Nearest).unwrap();
        assert_eq!(p.timestamp, 14 * DAY_MS);
    }

    #[test]
    fn test_nearest_tie_takes_earlier() {
        let s = series(&[0, 2]);
        let p = resolve_price(DAY_MS, &s, MatchMode::Nearest).unwrap();
        assert_eq!(p.timestamp, 0);
    }

    #[test]
    fn test_nearest_never_fails_on_nonempty_series() {
        let s = series(&[10]);
        // Far before and far after both resolve
        assert!(resolve_price(-100 * DAY_MS, &s, MatchMode::Nearest).is_some());
        assert!(resolve_price(100 * DAY_MS, &s, MatchMode::Nearest).is_some());
    }

    #[test]
    fn test_empty_series() {
        let s = PriceSeries::new();
        assert!(resolve_price(0, &s, MatchMode::Nearest).is_none());
        assert!(resolve_price(0, &s, MatchMode::ForwardOnly).is_none());
    }

    #[test]
    fn test_forward_only_skips_earlier_points() {
        let s = series(&[0, 14]);
        let p = resolve_price(5 * DAY_MS, &s, MatchMode::ForwardOnly).unwrap();
        assert_eq!(p.timestamp, 14 * DAY_MS);
    }

    #[test]
    fn test_forward_only_fails_past_last_point() {
        let s = series(&[0, 14]);
        assert!(resolve_price(15 * DAY_MS, &s, MatchMode::ForwardOnly).is_none());
    }
}
