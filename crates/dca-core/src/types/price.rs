//! Price observation types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single observed price for an asset pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Quoted price, always > 0
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }

    /// Get the calendar date of the observation.
    pub fn date(&self) -> NaiveDate {
        self.datetime().date_naive()
    }
}

/// A chronologically ordered series of price observations.
///
/// Gaps are expected: sources skip weekends, outages, and thin history.
/// Consumers must tolerate missing dates rather than assume one point per day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a series from unordered points, sorting by timestamp.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series has no observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All observations, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// The oldest observation.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// The newest observation.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Observations within `[from, to]` (both inclusive, epoch millis).
    pub fn between(&self, from: i64, to: i64) -> impl Iterator<Item = &PricePoint> {
        self.points
            .iter()
            .filter(move |p| p.timestamp >= from && p.timestamp <= to)
    }

    /// Get an iterator over the observations.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = PricePoint>>(iter: T) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}
