//! Simulation configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::traits::Clock;
use crate::types::{AssetPair, Frequency};

/// Earliest supported start date; no tracked exchange has usable data before it.
pub const MIN_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2010, 1, 1) {
    Some(d) => d,
    None => unreachable!(),
};

/// Minimum periodic investment amount.
pub const MIN_AMOUNT: f64 = 1.0;
/// Maximum periodic investment amount.
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Immutable input for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Asset pair to simulate
    pub pair: AssetPair,
    /// First candidate purchase date
    pub start_date: NaiveDate,
    /// Amount invested per purchase, in quote currency
    pub amount: f64,
    /// Purchase frequency
    pub frequency: Frequency,
    /// Last candidate purchase date; "today" when omitted
    pub end_date: Option<NaiveDate>,
}

impl SimulationConfig {
    /// Create a configuration with an open end date.
    pub fn new(pair: AssetPair, start_date: NaiveDate, amount: f64, frequency: Frequency) -> Self {
        Self {
            pair,
            start_date,
            amount,
            frequency,
            end_date: None,
        }
    }

    /// Set an explicit end date.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// The effective end date, defaulting to today.
    pub fn resolved_end(&self, clock: &dyn Clock) -> NaiveDate {
        self.end_date.unwrap_or_else(|| clock.today())
    }

    /// Validate the configuration against the current time.
    ///
    /// Runs before any fetch; a failure here is a rejected request,
    /// never retried.
    pub fn validate(&self, clock: &dyn Clock) -> Result<(), ConfigError> {
        if self.start_date < MIN_START_DATE {
            return Err(ConfigError::StartTooEarly {
                date: self.start_date,
                min: MIN_START_DATE,
            });
        }

        let today = clock.today();
        if self.start_date > today {
            return Err(ConfigError::StartInFuture(self.start_date));
        }

        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&self.amount) || !self.amount.is_finite() {
            return Err(ConfigError::InvalidAmount(self.amount));
        }

        let end = self.resolved_end(clock);
        if self.start_date > end {
            return Err(ConfigError::EmptyDateRange {
                start: self.start_date,
                end,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ManualClock;
    use chrono::{TimeZone, Utc};

    fn config(start: NaiveDate, amount: f64) -> SimulationConfig {
        SimulationConfig::new(
            "BTC-USD".parse().unwrap(),
            start,
            amount,
            Frequency::Weekly,
        )
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_valid_config() {
        let cfg = config(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 100.0);
        assert!(cfg.validate(&clock()).is_ok());
    }

    #[test]
    fn test_start_before_minimum() {
        let cfg = config(NaiveDate::from_ymd_opt(2009, 12, 31).unwrap(), 100.0);
        assert!(matches!(
            cfg.validate(&clock()),
            Err(ConfigError::StartTooEarly { .. })
        ));
    }

    #[test]
    fn test_start_in_future() {
        let cfg = config(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 100.0);
        assert!(matches!(
            cfg.validate(&clock()),
            Err(ConfigError::StartInFuture(_))
        ));
    }

    #[test]
    fn test_amount_bounds() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(config(start, 0.5).validate(&clock()).is_err());
        assert!(config(start, 1.0).validate(&clock()).is_ok());
        assert!(config(start, 1_000_000.0).validate(&clock()).is_ok());
        assert!(config(start, 1_000_001.0).validate(&clock()).is_err());
        assert!(config(start, f64::NAN).validate(&clock()).is_err());
    }

    #[test]
    fn test_start_after_end() {
        let cfg = config(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 100.0)
            .with_end_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!(matches!(
            cfg.validate(&clock()),
            Err(ConfigError::EmptyDateRange { .. })
        ));
    }

    #[test]
    fn test_end_defaults_to_today() {
        let cfg = config(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 100.0);
        assert_eq!(
            cfg.resolved_end(&clock()),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }
}
