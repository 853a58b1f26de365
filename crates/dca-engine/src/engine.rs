//! Simulation engine.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use dca_core::error::{ConfigError, DataError};
use dca_core::traits::{Clock, PriceSource, SystemClock};
use dca_core::types::{Purchase, SimulationConfig, SimulationResult, SimulationSummary};
use dca_core::DcaResult;

use crate::resolver::{resolve_price, MatchMode};
use crate::schedule::purchase_dates;

/// Midnight UTC of a date, as Unix milliseconds.
fn date_to_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

/// Orchestrates schedule generation, price fetching, and metric accumulation.
///
/// Holds no mutable state between runs; every [`run`](Self::run) call is
/// independent and reentrant. The only shared resource is whatever cache the
/// price source carries internally.
pub struct SimulationEngine<S: PriceSource> {
    source: S,
    clock: Arc<dyn Clock>,
    match_mode: MatchMode,
}

impl<S: PriceSource> SimulationEngine<S> {
    /// Create an engine over a price source with the system clock.
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            match_mode: MatchMode::default(),
        }
    }

    /// Replace the time source, for deterministic tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Select how purchase dates are matched against price observations.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Run one simulation.
    ///
    /// Fails with a [`ConfigError`] before any fetch when the configuration
    /// is invalid, or with a [`DataError`] when the series is empty or a
    /// purchase date cannot be resolved. Never returns a partial result.
    pub async fn run(&self, config: &SimulationConfig) -> DcaResult<SimulationResult> {
        config.validate(self.clock.as_ref())?;

        let end = config.resolved_end(self.clock.as_ref());
        let dates = purchase_dates(config.start_date, end, config.frequency);
        if dates.is_empty() {
            return Err(ConfigError::EmptyDateRange {
                start: config.start_date,
                end,
            }
            .into());
        }
        debug!(pair = %config.pair, count = dates.len(), "generated purchase schedule");

        // Span the fetch over the whole schedule, through the end of the
        // last purchase day.
        let from_ms = date_to_ms(dates[0]);
        let to_ms = date_to_ms(dates[dates.len() - 1] + Duration::days(1)) - 1;
        let series = self
            .source
            .historical_prices(&config.pair, from_ms, to_ms)
            .await?;
        if series.is_empty() {
            return Err(DataError::NoDataAvailable {
                pair: config.pair.to_string(),
            }
            .into());
        }

        let mut purchases = Vec::with_capacity(dates.len());
        let mut cumulative_quantity = 0.0_f64;

        for (i, date) in dates.iter().enumerate() {
            let point = resolve_price(date_to_ms(*date), &series, self.match_mode)
                .ok_or(DataError::NoPriceForDate { date: *date })?;

            let quantity = config.amount / point.price;
            cumulative_quantity += quantity;
            // Multiplication, not accumulation: keeps the invariant
            // cumulative_invested == purchases_so_far * amount exact.
            let cumulative_invested = (i + 1) as f64 * config.amount;
            // Mark to this purchase's own price, so the series charts the
            // portfolio as it stood on each date.
            let portfolio_value = cumulative_quantity * point.price;
            let profit_loss = portfolio_value - cumulative_invested;

            purchases.push(Purchase {
                date: *date,
                price: point.price,
                amount_invested: config.amount,
                quantity,
                cumulative_invested,
                cumulative_quantity,
                portfolio_value,
                profit_loss,
                profit_loss_percent: profit_loss / cumulative_invested * 100.0,
            });
        }

        let current_price = self.source.current_price(&config.pair).await?;

        // Summary metrics from first principles, not by re-summing the
        // per-purchase display values.
        let purchase_count = purchases.len();
        let total_invested = purchase_count as f64 * config.amount;
        let total_quantity = cumulative_quantity;
        let current_value = total_quantity * current_price;
        let profit_loss = current_value - total_invested;

        let summary = SimulationSummary {
            total_invested,
            current_value,
            total_quantity,
            profit_loss,
            profit_loss_percent: profit_loss / total_invested * 100.0,
            average_price: total_invested / total_quantity,
            current_price,
            purchase_count,
            first_purchase: purchases[0].date,
            last_purchase: purchases[purchase_count - 1].date,
        };

        info!(
            pair = %config.pair,
            purchases = purchase_count,
            invested = total_invested,
            value = current_value,
            "simulation complete"
        );

        Ok(SimulationResult {
            config: config.clone(),
            purchases,
            summary,
        })
    }

    /// Run several simulations concurrently against the shared source.
    ///
    /// Fails as a whole if any single simulation fails.
    pub async fn run_many(&self, configs: &[SimulationConfig]) -> DcaResult<Vec<SimulationResult>> {
        futures::future::try_join_all(configs.iter().map(|c| self.run(c))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use dca_core::error::DcaError;
    use dca_core::types::{AssetPair, Frequency, PricePoint, PriceSeries};

    /// Fixed in-memory source for engine tests.
    struct FixtureSource {
        points: Vec<(&'static str, f64)>,
        current: f64,
    }

    impl FixtureSource {
        fn point(date: &str, price: f64) -> PricePoint {
            let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
            PricePoint::new(date_to_ms(d), price)
        }
    }

    #[async_trait]
    impl PriceSource for FixtureSource {
        async fn historical_prices(
            &self,
            _pair: &AssetPair,
            from_ms: i64,
            to_ms: i64,
        ) -> Result<PriceSeries, DataError> {
            Ok(self
                .points
                .iter()
                .map(|(d, p)| Self::point(d, *p))
                .filter(|p| p.timestamp >= from_ms && p.timestamp <= to_ms)
                .collect())
        }

        async fn current_price(&self, _pair: &AssetPair) -> Result<f64, DataError> {
            Ok(self.current)
        }

        fn name(&self) -> &str {
            "fixture"
        }
    }

    fn test_clock() -> Arc<dyn Clock> {
        Arc::new(dca_core::traits::ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ))
    }

    fn d(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    fn btc_weekly(start: &str, end: &str, amount: f64) -> SimulationConfig {
        SimulationConfig::new("BTC-USD".parse().unwrap(), d(start), amount, Frequency::Weekly)
            .with_end_date(d(end))
    }

    #[tokio::test]
    async fn test_two_week_scenario() {
        let source = FixtureSource {
            points: vec![("2024-01-01", 40000.0), ("2024-01-08", 42000.0)],
            current: 45000.0,
        };
        let engine = SimulationEngine::new(source).with_clock(test_clock());

        let result = engine
            .run(&btc_weekly("2024-01-01", "2024-01-08", 100.0))
            .await
            .unwrap();

        assert_eq!(result.purchases.len(), 2);
        assert!((result.purchases[0].quantity - 0.0025).abs() < 1e-9);
        assert!((result.purchases[1].quantity - 0.002381).abs() < 1e-6);

        let s = &result.summary;
        assert_eq!(s.purchase_count, 2);
        assert_eq!(s.total_invested, 200.0);
        assert!((s.total_quantity - 0.004881).abs() < 1e-6);
        assert!((s.current_value - 219.64).abs() < 0.01);
        assert!((s.profit_loss - 19.64).abs() < 0.01);
        assert_eq!(s.current_price, 45000.0);
        assert_eq!(s.first_purchase, d("2024-01-01"));
        assert_eq!(s.last_purchase, d("2024-01-08"));
    }

    #[tokio::test]
    async fn test_summary_invariants() {
        let source = FixtureSource {
            points: vec![
                ("2024-01-01", 40000.0),
                ("2024-01-08", 41000.0),
                ("2024-01-15", 39000.0),
                ("2024-01-22", 43000.0),
            ],
            current: 42000.0,
        };
        let engine = SimulationEngine::new(source).with_clock(test_clock());

        let result = engine
            .run(&btc_weekly("2024-01-01", "2024-01-22", 250.0))
            .await
            .unwrap();
        let s = &result.summary;

        // Exact by construction, no floating drift
        assert_eq!(s.total_invested, s.purchase_count as f64 * 250.0);
        assert_eq!(s.profit_loss, s.current_value - s.total_invested);
        assert_eq!(s.current_value, s.total_quantity * s.current_price);

        // Running fields line up purchase to purchase
        for (i, p) in result.purchases.iter().enumerate() {
            assert_eq!(p.cumulative_invested, (i + 1) as f64 * 250.0);
            assert_eq!(p.profit_loss, p.portfolio_value - p.cumulative_invested);
        }
        let last = result.purchases.last().unwrap();
        assert!((last.cumulative_quantity - s.total_quantity).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_purchase_inside_gap_uses_nearest() {
        // Two-week hole in the series; the middle purchase still resolves
        let source = FixtureSource {
            points: vec![("2024-01-01", 40000.0), ("2024-01-15", 44000.0)],
            current: 45000.0,
        };
        let engine = SimulationEngine::new(source).with_clock(test_clock());

        let result = engine
            .run(&btc_weekly("2024-01-01", "2024-01-15", 100.0))
            .await
            .unwrap();

        assert_eq!(result.purchases.len(), 3);
        // Jan 8 sits equidistant from both edges; the tie goes to Jan 1
        assert_eq!(result.purchases[1].price, 40000.0);
    }

    #[tokio::test]
    async fn test_start_after_end_rejected() {
        let source = FixtureSource {
            points: vec![("2024-01-01", 40000.0)],
            current: 45000.0,
        };
        let engine = SimulationEngine::new(source).with_clock(test_clock());

        let err = engine
            .run(&btc_weekly("2024-02-01", "2024-01-01", 100.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DcaError::Config(ConfigError::EmptyDateRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_series_rejected() {
        let source = FixtureSource {
            points: vec![],
            current: 45000.0,
        };
        let engine = SimulationEngine::new(source).with_clock(test_clock());

        let err = engine
            .run(&btc_weekly("2024-01-01", "2024-01-08", 100.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DcaError::Data(DataError::NoDataAvailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_forward_only_fails_on_trailing_gap() {
        // Last scheduled date has no observation at or after it
        let source = FixtureSource {
            points: vec![("2024-01-01", 40000.0), ("2024-01-08", 42000.0)],
            current: 45000.0,
        };
        let engine = SimulationEngine::new(source)
            .with_clock(test_clock())
            .with_match_mode(MatchMode::ForwardOnly);

        let err = engine
            .run(&btc_weekly("2024-01-01", "2024-01-15", 100.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DcaError::Data(DataError::NoPriceForDate { .. })
        ));
    }

    #[tokio::test]
    async fn test_end_defaults_to_today() {
        let source = FixtureSource {
            points: vec![("2024-06-01", 40000.0), ("2024-06-08", 42000.0)],
            current: 45000.0,
        };
        let engine = SimulationEngine::new(source).with_clock(test_clock());

        let config = SimulationConfig::new(
            "BTC-USD".parse().unwrap(),
            d("2024-06-01"),
            100.0,
            Frequency::Weekly,
        );
        let result = engine.run(&config).await.unwrap();
        // Clock says 2024-06-15: purchases on Jun 1, 8, 15
        assert_eq!(result.purchases.len(), 3);
    }

    #[tokio::test]
    async fn test_run_many() {
        let source = FixtureSource {
            points: vec![("2024-01-01", 40000.0), ("2024-01-08", 42000.0)],
            current: 45000.0,
        };
        let engine = SimulationEngine::new(source).with_clock(test_clock());

        let configs = vec![
            btc_weekly("2024-01-01", "2024-01-08", 100.0),
            btc_weekly("2024-01-01", "2024-01-08", 50.0),
        ];
        let results = engine.run_many(&configs).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].summary.total_invested, 200.0);
        assert_eq!(results[1].summary.total_invested, 100.0);
    }
}
