//! Price source trait definition.

use crate::error::DataError;
use crate::types::{AssetPair, PriceSeries};
use async_trait::async_trait;

/// Trait for historical and spot price sources.
///
/// Fetch errors propagate to the simulation engine as-is; implementations
/// must not substitute stale or partial data on failure.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch historical prices for a pair.
    ///
    /// # Arguments
    /// * `pair` - The asset pair to fetch
    /// * `from_ms` - Start of the range, Unix milliseconds (inclusive)
    /// * `to_ms` - End of the range, Unix milliseconds (inclusive)
    ///
    /// # Returns
    /// A series ordered from oldest to newest. Gaps are allowed; an empty
    /// series is a valid response for a range with no data.
    async fn historical_prices(
        &self,
        pair: &AssetPair,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<PriceSeries, DataError>;

    /// Fetch the current spot price for a pair.
    async fn current_price(&self, pair: &AssetPair) -> Result<f64, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
