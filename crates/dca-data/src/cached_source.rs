//! Cache-consulting price source wrapper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use dca_cache::{CacheStore, StorageBackend};
use dca_core::error::DataError;
use dca_core::traits::PriceSource;
use dca_core::types::{AssetPair, PriceSeries};

/// Default TTL for historical series; history does not change.
pub const HISTORICAL_TTL: Duration = Duration::from_secs(24 * 3600);
/// Default TTL for spot prices; these go stale quickly.
pub const SPOT_TTL: Duration = Duration::from_secs(60);

/// Wraps a [`PriceSource`] with the persistent cache.
///
/// A cache miss or failed write is never fatal: the wrapper goes to the
/// inner source and returns whatever it got. Fetch errors from the inner
/// source pass through unchanged.
pub struct CachedPriceSource<S: PriceSource, B: StorageBackend> {
    inner: S,
    cache: Arc<CacheStore<B>>,
    historical_ttl: Duration,
    spot_ttl: Duration,
}

impl<S: PriceSource, B: StorageBackend> CachedPriceSource<S, B> {
    /// Wrap a source with default TTLs.
    pub fn new(inner: S, cache: Arc<CacheStore<B>>) -> Self {
        Self {
            inner,
            cache,
            historical_ttl: HISTORICAL_TTL,
            spot_ttl: SPOT_TTL,
        }
    }

    /// Override the TTLs used for historical series and spot prices.
    pub fn with_ttls(mut self, historical: Duration, spot: Duration) -> Self {
        self.historical_ttl = historical;
        self.spot_ttl = spot;
        self
    }

    fn series_key(pair: &AssetPair, from_ms: i64, to_ms: i64) -> String {
        format!("prices:{}:{}:{}", pair, from_ms, to_ms)
    }

    fn spot_key(pair: &AssetPair) -> String {
        format!("spot:{}", pair)
    }
}

#[async_trait]
impl<S: PriceSource, B: StorageBackend> PriceSource for CachedPriceSource<S, B> {
    async fn historical_prices(
        &self,
        pair: &AssetPair,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<PriceSeries, DataError> {
        let key = Self::series_key(pair, from_ms, to_ms);
        if let Some(series) = self.cache.get::<PriceSeries>(&key) {
            debug!(%pair, from_ms, to_ms, "historical prices served from cache");
            return Ok(series);
        }

        let series = self.inner.historical_prices(pair, from_ms, to_ms).await?;
        self.cache.set(&key, &series, Some(self.historical_ttl));
        Ok(series)
    }

    async fn current_price(&self, pair: &AssetPair) -> Result<f64, DataError> {
        let key = Self::spot_key(pair);
        if let Some(price) = self.cache.get::<f64>(&key) {
            debug!(%pair, price, "spot price served from cache");
            return Ok(price);
        }

        let price = self.inner.current_price(pair).await?;
        self.cache.set(&key, &price, Some(self.spot_ttl));
        Ok(price)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
