//! REST price source.
//!
//! Speaks the CoinGecko wire format: `/coins/{id}/market_chart/range` for
//! history and `/simple/price` for the spot price. Retry and backoff are the
//! caller's concern; this client only spaces its own requests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use dca_core::error::DataError;
use dca_core::traits::PriceSource;
use dca_core::types::{AssetPair, PricePoint, PriceSeries};

use crate::rate_limit::RateLimiter;

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1500);

/// Wire format of `/coins/{id}/market_chart/range`.
#[derive(Debug, Deserialize)]
struct MarketChart {
    /// `[timestamp_ms, price]` tuples
    prices: Vec<(f64, f64)>,
}

/// HTTP price source with an injected rate limiter.
pub struct RestPriceSource {
    client: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
}

impl RestPriceSource {
    /// Create a source against the default public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_MIN_INTERVAL)
    }

    /// Create a source against a specific endpoint and request spacing.
    pub fn with_base_url(base_url: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(min_interval),
        }
    }

    /// Map a ticker symbol to the API's coin identifier.
    fn coin_id(base: &str) -> String {
        match base.to_uppercase().as_str() {
            "BTC" => "bitcoin".to_string(),
            "ETH" => "ethereum".to_string(),
            "SOL" => "solana".to_string(),
            "ADA" => "cardano".to_string(),
            "XRP" => "ripple".to_string(),
            "DOGE" => "dogecoin".to_string(),
            "DOT" => "polkadot".to_string(),
            "LTC" => "litecoin".to_string(),
            "LINK" => "chainlink".to_string(),
            "MATIC" => "matic-network".to_string(),
            other => other.to_lowercase(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, DataError> {
        self.limiter.acquire().await;
        debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::FetchFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited { retry_after_secs });
        }
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::UnknownAsset(url.to_string()));
        }
        if !response.status().is_success() {
            return Err(DataError::FetchFailed(format!(
                "unexpected status {} from {}",
                response.status(),
                url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))
    }
}

impl Default for RestPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for RestPriceSource {
    async fn historical_prices(
        &self,
        pair: &AssetPair,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<PriceSeries, DataError> {
        let url = format!(
            "{}/coins/{}/market_chart/range?vs_currency={}&from={}&to={}",
            self.base_url,
            Self::coin_id(&pair.base),
            pair.quote.to_lowercase(),
            from_ms / 1000,
            to_ms / 1000,
        );

        let chart: MarketChart = self.get_json(&url).await?;
        let points = chart
            .prices
            .into_iter()
            .map(|(ts, price)| PricePoint::new(ts as i64, price))
            .collect();
        Ok(PriceSeries::from_points(points))
    }

    async fn current_price(&self, pair: &AssetPair) -> Result<f64, DataError> {
        let id = Self::coin_id(&pair.base);
        let vs = pair.quote.to_lowercase();
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url, id, vs
        );

        let prices: HashMap<String, HashMap<String, f64>> = self.get_json(&url).await?;
        prices
            .get(&id)
            .and_then(|by_currency| by_currency.get(&vs))
            .copied()
            .ok_or_else(|| DataError::UnknownAsset(pair.to_string()))
    }

    fn name(&self) -> &str {
        "rest"
    }
}
