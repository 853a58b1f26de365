//! Asset pair identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A quoted asset pair such as `BTC-USD`.
///
/// The base symbol is 3-5 uppercase letters, the quote currency exactly 3.
/// Parsing normalizes case, so `btc-usd` and `BTC-USD` are the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetPair {
    /// Base asset symbol (e.g. `BTC`)
    pub base: String,
    /// Quote currency symbol (e.g. `USD`)
    pub quote: String,
}

impl AssetPair {
    /// Create a pair from base and quote symbols, validating both.
    pub fn new(base: &str, quote: &str) -> Result<Self, ConfigError> {
        let base = base.to_uppercase();
        let quote = quote.to_uppercase();

        let base_ok = (3..=5).contains(&base.len()) && base.chars().all(|c| c.is_ascii_uppercase());
        let quote_ok = quote.len() == 3 && quote.chars().all(|c| c.is_ascii_uppercase());

        if !base_ok || !quote_ok {
            return Err(ConfigError::InvalidPair(format!("{}-{}", base, quote)));
        }

        Ok(Self { base, quote })
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

impl FromStr for AssetPair {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('-')
            .ok_or_else(|| ConfigError::InvalidPair(s.to_string()))?;
        Self::new(base, quote)
    }
}

impl TryFrom<String> for AssetPair {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AssetPair> for String {
    fn from(pair: AssetPair) -> Self {
        pair.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_pairs() {
        let pair: AssetPair = "BTC-USD".parse().unwrap();
        assert_eq!(pair.base, "BTC");
        assert_eq!(pair.quote, "USD");

        let pair: AssetPair = "MATIC-EUR".parse().unwrap();
        assert_eq!(pair.base, "MATIC");

        // Case is normalized
        let pair: AssetPair = "eth-usd".parse().unwrap();
        assert_eq!(pair.to_string(), "ETH-USD");
    }

    #[test]
    fn test_parse_invalid_pairs() {
        assert!("BTCUSD".parse::<AssetPair>().is_err());
        assert!("BT-USD".parse::<AssetPair>().is_err());
        assert!("TOOLONG-USD".parse::<AssetPair>().is_err());
        assert!("BTC-US".parse::<AssetPair>().is_err());
        assert!("BTC-USDT".parse::<AssetPair>().is_err());
        assert!("BT3-USD".parse::<AssetPair>().is_err());
        assert!("".parse::<AssetPair>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let pair: AssetPair = "SOL-USD".parse().unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, "\"SOL-USD\"");
        let back: AssetPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair);
    }
}
