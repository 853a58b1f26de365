//! Price sources for the DCA simulator.
//!
//! [`RestPriceSource`] talks to a CoinGecko-style HTTP API, throttled by an
//! injected [`RateLimiter`]. [`CsvPriceSource`] serves offline data files.
//! [`CachedPriceSource`] wraps any source with the persistent cache so
//! repeated simulations stay off the network.

mod cached_source;
mod csv_source;
mod rate_limit;
mod rest_source;

pub use cached_source::{CachedPriceSource, HISTORICAL_TTL, SPOT_TTL};
pub use csv_source::CsvPriceSource;
pub use rate_limit::RateLimiter;
pub use rest_source::RestPriceSource;
