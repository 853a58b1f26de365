//! Data types for the DCA simulator.

mod pair;
mod frequency;
mod price;
mod config;
mod result;

pub use pair::AssetPair;
pub use frequency::Frequency;
pub use price::{PricePoint, PriceSeries};
pub use config::{SimulationConfig, MIN_START_DATE};
pub use result::{Purchase, SimulationResult, SimulationSummary};
