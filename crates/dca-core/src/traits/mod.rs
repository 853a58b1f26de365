//! Trait definitions for the DCA simulator.

mod clock;
mod price_source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use price_source::PriceSource;
