//! Core types and traits for the DCA simulator.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PricePoint, PriceSeries)
//! - Simulation input/output types (SimulationConfig, Purchase, SimulationResult)
//! - Core traits for price sources and the injectable clock
//! - The error taxonomy shared across the workspace

pub mod types;
pub mod traits;
pub mod error;

pub use error::{DcaError, DcaResult};
pub use types::*;
pub use traits::*;
