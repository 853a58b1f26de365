//! DCA simulation engine.
//!
//! Turns a [`dca_core::SimulationConfig`] into a purchase schedule, resolves
//! a usable price for every scheduled date against a possibly gapped series,
//! and accumulates the running and summary portfolio metrics.

pub mod schedule;
pub mod resolver;
mod engine;
mod report;

pub use engine::SimulationEngine;
pub use report::SimulationReport;
pub use resolver::MatchMode;
