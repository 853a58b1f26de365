//! Simulation output types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::SimulationConfig;

/// One simulated buy event, with running totals as of that purchase.
///
/// Derived data: recomputed on every simulation run, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Scheduled purchase date
    pub date: NaiveDate,
    /// Price actually used for the buy
    pub price: f64,
    /// Amount invested in this purchase
    pub amount_invested: f64,
    /// Quantity acquired (`amount_invested / price`)
    pub quantity: f64,
    /// Total invested up to and including this purchase
    pub cumulative_invested: f64,
    /// Total quantity held after this purchase
    pub cumulative_quantity: f64,
    /// Holdings marked to this purchase's own price
    pub portfolio_value: f64,
    /// Running profit/loss at this purchase
    pub profit_loss: f64,
    /// Running profit/loss as a percentage of invested capital
    pub profit_loss_percent: f64,
}

/// Final summary metrics for a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// `purchase_count * amount`, exact by construction
    pub total_invested: f64,
    /// Holdings valued at the current price
    pub current_value: f64,
    /// Total quantity acquired
    pub total_quantity: f64,
    /// `current_value - total_invested`
    pub profit_loss: f64,
    /// Profit/loss as a percentage of total invested
    pub profit_loss_percent: f64,
    /// `total_invested / total_quantity`
    pub average_price: f64,
    /// Current price used for valuation
    pub current_price: f64,
    /// Number of purchases executed
    pub purchase_count: usize,
    /// Date of the first purchase
    pub first_purchase: NaiveDate,
    /// Date of the last purchase
    pub last_purchase: NaiveDate,
}

/// Complete result of one simulation run.
///
/// Transient output: the engine hands it to the caller and retains nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Configuration that produced this result
    pub config: SimulationConfig,
    /// Purchase series with running totals, oldest first
    pub purchases: Vec<Purchase>,
    /// Final summary metrics
    pub summary: SimulationSummary,
}
