//! Simulation report generation.

use serde::{Deserialize, Serialize};

use dca_core::types::SimulationResult;

/// Presentable wrapper around a simulation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub result: SimulationResult,
}

impl SimulationReport {
    pub fn new(result: SimulationResult) -> Self {
        Self { result }
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let s = &self.result.summary;
        let config = &self.result.config;
        let mut out = String::new();

        out.push_str("═══════════════════════════════════════════════════════════\n");
        out.push_str("                     DCA SIMULATION                         \n");
        out.push_str("═══════════════════════════════════════════════════════════\n\n");

        out.push_str("STRATEGY\n");
        out.push_str("───────────────────────────────────────────────────────────\n");
        out.push_str(&format!("  Pair:                {}\n", config.pair));
        out.push_str(&format!(
            "  Amount:              {:.2} {} {}\n",
            config.amount, config.pair.quote, config.frequency
        ));
        out.push_str(&format!(
            "  Period:              {} to {}\n",
            s.first_purchase, s.last_purchase
        ));
        out.push('\n');

        out.push_str("OUTCOME\n");
        out.push_str("───────────────────────────────────────────────────────────\n");
        out.push_str(&format!("  Purchases:           {}\n", s.purchase_count));
        out.push_str(&format!("  Total Invested:      ${:.2}\n", s.total_invested));
        out.push_str(&format!("  Current Value:       ${:.2}\n", s.current_value));
        out.push_str(&format!(
            "  Profit/Loss:         ${:.2} ({:.2}%)\n",
            s.profit_loss, s.profit_loss_percent
        ));
        out.push_str(&format!("  Total Quantity:      {:.8}\n", s.total_quantity));
        out.push_str(&format!("  Average Price:       ${:.2}\n", s.average_price));
        out.push_str(&format!("  Current Price:       ${:.2}\n", s.current_price));
        out.push('\n');

        out.push_str("═══════════════════════════════════════════════════════════\n");

        out
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.result)
    }

    /// Export the purchase series to CSV.
    pub fn purchases_to_csv(&self) -> String {
        let mut csv = String::from(
            "date,price,amount_invested,quantity,cumulative_invested,cumulative_quantity,portfolio_value,profit_loss,profit_loss_percent\n",
        );
        for p in &self.result.purchases {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                p.date,
                p.price,
                p.amount_invested,
                p.quantity,
                p.cumulative_invested,
                p.cumulative_quantity,
                p.portfolio_value,
                p.profit_loss,
                p.profit_loss_percent
            ));
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dca_core::types::{Frequency, Purchase, SimulationConfig, SimulationSummary};

    fn sample_result() -> SimulationResult {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        SimulationResult {
            config: SimulationConfig::new(
                "BTC-USD".parse().unwrap(),
                date,
                100.0,
                Frequency::Weekly,
            ),
            purchases: vec![Purchase {
                date,
                price: 40000.0,
                amount_invested: 100.0,
                quantity: 0.0025,
                cumulative_invested: 100.0,
                cumulative_quantity: 0.0025,
                portfolio_value: 100.0,
                profit_loss: 0.0,
                profit_loss_percent: 0.0,
            }],
            summary: SimulationSummary {
                total_invested: 100.0,
                current_value: 112.5,
                total_quantity: 0.0025,
                profit_loss: 12.5,
                profit_loss_percent: 12.5,
                average_price: 40000.0,
                current_price: 45000.0,
                purchase_count: 1,
                first_purchase: date,
                last_purchase: date,
            },
        }
    }

    #[test]
    fn test_report_summary() {
        let report = SimulationReport::new(sample_result());
        let summary = report.summary();
        assert!(summary.contains("BTC-USD"));
        assert!(summary.contains("Total Invested:      $100.00"));
        assert!(summary.contains("12.50%"));
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = SimulationReport::new(sample_result());
        let json = report.to_json().unwrap();
        let back: SimulationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.purchase_count, 1);
    }

    #[test]
    fn test_purchases_csv() {
        let report = SimulationReport::new(sample_result());
        let csv = report.purchases_to_csv();
        assert!(csv.starts_with("date,price"));
        assert!(csv.contains("2024-01-01,40000"));
    }
}
