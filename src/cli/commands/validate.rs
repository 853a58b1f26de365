//! Validate-config command implementation.

use std::path::Path;

use anyhow::{Context, Result};

pub async fn run(config_path: &Path) -> Result<()> {
    let config = dca_config::load_config(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    println!("Configuration OK: {}", config_path.display());
    println!("  app:        {} ({})", config.app.name, config.app.environment);
    println!("  cache dir:  {}", config.cache.dir);
    println!("  source:     {}", config.source.base_url);
    println!(
        "  defaults:   {} {} per purchase, {} matching",
        config.simulation.default_amount,
        config.simulation.default_frequency,
        match config.simulation.match_mode {
            dca_engine::MatchMode::Nearest => "nearest",
            dca_engine::MatchMode::ForwardOnly => "forward-only",
        }
    );

    Ok(())
}
