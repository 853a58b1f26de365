//! Simulate command implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use dca_cache::{CacheConfig, CacheStore, FileBackend};
use dca_config::AppConfig;
use dca_core::traits::PriceSource;
use dca_core::types::{Frequency, SimulationConfig};
use dca_data::{CachedPriceSource, CsvPriceSource, RestPriceSource};
use dca_engine::{SimulationEngine, SimulationReport};

use crate::cli::SimulateArgs;

pub async fn run(args: SimulateArgs, config_path: &Path) -> Result<()> {
    let settings = if config_path.exists() {
        dca_config::load_config(config_path).context("Failed to load configuration")?
    } else {
        AppConfig::default()
    };

    let configs = build_configs(&args, &settings)?;
    info!(count = configs.len(), "starting simulation");

    if let Some(data_path) = &args.data {
        let source = CsvPriceSource::new(data_path)?;
        let engine =
            SimulationEngine::new(source).with_match_mode(settings.simulation.match_mode);
        execute(&engine, &configs, &args).await
    } else {
        let backend = FileBackend::new(&settings.cache.dir)?;
        let cache = Arc::new(CacheStore::new(
            backend,
            CacheConfig {
                max_size_bytes: settings.cache.max_size_bytes,
                default_ttl: Duration::from_secs(settings.cache.historical_ttl_secs),
                ..CacheConfig::default()
            },
        ));
        let rest = RestPriceSource::with_base_url(
            &settings.source.base_url,
            Duration::from_millis(settings.source.min_request_interval_ms),
        );
        let source = CachedPriceSource::new(rest, cache).with_ttls(
            Duration::from_secs(settings.cache.historical_ttl_secs),
            Duration::from_secs(settings.cache.spot_ttl_secs),
        );
        let engine =
            SimulationEngine::new(source).with_match_mode(settings.simulation.match_mode);
        execute(&engine, &configs, &args).await
    }
}

fn build_configs(args: &SimulateArgs, settings: &AppConfig) -> Result<Vec<SimulationConfig>> {
    if args.pairs.is_empty() {
        anyhow::bail!("Provide at least one asset pair with --pairs (e.g. --pairs BTC-USD)");
    }

    let start = parse_date(&args.start)?;
    let end = args.end.as_deref().map(parse_date).transpose()?;
    let amount = args.amount.unwrap_or(settings.simulation.default_amount);
    let frequency: Frequency = match &args.frequency {
        Some(raw) => raw.parse()?,
        None => settings.simulation.default_frequency,
    };

    args.pairs
        .iter()
        .map(|raw| {
            let pair = raw
                .parse()
                .with_context(|| format!("Invalid pair '{}'", raw))?;
            let mut config = SimulationConfig::new(pair, start, amount, frequency);
            config.end_date = end;
            Ok(config)
        })
        .collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD", raw))
}

async fn execute<S: PriceSource>(
    engine: &SimulationEngine<S>,
    configs: &[SimulationConfig],
    args: &SimulateArgs,
) -> Result<()> {
    let results = engine.run_many(configs).await?;

    let reports: Vec<SimulationReport> = results.into_iter().map(SimulationReport::new).collect();
    for report in &reports {
        match args.output.as_str() {
            "json" => println!("{}", report.to_json()?),
            _ => println!("{}", report.summary()),
        }
    }

    if let Some(save_path) = &args.save {
        let json = serde_json::to_string_pretty(
            &reports.iter().map(|r| &r.result).collect::<Vec<_>>(),
        )?;
        std::fs::write(save_path, json)?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}
