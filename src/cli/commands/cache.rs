//! Cache command implementation.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use dca_cache::{CacheConfig, CacheStore, FileBackend};
use dca_config::AppConfig;

use crate::cli::{CacheArgs, CacheCommand};

pub async fn run(args: CacheArgs, config_path: &Path) -> Result<()> {
    let settings = if config_path.exists() {
        dca_config::load_config(config_path).context("Failed to load configuration")?
    } else {
        AppConfig::default()
    };

    let backend = FileBackend::new(&settings.cache.dir)?;
    let store = CacheStore::new(
        backend,
        CacheConfig {
            max_size_bytes: settings.cache.max_size_bytes,
            default_ttl: Duration::from_secs(settings.cache.historical_ttl_secs),
            ..CacheConfig::default()
        },
    );

    match args.command {
        CacheCommand::Stats => {
            let stats = store.stats();
            println!("Cache directory:   {}", settings.cache.dir);
            println!("Total entries:     {}", stats.total_entries);
            println!("Valid entries:     {}", stats.valid_entries);
            println!("Expired entries:   {}", stats.expired_entries);
            println!(
                "Size:              {} / {} bytes ({:.1}%)",
                stats.total_size_bytes, stats.max_size_bytes, stats.utilization_percent
            );
        }
        CacheCommand::ClearExpired => {
            let removed = store.clear_expired();
            println!("Removed {} expired entries", removed);
        }
        CacheCommand::Clear => {
            let removed = store.clear_all();
            println!("Removed {} entries", removed);
        }
    }

    Ok(())
}
