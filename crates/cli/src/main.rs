use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfsync_core::{
    load_config, validate_config, BestsellerSource, LibraryStore, MatchPolicy, NytClient,
    NytConfig, RunReport, SqliteLibraryStore, SyncRunner, TitleMatcher,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    match run().await {
        Ok(report) if report.is_success() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            error!("Fatal error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<RunReport> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("shelfsync {}", VERSION);

    // Config path: first CLI argument, then env, then default
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SHELFSYNC_CONFIG").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Database path: {:?}", config.store.path);
    info!("List period: {}", config.source.period);

    let source: Arc<dyn BestsellerSource> = Arc::new(NytClient::new(NytConfig {
        api_key: config.source.api_key.clone(),
        base_url: config.source.base_url.clone(),
        timeout_secs: config.source.timeout_secs,
    })?);

    let store: Arc<dyn LibraryStore> = Arc::new(
        SqliteLibraryStore::open(&config.store.path, config.store.busy_timeout_ms)
            .context("Failed to open library database")?,
    );

    let matcher = TitleMatcher::new(MatchPolicy {
        fuzzy_threshold: config.matcher.fuzzy_threshold,
        tie_margin: config.matcher.tie_margin,
        ..MatchPolicy::default()
    });

    let runner = SyncRunner::new(source, store, matcher, config.source.period.clone());
    let report = runner.run(&config.libraries).await;

    for unit in &report.units {
        match &unit.error {
            Some(e) => warn!(
                library = %unit.library,
                collection = %unit.collection,
                "Unit failed: {e}"
            ),
            None => {
                if let Some(result) = &unit.reconcile {
                    info!(
                        library = %unit.library,
                        collection = %unit.collection,
                        matched = unit.matched,
                        unmatched = unit.unmatched,
                        added = result.added.len(),
                        removed = result.removed.len(),
                        failures = result.failures.len(),
                        "Unit complete"
                    );
                }
            }
        }
    }

    Ok(report)
}
