// =============================================================================
// Catalyst Screener — Main Entry Point
// =============================================================================
//
// Polls the market data API for a universe of US stock symbols and prints
// the ones moving on elevated volume with a fresh news catalyst.  Output is
// informational only — nothing is ever ordered.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod config;
mod finnhub;
mod ranker;
mod rel_volume;
mod report;
mod scanner;
mod screener;
mod session;
mod types;
mod universe;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ScreenerConfig;
use crate::finnhub::FinnhubClient;
use crate::universe::UniverseRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║            Catalyst Screener — Starting Up              ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = ScreenerConfig::load("screener_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScreenerConfig::default()
    });

    // Override the watchlist from env if available.
    if let Ok(wl) = std::env::var("SCREENER_WATCHLIST") {
        config.watchlist = wl
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    info!(
        price_range = format!("{:.2}-{:.2}", config.min_price, config.max_price),
        min_pct = config.min_pct_change,
        min_rvol = config.min_rel_volume,
        news_window_min = config.news_lookback_min,
        watchlist = config.watchlist.len(),
        "active filter thresholds"
    );

    // ── 2. Credential check ──────────────────────────────────────────────
    let token = std::env::var("FINNHUB_API_KEY").unwrap_or_default();
    if token.trim().is_empty() {
        anyhow::bail!("FINNHUB_API_KEY is not set — cannot reach the market data API");
    }

    // ── 3. Build the API client ──────────────────────────────────────────
    let client = FinnhubClient::new(token);

    // ── 4. Symbol universe (cached on first fetch) ───────────────────────
    let repo = UniverseRepository::new(&config.cache_dir);
    let universe = repo.load_or_fetch(&client, &config.exchange).await?;
    let working_set = universe::working_set(&universe, &config.watchlist);

    info!(
        universe = universe.len(),
        scanning = working_set.len(),
        exchange = %config.exchange,
        "symbol universe ready"
    );

    // ── 5. Scan until killed ─────────────────────────────────────────────
    tokio::select! {
        result = scanner::run_scan_loop(&client, &config, &working_set) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Shutdown signal received — stopping gracefully");
        }
    }

    info!("Catalyst screener shut down complete.");
    Ok(())
}
