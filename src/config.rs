// =============================================================================
// Screener Configuration — static settings loaded once at startup
// =============================================================================
//
// Every tunable parameter lives here and is fixed for the lifetime of the
// process.  The configuration is constructed once in `main` and passed by
// reference to every component, so there is no global mutable state.
//
// All fields carry `#[serde(default)]` so that adding new fields never
// breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_min_price() -> f64 {
    2.0
}

fn default_max_price() -> f64 {
    20.0
}

fn default_min_pct_change() -> f64 {
    10.0
}

fn default_min_rel_volume() -> f64 {
    5.0
}

fn default_news_lookback_min() -> u32 {
    120
}

fn default_sleep_seconds() -> f64 {
    2.0
}

fn default_prepost_progress() -> f64 {
    0.20
}

fn default_session_start() -> String {
    "09:30".to_string()
}

fn default_session_end() -> String {
    "16:00".to_string()
}

fn default_top_n() -> usize {
    10
}

fn default_exchange() -> String {
    "US".to_string()
}

fn default_cache_dir() -> String {
    "data".to_string()
}

// =============================================================================
// ScreenerConfig
// =============================================================================

/// Static configuration for the catalyst screener.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    // --- Filter thresholds ---------------------------------------------------

    /// Minimum acceptable share price (inclusive).
    #[serde(default = "default_min_price")]
    pub min_price: f64,

    /// Maximum acceptable share price (inclusive).
    #[serde(default = "default_max_price")]
    pub max_price: f64,

    /// Minimum percent change on the day (e.g. 10.0 means +10 %).
    #[serde(default = "default_min_pct_change")]
    pub min_pct_change: f64,

    /// Minimum relative volume multiple (e.g. 5.0 means 5x normal volume).
    #[serde(default = "default_min_rel_volume")]
    pub min_rel_volume: f64,

    /// News catalyst window: a hit needs at least one article newer than this
    /// many minutes.
    #[serde(default = "default_news_lookback_min")]
    pub news_lookback_min: u32,

    // --- Pacing / rate-limits ------------------------------------------------

    /// Delay between symbol batches, in seconds.
    #[serde(default = "default_sleep_seconds")]
    pub sleep_seconds: f64,

    // --- Session handling ----------------------------------------------------

    /// Session progress substituted outside regular hours, where true progress
    /// is not meaningful but the volume baseline still needs scaling.
    #[serde(default = "default_prepost_progress")]
    pub prepost_progress: f64,

    /// Regular session open in the market timezone, "HH:MM".
    #[serde(default = "default_session_start")]
    pub session_start: String,

    /// Regular session close in the market timezone, "HH:MM".
    #[serde(default = "default_session_end")]
    pub session_end: String,

    // --- Universe ------------------------------------------------------------

    /// Optional allowlist restricting the scanned universe. Empty = scan all.
    #[serde(default)]
    pub watchlist: Vec<String>,

    /// Exchange code for the symbol directory request.
    #[serde(default = "default_exchange")]
    pub exchange: String,

    /// Directory holding the symbol cache file.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    // --- Output --------------------------------------------------------------

    /// Maximum number of hits printed per batch.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            min_price: default_min_price(),
            max_price: default_max_price(),
            min_pct_change: default_min_pct_change(),
            min_rel_volume: default_min_rel_volume(),
            news_lookback_min: default_news_lookback_min(),
            sleep_seconds: default_sleep_seconds(),
            prepost_progress: default_prepost_progress(),
            session_start: default_session_start(),
            session_end: default_session_end(),
            watchlist: Vec::new(),
            exchange: default_exchange(),
            cache_dir: default_cache_dir(),
            top_n: default_top_n(),
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read screener config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse screener config from {}", path.display()))?;

        info!(
            path = %path.display(),
            price_range = format!("{:.2}-{:.2}", config.min_price, config.max_price),
            min_pct = config.min_pct_change,
            min_rvol = config.min_rel_volume,
            "screener config loaded"
        );

        Ok(config)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = ScreenerConfig::default();
        assert!((cfg.min_price - 2.0).abs() < f64::EPSILON);
        assert!((cfg.max_price - 20.0).abs() < f64::EPSILON);
        assert!((cfg.min_pct_change - 10.0).abs() < f64::EPSILON);
        assert!((cfg.min_rel_volume - 5.0).abs() < f64::EPSILON);
        assert_eq!(cfg.news_lookback_min, 120);
        assert!((cfg.prepost_progress - 0.20).abs() < f64::EPSILON);
        assert_eq!(cfg.session_start, "09:30");
        assert_eq!(cfg.session_end, "16:00");
        assert!(cfg.watchlist.is_empty());
        assert_eq!(cfg.exchange, "US");
        assert_eq!(cfg.top_n, 10);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: ScreenerConfig = serde_json::from_str("{}").unwrap();
        assert!((cfg.min_price - 2.0).abs() < f64::EPSILON);
        assert_eq!(cfg.news_lookback_min, 120);
        assert_eq!(cfg.session_end, "16:00");
        assert_eq!(cfg.cache_dir, "data");
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "min_pct_change": 7.5, "watchlist": ["NBY", "AZTR"] }"#;
        let cfg: ScreenerConfig = serde_json::from_str(json).unwrap();
        assert!((cfg.min_pct_change - 7.5).abs() < f64::EPSILON);
        assert_eq!(cfg.watchlist, vec!["NBY", "AZTR"]);
        assert!((cfg.max_price - 20.0).abs() < f64::EPSILON);
        assert_eq!(cfg.top_n, 10);
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = ScreenerConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: ScreenerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.session_start, cfg2.session_start);
        assert_eq!(cfg.watchlist, cfg2.watchlist);
        assert!((cfg.min_rel_volume - cfg2.min_rel_volume).abs() < f64::EPSILON);
    }
}
