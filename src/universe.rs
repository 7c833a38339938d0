// =============================================================================
// Symbol Universe — disk-cached symbol directory + working-set derivation
// =============================================================================
//
// The exchange symbol directory is large and changes rarely, so it is fetched
// once and cached to disk.  The cache file is the single source of truth
// until the operator deletes it — there is no expiry.
//
// The working set actually scanned is either an explicit watchlist
// intersected with the universe, or the full universe minus derivative/unit
// share classes (symbols containing '/' or '-').
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::finnhub::FinnhubClient;
use crate::types::SymbolInfo;

/// Instrument types retained when building the cache.
const TRADABLE_TYPES: [&str; 3] = ["Common Stock", "ETP", "REIT"];

/// Working sets larger than this get the bigger batch size to bound the
/// total round count.
const LARGE_UNIVERSE_THRESHOLD: usize = 5_000;

const BATCH_SIZE_LARGE: usize = 150;
const BATCH_SIZE_SMALL: usize = 75;

/// Disk-backed repository for the symbol directory.
pub struct UniverseRepository {
    cache_path: PathBuf,
}

impl UniverseRepository {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            cache_path: cache_dir.as_ref().join("symbols_us.json"),
        }
    }

    /// Return the cached universe, or fetch, filter, and cache it on first
    /// run.  Cache I/O failure is a startup error — the cache directory is
    /// operator-controlled and expected to be writable.
    pub async fn load_or_fetch(
        &self,
        client: &FinnhubClient,
        exchange: &str,
    ) -> Result<Vec<SymbolInfo>> {
        if let Some(cached) = self.load_cache()? {
            info!(
                path = %self.cache_path.display(),
                count = cached.len(),
                "symbol universe loaded from cache"
            );
            return Ok(cached);
        }

        let listings = client.fetch_symbol_universe(exchange).await?;
        let tradable: Vec<SymbolInfo> = listings.into_iter().filter(is_tradable).collect();

        self.store_cache(&tradable)?;
        info!(
            path = %self.cache_path.display(),
            exchange,
            count = tradable.len(),
            "symbol universe fetched and cached"
        );

        Ok(tradable)
    }

    /// Read the cache file if it exists.
    pub fn load_cache(&self) -> Result<Option<Vec<SymbolInfo>>> {
        if !self.cache_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.cache_path).with_context(|| {
            format!("failed to read symbol cache from {}", self.cache_path.display())
        })?;

        let symbols: Vec<SymbolInfo> = serde_json::from_str(&content).with_context(|| {
            format!("failed to parse symbol cache from {}", self.cache_path.display())
        })?;

        Ok(Some(symbols))
    }

    /// Write the cache file atomically (tmp + rename).
    pub fn store_cache(&self, symbols: &[SymbolInfo]) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create cache directory {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string(symbols).context("failed to serialise symbol cache")?;

        let tmp_path = self.cache_path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp cache to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, &self.cache_path).with_context(|| {
            format!("failed to rename tmp cache to {}", self.cache_path.display())
        })?;

        Ok(())
    }
}

/// Keep only instrument types worth screening, with a non-empty ticker.
fn is_tradable(info: &SymbolInfo) -> bool {
    !info.symbol.is_empty() && TRADABLE_TYPES.contains(&info.instrument_type.as_str())
}

/// Derive the scanned working set from the universe.
///
/// A non-empty watchlist acts as an allowlist (universe order is kept);
/// otherwise derivative/unit share classes are excluded by the '/'-or-'-'
/// naming convention.
pub fn working_set(universe: &[SymbolInfo], watchlist: &[String]) -> Vec<String> {
    if !watchlist.is_empty() {
        universe
            .iter()
            .filter(|s| watchlist.iter().any(|w| w == &s.symbol))
            .map(|s| s.symbol.clone())
            .collect()
    } else {
        universe
            .iter()
            .filter(|s| !s.symbol.contains('/') && !s.symbol.contains('-'))
            .map(|s| s.symbol.clone())
            .collect()
    }
}

/// Batch size for a working set of `len` symbols.
pub fn batch_size_for(len: usize) -> usize {
    if len > LARGE_UNIVERSE_THRESHOLD {
        BATCH_SIZE_LARGE
    } else {
        BATCH_SIZE_SMALL
    }
}
