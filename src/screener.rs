// =============================================================================
// Screening Pipeline — ordered per-symbol filter chain
// =============================================================================
//
// Each symbol runs through the filters in sequence, short-circuiting at the
// first failure so that no further API calls are spent on a rejected symbol:
//
//   1. Quote:      price present and inside [min_price, max_price]
//   2. Momentum:   percent change present and >= min_pct_change
//   3. Volume:     relative volume >= min_rel_volume
//   4. Catalyst:   at least one news item inside the lookback window
//
// The batch loop treats an error from `screen_symbol` as a per-symbol
// rejection; a failing symbol never aborts the batch.
// =============================================================================

use anyhow::Result;
use tracing::debug;

use crate::config::ScreenerConfig;
use crate::finnhub::FinnhubClient;
use crate::rel_volume::{baseline_volume, relative_volume};
use crate::types::{NewsItem, ScreeningResult};

/// Minute-candle window reaching back far enough to cover pre-market trading
/// on the scan day.
const TODAY_VOLUME_LOOKBACK_SECS: i64 = 10 * 3600;

/// Headline placeholder when the matched article carries none.
const HEADLINE_FALLBACK: &str = "(news)";

pub struct ScreeningEngine;

impl ScreeningEngine {
    /// Screen one symbol through the full filter chain.
    ///
    /// `progress` is the (fallback-adjusted) session progress used to scale
    /// the volume baseline; `now_unix` anchors the candle and news windows.
    ///
    /// Returns `Ok(None)` when any filter rejects the symbol.
    pub async fn screen_symbol(
        client: &FinnhubClient,
        config: &ScreenerConfig,
        symbol: &str,
        progress: f64,
        now_unix: i64,
    ) -> Result<Option<ScreeningResult>> {
        // ── 1. Quote / price band ────────────────────────────────────────
        let quote = match client.quote(symbol).await {
            Some(q) => q,
            None => {
                debug!(symbol, "rejected: no quote");
                return Ok(None);
            }
        };

        if !price_in_band(quote.price, config.min_price, config.max_price) {
            debug!(symbol, price = quote.price, "rejected: price outside band");
            return Ok(None);
        }

        // ── 2. Percent change ────────────────────────────────────────────
        let pct = match quote.percent_change {
            Some(p) if p >= config.min_pct_change => p,
            _ => {
                debug!(
                    symbol,
                    pct = ?quote.percent_change,
                    "rejected: percent change below minimum"
                );
                return Ok(None);
            }
        };

        // ── 3. Relative volume ───────────────────────────────────────────
        let today_volume = client
            .today_volume(symbol, now_unix - TODAY_VOLUME_LOOKBACK_SECS, now_unix)
            .await
            .unwrap_or(0);
        let metrics = client.volume_metrics(symbol).await.unwrap_or_default();

        let baseline = baseline_volume(&[metrics.avg10, metrics.avg30]);
        let rvol = relative_volume(today_volume, baseline, progress);

        if rvol < config.min_rel_volume {
            debug!(symbol, rvol, baseline, "rejected: relative volume below minimum");
            return Ok(None);
        }

        // ── 4. News catalyst ─────────────────────────────────────────────
        let window_start = now_unix - i64::from(config.news_lookback_min) * 60;
        let items = match client.company_news(symbol, window_start, now_unix).await {
            Some(items) => items,
            None => {
                debug!(symbol, "rejected: news unavailable");
                return Ok(None);
            }
        };

        let headline = match fresh_headline(&items, window_start) {
            Some(h) => h,
            None => {
                debug!(symbol, "rejected: no news inside lookback window");
                return Ok(None);
            }
        };

        debug!(symbol, price = quote.price, pct, rvol, "all filters passed");

        Ok(Some(ScreeningResult {
            symbol: symbol.to_string(),
            price: quote.price,
            percent_change: pct,
            rel_volume: rvol,
            headline,
        }))
    }
}

/// Both band edges are inclusive; a zero price means the provider had no
/// quote for the symbol.
fn price_in_band(price: f64, min: f64, max: f64) -> bool {
    price > 0.0 && price >= min && price <= max
}

/// Headline of the first item at or after `window_start`, in provider order.
///
/// The provider lists articles newest-first, so the first in-window item is
/// taken as the freshest catalyst.  That ordering is the provider's contract
/// and is not verified here.
fn fresh_headline(items: &[NewsItem], window_start: i64) -> Option<String> {
    items
        .iter()
        .find(|n| n.timestamp >= window_start)
        .map(|n| {
            n.headline
                .clone()
                .unwrap_or_else(|| HEADLINE_FALLBACK.to_string())
        })
}
