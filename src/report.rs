// =============================================================================
// Console Report — hit lines and suggested trade levels
// =============================================================================
//
// Stdout is the product surface: one line per hit plus a suggested
// buy/target/stop line, or a "no matches" line restating the active
// thresholds.  Diagnostics stay on the tracing subscriber.
//
// The suggested levels are fixed percentage offsets from the current price
// and are purely informational — nothing is ever ordered.
// =============================================================================

use crate::config::ScreenerConfig;
use crate::session::now_eastern;
use crate::types::ScreeningResult;

/// Suggested entry, targets, and stop derived from the current price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevels {
    pub buy: f64,
    pub target1: f64,
    pub target2: f64,
    pub stop: f64,
}

impl TradeLevels {
    /// Buy at market, targets at +5 % and +10 %, stop at −6 %.
    pub fn from_price(price: f64) -> Self {
        Self {
            buy: price,
            target1: price * 1.05,
            target2: price * 1.10,
            stop: price * 0.94,
        }
    }
}

/// Print the ranked hits for one batch, or a "no matches" line restating the
/// active filter thresholds.
pub fn print_batch(hits: &[ScreeningResult], config: &ScreenerConfig) {
    let ts = now_eastern().format("%H:%M:%S");

    if hits.is_empty() {
        println!(
            "[{ts}] No matches ({:.0}–{:.0}$, +{:.0}%, rVol≥{:.0}×, news last {}m).",
            config.min_price,
            config.max_price,
            config.min_pct_change,
            config.min_rel_volume,
            config.news_lookback_min
        );
        return;
    }

    for hit in hits {
        println!(
            "[{ts}] ✅ HIT {} ${:.2} (+{:.1}%) rVol {:.1}× | \"{}\"",
            hit.symbol, hit.price, hit.percent_change, hit.rel_volume, hit.headline
        );

        let levels = TradeLevels::from_price(hit.price);
        println!(
            "         Buy@{:.2}  Target1@{:.2}  Target2@{:.2}  Stop@{:.2}",
            levels.buy, levels.target1, levels.target2, levels.stop
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_from_five_dollars() {
        let levels = TradeLevels::from_price(5.00);
        assert!((levels.buy - 5.00).abs() < 1e-9);
        assert!((levels.target1 - 5.25).abs() < 1e-9);
        assert!((levels.target2 - 5.50).abs() < 1e-9);
        assert!((levels.stop - 4.70).abs() < 1e-9);
    }

    #[test]
    fn levels_scale_linearly_with_price() {
        let a = TradeLevels::from_price(10.0);
        let b = TradeLevels::from_price(20.0);
        assert!((b.target1 - 2.0 * a.target1).abs() < 1e-9);
        assert!((b.stop - 2.0 * a.stop).abs() < 1e-9);
    }
}
