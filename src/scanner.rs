// =============================================================================
// Batch Loop — partition the working set and scan it forever
// =============================================================================
//
// The universe is loaded once; after that the loop runs until the process is
// killed.  Symbols are screened strictly sequentially — one symbol's calls
// complete before the next symbol starts — which keeps request volume
// predictable for the provider's rate limits.  The only pause is the fixed
// inter-batch delay.
// =============================================================================

use std::time::Duration;

use anyhow::Result;
use chrono::{NaiveTime, Utc};
use tracing::{debug, info, warn};

use crate::config::ScreenerConfig;
use crate::finnhub::FinnhubClient;
use crate::ranker::rank_results;
use crate::report;
use crate::screener::ScreeningEngine;
use crate::session::{effective_progress, now_eastern, parse_session_time, session_progress};
use crate::types::ScreeningResult;
use crate::universe::batch_size_for;

/// Run the scan loop over `working_set` until the process is killed.
///
/// Each batch gets one full screening + ranking pass, the top-N hits are
/// printed, and the loop sleeps before the next batch.  After the last batch
/// it wraps around to the first.
pub async fn run_scan_loop(
    client: &FinnhubClient,
    config: &ScreenerConfig,
    working_set: &[String],
) -> Result<()> {
    anyhow::ensure!(
        !working_set.is_empty(),
        "working set is empty — nothing to scan"
    );

    let session_start = parse_session_time(&config.session_start)?;
    let session_end = parse_session_time(&config.session_end)?;
    let batch_size = batch_size_for(working_set.len());

    info!(
        symbols = working_set.len(),
        batch_size,
        sleep_seconds = config.sleep_seconds,
        "scan loop starting"
    );

    loop {
        for batch in working_set.chunks(batch_size) {
            let hits = scan_batch(client, config, batch, session_start, session_end).await;

            let shown = hits.len().min(config.top_n);
            report::print_batch(&hits[..shown], config);

            tokio::time::sleep(Duration::from_secs_f64(config.sleep_seconds)).await;
        }

        debug!(
            quota = ?client.rate_limits(),
            "full scan round complete — restarting from first batch"
        );
    }
}

/// Screen every symbol of one batch and return the ranked hits.
///
/// Session progress is computed once per batch.  A symbol that errors is
/// logged and skipped; partial failure never aborts the batch.
async fn scan_batch(
    client: &FinnhubClient,
    config: &ScreenerConfig,
    batch: &[String],
    session_start: NaiveTime,
    session_end: NaiveTime,
) -> Vec<ScreeningResult> {
    let now_et = now_eastern();
    let raw = session_progress(now_et.time(), session_start, session_end);
    let progress = effective_progress(raw, config.prepost_progress);
    let now_unix = Utc::now().timestamp();

    let mut hits = Vec::new();

    for symbol in batch {
        match ScreeningEngine::screen_symbol(client, config, symbol, progress, now_unix).await {
            Ok(Some(hit)) => {
                debug!(symbol = %hit.symbol, pct = hit.percent_change, rvol = hit.rel_volume, "hit");
                hits.push(hit);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "screening failed — symbol skipped");
            }
        }
    }

    rank_results(&mut hits);
    hits
}
