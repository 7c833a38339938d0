// =============================================================================
// Finnhub REST API Client — token-authenticated market data reads
// =============================================================================
//
// Authentication is a single static X-Finnhub-Token header attached to every
// request.  The token is never logged or serialized.
//
// Contract: the per-symbol read operations (`quote`, `today_volume`,
// `volume_metrics`, `company_news`) never fail past this boundary.  A
// transport error, non-200 status, or malformed body is logged and collapsed
// into `None` ("no data"), so the screening pipeline tolerates per-symbol
// gaps independently.  Only the one-time symbol directory fetch returns
// `Result`, because startup may legitimately die on it.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::finnhub::rate_limit::{RateLimitSnapshot, RateLimitTracker};
use crate::types::{NewsItem, Quote, SymbolInfo, VolumeMetrics};

/// Per-request timeouts, matching the cost of each endpoint.
const UNIVERSE_TIMEOUT: Duration = Duration::from_secs(30);
const QUOTE_TIMEOUT: Duration = Duration::from_secs(10);
const CANDLE_TIMEOUT: Duration = Duration::from_secs(20);
const METRIC_TIMEOUT: Duration = Duration::from_secs(15);
const NEWS_TIMEOUT: Duration = Duration::from_secs(15);

/// Provider field aliases for the average-volume metrics, probed in order.
const AVG10_FIELDS: [&str; 3] = [
    "10DayAverageTradingVolume",
    "10DayAvgVolume",
    "avgVolume10D",
];
const AVG30_FIELDS: [&str; 3] = [
    "30DayAverageTradingVolume",
    "30DayAvgVolume",
    "avgVolume30D",
];

/// Finnhub REST API client with header-token authentication.
pub struct FinnhubClient {
    base_url: String,
    client: reqwest::Client,
    limits: RateLimitTracker,
}

impl FinnhubClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `FinnhubClient`.
    ///
    /// # Arguments
    /// * `token` — Finnhub API token (sent as a header, never in query params).
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();

        let mut default_headers = HeaderMap::new();
        if let Ok(val) = HeaderValue::from_str(&token) {
            default_headers.insert("X-Finnhub-Token", val);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(QUOTE_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        debug!("FinnhubClient initialised (base_url=https://finnhub.io/api/v1)");

        Self {
            base_url: "https://finnhub.io/api/v1".to_string(),
            client,
            limits: RateLimitTracker::new(),
        }
    }

    /// Current quota state as reported by the provider's response headers.
    pub fn rate_limits(&self) -> RateLimitSnapshot {
        self.limits.snapshot()
    }

    // -------------------------------------------------------------------------
    // Symbol universe (fatal-able — used once at startup)
    // -------------------------------------------------------------------------

    /// GET /stock/symbol — the full symbol directory for `exchange`.
    pub async fn fetch_symbol_universe(&self, exchange: &str) -> Result<Vec<SymbolInfo>> {
        let body = self
            .get_json(
                "/stock/symbol",
                &[("exchange", exchange.to_string())],
                UNIVERSE_TIMEOUT,
            )
            .await?;

        let listings: Vec<SymbolInfo> = serde_json::from_value(body)
            .context("symbol directory response is not a listing array")?;

        debug!(exchange, count = listings.len(), "symbol universe fetched");
        Ok(listings)
    }

    // -------------------------------------------------------------------------
    // Per-symbol reads (no-data on any failure)
    // -------------------------------------------------------------------------

    /// GET /quote — current price and day-change for `symbol`.
    pub async fn quote(&self, symbol: &str) -> Option<Quote> {
        let body = match self
            .get_json("/quote", &[("symbol", symbol.to_string())], QUOTE_TIMEOUT)
            .await
        {
            Ok(b) => b,
            Err(e) => {
                debug!(symbol, error = %e, "quote unavailable");
                return None;
            }
        };

        match serde_json::from_value::<Quote>(body) {
            Ok(q) => Some(q),
            Err(e) => {
                debug!(symbol, error = %e, "quote body malformed");
                None
            }
        }
    }

    /// GET /stock/candle at minute resolution — cumulative traded volume
    /// between `from_unix` and `to_unix` (seconds).
    ///
    /// Returns `None` when the provider flags the window as having no data
    /// (`s != "ok"`) or the volume series is empty.
    pub async fn today_volume(&self, symbol: &str, from_unix: i64, to_unix: i64) -> Option<u64> {
        let body = match self
            .get_json(
                "/stock/candle",
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", "1".to_string()),
                    ("from", from_unix.to_string()),
                    ("to", to_unix.to_string()),
                ],
                CANDLE_TIMEOUT,
            )
            .await
        {
            Ok(b) => b,
            Err(e) => {
                debug!(symbol, error = %e, "minute candles unavailable");
                return None;
            }
        };

        if body.get("s").and_then(|s| s.as_str()) != Some("ok") {
            debug!(symbol, "candle response has no data for the window");
            return None;
        }

        let vols = body.get("v")?.as_array()?;
        if vols.is_empty() {
            return None;
        }

        let total: f64 = vols.iter().filter_map(|v| v.as_f64()).sum();
        Some(total.round() as u64)
    }

    /// GET /stock/metric — 10- and 30-day average trading volume.
    ///
    /// The provider has shipped these under several field names over time, so
    /// each average is resolved through an ordered alias probe.
    pub async fn volume_metrics(&self, symbol: &str) -> Option<VolumeMetrics> {
        let body = match self
            .get_json(
                "/stock/metric",
                &[
                    ("symbol", symbol.to_string()),
                    ("metric", "all".to_string()),
                ],
                METRIC_TIMEOUT,
            )
            .await
        {
            Ok(b) => b,
            Err(e) => {
                debug!(symbol, error = %e, "volume metrics unavailable");
                return None;
            }
        };

        let metric = body.get("metric")?;
        Some(VolumeMetrics {
            avg10: first_number(metric, &AVG10_FIELDS),
            avg30: first_number(metric, &AVG30_FIELDS),
        })
    }

    /// GET /company-news — articles for `symbol` between `from_unix` and
    /// `to_unix` (seconds).  The endpoint takes whole UTC dates, so the
    /// window is widened to day boundaries; callers re-filter by timestamp.
    ///
    /// Malformed entries are skipped rather than failing the whole list.
    pub async fn company_news(
        &self,
        symbol: &str,
        from_unix: i64,
        to_unix: i64,
    ) -> Option<Vec<NewsItem>> {
        let from_day = DateTime::from_timestamp(from_unix, 0)?
            .format("%Y-%m-%d")
            .to_string();
        let to_day = DateTime::from_timestamp(to_unix, 0)?
            .format("%Y-%m-%d")
            .to_string();

        let body = match self
            .get_json(
                "/company-news",
                &[
                    ("symbol", symbol.to_string()),
                    ("from", from_day),
                    ("to", to_day),
                ],
                NEWS_TIMEOUT,
            )
            .await
        {
            Ok(b) => b,
            Err(e) => {
                debug!(symbol, error = %e, "company news unavailable");
                return None;
            }
        };

        let arr = body.as_array()?;
        let items: Vec<NewsItem> = arr
            .iter()
            .filter_map(|v| match serde_json::from_value::<NewsItem>(v.clone()) {
                Ok(item) => Some(item),
                Err(_) => {
                    warn!(symbol, "skipping malformed news entry");
                    None
                }
            })
            .collect();

        debug!(symbol, count = items.len(), "company news fetched");
        Some(items)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    /// Perform a GET against `path`, update the quota tracker from the
    /// response headers, and return the parsed JSON body on 2xx.
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("GET {path} request failed"))?;

        self.limits.update_from_headers(resp.headers());

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse {path} response body"))?;

        if !status.is_success() {
            anyhow::bail!("Finnhub GET {} returned {}: {}", path, status, body);
        }

        Ok(body)
    }
}

/// Probe `obj` for the first field in `fields` holding a positive-capable
/// number.  Used for provider metrics that have shipped under several names.
fn first_number(obj: &serde_json::Value, fields: &[&str]) -> Option<f64> {
    fields
        .iter()
        .find_map(|f| obj.get(*f).and_then(|v| v.as_f64()))
}

impl std::fmt::Debug for FinnhubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinnhubClient")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
