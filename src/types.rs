// =============================================================================
// Shared types used across the catalyst screener
// =============================================================================

use serde::{Deserialize, Serialize};

/// One entry of the exchange symbol directory.
///
/// This is also the shape persisted in the symbol cache file, so unknown
/// provider fields are dropped on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    /// Instrument type as reported by the provider ("Common Stock", "ETP", ...).
    #[serde(rename = "type", default)]
    pub instrument_type: String,
    #[serde(default)]
    pub description: String,
}

/// Point-in-time quote for one symbol.
///
/// Field names follow the provider's compact wire format:
///   c = current price, d = change, dp = percent change,
///   h/l = day high/low, o = open, pc = previous close.
///
/// The provider returns `c = 0` and null deltas for unknown symbols, so a
/// zero price must be treated as "no quote".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "c")]
    pub price: f64,
    #[serde(rename = "d", default)]
    pub change: Option<f64>,
    #[serde(rename = "dp", default)]
    pub percent_change: Option<f64>,
    #[serde(rename = "h", default)]
    pub day_high: f64,
    #[serde(rename = "l", default)]
    pub day_low: f64,
    #[serde(rename = "o", default)]
    pub open: f64,
    #[serde(rename = "pc", default)]
    pub prev_close: f64,
}

/// Slow-moving average-volume baselines for one symbol.
///
/// Either average may be absent for thinly covered symbols; the relative
/// volume estimator resolves them through an ordered fallback chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeMetrics {
    pub avg10: Option<f64>,
    pub avg30: Option<f64>,
}

/// A single news article for a symbol.
///
/// Providers disagree on field names (`datetime` vs `time`, `headline` vs
/// `title`), so both spellings are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    /// Publication time as a UNIX timestamp in seconds.
    #[serde(rename = "datetime", alias = "time")]
    pub timestamp: i64,
    #[serde(default, alias = "title")]
    pub headline: Option<String>,
}

/// A symbol that passed every screening filter. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResult {
    pub symbol: String,
    pub price: f64,
    pub percent_change: f64,
    pub rel_volume: f64,
    pub headline: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_deserialises_wire_format() {
        let json = r#"{"c":5.0,"d":0.65,"dp":15.0,"h":5.2,"l":4.3,"o":4.4,"pc":4.35}"#;
        let q: Quote = serde_json::from_str(json).unwrap();
        assert!((q.price - 5.0).abs() < f64::EPSILON);
        assert_eq!(q.percent_change, Some(15.0));
        assert!((q.prev_close - 4.35).abs() < f64::EPSILON);
    }

    #[test]
    fn quote_tolerates_null_deltas() {
        // Unknown symbols come back with zero price and null change fields.
        let json = r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0}"#;
        let q: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(q.price, 0.0);
        assert_eq!(q.change, None);
        assert_eq!(q.percent_change, None);
    }

    #[test]
    fn news_item_accepts_alias_fields() {
        let json = r#"{"time":1700000000,"title":"Acme wins contract"}"#;
        let n: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(n.timestamp, 1_700_000_000);
        assert_eq!(n.headline.as_deref(), Some("Acme wins contract"));
    }

    #[test]
    fn symbol_info_reads_provider_type_field() {
        let json = r#"{"symbol":"XYZ","type":"Common Stock","description":"XYZ Corp"}"#;
        let s: SymbolInfo = serde_json::from_str(json).unwrap();
        assert_eq!(s.symbol, "XYZ");
        assert_eq!(s.instrument_type, "Common Stock");
    }
}
