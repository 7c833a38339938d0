// =============================================================================
// Rate-Limit Tracker — monitors Finnhub API quota to avoid 429s
// =============================================================================
//
// Finnhub reports the per-minute request quota in response headers:
//   X-Ratelimit-Limit      total requests allowed in the current window
//   X-Ratelimit-Remaining  requests left in the window
//   X-Ratelimit-Reset      UNIX time (seconds) when the window resets
//
// The tracker reads these headers after every request and keeps atomic
// counters that callers may query lock-free.  It is purely observational —
// the scan loop already batches and sleeps to stay inside the quota — but it
// surfaces how close each scan round runs to the ceiling.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::{debug, warn};

/// Remaining-quota level at which a warning is emitted.
const REMAINING_WARN_THRESHOLD: u32 = 10;

/// Sentinel meaning "no header observed yet".
const UNOBSERVED: u32 = u32::MAX;

/// Thread-safe quota tracker backed by atomic counters.
pub struct RateLimitTracker {
    limit: AtomicU32,
    remaining: AtomicU32,
    reset_at: AtomicU64,
}

/// Immutable snapshot of the current quota state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Total requests allowed per window; `None` until a header is seen.
    pub limit: Option<u32>,
    /// Requests left in the window; `None` until a header is seen.
    pub remaining: Option<u32>,
    /// UNIX time (seconds) when the window resets.
    pub reset_at: u64,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self {
            limit: AtomicU32::new(UNOBSERVED),
            remaining: AtomicU32::new(UNOBSERVED),
            reset_at: AtomicU64::new(0),
        }
    }

    // -------------------------------------------------------------------------
    // Header-based updates
    // -------------------------------------------------------------------------

    /// Update internal counters from the HTTP response headers returned by
    /// the provider.
    pub fn update_from_headers(&self, headers: &reqwest::header::HeaderMap) {
        if let Some(l) = parse_header_u32(headers, "X-Ratelimit-Limit") {
            self.limit.store(l, Ordering::Relaxed);
        }

        if let Some(r) = parse_header_u32(headers, "X-Ratelimit-Remaining") {
            let prev = self.remaining.swap(r, Ordering::Relaxed);
            if r <= REMAINING_WARN_THRESHOLD && (prev == UNOBSERVED || prev > REMAINING_WARN_THRESHOLD)
            {
                warn!(
                    remaining = r,
                    threshold = REMAINING_WARN_THRESHOLD,
                    "API quota crossed low-water mark"
                );
            }
            debug!(remaining = r, "rate-limit quota updated from header");
        }

        if let Some(t) = parse_header_u64(headers, "X-Ratelimit-Reset") {
            self.reset_at.store(t, Ordering::Relaxed);
        }
    }

    /// Requests left in the current window, if a header has been observed.
    pub fn remaining(&self) -> Option<u32> {
        match self.remaining.load(Ordering::Relaxed) {
            UNOBSERVED => None,
            r => Some(r),
        }
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    /// Produce a serialisable snapshot of the current counters.
    pub fn snapshot(&self) -> RateLimitSnapshot {
        RateLimitSnapshot {
            limit: match self.limit.load(Ordering::Relaxed) {
                UNOBSERVED => None,
                l => Some(l),
            },
            remaining: self.remaining(),
            reset_at: self.reset_at.load(Ordering::Relaxed),
        }
    }
}

impl Default for RateLimitTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RateLimitTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitTracker")
            .field("limit", &self.limit.load(Ordering::Relaxed))
            .field("remaining", &self.remaining.load(Ordering::Relaxed))
            .field("reset_at", &self.reset_at.load(Ordering::Relaxed))
            .finish()
    }
}

fn parse_header_u32(headers: &reqwest::header::HeaderMap, name: &str) -> Option<u32> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

fn parse_header_u64(headers: &reqwest::header::HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn headers(limit: &str, remaining: &str, reset: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("X-Ratelimit-Limit", HeaderValue::from_str(limit).unwrap());
        h.insert(
            "X-Ratelimit-Remaining",
            HeaderValue::from_str(remaining).unwrap(),
        );
        h.insert("X-Ratelimit-Reset", HeaderValue::from_str(reset).unwrap());
        h
    }

    #[test]
    fn fresh_tracker_reports_nothing_observed() {
        let tracker = RateLimitTracker::new();
        let snap = tracker.snapshot();
        assert_eq!(snap.limit, None);
        assert_eq!(snap.remaining, None);
        assert_eq!(snap.reset_at, 0);
    }

    #[test]
    fn updates_counters_from_headers() {
        let tracker = RateLimitTracker::new();
        tracker.update_from_headers(&headers("60", "42", "1700000060"));

        let snap = tracker.snapshot();
        assert_eq!(snap.limit, Some(60));
        assert_eq!(snap.remaining, Some(42));
        assert_eq!(snap.reset_at, 1_700_000_060);
        assert_eq!(tracker.remaining(), Some(42));
    }

    #[test]
    fn ignores_malformed_header_values() {
        let tracker = RateLimitTracker::new();
        let mut h = HeaderMap::new();
        h.insert(
            "X-Ratelimit-Remaining",
            HeaderValue::from_static("not-a-number"),
        );
        tracker.update_from_headers(&h);
        assert_eq!(tracker.remaining(), None);
    }

    #[test]
    fn tracks_quota_drain_across_requests() {
        let tracker = RateLimitTracker::new();
        tracker.update_from_headers(&headers("60", "30", "1700000060"));
        tracker.update_from_headers(&headers("60", "5", "1700000060"));
        assert_eq!(tracker.remaining(), Some(5));
    }
}
