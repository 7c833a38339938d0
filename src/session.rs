// =============================================================================
// Session Clock — fractional progress through the regular trading session
// =============================================================================
//
// Relative volume must be compared against a baseline scaled to how much of
// the day has elapsed, so 9:45 volume isn't held against a full day's
// average.  Progress is linear between the configured open and close and
// clamped to [0, 1].
//
// Outside regular hours true progress is not meaningful, but extended-hours
// movers still need a volume baseline; callers substitute a fixed fallback
// via `effective_progress`.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

/// Current wall-clock time in the market timezone (handles DST automatically).
pub fn now_eastern() -> DateTime<Tz> {
    Utc::now().with_timezone(&New_York)
}

/// Parse a session boundary in "HH:MM" form.
pub fn parse_session_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .with_context(|| format!("invalid session time '{s}', expected HH:MM"))
}

/// Fraction of the regular session elapsed at `now`, in [0, 1].
///
/// Returns 0.0 strictly before `start`, 1.0 strictly after `end`, and the
/// clamped linear interpolation in between.
pub fn session_progress(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> f64 {
    if now < start {
        return 0.0;
    }
    if now > end {
        return 1.0;
    }

    let total = (end - start).num_seconds() as f64;
    if total <= 0.0 {
        // Degenerate configuration (close not after open): treat as over.
        return 1.0;
    }
    let done = (now - start).num_seconds() as f64;

    (done / total).clamp(0.0, 1.0)
}

/// Apply the pre/post-market edge policy: outside (0, 1) exclusive the raw
/// progress is replaced by the configured fallback.
pub fn effective_progress(raw: f64, prepost_fallback: f64) -> f64 {
    if raw <= 0.0 || raw >= 1.0 {
        prepost_fallback
    } else {
        raw
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn before_open_is_zero() {
        assert_eq!(session_progress(t(8, 0), t(9, 30), t(16, 0)), 0.0);
    }

    #[test]
    fn after_close_is_one() {
        assert_eq!(session_progress(t(17, 45), t(9, 30), t(16, 0)), 1.0);
    }

    #[test]
    fn midpoint_is_half() {
        // 09:30 to 16:00 is 6.5 hours; the midpoint falls at 12:45.
        let p = session_progress(t(12, 45), t(9, 30), t(16, 0));
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn at_open_and_close_boundaries() {
        assert_eq!(session_progress(t(9, 30), t(9, 30), t(16, 0)), 0.0);
        assert_eq!(session_progress(t(16, 0), t(9, 30), t(16, 0)), 1.0);
    }

    #[test]
    fn progress_is_clamped() {
        let p = session_progress(t(10, 0), t(9, 30), t(16, 0));
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn degenerate_session_treated_as_over() {
        assert_eq!(session_progress(t(12, 0), t(16, 0), t(9, 30)), 1.0);
    }

    #[test]
    fn effective_progress_substitutes_fallback_outside_session() {
        assert_eq!(effective_progress(0.0, 0.2), 0.2);
        assert_eq!(effective_progress(1.0, 0.2), 0.2);
        assert_eq!(effective_progress(0.5, 0.2), 0.5);
    }

    #[test]
    fn parse_session_time_accepts_hh_mm() {
        assert_eq!(parse_session_time("09:30").unwrap(), t(9, 30));
        assert!(parse_session_time("930").is_err());
        assert!(parse_session_time("25:00").is_err());
    }
}
