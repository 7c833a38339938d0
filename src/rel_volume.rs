// =============================================================================
// Relative Volume Estimator
// =============================================================================
//
// rVol compares today's observed volume against the volume that would be
// "expected by now", i.e. the average daily volume scaled by session
// progress:
//
//   denominator = max(1.0, baseline * max(0.1, progress))
//   rVol        = today_volume / denominator
//
// The 0.1 progress floor caps the blow-up in the first minutes of the
// session and deliberately underestimates rVol very early in the day.  The
// 1.0 denominator floor keeps the ratio finite when the baseline is unknown.
// =============================================================================

/// Resolve the average-volume baseline from an ordered list of candidate
/// sources.  The first candidate that is present and positive wins; with no
/// usable candidate the baseline is 0.0.
pub fn baseline_volume(candidates: &[Option<f64>]) -> f64 {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|v| *v > 0.0)
        .unwrap_or(0.0)
}

/// Today's volume relative to the progress-scaled baseline.
///
/// # Edge cases
/// - `baseline == 0.0` => denominator floors at 1.0, result stays finite
/// - `progress == 0.0` => progress floors at 0.1 (early-session bias)
pub fn relative_volume(today_volume: u64, baseline: f64, progress: f64) -> f64 {
    let denominator = (baseline * progress.max(0.1)).max(1.0);
    today_volume as f64 / denominator
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // ---- baseline_volume ---------------------------------------------------

    #[test]
    fn baseline_prefers_first_present_candidate() {
        assert_eq!(baseline_volume(&[Some(100_000.0), Some(80_000.0)]), 100_000.0);
    }

    #[test]
    fn baseline_falls_through_absent_and_zero() {
        assert_eq!(baseline_volume(&[None, Some(80_000.0)]), 80_000.0);
        // A zero average is as useless as a missing one.
        assert_eq!(baseline_volume(&[Some(0.0), Some(80_000.0)]), 80_000.0);
    }

    #[test]
    fn baseline_defaults_to_zero() {
        assert_eq!(baseline_volume(&[None, None]), 0.0);
        assert_eq!(baseline_volume(&[]), 0.0);
    }

    // ---- relative_volume ---------------------------------------------------

    #[test]
    fn worked_example_midday() {
        // 600k traded vs a 100k average at half-session: denominator is
        // max(1, 100000 * 0.5) = 50000, so rVol = 12.0.
        let rvol = relative_volume(600_000, 100_000.0, 0.5);
        assert!((rvol - 12.0).abs() < 1e-12);
    }

    #[test]
    fn monotone_in_today_volume() {
        let mut prev = 0.0;
        for v in [0u64, 1, 1_000, 50_000, 600_000, 10_000_000] {
            let r = relative_volume(v, 100_000.0, 0.5);
            assert!(r >= prev, "rVol must not decrease as volume grows");
            prev = r;
        }
    }

    #[test]
    fn never_divides_by_zero() {
        // Unknown baseline and zero progress still produce a finite ratio.
        let r = relative_volume(42, 0.0, 0.0);
        assert!(r.is_finite());
        assert!((r - 42.0).abs() < 1e-12);
    }

    #[test]
    fn early_session_progress_floor() {
        // At 0.01 progress the floor of 0.1 applies, underestimating rVol.
        let floored = relative_volume(10_000, 100_000.0, 0.01);
        let unfloored = 10_000.0 / (100_000.0 * 0.01);
        assert!((floored - 1.0).abs() < 1e-12);
        assert!(floored < unfloored);
    }

    #[test]
    fn zero_volume_is_zero() {
        assert_eq!(relative_volume(0, 100_000.0, 0.5), 0.0);
    }
}
