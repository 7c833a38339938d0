// =============================================================================
// Result Ranker — strongest movers first
// =============================================================================

use crate::types::ScreeningResult;

/// Sort hits by descending percent change, then descending relative volume.
///
/// The sort is stable: results tied on both keys keep the order in which the
/// pipeline produced them.
pub fn rank_results(results: &mut [ScreeningResult]) {
    results.sort_by(|a, b| {
        b.percent_change
            .total_cmp(&a.percent_change)
            .then_with(|| b.rel_volume.total_cmp(&a.rel_volume))
    });
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn hit(symbol: &str, pct: f64, rvol: f64) -> ScreeningResult {
        ScreeningResult {
            symbol: symbol.to_string(),
            price: 5.0,
            percent_change: pct,
            rel_volume: rvol,
            headline: String::new(),
        }
    }

    #[test]
    fn orders_by_pct_then_rvol_descending() {
        let mut results = vec![hit("A", 12.0, 3.0), hit("B", 12.0, 8.0), hit("C", 20.0, 1.0)];
        rank_results(&mut results);
        let order: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[test]
    fn full_ties_keep_encounter_order() {
        let mut results = vec![
            hit("FIRST", 15.0, 6.0),
            hit("SECOND", 15.0, 6.0),
            hit("THIRD", 15.0, 6.0),
        ];
        rank_results(&mut results);
        let order: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn empty_and_single_are_noops() {
        let mut empty: Vec<ScreeningResult> = Vec::new();
        rank_results(&mut empty);
        assert!(empty.is_empty());

        let mut one = vec![hit("ONLY", 11.0, 5.0)];
        rank_results(&mut one);
        assert_eq!(one[0].symbol, "ONLY");
    }
}
