//! VA combined rating: the "whole person" combination of independent disability ratings.
//!
//! Ratings are not added. Each additional disability only affects the efficiency
//! left over by the ones before it:
//!
//! ```text
//! total = total + r * (100 - total) / 100
//! ```
//!
//! applied highest-first, then rounded to the nearest 10 (half-up) with anything
//! at or above 95 promoted to 100.
//!
//! The running total is kept in `Decimal` so that exact .5 boundaries (e.g. 85 → 90)
//! are never nudged across the midpoint by binary floating point.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Highest rating tier. Anything above it is clamped.
pub const MAX_RATING: u32 = 100;

/// Rounded values at or above this are reported as total disability.
const TOTAL_DISABILITY_THRESHOLD: u32 = 95;

/// One row of the step-by-step combination shown in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationStep {
    pub rating: u32,
    /// Unrounded running total after applying `rating`.
    pub running_total: f64,
}

/// Combines independent disability ratings into a single VA combined rating.
///
/// Total over every input: values ≤ 0 are ignored, values above 100 are clamped,
/// an empty (or all-ignored) input combines to 0. The result is always one of
/// `0, 10, 20, …, 90, 100`.
pub fn combine(ratings: &[i32]) -> u32 {
    let sorted = normalize(ratings);
    if sorted.is_empty() {
        return 0;
    }

    let total = running_totals(&sorted)
        .last()
        .copied()
        .unwrap_or(Decimal::ZERO);

    round_combined(total)
}

/// Returns the filtered, descending ratings with the running total after each one.
///
/// The last step's `running_total` is the value `combine` rounds.
pub fn combination_steps(ratings: &[i32]) -> Vec<CombinationStep> {
    let sorted = normalize(ratings);
    running_totals(&sorted)
        .into_iter()
        .zip(sorted)
        .map(|(total, rating)| CombinationStep {
            rating,
            running_total: total.to_f64().unwrap_or_default(),
        })
        .collect()
}

/// Drops non-positive entries, clamps to `MAX_RATING`, sorts descending.
fn normalize(ratings: &[i32]) -> Vec<u32> {
    let mut sorted: Vec<u32> = ratings
        .iter()
        .filter(|&&r| r > 0)
        .map(|&r| (r as u32).min(MAX_RATING))
        .collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

fn running_totals(sorted: &[u32]) -> Vec<Decimal> {
    let hundred = Decimal::ONE_HUNDRED;
    let mut totals = Vec::with_capacity(sorted.len());
    let mut iter = sorted.iter();

    let Some(&first) = iter.next() else {
        return totals;
    };

    let mut total = Decimal::from(first);
    totals.push(total);

    for &rating in iter {
        total += Decimal::from(rating) * (hundred - total) / hundred;
        totals.push(total);
    }

    totals
}

/// Nearest multiple of 10 (half-up), then the ≥ 95 → 100 rule and the 100 ceiling.
fn round_combined(total: Decimal) -> u32 {
    let tens = (total / Decimal::TEN)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0);
    let rounded = tens.saturating_mul(10);

    if rounded >= TOTAL_DISABILITY_THRESHOLD {
        MAX_RATING
    } else {
        rounded.min(MAX_RATING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_combines_to_zero() {
        assert_eq!(combine(&[]), 0);
    }

    #[test]
    fn test_single_tier_combines_to_itself() {
        for tier in (0..=100).step_by(10) {
            assert_eq!(combine(&[tier]), tier as u32, "tier {tier}");
        }
    }

    #[test]
    fn test_reference_example_50_30_10() {
        // 50 → 65 → 68.5 → 70
        assert_eq!(combine(&[50, 30, 10]), 70);
    }

    #[test]
    fn test_70_50_30_combines_to_90() {
        // 70 → 85 → 89.5 → 90
        assert_eq!(combine(&[70, 50, 30]), 90);
    }

    #[test]
    fn test_any_100_rating_yields_100() {
        assert_eq!(combine(&[100, 50, 30]), 100);
        assert_eq!(combine(&[10, 100]), 100);
    }

    #[test]
    fn test_midpoint_rounds_up() {
        // 70 + 50 * 0.30 = 85 exactly
        assert_eq!(combine(&[70, 50]), 90);
        // 50 + 10 * 0.50 = 55 exactly
        assert_eq!(combine(&[50, 10]), 60);
    }

    #[test]
    fn test_just_below_midpoint_rounds_down() {
        // 40 + 20 * 0.60 = 52
        assert_eq!(combine(&[40, 20]), 50);
    }

    #[test]
    fn test_ninety_five_promotes_to_total() {
        // 90 + 50 * 0.10 = 95
        assert_eq!(combine(&[90, 50]), 100);
        // 90 + 40 * 0.10 = 94 → 90
        assert_eq!(combine(&[90, 40]), 90);
    }

    #[test]
    fn test_order_does_not_matter() {
        assert_eq!(combine(&[30, 70, 10]), combine(&[70, 30, 10]));
        assert_eq!(combine(&[10, 10, 20, 70]), combine(&[70, 20, 10, 10]));
    }

    #[test]
    fn test_zero_and_negative_are_ignored() {
        assert_eq!(combine(&[50, 0, -10, 30]), combine(&[50, 30]));
        assert_eq!(combine(&[0, -20]), 0);
    }

    #[test]
    fn test_overlarge_ratings_are_clamped() {
        assert_eq!(combine(&[150]), 100);
        assert_eq!(combine(&[150, 150]), 100);
    }

    #[test]
    fn test_steps_follow_descending_order() {
        let steps = combination_steps(&[10, 50, 0, 30]);
        let ratings: Vec<u32> = steps.iter().map(|s| s.rating).collect();
        assert_eq!(ratings, vec![50, 30, 10]);
        assert_eq!(steps[0].running_total, 50.0);
        assert_eq!(steps[1].running_total, 65.0);
        assert_eq!(steps[2].running_total, 68.5);
    }

    #[test]
    fn test_steps_empty_for_no_positive_ratings() {
        assert!(combination_steps(&[0, -5]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_result_is_a_rating_tier(ratings in prop::collection::vec(-50i32..=200, 0..12)) {
            let combined = combine(&ratings);
            prop_assert!(combined <= 100);
            prop_assert_eq!(combined % 10, 0);
        }

        #[test]
        fn prop_adding_a_rating_never_decreases(
            ratings in prop::collection::vec(0i32..=10, 0..8).prop_map(|v| v.into_iter().map(|r| r * 10).collect::<Vec<_>>()),
            extra in 1i32..=100,
        ) {
            let before = combine(&ratings);
            let mut with_extra = ratings.clone();
            with_extra.push(extra);
            prop_assert!(combine(&with_extra) >= before);
        }

        #[test]
        fn prop_order_independent(mut ratings in prop::collection::vec(0i32..=100, 0..8)) {
            let forward = combine(&ratings);
            ratings.reverse();
            prop_assert_eq!(combine(&ratings), forward);
        }
    }
}
