use serde::Serialize;

/// 2025 VA monthly compensation rates, veteran only (no dependents).
///
/// Keys are exactly the eleven combined-rating tiers. Updated once a year with COLA.
pub const COMPENSATION_RATES: [(u32, i64); 11] = [
    (0, 0),
    (10, 171),
    (20, 338),
    (30, 524),
    (40, 755),
    (50, 1075),
    (60, 1361),
    (70, 1716),
    (80, 1995),
    (90, 2241),
    (100, 3737),
];

/// Monthly compensation in whole dollars for a combined rating.
///
/// Anything that is not a canonical tier (e.g. 73, -10) is unknown and yields 0.
pub fn monthly_compensation(combined_rating: i64) -> i64 {
    COMPENSATION_RATES
        .iter()
        .find(|(tier, _)| i64::from(*tier) == combined_rating)
        .map(|(_, dollars)| *dollars)
        .unwrap_or(0)
}

/// Dollar delta between a current and a potential combined rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompensationDelta {
    pub current_monthly: i64,
    pub potential_monthly: i64,
    pub monthly_increase: i64,
    pub annual_increase: i64,
}

impl CompensationDelta {
    pub fn between(current_rating: i64, potential_rating: i64) -> Self {
        let current_monthly = monthly_compensation(current_rating);
        let potential_monthly = monthly_compensation(potential_rating);
        let monthly_increase = potential_monthly - current_monthly;

        Self {
            current_monthly,
            potential_monthly,
            monthly_increase,
            annual_increase: monthly_increase * 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::combine;

    #[test]
    fn test_every_tier_has_a_rate() {
        for tier in (0..=100).step_by(10) {
            let expected = COMPENSATION_RATES
                .iter()
                .find(|(t, _)| *t == tier)
                .map(|(_, d)| *d);
            assert_eq!(Some(monthly_compensation(tier as i64)), expected);
        }
    }

    #[test]
    fn test_empty_ratings_compensate_zero() {
        assert_eq!(monthly_compensation(combine(&[]) as i64), 0);
    }

    #[test]
    fn test_non_canonical_key_is_zero() {
        assert_eq!(monthly_compensation(73), 0);
        assert_eq!(monthly_compensation(-10), 0);
        assert_eq!(monthly_compensation(110), 0);
    }

    #[test]
    fn test_rates_increase_with_rating() {
        let dollars: Vec<i64> = COMPENSATION_RATES.iter().map(|(_, d)| *d).collect();
        assert!(dollars.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_increase_from_60_to_100() {
        let delta = CompensationDelta::between(60, 100);
        assert_eq!(delta.current_monthly, 1361);
        assert_eq!(delta.potential_monthly, 3737);
        assert_eq!(delta.monthly_increase, 2376);
        assert_eq!(delta.annual_increase, 28512);
    }

    #[test]
    fn test_decrease_is_negative() {
        let delta = CompensationDelta::between(90, 70);
        assert_eq!(delta.monthly_increase, 1716 - 2241);
        assert_eq!(delta.annual_increase, (1716 - 2241) * 12);
    }
}
