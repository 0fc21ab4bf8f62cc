//! Fair-price estimation for vehicle listings.
//!
//! The fair price blends two sources, both in integer cents: the mean of
//! the vehicle's own most recent recorded prices (weight 0.4) and the mean
//! price of comparable published vehicles in the same category within ±3
//! model years (weight 0.6). A single available source passes through
//! unchanged; neither source means no estimate.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Weight of the vehicle's own price history in the blend.
const OWN_HISTORY_WEIGHT: f64 = 0.4;
/// Weight of the comparable-category mean in the blend.
const COMPARABLE_WEIGHT: f64 = 0.6;
/// How many of the vehicle's own price points feed the history mean and
/// the trend classification.
pub const HISTORY_WINDOW: usize = 3;
/// Model-year tolerance when selecting comparable vehicles.
pub const COMPARABLE_YEAR_SPAN: i16 = 3;

/// Direction of a vehicle's recent asking-price movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Rising,
    Falling,
    Stable,
}

/// Mean of the most recent `HISTORY_WINDOW` price points, newest first.
///
/// Returns `None` for an empty history.
#[must_use]
pub fn history_mean_cents(recent_cents: &[i64]) -> Option<i64> {
    let window = &recent_cents[..recent_cents.len().min(HISTORY_WINDOW)];
    if window.is_empty() {
        return None;
    }
    let sum: i64 = window.iter().sum();
    #[allow(clippy::cast_possible_wrap)]
    let n = window.len() as i64;
    // Round half away from zero on the cent scale.
    Some((sum + n / 2) / n)
}

/// The blended fair price in cents.
///
/// With both sources available the result is
/// `round(own * 0.4 + comparable * 0.6)`; with one source, that source
/// unchanged; with neither, `None`.
#[must_use]
pub fn fair_price_cents(own_history_cents: &[i64], comparable_mean_cents: Option<i64>) -> Option<i64> {
    let own = history_mean_cents(own_history_cents);
    match (own, comparable_mean_cents) {
        (Some(own), Some(comparable)) => {
            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_possible_truncation
            )]
            let blended =
                (own as f64).mul_add(OWN_HISTORY_WEIGHT, comparable as f64 * COMPARABLE_WEIGHT);
            Some(blended.round() as i64)
        }
        (Some(own), None) => Some(own),
        (None, Some(comparable)) => Some(comparable),
        (None, None) => None,
    }
}

/// Classify the price movement over the `HISTORY_WINDOW` most recent
/// points, newest first.
///
/// Compares the sign of consecutive deltas: a majority of increases is
/// `Rising`, a majority of decreases is `Falling`, anything else —
/// including ties and too-short histories — is `Stable`.
#[must_use]
pub fn price_trend(recent_cents: &[i64]) -> PriceTrend {
    let window = &recent_cents[..recent_cents.len().min(HISTORY_WINDOW)];
    if window.len() < 2 {
        return PriceTrend::Stable;
    }

    let mut increases = 0u32;
    let mut decreases = 0u32;
    // Window is newest first; walk from the oldest point forward.
    for pair in window.windows(2) {
        let (newer, older) = (pair[0], pair[1]);
        if newer > older {
            increases += 1;
        } else if newer < older {
            decreases += 1;
        }
    }

    if increases > decreases {
        PriceTrend::Rising
    } else if decreases > increases {
        PriceTrend::Falling
    } else {
        PriceTrend::Stable
    }
}

/// Convert a euro amount to integer cents.
///
/// Returns `None` if the amount does not fit in `i64` cents.
#[must_use]
pub fn euros_to_cents(amount: Decimal) -> Option<i64> {
    (amount * Decimal::from(100)).round().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_weighs_comparables_heavier() {
        // Own history mean 10000, comparable mean 20000:
        // 10000 * 0.4 + 20000 * 0.6 = 16000.
        assert_eq!(fair_price_cents(&[10_000], Some(20_000)), Some(16_000));
    }

    #[test]
    fn history_only_passes_through_unchanged() {
        assert_eq!(fair_price_cents(&[10_000, 10_000, 10_000], None), Some(10_000));
    }

    #[test]
    fn comparable_only_passes_through_unchanged() {
        assert_eq!(fair_price_cents(&[], Some(1_234_500)), Some(1_234_500));
    }

    #[test]
    fn no_sources_means_no_estimate() {
        assert_eq!(fair_price_cents(&[], None), None);
    }

    #[test]
    fn history_mean_uses_at_most_three_points() {
        // Only the first three (newest) points count.
        assert_eq!(
            history_mean_cents(&[12_000, 11_000, 10_000, 900_000]),
            Some(11_000)
        );
    }

    #[test]
    fn history_mean_rounds_half_up() {
        assert_eq!(history_mean_cents(&[1, 2]), Some(2));
    }

    #[test]
    fn blend_rounds_to_whole_cents() {
        // 101 * 0.4 + 100 * 0.6 = 100.4 → 100
        assert_eq!(fair_price_cents(&[101], Some(100)), Some(100));
    }

    #[test]
    fn trend_rising_when_prices_climb() {
        // Newest first: 12000 > 11000 > 10000.
        assert_eq!(price_trend(&[12_000, 11_000, 10_000]), PriceTrend::Rising);
    }

    #[test]
    fn trend_falling_when_prices_drop() {
        assert_eq!(price_trend(&[9_000, 10_000, 11_000]), PriceTrend::Falling);
    }

    #[test]
    fn trend_tie_defaults_to_stable() {
        // One increase, one decrease.
        assert_eq!(price_trend(&[10_000, 9_000, 10_000]), PriceTrend::Stable);
    }

    #[test]
    fn trend_flat_history_is_stable() {
        assert_eq!(price_trend(&[10_000, 10_000, 10_000]), PriceTrend::Stable);
    }

    #[test]
    fn trend_single_point_is_stable() {
        assert_eq!(price_trend(&[10_000]), PriceTrend::Stable);
        assert_eq!(price_trend(&[]), PriceTrend::Stable);
    }

    #[test]
    fn trend_ignores_points_beyond_the_window() {
        // The fourth point would flip the majority if it were counted.
        assert_eq!(
            price_trend(&[12_000, 11_000, 10_500, 999_999]),
            PriceTrend::Rising
        );
    }

    #[test]
    fn euros_convert_to_cents_with_rounding() {
        assert_eq!(euros_to_cents(Decimal::new(104_995, 1)), Some(1_049_950));
        assert_eq!(euros_to_cents(Decimal::new(9_999, 2)), Some(9_999));
    }

    #[test]
    fn trend_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PriceTrend::Rising).expect("serialize"),
            "\"rising\""
        );
    }
}
