//! Comparable-price sanity bands.
//!
//! Gives students a "typical for this area" range so an implausibly cheap
//! or expensive listing stands out. With fewer than three comparables the
//! band is a fixed fallback rather than a statistic — a small-sample
//! policy, not an error.

/// Band returned when there are too few comparables to compute one.
pub const FALLBACK_BAND: (i64, i64) = (800, 950);

/// Minimum number of comparables for a computed band.
pub const MIN_COMPARABLES: usize = 3;

/// 25th/75th percentile band over comparable monthly prices, truncated to
/// whole dollars.
pub fn price_band(prices: &[i64]) -> (i64, i64) {
    if prices.len() < MIN_COMPARABLES {
        return FALLBACK_BAND;
    }
    let mut sorted = prices.to_vec();
    sorted.sort_unstable();
    (percentile(&sorted, 25.0) as i64, percentile(&sorted, 75.0) as i64)
}

/// Linear-interpolated percentile between order statistics of a sorted,
/// non-empty sample.
fn percentile(sorted: &[i64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_prices_returns_fallback_regardless_of_values() {
        assert_eq!(price_band(&[5000, 6000]), FALLBACK_BAND);
        assert_eq!(price_band(&[1, 2]), FALLBACK_BAND);
    }

    #[test]
    fn test_empty_returns_fallback() {
        assert_eq!(price_band(&[]), FALLBACK_BAND);
    }

    #[test]
    fn test_five_prices_lands_on_order_statistics() {
        // rank 25% = 1.0 and 75% = 3.0 exactly, no interpolation needed.
        assert_eq!(price_band(&[600, 800, 1000, 1200, 1400]), (800, 1200));
    }

    #[test]
    fn test_four_prices_interpolates() {
        // 25th: rank 0.75 -> 100 + 0.75*100 = 175
        // 75th: rank 2.25 -> 300 + 0.25*100 = 325
        assert_eq!(price_band(&[100, 200, 300, 400]), (175, 325));
    }

    #[test]
    fn test_fractional_result_truncates() {
        // 25th: rank 0.5 -> 100.5 truncates to 100.
        assert_eq!(price_band(&[100, 101, 102]), (100, 101));
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        assert_eq!(price_band(&[1400, 600, 1200, 800, 1000]), (800, 1200));
    }
}
