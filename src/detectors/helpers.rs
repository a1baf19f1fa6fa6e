//! Window statistics shared by the detectors
//!
//! Percent change, monotonicity flags and the confidence formula.

use crate::{Direction, PatternError, Result, ScanConfig, SeriesKind};

// ============================================================
// CONFIDENCE CONSTANTS
// ============================================================

/// Score every matched window starts from
pub const BASE_CONFIDENCE: f64 = 50.0;
/// Added per session beyond `min_window`
pub const CONFIDENCE_PER_EXTRA_SESSION: f64 = 8.0;
/// Volume contribution: |volume change %| / VOLUME_DIVISOR, capped
pub const VOLUME_DIVISOR: f64 = 2.0;
pub const VOLUME_CAP: f64 = 20.0;
/// Price contribution: |price change %| * PRICE_WEIGHT, capped
pub const PRICE_WEIGHT: f64 = 8.0;
pub const PRICE_CAP: f64 = 20.0;
/// Hard ceiling after rounding
pub const MAX_CONFIDENCE: f64 = 95.0;

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Percent change from `first` to `last`. `None` when `first` is zero.
#[inline]
pub fn percent_change(first: f64, last: f64) -> Option<f64> {
    (first != 0.0).then(|| (last - first) / first * 100.0)
}

/// Confidence score for a matched window.
///
/// Every term is non-negative, so the result lies in `50..=95`.
#[inline]
pub fn confidence_score(
    window_len: usize,
    min_window: usize,
    volume_change_pct: f64,
    price_change_pct: f64,
) -> u8 {
    let extra_sessions = window_len.saturating_sub(min_window) as f64;
    let score = BASE_CONFIDENCE
        + extra_sessions * CONFIDENCE_PER_EXTRA_SESSION
        + (volume_change_pct.abs() / VOLUME_DIVISOR).min(VOLUME_CAP)
        + (price_change_pct.abs() * PRICE_WEIGHT).min(PRICE_CAP);
    score.round().min(MAX_CONFIDENCE) as u8
}

/// Step-wise trend flags of a sequence.
///
/// `up` holds when no step decreases, `down` when no step increases. A flat
/// sequence (and any sequence shorter than two) has both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monotonicity {
    pub up: bool,
    pub down: bool,
}

impl Monotonicity {
    pub fn of(values: &[f64]) -> Self {
        let mut up = true;
        let mut down = true;
        for pair in values.windows(2) {
            if pair[1] < pair[0] {
                up = false;
            }
            if pair[1] > pair[0] {
                down = false;
            }
        }
        Self { up, down }
    }

    #[inline]
    pub fn is_flat(self) -> bool {
        self.up && self.down
    }
}

/// Aggregate statistics of one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub volume_change_pct: f64,
    pub price_change_pct: f64,
    pub volume_trend: Monotonicity,
    pub price_trend: Monotonicity,
}

impl WindowStats {
    /// Compute stats for equal-length, non-empty slices starting at session
    /// `start`. Fails with `ZeroBase` when either slice opens at zero.
    pub fn compute(volumes: &[f64], prices: &[f64], start: usize) -> Result<Self> {
        if volumes.len() != prices.len() {
            return Err(PatternError::LengthMismatch {
                volumes: volumes.len(),
                prices: prices.len(),
            });
        }
        let (Some(&v_first), Some(&v_last), Some(&p_first), Some(&p_last)) =
            (volumes.first(), volumes.last(), prices.first(), prices.last())
        else {
            return Err(PatternError::InvalidValue("empty window"));
        };

        let volume_change_pct =
            percent_change(v_first, v_last).ok_or(PatternError::ZeroBase {
                series: SeriesKind::Volume,
                index: start,
            })?;
        let price_change_pct =
            percent_change(p_first, p_last).ok_or(PatternError::ZeroBase {
                series: SeriesKind::Price,
                index: start,
            })?;

        Ok(Self {
            volume_change_pct,
            price_change_pct,
            volume_trend: Monotonicity::of(volumes),
            price_trend: Monotonicity::of(prices),
        })
    }

    #[inline]
    pub fn is_bullish(&self, config: &ScanConfig) -> bool {
        self.volume_trend.up
            && self.price_trend.up
            && self.volume_change_pct.abs() >= config.min_volume_change_pct.get()
            && self.price_change_pct >= config.min_price_change_pct.get()
    }

    #[inline]
    pub fn is_bearish(&self, config: &ScanConfig) -> bool {
        self.volume_trend.down
            && self.price_trend.down
            && self.volume_change_pct.abs() >= config.min_volume_change_pct.get()
            && self.price_change_pct <= -config.min_price_change_pct.get()
    }

    /// Directions this window matches that pass the config's direction
    /// filter, bullish first. A flat window can match both.
    pub fn matched_directions(&self, config: &ScanConfig) -> impl Iterator<Item = Direction> {
        let filter = config.direction;
        [
            self.is_bullish(config).then_some(Direction::Bullish),
            self.is_bearish(config).then_some(Direction::Bearish),
        ]
        .into_iter()
        .flatten()
        .filter(move |d| filter.accepts(*d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DirectionFilter;

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(100.0, 200.0), Some(100.0));
        assert_eq!(percent_change(50.0, 56.0).map(|p| p.round()), Some(12.0));
        assert_eq!(percent_change(200.0, 100.0), Some(-50.0));
        assert_eq!(percent_change(0.0, 10.0), None);
    }

    #[test]
    fn test_monotonicity() {
        assert_eq!(
            Monotonicity::of(&[1.0, 2.0, 2.0, 3.0]),
            Monotonicity { up: true, down: false }
        );
        assert_eq!(
            Monotonicity::of(&[3.0, 2.0, 2.0, 1.0]),
            Monotonicity { up: false, down: true }
        );
        assert_eq!(
            Monotonicity::of(&[1.0, 3.0, 2.0]),
            Monotonicity { up: false, down: false }
        );
        assert!(Monotonicity::of(&[4.0, 4.0, 4.0]).is_flat());
        assert!(Monotonicity::of(&[4.0]).is_flat());
    }

    #[test]
    fn test_confidence_score() {
        // 50 + 8 + min(50, 20) + min(96, 20) = 98, capped
        assert_eq!(confidence_score(4, 3, 100.0, 12.0), 95);
        // 50 + 0 + 20 + 20
        assert_eq!(confidence_score(3, 3, 50.0, 6.0), 90);
        // 50 + 0 + 5 + 16
        assert_eq!(confidence_score(3, 3, 10.0, 2.0), 71);
        // 50 + 2.5 + 8 = 60.5 rounds up
        assert_eq!(confidence_score(3, 3, 5.0, 1.0), 61);
        // Sign does not matter
        assert_eq!(confidence_score(3, 3, -10.0, -2.0), 71);
        assert_eq!(confidence_score(3, 3, 0.0, 0.0), 50);
    }

    #[test]
    fn test_window_stats_zero_base() {
        let err = WindowStats::compute(&[0.0, 10.0, 20.0], &[1.0, 2.0, 3.0], 4).unwrap_err();
        assert_eq!(
            err,
            PatternError::ZeroBase {
                series: SeriesKind::Volume,
                index: 4
            }
        );

        let err = WindowStats::compute(&[1.0, 10.0], &[0.0, 2.0], 0).unwrap_err();
        assert!(matches!(
            err,
            PatternError::ZeroBase {
                series: SeriesKind::Price,
                ..
            }
        ));
    }

    #[test]
    fn test_flat_window_matches_both_with_zero_thresholds() {
        let config = crate::ScanConfig::builder()
            .min_volume_change_pct(0.0)
            .min_price_change_pct(0.0)
            .build()
            .unwrap();
        let stats = WindowStats::compute(&[10.0, 10.0, 10.0], &[5.0, 5.0, 5.0], 0).unwrap();
        let dirs: Vec<_> = stats.matched_directions(&config).collect();
        assert_eq!(dirs, vec![Direction::Bullish, Direction::Bearish]);

        let bearish_only = ScanConfig {
            direction: DirectionFilter::Bearish,
            ..config
        };
        let dirs: Vec<_> = stats.matched_directions(&bearish_only).collect();
        assert_eq!(dirs, vec![Direction::Bearish]);
    }

    #[test]
    fn test_thresholds() {
        let config = ScanConfig::default();
        // Volume +4% is below the 5% threshold
        let stats = WindowStats::compute(&[100.0, 102.0, 104.0], &[10.0, 11.0, 12.0], 0).unwrap();
        assert!(!stats.is_bullish(&config));
        // Price +0.5% is below the 1% threshold
        let stats =
            WindowStats::compute(&[100.0, 110.0, 120.0], &[100.0, 100.2, 100.5], 0).unwrap();
        assert!(!stats.is_bullish(&config));
        // Bearish needs price <= -1%
        let stats = WindowStats::compute(&[120.0, 110.0, 100.0], &[20.0, 19.0, 18.0], 0).unwrap();
        assert!(stats.is_bearish(&config));
        assert!(!stats.is_bullish(&config));
    }
}
