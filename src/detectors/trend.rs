//! Volume/price trend window detector
//!
//! Exhaustive scan over every window of `min_window..=max_window` sessions.
//! Overlapping and nested windows are reported independently.

use super::helpers::{confidence_score, WindowStats};
use crate::{Pattern, PatternError, Result, ScanConfig, Session, Window};

/// Detects windows where volume and price trend together.
///
/// Holds only its configuration, so one detector can be shared across
/// threads and calls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendDetector {
    config: ScanConfig,
}

impl TrendDetector {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    #[inline]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan aligned volume and price series.
    ///
    /// Series shorter than `min_window` yield an empty result. The series are
    /// expected to be finite; drop missing sessions beforehand.
    pub fn detect(&self, volumes: &[f64], prices: &[f64]) -> Result<Vec<Pattern>> {
        detect(volumes, prices, &self.config)
    }

    /// Scan a slice of sessions
    pub fn detect_sessions<T: Session>(&self, sessions: &[T]) -> Result<Vec<Pattern>> {
        let (volumes, prices): (Vec<f64>, Vec<f64>) =
            sessions.iter().map(|s| (s.volume(), s.price())).unzip();
        self.detect(&volumes, &prices)
    }
}

/// Scan aligned volume and price series with `config`.
///
/// Fails only on a length mismatch. Windows opening on a zero volume or price
/// are skipped. Results are unsorted: ordered by window length, then start.
pub fn detect(volumes: &[f64], prices: &[f64], config: &ScanConfig) -> Result<Vec<Pattern>> {
    if volumes.len() != prices.len() {
        return Err(PatternError::LengthMismatch {
            volumes: volumes.len(),
            prices: prices.len(),
        });
    }

    let len = volumes.len();
    let min_window = config.min_window.get();
    if len < min_window {
        return Ok(Vec::new());
    }
    let max_window = config.max_window.get().min(len);

    let mut patterns = Vec::new();

    for window_len in min_window..=max_window {
        for start in 0..=len - window_len {
            let window = Window::new(start, start + window_len - 1);
            let vol_slice = &volumes[window.range()];
            let price_slice = &prices[window.range()];

            let stats = match WindowStats::compute(vol_slice, price_slice, start) {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::debug!("Skipping window {}..={}: {}", window.start, window.end, e);
                    continue;
                }
            };

            for direction in stats.matched_directions(config) {
                patterns.push(Pattern {
                    direction,
                    window,
                    volume_change_pct: stats.volume_change_pct,
                    price_change_pct: stats.price_change_pct,
                    confidence: confidence_score(
                        window_len,
                        min_window,
                        stats.volume_change_pct,
                        stats.price_change_pct,
                    ),
                    volumes: vol_slice.to_vec(),
                    prices: price_slice.to_vec(),
                });
            }
        }
    }

    tracing::trace!("Detected {} patterns over {} sessions", patterns.len(), len);
    Ok(patterns)
}
