//! Input preparation
//!
//! The detector assumes clean, aligned series. Raw market data has gaps; a
//! session is kept only when both its volume and price are present, finite
//! and positive.

use crate::{detectors::TrendDetector, Pattern, PatternError, Result};

/// Sessions kept by [`AlignedSeries::tail`] in a typical daily scan
pub const DEFAULT_LOOKBACK: usize = 20;

/// Equal-length volume and price series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    volumes: Vec<f64>,
    prices: Vec<f64>,
    dropped: usize,
}

impl AlignedSeries {
    pub fn new(volumes: Vec<f64>, prices: Vec<f64>) -> Result<Self> {
        if volumes.len() != prices.len() {
            return Err(PatternError::LengthMismatch {
                volumes: volumes.len(),
                prices: prices.len(),
            });
        }
        Ok(Self {
            volumes,
            prices,
            dropped: 0,
        })
    }

    #[inline]
    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    #[inline]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Sessions removed by [`sanitize`]
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Keep only the last `n` sessions
    pub fn tail(mut self, n: usize) -> Self {
        let skip = self.len().saturating_sub(n);
        self.volumes.drain(..skip);
        self.prices.drain(..skip);
        self
    }

    pub fn detect(&self, detector: &TrendDetector) -> Result<Vec<Pattern>> {
        detector.detect(&self.volumes, &self.prices)
    }
}

#[inline]
fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Align raw series, dropping every session with a missing, non-positive or
/// non-finite volume or price.
pub fn sanitize(volumes: &[Option<f64>], prices: &[Option<f64>]) -> Result<AlignedSeries> {
    if volumes.len() != prices.len() {
        return Err(PatternError::LengthMismatch {
            volumes: volumes.len(),
            prices: prices.len(),
        });
    }

    let mut series = AlignedSeries::default();
    for (&v, &p) in volumes.iter().zip(prices) {
        match (usable(v), usable(p)) {
            (Some(v), Some(p)) => {
                series.volumes.push(v);
                series.prices.push(p);
            }
            _ => series.dropped += 1,
        }
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_drops_incomplete_sessions() {
        let volumes = [Some(100.0), None, Some(150.0), Some(0.0), Some(200.0), Some(f64::NAN)];
        let prices = [Some(50.0), Some(51.0), None, Some(52.0), Some(56.0), Some(57.0)];

        let series = sanitize(&volumes, &prices).unwrap();
        assert_eq!(series.volumes(), &[100.0, 200.0]);
        assert_eq!(series.prices(), &[50.0, 56.0]);
        assert_eq!(series.dropped(), 4);
    }

    #[test]
    fn test_sanitize_drops_negative_values() {
        let volumes = [Some(-100.0), Some(-50.0), Some(-10.0), Some(120.0)];
        let prices = [Some(50.0), Some(51.0), Some(53.0), Some(-1.0)];

        let series = sanitize(&volumes, &prices).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.dropped(), 4);
        assert!(series
            .detect(&TrendDetector::with_defaults())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_sanitize_mismatch() {
        let err = sanitize(&[Some(1.0)], &[]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_tail() {
        let volumes: Vec<f64> = (1..=30).map(f64::from).collect();
        let prices = volumes.clone();
        let series = AlignedSeries::new(volumes, prices).unwrap().tail(DEFAULT_LOOKBACK);
        assert_eq!(series.len(), 20);
        assert_eq!(series.volumes()[0], 11.0);
        assert_eq!(series.prices()[19], 30.0);

        let short = AlignedSeries::new(vec![1.0], vec![2.0]).unwrap().tail(5);
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn test_new_mismatch() {
        assert!(AlignedSeries::new(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(AlignedSeries::new(Vec::new(), Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_detect_on_sanitized() {
        let volumes = [Some(100.0), None, Some(120.0), Some(150.0), Some(200.0)];
        let prices = [Some(50.0), Some(99.0), Some(51.0), Some(53.0), Some(56.0)];
        let series = sanitize(&volumes, &prices).unwrap();
        let patterns = series.detect(&TrendDetector::with_defaults()).unwrap();
        assert_eq!(patterns.len(), 3);
    }
}
