//! Parameter metadata for the trend detector
//!
//! This module describes the tunable scan parameters, enabling:
//! - Grid search over thresholds and window lengths
//! - Parameter documentation
//! - Building a validated config from a loose parameter map
//!
//! # Example
//!
//! ```rust
//! use vpscan::params::{ParamMeta, ParamType, ParameterizedDetector};
//! use vpscan::prelude::*;
//!
//! for param in TrendDetector::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{detectors::TrendDetector, PatternError, Percent, Period, Result, ScanConfig};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Non-negative percentage threshold
  Percent,
  /// Window length in sessions (positive integer)
  Period,
}

/// Metadata for a single scan parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name, matching the `ScanConfig` field
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn percent(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Percent, default, range, description }
  }

  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(PatternError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Percent => Ok(()),
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(PatternError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

/// Tunable fields of [`ScanConfig`]
pub const SCAN_PARAMS: &[ParamMeta] = &[
  ParamMeta::period("min_window", 3.0, (2.0, 7.0, 1.0), "Shortest window in sessions"),
  ParamMeta::period("max_window", 7.0, (3.0, 10.0, 1.0), "Longest window in sessions"),
  ParamMeta::percent(
    "min_volume_change_pct",
    5.0,
    (1.0, 50.0, 1.0),
    "Minimum absolute volume change across the window",
  ),
  ParamMeta::percent(
    "min_price_change_pct",
    1.0,
    (0.5, 5.0, 0.5),
    "Minimum price move in the pattern's direction",
  ),
];

// ============================================================
// PARAMETERIZED DETECTOR TRAIT
// ============================================================

/// Trait for detectors that support parameterization
pub trait ParameterizedDetector: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a detector with parameters from a HashMap
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;
}

impl ScanConfig {
  /// Build a validated config from a parameter map. Missing keys default;
  /// the direction filter is kept at its default.
  pub fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    let d = ScanConfig::default();
    let config = ScanConfig {
      min_window: get_period(params, "min_window", d.min_window.get())?,
      max_window: get_period(params, "max_window", d.max_window.get())?,
      min_volume_change_pct: get_percent(
        params,
        "min_volume_change_pct",
        d.min_volume_change_pct.get(),
      )?,
      min_price_change_pct: get_percent(
        params,
        "min_price_change_pct",
        d.min_price_change_pct.get(),
      )?,
      direction: d.direction,
    };
    config.validate()?;
    Ok(config)
  }
}

impl ParameterizedDetector for TrendDetector {
  fn param_meta() -> &'static [ParamMeta] {
    SCAN_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    TrendDetector::new(ScanConfig::with_params(params)?)
  }
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Percent from params with default fallback
pub fn get_percent(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Percent> {
  let value = params.get(key).copied().unwrap_or(default);
  Percent::new(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value < 0.0 || value.fract() != 0.0 {
    return Err(PatternError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

// ============================================================
// TESTS
// ============================================================
