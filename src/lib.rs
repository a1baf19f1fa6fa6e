//! # VPSCAN - Volume/Price trend scanner
//!
//! Finds contiguous windows of trading sessions where volume and price trend
//! together, and scores each window with a bounded confidence value.
//!
//! ## Quick Start
//!
//! ```rust
//! use vpscan::prelude::*;
//!
//! let volumes = [100.0, 120.0, 150.0, 200.0];
//! let prices = [50.0, 51.0, 53.0, 56.0];
//!
//! let detector = TrendDetector::new(ScanConfig::default()).unwrap();
//! let mut patterns = detector.detect(&volumes, &prices).unwrap();
//!
//! // Detection returns matches unsorted; rank once over the full set
//! rank(&mut patterns);
//! assert_eq!(patterns[0].confidence, 95);
//! ```

pub mod detectors;
pub mod format;
pub mod params;
pub mod rank;
pub mod series;

pub mod prelude {
    pub use crate::{
        // Detectors
        detectors::*,
        // Display
        format::{format_price, format_volume, price_trail, volume_trail},
        // Parameters
        params::{get_percent, get_period, ParamMeta, ParamType, ParameterizedDetector},
        // Ranking
        rank::{filter_min_confidence, rank, rank_results, RankedPattern, ScanSummary},
        // Parallel
        scan_parallel,
        // Input preparation
        series::{sanitize, AlignedSeries, DEFAULT_LOOKBACK},
        // Types
        ConfidenceBand,
        Direction,
        DirectionFilter,
        Instrument,
        Pattern,
        // Errors
        PatternError,
        Percent,
        Period,
        Result,
        ScanConfig,
        ScanConfigBuilder,
        ScanError,
        ScanResult,
        SeriesKind,
        // Core traits
        Session,
        Window,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Which of the two aligned series a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SeriesKind {
    Volume,
    Price,
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesKind::Volume => f.write_str("volume"),
            SeriesKind::Price => f.write_str("price"),
        }
    }
}

/// Errors that can occur during detection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid input: {volumes} volumes vs {prices} prices")]
    LengthMismatch { volumes: usize, prices: usize },

    #[error("Invalid input: zero {series} at index {index}, percent change undefined")]
    ZeroBase { series: SeriesKind, index: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PatternError {
    /// True for errors caused by the series handed to the detector,
    /// as opposed to configuration errors.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PatternError::LengthMismatch { .. } | PatternError::ZeroBase { .. }
        )
    }
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Non-negative, finite percentage threshold
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    /// Create a new Percent, validating the value is finite and >= 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(PatternError::InvalidValue(
                "Percent cannot be NaN or infinite",
            ));
        }
        if value < 0.0 {
            return Err(PatternError::OutOfRange {
                field: "Percent",
                value,
                min: 0.0,
                max: f64::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Create a Percent from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Percent {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Percent {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Percent::new(value).map_err(serde::de::Error::custom)
    }
}

/// Window length in sessions (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(PatternError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// SESSION TRAIT
// ============================================================

/// One trading session: traded volume and closing price.
///
/// Values are expected to be finite. Sessions with missing data should be
/// dropped before detection (see [`series::sanitize`]).
pub trait Session {
    fn volume(&self) -> f64;
    fn price(&self) -> f64;
}

/// `(volume, price)` pairs
impl Session for (f64, f64) {
    #[inline]
    fn volume(&self) -> f64 {
        self.0
    }

    #[inline]
    fn price(&self) -> f64 {
        self.1
    }
}

impl<T: Session + ?Sized> Session for &T {
    #[inline]
    fn volume(&self) -> f64 {
        (**self).volume()
    }

    #[inline]
    fn price(&self) -> f64 {
        (**self).price()
    }
}

// ============================================================
// PATTERN - result of detection
// ============================================================

/// Direction of a detected window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Volume and price rising together
    Bullish,
    /// Volume and price falling together
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }

    /// Human-readable pattern name
    pub fn label(self) -> &'static str {
        match self {
            Direction::Bullish => "Volume UP + Price UP",
            Direction::Bearish => "Volume DOWN + Price DOWN",
        }
    }
}

/// Which directions a scan reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionFilter {
    Bullish,
    Bearish,
    #[default]
    Both,
}

impl DirectionFilter {
    #[inline]
    pub fn accepts(self, direction: Direction) -> bool {
        match self {
            DirectionFilter::Both => true,
            DirectionFilter::Bullish => direction.is_bullish(),
            DirectionFilter::Bearish => direction.is_bearish(),
        }
    }
}

/// Inclusive range `[start, end]` of session indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of sessions covered, `end - start + 1`. Zero when `start > end`.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Half-open range for slicing, empty when `start > end`
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len()
    }
}

/// Coarse grouping of confidence scores for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            c if c >= 85 => ConfidenceBand::High,
            c if c >= 70 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }
}

/// One matched window
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pattern {
    pub direction: Direction,
    pub window: Window,
    /// Volume change from first to last session of the window, in percent
    pub volume_change_pct: f64,
    /// Price change from first to last session of the window, in percent
    pub price_change_pct: f64,
    /// Heuristic score, always within 50..=95
    pub confidence: u8,
    /// Raw volume sub-sequence of the window
    pub volumes: Vec<f64>,
    /// Raw price sub-sequence of the window
    pub prices: Vec<f64>,
}

impl Pattern {
    /// Number of sessions in the window
    #[inline]
    pub fn candles(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }
}

// ============================================================
// SCAN CONFIG
// ============================================================

/// Detection parameters.
///
/// `min_price_change_pct` is applied with the sign of the direction:
/// bullish windows need `price_change >= +t`, bearish `price_change <= -t`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScanConfig {
    pub min_window: Period,
    pub max_window: Period,
    pub min_volume_change_pct: Percent,
    pub min_price_change_pct: Percent,
    pub direction: DirectionFilter,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_window: Period::new_const(3),
            max_window: Period::new_const(7),
            min_volume_change_pct: Percent::new_const(5.0),
            min_price_change_pct: Percent::new_const(1.0),
            direction: DirectionFilter::Both,
        }
    }
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.max_window < self.min_window {
            return Err(PatternError::InvalidConfig(format!(
                "max_window ({}) < min_window ({})",
                self.max_window.get(),
                self.min_window.get()
            )));
        }
        Ok(())
    }
}

#[derive(serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScanConfigDef {
    min_window: Period,
    max_window: Period,
    min_volume_change_pct: Percent,
    min_price_change_pct: Percent,
    direction: DirectionFilter,
}

impl Default for ScanConfigDef {
    fn default() -> Self {
        let d = ScanConfig::default();
        Self {
            min_window: d.min_window,
            max_window: d.max_window,
            min_volume_change_pct: d.min_volume_change_pct,
            min_price_change_pct: d.min_price_change_pct,
            direction: d.direction,
        }
    }
}

/// Missing keys take their defaults; the result is validated.
impl<'de> serde::Deserialize<'de> for ScanConfig {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let def = ScanConfigDef::deserialize(d)?;
        let config = ScanConfig {
            min_window: def.min_window,
            max_window: def.max_window,
            min_volume_change_pct: def.min_volume_change_pct,
            min_price_change_pct: def.min_price_change_pct,
            direction: def.direction,
        };
        config.validate().map_err(serde::de::Error::custom)?;
        Ok(config)
    }
}

/// Builder for [`ScanConfig`], validating on `build`
#[derive(Debug, Clone)]
pub struct ScanConfigBuilder {
    min_window: usize,
    max_window: usize,
    min_volume_change_pct: f64,
    min_price_change_pct: f64,
    direction: DirectionFilter,
}

impl Default for ScanConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        let d = ScanConfig::default();
        Self {
            min_window: d.min_window.get(),
            max_window: d.max_window.get(),
            min_volume_change_pct: d.min_volume_change_pct.get(),
            min_price_change_pct: d.min_price_change_pct.get(),
            direction: d.direction,
        }
    }

    /// Window lengths to try, inclusive
    pub fn windows(mut self, min: usize, max: usize) -> Self {
        self.min_window = min;
        self.max_window = max;
        self
    }

    pub fn min_volume_change_pct(mut self, pct: f64) -> Self {
        self.min_volume_change_pct = pct;
        self
    }

    pub fn min_price_change_pct(mut self, pct: f64) -> Self {
        self.min_price_change_pct = pct;
        self
    }

    pub fn direction(mut self, direction: DirectionFilter) -> Self {
        self.direction = direction;
        self
    }

    pub fn build(self) -> Result<ScanConfig> {
        let config = ScanConfig {
            min_window: Period::new(self.min_window)?,
            max_window: Period::new(self.max_window)?,
            min_volume_change_pct: Percent::new(self.min_volume_change_pct)?,
            min_price_change_pct: Percent::new(self.min_price_change_pct)?,
            direction: self.direction,
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

use detectors::TrendDetector;

/// Aligned series for one instrument
#[derive(Debug, Clone, Copy)]
pub struct Instrument<'a> {
    pub symbol: &'a str,
    pub volumes: &'a [f64],
    pub prices: &'a [f64],
}

impl<'a> Instrument<'a> {
    pub fn new(symbol: &'a str, volumes: &'a [f64], prices: &'a [f64]) -> Self {
        Self {
            symbol,
            volumes,
            prices,
        }
    }
}

/// Result of scanning a single instrument
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub symbol: String,
    pub patterns: Vec<Pattern>,
}

/// Error from scanning a single instrument
#[derive(Debug, Clone)]
pub struct ScanError {
    pub symbol: String,
    pub error: PatternError,
}

/// Parallel scanning of multiple instruments.
///
/// A failing instrument is reported in the error list and does not affect the
/// others. Patterns come back unranked; see [`rank::rank_results`].
pub fn scan_parallel<'a, I>(
    detector: &TrendDetector,
    instruments: I,
) -> (Vec<ScanResult>, Vec<ScanError>)
where
    I: IntoParallelIterator<Item = Instrument<'a>>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|instrument| {
            detector
                .detect(instrument.volumes, instrument.prices)
                .map(|patterns| ScanResult {
                    symbol: instrument.symbol.to_string(),
                    patterns,
                })
                .map_err(|error| {
                    tracing::warn!("Scan of {} failed: {}", instrument.symbol, error);
                    ScanError {
                        symbol: instrument.symbol.to_string(),
                        error,
                    }
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
