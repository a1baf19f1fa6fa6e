//! Volume/price detectors
//!
//! # Detector Families
//!
//! - **Trend windows**: every window of `min_window..=max_window` sessions in
//!   which volume and price are monotonic in the same direction and move by at
//!   least the configured thresholds.
//! - **Volume shapes**: V and U formations in the trailing volume sessions.

pub mod helpers;

pub mod shape;
pub mod trend;

// Re-export all detectors for convenience
pub use helpers::*;
pub use shape::*;
pub use trend::*;
