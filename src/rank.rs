//! Ranking and summarizing scan output
//!
//! Detection returns patterns unsorted. Ranking happens once over the full
//! result set, after all instruments are scanned.

use crate::{Direction, Pattern, ScanResult};

/// Sort by confidence, highest first. Equal scores keep detection order.
pub fn rank(patterns: &mut [Pattern]) {
    patterns.sort_by(|a, b| b.confidence.cmp(&a.confidence));
}

/// Drop patterns scoring below `min_confidence`
pub fn filter_min_confidence(patterns: Vec<Pattern>, min_confidence: u8) -> Vec<Pattern> {
    patterns
        .into_iter()
        .filter(|p| p.confidence >= min_confidence)
        .collect()
}

/// Pattern tagged with its instrument
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RankedPattern {
    pub symbol: String,
    pub pattern: Pattern,
}

/// Flatten per-instrument results into a single ranked list
pub fn rank_results(results: Vec<ScanResult>) -> Vec<RankedPattern> {
    let mut ranked: Vec<RankedPattern> = results
        .into_iter()
        .flat_map(|r| {
            let symbol = r.symbol;
            r.patterns.into_iter().map(move |pattern| RankedPattern {
                symbol: symbol.clone(),
                pattern,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.pattern.confidence.cmp(&a.pattern.confidence));
    ranked
}

/// Aggregate counts over a result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub bullish: usize,
    pub bearish: usize,
    /// Mean confidence rounded down, 0 for an empty set
    pub avg_confidence: u8,
    pub best_confidence: Option<u8>,
}

impl ScanSummary {
    pub fn from_patterns<'a>(patterns: impl IntoIterator<Item = &'a Pattern>) -> Self {
        let mut summary = ScanSummary::default();
        let mut sum: u64 = 0;

        for p in patterns {
            summary.total += 1;
            match p.direction {
                Direction::Bullish => summary.bullish += 1,
                Direction::Bearish => summary.bearish += 1,
            }
            sum += u64::from(p.confidence);
            summary.best_confidence = summary.best_confidence.max(Some(p.confidence));
        }

        if summary.total > 0 {
            summary.avg_confidence = (sum / summary.total as u64) as u8;
        }
        summary
    }
}
