//! Volume shape detectors
//!
//! V (5 sessions) and U (6 sessions) formations in the trailing volume
//! sessions. Each shape is a fixed list of conditions; its confidence is the
//! share of conditions that hold, but a shape only counts as detected when all
//! of them hold.

/// Volume formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VolumeShape {
    /// Sharp drop then sharp recovery
    V,
    /// Gradual dip and recovery to the starting level
    U,
}

impl VolumeShape {
    /// Trailing sessions the shape is evaluated on
    pub fn sessions(self) -> usize {
        match self {
            VolumeShape::V => 5,
            VolumeShape::U => 6,
        }
    }
}

/// How many of a shape's conditions held
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ShapeScore {
    pub shape: VolumeShape,
    pub satisfied: usize,
    pub total: usize,
}

impl ShapeScore {
    /// Equal weight per condition, 0.0..=100.0
    #[inline]
    pub fn confidence(&self) -> f64 {
        self.satisfied as f64 * (100.0 / self.total as f64)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.satisfied == self.total
    }
}

fn score(shape: VolumeShape, conditions: &[bool]) -> ShapeScore {
    ShapeScore {
        shape,
        satisfied: conditions.iter().filter(|&&c| c).count(),
        total: conditions.len(),
    }
}

/// Score the V formation on the last 5 volumes. `None` if fewer are given.
pub fn score_v_shape(volumes: &[f64]) -> Option<ShapeScore> {
    let c = volumes.get(volumes.len().checked_sub(5)?..)?;
    let lowest = c.iter().copied().fold(f64::INFINITY, f64::min);

    Some(score(
        VolumeShape::V,
        &[
            c[2] == lowest,
            c[3] > c[2],
            c[4] > c[3],
            // Significant drop
            c[2] < c[0] * 0.8,
            // Significant recovery
            c[4] > c[2] * 1.5,
        ],
    ))
}

/// Score the U formation on the last 6 volumes. `None` if fewer are given.
pub fn score_u_shape(volumes: &[f64]) -> Option<ShapeScore> {
    let c = volumes.get(volumes.len().checked_sub(6)?..)?;

    Some(score(
        VolumeShape::U,
        &[
            c[2] < c[1],
            c[3] < c[2],
            c[4] > c[3],
            c[5] > c[4],
            // Ends near where it started
            (c[0] - c[5]).abs() < c[0] * 0.2,
            // Significant dip
            c[3] < c[0] * 0.7,
        ],
    ))
}

/// Which shapes to look for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeFilter {
    V,
    U,
    #[default]
    Both,
}

/// Picks at most one detected shape per series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDetector {
    pub filter: ShapeFilter,
    /// Detected shapes below this confidence are dropped
    pub min_confidence: f64,
}

impl Default for ShapeDetector {
    fn default() -> Self {
        Self {
            filter: ShapeFilter::Both,
            min_confidence: 50.0,
        }
    }
}

impl ShapeDetector {
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// With `Both`, V wins only when detected and strictly more confident
    /// than U; otherwise U is reported if detected.
    pub fn detect(&self, volumes: &[f64]) -> Option<ShapeScore> {
        let v = score_v_shape(volumes);
        let u = score_u_shape(volumes);

        let chosen = match self.filter {
            ShapeFilter::V => v.filter(ShapeScore::is_complete),
            ShapeFilter::U => u.filter(ShapeScore::is_complete),
            ShapeFilter::Both => {
                let u_confidence = u.map_or(0.0, |s| s.confidence());
                match v.filter(ShapeScore::is_complete) {
                    Some(v) if v.confidence() > u_confidence => Some(v),
                    _ => u.filter(ShapeScore::is_complete),
                }
            }
        };

        chosen.filter(|s| s.confidence() >= self.min_confidence)
    }
}
