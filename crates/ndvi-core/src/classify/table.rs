use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{NdviError, Result};

/// Which end of each rule's interval is closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalBounds {
    /// `min <= value < max`
    #[default]
    LowerInclusive,
    /// `min < value <= max`
    UpperInclusive,
}

impl std::fmt::Display for IntervalBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowerInclusive => write!(f, "[min, max)"),
            Self::UpperInclusive => write!(f, "(min, max]"),
        }
    }
}

/// One threshold band: pixels inside `min..max` receive `label`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub label: u8,
    pub min: f32,
    pub max: f32,
}

impl ThresholdRule {
    pub fn new(label: u8, min: f32, max: f32) -> Self {
        Self { label, min, max }
    }
}

/// Ordered threshold rules plus the boundary convention they share.
///
/// Rules are applied in sequence; a later rule overwrites an earlier one
/// wherever their intervals overlap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    #[serde(default)]
    pub bounds: IntervalBounds,
    pub rules: Vec<ThresholdRule>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::convention_b()
    }
}

impl ThresholdTable {
    pub fn new(bounds: IntervalBounds, rules: Vec<ThresholdRule>) -> Self {
        Self { bounds, rules }
    }

    /// Upper-inclusive bands, open-ended at both extremes:
    /// `<= 0 -> 0`, `(0, 0.2] -> 1`, `(0.2, 0.5] -> 2`, `> 0.5 -> 3`.
    pub fn convention_a() -> Self {
        Self::new(
            IntervalBounds::UpperInclusive,
            vec![
                ThresholdRule::new(0, f32::NEG_INFINITY, 0.0),
                ThresholdRule::new(1, 0.0, 0.2),
                ThresholdRule::new(2, 0.2, 0.5),
                ThresholdRule::new(3, 0.5, f32::INFINITY),
            ],
        )
    }

    /// Half-open bands with an explicit floor at -1 and ceiling at 1:
    /// `[-1, 0) -> 0`, `[0, 0.2) -> 1`, `[0.2, 0.5) -> 2`, `[0.5, 1) -> 3`.
    pub fn convention_b() -> Self {
        Self::new(
            IntervalBounds::LowerInclusive,
            vec![
                ThresholdRule::new(0, -1.0, 0.0),
                ThresholdRule::new(1, 0.0, 0.2),
                ThresholdRule::new(2, 0.2, 0.5),
                ThresholdRule::new(3, 0.5, 1.0),
            ],
        )
    }

    #[inline]
    pub fn matches(&self, rule: &ThresholdRule, value: f32) -> bool {
        match self.bounds {
            IntervalBounds::LowerInclusive => value >= rule.min && value < rule.max,
            IntervalBounds::UpperInclusive => value > rule.min && value <= rule.max,
        }
    }

    /// Label the table assigns to a single value, if any rule matches.
    pub fn label_for(&self, value: f32) -> Option<u8> {
        self.rules
            .iter()
            .rev()
            .find(|rule| self.matches(rule, value))
            .map(|rule| rule.label)
    }

    pub fn max_label(&self) -> Option<u8> {
        self.rules.iter().map(|r| r.label).max()
    }

    /// Like `check_rules`, additionally logging gaps in the coverage of [-1, 1].
    pub fn validate(&self) -> Result<()> {
        self.check_rules()?;
        for (lo, hi) in self.coverage_gaps(-1.0, 1.0) {
            warn!(lo, hi, "Threshold table leaves NDVI range uncovered");
        }
        Ok(())
    }

    /// Reject empty tables, NaN bounds and empty or inverted intervals.
    pub fn check_rules(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(NdviError::InvalidThreshold("table has no rules".into()));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.min.is_nan() || rule.max.is_nan() {
                return Err(NdviError::InvalidThreshold(format!(
                    "rule {i} (label {}) has a NaN bound",
                    rule.label
                )));
            }
            if rule.min >= rule.max {
                return Err(NdviError::InvalidThreshold(format!(
                    "rule {i} (label {}) has min {} >= max {}",
                    rule.label, rule.min, rule.max
                )));
            }
        }
        Ok(())
    }

    /// Sub-intervals of `[lo, hi]` that no rule covers.
    ///
    /// Boundary points are ignored; only gaps of positive width are reported.
    pub fn coverage_gaps(&self, lo: f32, hi: f32) -> Vec<(f32, f32)> {
        let mut spans: Vec<(f32, f32)> = self
            .rules
            .iter()
            .filter(|r| !r.min.is_nan() && !r.max.is_nan())
            .map(|r| (r.min.max(lo), r.max.min(hi)))
            .filter(|(a, b)| a < b)
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut gaps = Vec::new();
        let mut cursor = lo;
        for (a, b) in spans {
            if a > cursor {
                gaps.push((cursor, a));
            }
            cursor = cursor.max(b);
        }
        if cursor < hi {
            gaps.push((cursor, hi));
        }
        gaps
    }
}
