pub mod table;

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView2, Zip};
use tracing::debug;

use crate::consts::DEFAULT_LABEL;
use crate::error::Result;
use crate::raster::LabelArray;

pub use table::{IntervalBounds, ThresholdRule, ThresholdTable};

/// Map NDVI values to class labels.
///
/// Every rule is applied in order over the whole array, so overlapping rules
/// resolve to the last one listed. Unmatched pixels (including NaN) keep
/// `DEFAULT_LABEL`.
pub fn classify(ndvi: &ArrayView2<'_, f32>, table: &ThresholdTable) -> Result<LabelArray> {
    table.check_rules()?;

    let mut labels = Array2::<u8>::from_elem(ndvi.dim(), DEFAULT_LABEL);
    for rule in &table.rules {
        let mut hits = 0usize;
        Zip::from(&mut labels).and(ndvi).for_each(|l, &v| {
            if table.matches(rule, v) {
                *l = rule.label;
                hits += 1;
            }
        });
        debug!(label = rule.label, min = rule.min, max = rule.max, hits, "Applied threshold rule");
    }
    Ok(labels)
}

/// Pixel count per label, in ascending label order.
pub fn class_histogram(labels: &ArrayView2<'_, u8>) -> BTreeMap<u8, usize> {
    let mut counts = BTreeMap::new();
    for &l in labels.iter() {
        *counts.entry(l).or_insert(0) += 1;
    }
    counts
}
