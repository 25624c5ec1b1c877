use ndarray::{Array1, Array2};

use ndvi_core::classify::{
    class_histogram, classify, IntervalBounds, ThresholdRule, ThresholdTable,
};
use ndvi_core::error::NdviError;

fn classify_values(values: &[f32], table: &ThresholdTable) -> Vec<u8> {
    let ndvi = Array1::from(values.to_vec())
        .into_shape_with_order((1, values.len()))
        .unwrap();
    classify(&ndvi.view(), table).unwrap().iter().copied().collect()
}

// ---------------------------------------------------------------------------
// Conventions
// ---------------------------------------------------------------------------

#[test]
fn test_convention_a_upper_inclusive_boundaries() {
    let table = ThresholdTable::convention_a();
    assert_eq!(table.bounds, IntervalBounds::UpperInclusive);
    let labels = classify_values(&[-0.9, -0.5, 0.0, 0.1, 0.2, 0.35, 0.5, 0.9, 1.0], &table);
    assert_eq!(labels, vec![0, 0, 0, 1, 1, 2, 2, 3, 3]);
}

#[test]
fn test_convention_b_half_open_boundaries() {
    let table = ThresholdTable::convention_b();
    assert_eq!(table.bounds, IntervalBounds::LowerInclusive);
    let labels = classify_values(&[-1.0, -0.1, 0.0, 0.19, 0.2, 0.5, 0.99], &table);
    assert_eq!(labels, vec![0, 0, 1, 1, 2, 3, 3]);
}

#[test]
fn test_convention_b_ceiling_is_exclusive() {
    // 1.0 falls outside [0.5, 1.0) and keeps the default label.
    let table = ThresholdTable::convention_b();
    assert_eq!(classify_values(&[1.0], &table), vec![0]);
    assert_eq!(table.label_for(1.0), None);
}

#[test]
fn test_conventions_disagree_on_zero() {
    assert_eq!(ThresholdTable::convention_a().label_for(0.0), Some(0));
    assert_eq!(ThresholdTable::convention_b().label_for(0.0), Some(1));
}

#[test]
fn test_default_table_is_convention_b() {
    assert_eq!(ThresholdTable::default(), ThresholdTable::convention_b());
}

// ---------------------------------------------------------------------------
// Rule ordering
// ---------------------------------------------------------------------------

#[test]
fn test_overlapping_rules_last_write_wins() {
    let table = ThresholdTable::new(
        IntervalBounds::LowerInclusive,
        vec![ThresholdRule::new(1, 0.0, 0.3), ThresholdRule::new(2, 0.2, 0.5)],
    );
    let labels = classify_values(&[0.25, 0.1, 0.4, 0.6], &table);
    assert_eq!(labels, vec![2, 1, 2, 0]);
    assert_eq!(table.label_for(0.25), Some(2));
}

#[test]
fn test_rule_order_not_label_order() {
    // Same rules in reverse: the earlier-listed wide rule now loses.
    let table = ThresholdTable::new(
        IntervalBounds::LowerInclusive,
        vec![ThresholdRule::new(2, 0.2, 0.5), ThresholdRule::new(1, 0.0, 0.3)],
    );
    assert_eq!(classify_values(&[0.25], &table), vec![1]);
}

#[test]
fn test_unmatched_and_nan_keep_default_label() {
    let table = ThresholdTable::new(
        IntervalBounds::LowerInclusive,
        vec![ThresholdRule::new(7, 0.0, 0.5)],
    );
    assert_eq!(classify_values(&[f32::NAN, -0.5, 0.7, 0.1], &table), vec![0, 0, 0, 7]);
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

#[test]
fn test_complete_table_labels_every_pixel() {
    let table = ThresholdTable::new(
        IntervalBounds::LowerInclusive,
        vec![
            ThresholdRule::new(1, -1.0, 0.0),
            ThresholdRule::new(2, 0.0, 0.2),
            ThresholdRule::new(3, 0.2, 0.5),
            ThresholdRule::new(4, 0.5, 1.0),
        ],
    );
    assert!(table.coverage_gaps(-1.0, 1.0).is_empty());

    let values: Vec<f32> = (0..200).map(|i| -1.0 + i as f32 * 0.01).collect();
    let labels = classify_values(&values, &table);
    assert!(labels.iter().all(|&l| l != 0), "labels: {labels:?}");
}

#[test]
fn test_coverage_gaps_reported() {
    let table = ThresholdTable::new(
        IntervalBounds::LowerInclusive,
        vec![ThresholdRule::new(0, -1.0, 0.0), ThresholdRule::new(1, 0.2, 0.8)],
    );
    assert_eq!(table.coverage_gaps(-1.0, 1.0), vec![(0.0, 0.2), (0.8, 1.0)]);
}

#[test]
fn test_convention_a_covers_range() {
    assert!(ThresholdTable::convention_a().coverage_gaps(-1.0, 1.0).is_empty());
    assert!(ThresholdTable::convention_b().coverage_gaps(-1.0, 1.0).is_empty());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_empty_table_rejected() {
    let table = ThresholdTable::new(IntervalBounds::LowerInclusive, vec![]);
    let ndvi = Array2::<f32>::zeros((2, 2));
    let err = classify(&ndvi.view(), &table).unwrap_err();
    assert!(matches!(err, NdviError::InvalidThreshold(_)), "got {err:?}");
}

#[test]
fn test_inverted_rule_rejected() {
    let table = ThresholdTable::new(
        IntervalBounds::LowerInclusive,
        vec![ThresholdRule::new(1, 0.5, 0.2)],
    );
    assert!(matches!(table.validate(), Err(NdviError::InvalidThreshold(_))));
}

#[test]
fn test_empty_interval_rejected() {
    let table = ThresholdTable::new(
        IntervalBounds::UpperInclusive,
        vec![ThresholdRule::new(1, 0.3, 0.3)],
    );
    assert!(matches!(table.check_rules(), Err(NdviError::InvalidThreshold(_))));
}

#[test]
fn test_nan_bound_rejected() {
    let table = ThresholdTable::new(
        IntervalBounds::LowerInclusive,
        vec![ThresholdRule::new(1, f32::NAN, 0.3)],
    );
    assert!(matches!(table.validate(), Err(NdviError::InvalidThreshold(_))));
}

#[test]
fn test_table_with_gaps_still_valid() {
    let table = ThresholdTable::new(
        IntervalBounds::LowerInclusive,
        vec![ThresholdRule::new(1, 0.0, 0.5)],
    );
    assert!(table.validate().is_ok());
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[test]
fn test_label_shape_matches_input() {
    let ndvi = Array2::from_shape_fn((3, 5), |(r, c)| (r as f32 - c as f32) / 5.0);
    let labels = classify(&ndvi.view(), &ThresholdTable::convention_a()).unwrap();
    assert_eq!(labels.dim(), (3, 5));
}

#[test]
fn test_class_histogram_counts() {
    let ndvi = Array1::from(vec![-0.5f32, 0.1, 0.1, 0.3, 0.9, 0.9, 0.9])
        .into_shape_with_order((1, 7))
        .unwrap();
    let labels = classify(&ndvi.view(), &ThresholdTable::convention_b()).unwrap();
    let hist = class_histogram(&labels.view());
    let counts: Vec<(u8, usize)> = hist.into_iter().collect();
    assert_eq!(counts, vec![(0, 1), (1, 2), (2, 1), (3, 3)]);
}

#[test]
fn test_max_label() {
    assert_eq!(ThresholdTable::convention_a().max_label(), Some(3));
    let empty = ThresholdTable::new(IntervalBounds::LowerInclusive, vec![]);
    assert_eq!(empty.max_label(), None);
}

#[test]
fn test_interval_bounds_display() {
    assert_eq!(format!("{}", IntervalBounds::LowerInclusive), "[min, max)");
    assert_eq!(format!("{}", IntervalBounds::UpperInclusive), "(min, max]");
}
