//! Assertion functions for estimator outputs.
//!
//! Estimates are floats, so every value comparison takes a tolerance; labels are
//! compared exactly and in order, since emission order is part of the contract.

use crate::sink::Emission;
use crate::value::Value;

/// Tolerance used by [`assert_emission`].
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Assert that two value sequences have equal length and agree within `tolerance`.
///
/// # Panics
///
/// Panics on a length mismatch or when any pair differs by more than `tolerance`.
///
/// # Example
///
/// ```
/// use ironola::testing::assert_values_close;
///
/// assert_values_close(&[0.1 + 0.2, 1.0], &[0.3, 1.0], 1e-12);
/// ```
pub fn assert_values_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Value count mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "Value mismatch at index {i}: expected {e}, got {a} (tolerance {tolerance})\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that group labels match exactly, in order.
///
/// # Panics
///
/// Panics if the labels differ in length, content or order.
///
/// # Example
///
/// ```
/// use ironola::Value;
/// use ironola::testing::assert_groups_eq;
///
/// assert_groups_eq(&[Value::from("x")], &[Value::from("x")]);
/// ```
pub fn assert_groups_eq(actual: &[Value], expected: &[Value]) {
    assert_eq!(
        actual, expected,
        "Group labels mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
}

/// Assert an emission's labels exactly and its values within [`DEFAULT_TOLERANCE`].
///
/// # Panics
///
/// Panics if labels or values differ.
pub fn assert_emission(emission: &Emission, groups: &[Value], values: &[f64]) {
    assert_groups_eq(&emission.groups, groups);
    assert_values_close(&emission.values, values, DEFAULT_TOLERANCE);
}

/// Assert that `actual` lies within `tolerance` of `expected`, relative to `expected`.
///
/// # Panics
///
/// Panics when the relative error exceeds `tolerance`.
///
/// # Example
///
/// ```
/// use ironola::testing::assert_relative_close;
///
/// assert_relative_close(1010.0, 1000.0, 0.02);
/// ```
pub fn assert_relative_close(actual: f64, expected: f64, tolerance: f64) {
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    let err = (actual - expected).abs() / scale;
    assert!(
        err <= tolerance,
        "Relative error {err:.4} exceeds {tolerance}: expected {expected}, got {actual}"
    );
}
