//! Coordinate-vector assertions with index diagnostics.

use approx::abs_diff_eq;
use nalgebra::DVector;

/// Assert a flattened coordinate vector matches an expected slice.
/// Panics with the first mismatching entry and its vertex/axis location.
pub fn assert_coords_close(actual: &DVector<f64>, expected: &[f64], tol: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "coordinate vector length {} != expected {}",
        actual.len(),
        expected.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        if !abs_diff_eq!(*a, *e, epsilon = tol) {
            panic!(
                "coordinate mismatch at entry {} (vertex {}, axis {}): {} vs expected {}",
                i,
                i / 3 + 1,
                ["x", "y", "z"][i % 3],
                a,
                e
            );
        }
    }
}

/// Assert two vectors agree element-wise.
pub fn assert_vectors_close(actual: &DVector<f64>, expected: &DVector<f64>, tol: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "vector length {} != expected {}",
        actual.len(),
        expected.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        if !abs_diff_eq!(*a, *e, epsilon = tol) {
            panic!("vector mismatch at entry {}: {} vs expected {}", i, a, e);
        }
    }
}
