use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::shape::{ParamShape, ShapeError};

/// Whether a parameter drives the model or is computed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    /// Driving parameter; writable through the marshalling surface.
    Design,
    /// Kernel-computed parameter; read-only from the wrapper's side.
    Config,
}

/// A shaped parameter value.
///
/// Vectors do not record their orientation; the declared [`ParamShape`]
/// disambiguates row from column at every access.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(f64),
    Vector(DVector<f64>),
    Matrix(DMatrix<f64>),
}

impl ParamValue {
    /// A zero-filled value matching the given shape.
    pub fn zeros(shape: &ParamShape) -> Self {
        match *shape {
            ParamShape::Scalar => ParamValue::Scalar(0.0),
            ParamShape::RowVector { cols } => ParamValue::Vector(DVector::zeros(cols as usize)),
            ParamShape::ColVector { rows } => ParamValue::Vector(DVector::zeros(rows as usize)),
            ParamShape::Matrix { rows, cols } => {
                ParamValue::Matrix(DMatrix::zeros(rows as usize, cols as usize))
            }
        }
    }

    /// Whether this value agrees with the declared shape.
    pub fn matches(&self, shape: &ParamShape) -> bool {
        match (self, shape) {
            (ParamValue::Scalar(_), ParamShape::Scalar) => true,
            (ParamValue::Vector(v), ParamShape::RowVector { cols }) => v.len() == *cols as usize,
            (ParamValue::Vector(v), ParamShape::ColVector { rows }) => v.len() == *rows as usize,
            (ParamValue::Matrix(m), ParamShape::Matrix { rows, cols }) => {
                m.nrows() == *rows as usize && m.ncols() == *cols as usize
            }
            _ => false,
        }
    }

    /// Short human-readable description, used in shape-mismatch errors.
    pub fn describe(&self) -> String {
        match self {
            ParamValue::Scalar(_) => "scalar".to_string(),
            ParamValue::Vector(v) => format!("vector[{}]", v.len()),
            ParamValue::Matrix(m) => format!("matrix[{}x{}]", m.nrows(), m.ncols()),
        }
    }

    /// Read the element at a 1-based (row, col) address under `shape`.
    pub fn element(&self, shape: &ParamShape, row: u32, col: u32) -> Result<f64, ShapeError> {
        if !self.matches(shape) {
            return Err(ShapeError::Mismatch {
                expected: *shape,
                got: self.describe(),
            });
        }
        if !shape.contains(row, col) {
            return Err(ShapeError::OutOfBounds {
                shape: *shape,
                row,
                col,
            });
        }
        Ok(match (self, shape) {
            (ParamValue::Scalar(v), _) => *v,
            (ParamValue::Vector(v), ParamShape::RowVector { .. }) => v[col as usize - 1],
            (ParamValue::Vector(v), ParamShape::ColVector { .. }) => v[row as usize - 1],
            (ParamValue::Matrix(m), _) => m[(row as usize - 1, col as usize - 1)],
            // matches() already rejected every other pairing
            _ => unreachable!("value/shape pairing checked above"),
        })
    }

    /// Write the element at a 1-based (row, col) address under `shape`.
    pub fn set_element(
        &mut self,
        shape: &ParamShape,
        row: u32,
        col: u32,
        value: f64,
    ) -> Result<(), ShapeError> {
        if !self.matches(shape) {
            return Err(ShapeError::Mismatch {
                expected: *shape,
                got: self.describe(),
            });
        }
        if !shape.contains(row, col) {
            return Err(ShapeError::OutOfBounds {
                shape: *shape,
                row,
                col,
            });
        }
        match (self, shape) {
            (ParamValue::Scalar(v), _) => *v = value,
            (ParamValue::Vector(v), ParamShape::RowVector { .. }) => v[col as usize - 1] = value,
            (ParamValue::Vector(v), ParamShape::ColVector { .. }) => v[row as usize - 1] = value,
            (ParamValue::Matrix(m), _) => m[(row as usize - 1, col as usize - 1)] = value,
            _ => unreachable!("value/shape pairing checked above"),
        }
        Ok(())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Scalar(v)
    }
}
