use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of a kernel parameter, derived from its table dimensions.
///
/// The kernel reports every parameter as an (nrow, ncol) block. The four
/// cases below are the only ones that exist; both the read and the write
/// marshalling paths dispatch through this one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParamShape {
    Scalar,
    RowVector { cols: u32 },
    ColVector { rows: u32 },
    Matrix { rows: u32, cols: u32 },
}

impl ParamShape {
    /// Classify 1-based table dimensions into a shape.
    pub fn from_dims(rows: u32, cols: u32) -> Self {
        match (rows, cols) {
            (1, 1) => ParamShape::Scalar,
            (1, n) => ParamShape::RowVector { cols: n },
            (n, 1) => ParamShape::ColVector { rows: n },
            (r, c) => ParamShape::Matrix { rows: r, cols: c },
        }
    }

    pub fn rows(&self) -> u32 {
        match *self {
            ParamShape::Scalar | ParamShape::RowVector { .. } => 1,
            ParamShape::ColVector { rows } => rows,
            ParamShape::Matrix { rows, .. } => rows,
        }
    }

    pub fn cols(&self) -> u32 {
        match *self {
            ParamShape::Scalar | ParamShape::ColVector { .. } => 1,
            ParamShape::RowVector { cols } => cols,
            ParamShape::Matrix { cols, .. } => cols,
        }
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.rows() as usize * self.cols() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ParamShape::Scalar)
    }

    /// Whether a 1-based (row, col) address lies inside this shape.
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= 1 && col >= 1 && row <= self.rows() && col <= self.cols()
    }

    /// All 1-based (row, col) addresses of this shape, row-major.
    ///
    /// This is the single iteration order shared by the get and set
    /// marshalling paths.
    pub fn positions(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::with_capacity(self.len());
        for row in 1..=self.rows() {
            for col in 1..=self.cols() {
                out.push((row, col));
            }
        }
        out
    }
}

impl fmt::Display for ParamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows(), self.cols())
    }
}

/// Errors from shape/value agreement checks.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShapeError {
    #[error("value of shape {got} does not match declared shape {expected}")]
    Mismatch { expected: ParamShape, got: String },

    #[error("element ({row},{col}) out of bounds for shape {shape}")]
    OutOfBounds { shape: ParamShape, row: u32, col: u32 },
}
