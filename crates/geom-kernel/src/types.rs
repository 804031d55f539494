use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

// Re-export shared types from camber-types
pub use camber_types::{ParamKind, ParamShape, ParamValue, ShapeError};

new_key_type! {
    pub(crate) struct BodyKey;
}

/// Opaque handle to a solid built by the kernel.
/// Valid only until the next rebuild; never persisted.
#[derive(Debug, Clone)]
pub struct BodyHandle(pub(crate) BodyKey);

/// Table entry description returned by parameter introspection.
#[derive(Debug, Clone)]
pub struct PmtrInfo {
    pub name: String,
    pub kind: ParamKind,
    pub shape: ParamShape,
}

/// Declaration used to seed the kernel's parameter table.
#[derive(Debug, Clone)]
pub struct PmtrDecl {
    pub name: String,
    pub kind: ParamKind,
    /// Initial values; the matrix dimensions define the parameter shape.
    pub values: DMatrix<f64>,
}

/// Binds a config parameter to a body metric recomputed on every rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigBinding {
    pub name: String,
    pub metric: BodyMetric,
}

/// Metrics of the first built body that can drive config parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyMetric {
    Volume,
    SurfaceArea,
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("parameter index {index} out of range (table has {count} parameters)")]
    PmtrOutOfRange { index: u32, count: u32 },

    #[error("element ({row},{col}) out of bounds for parameter {name} ({shape})")]
    ElementOutOfBounds {
        name: String,
        shape: ParamShape,
        row: u32,
        col: u32,
    },

    #[error("config parameter {name} is read-only")]
    ReadOnly { name: String },

    #[error("unknown parameter: {name}")]
    UnknownPmtr { name: String },

    #[error("duplicate parameter name: {name}")]
    DuplicatePmtr { name: String },

    #[error("parameter {name} has empty dimensions")]
    EmptyPmtr { name: String },

    #[error("invalid config binding for {name}: {reason}")]
    InvalidBinding { name: String, reason: String },

    #[error("degenerate geometry: {detail}")]
    DegenerateGeometry { detail: String },

    #[error("rebuild failed at step {step}: {reason}")]
    RebuildFailed { step: String, reason: String },

    #[error("recipe produced no bodies")]
    EmptyRecipe,

    #[error("body handle does not refer to a current body")]
    UnknownBody,

    #[error("{entity} index {index} out of range (body has {count})")]
    EntityOutOfRange {
        entity: &'static str,
        index: u32,
        count: u32,
    },

    #[error("topology error: {reason}")]
    BadTopology { reason: String },

    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),
}
