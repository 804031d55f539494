use camber_types::ParamShape;
use geom_kernel::KernelError;
use model_format::LoadError;
use surface_tess::TessError;

/// Errors that abort component setup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SetupError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("geometry model contains no bodies")]
    NoBody,

    #[error("geometry model must contain exactly one body (found {count})")]
    MultipleBodies { count: usize },

    #[error("geometry model has no tessellation")]
    MissingTessellation,

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("tessellation error: {0}")]
    Tess(#[from] TessError),
}

/// Errors that abort an evaluation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ComputeError {
    #[error("missing input: {name}")]
    MissingInput { name: String },

    #[error("unknown design parameter: {name}")]
    UnknownParameter { name: String },

    #[error("marshalling failed for {name}: {source}")]
    Parameter {
        name: String,
        #[source]
        source: KernelError,
    },

    #[error("rebuild produced no bodies")]
    NoBodyBuilt,

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("tessellation error: {0}")]
    Tess(#[from] TessError),
}

/// Errors from sensitivity extraction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SensitivityError {
    #[error("requested {which} index {value} may not be less than one")]
    InvalidIndex { which: &'static str, value: u32 },

    #[error("unknown design parameter: {name}")]
    UnknownParameter { name: String },

    #[error("row {row} exceeds the {rows} rows of design parameter {name}")]
    RowOutOfRange { name: String, row: u32, rows: u32 },

    #[error("column {col} exceeds the {cols} columns of design parameter {name}")]
    ColOutOfRange { name: String, col: u32, cols: u32 },

    #[error("sensitivity with respect to {name} requires a scalar parameter (shape is {shape})")]
    NonScalar { name: String, shape: ParamShape },

    #[error("rebuild produced no bodies")]
    NoBodyBuilt,

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("tessellation error: {0}")]
    Tess(#[from] TessError),
}
