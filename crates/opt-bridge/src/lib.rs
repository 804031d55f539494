//! Adapter exposing a parametric CAD model as a differentiable block of an
//! optimization framework.
//!
//! [`SurfaceComponent`] mirrors the kernel's design parameters as shaped
//! inputs and its config parameters as shaped outputs, and publishes the
//! flattened surface-mesh coordinates (`x_surf`) as a function of those
//! inputs. Each evaluation writes the inputs into the kernel table, rebuilds
//! the model from scratch, and re-maps the reference tessellation onto the
//! new body so that vertex correspondence survives across iterations.

pub mod component;
pub mod errors;
pub mod marshal;
pub mod sensitivity;
pub mod variables;

pub use component::{SurfaceComponent, SURFACE_OUTPUT};
pub use errors::{ComputeError, SensitivityError, SetupError};
pub use sensitivity::SurfaceJacobian;
pub use variables::{VariableSet, VariableSpec};
