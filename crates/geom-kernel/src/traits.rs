use crate::body::SolidBody;
use crate::types::{BodyHandle, KernelError, PmtrInfo};

/// The parametric kernel seam.
///
/// Exposes the parameter table (1-based `(index, row, col)` addressing
/// throughout), velocity control for sensitivity rebuilds, and full-model
/// rebuild. Implemented by [`crate::NativeKernel`]; the adapter layer only
/// talks to this trait, so tests can substitute doubles.
pub trait ParametricKernel {
    /// Number of parameters in the table.
    fn pmtr_count(&self) -> u32;

    /// Name, kind, and shape of the parameter at a 1-based table index.
    fn pmtr_info(&self, index: u32) -> Result<PmtrInfo, KernelError>;

    /// Read one element of a parameter.
    fn get_value(&self, index: u32, row: u32, col: u32) -> Result<f64, KernelError>;

    /// Write one element of a design parameter.
    /// Config parameters are read-only through this surface.
    fn set_value(&mut self, index: u32, row: u32, col: u32, value: f64)
        -> Result<(), KernelError>;

    /// Zero every parameter velocity.
    fn clear_velocities(&mut self);

    /// Set the velocity of one design-parameter element.
    fn set_velocity(
        &mut self,
        index: u32,
        row: u32,
        col: u32,
        value: f64,
    ) -> Result<(), KernelError>;

    /// Rebuild the model from scratch with current parameter values,
    /// propagating any set velocities onto the built geometry.
    /// Invalidates all handles from previous rebuilds.
    fn rebuild(&mut self) -> Result<Vec<BodyHandle>, KernelError>;

    /// Access a body built by the most recent rebuild.
    fn body(&self, handle: &BodyHandle) -> Result<&SolidBody, KernelError>;
}
