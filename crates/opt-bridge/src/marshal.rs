//! Value marshalling between framework containers and the kernel table.
//!
//! One shape-tagged copy routine serves both directions. The kernel
//! addresses elements as 1-based (row, col); [`ParamShape::positions`]
//! supplies that address walk, and [`ParamValue`] enforces value/shape
//! agreement, so a slot registered with one shape can never silently read
//! or write a differently shaped block.

use camber_types::{ParamShape, ParamValue};
use geom_kernel::{KernelError, ParametricKernel};

/// Read a whole parameter out of the kernel table.
pub fn read_param(
    kernel: &dyn ParametricKernel,
    index: u32,
    shape: &ParamShape,
) -> Result<ParamValue, KernelError> {
    let mut value = ParamValue::zeros(shape);
    for (row, col) in shape.positions() {
        let element = kernel.get_value(index, row, col)?;
        value.set_element(shape, row, col, element)?;
    }
    Ok(value)
}

/// Write a whole design parameter into the kernel table.
///
/// The value must match the registered shape exactly; a mismatch is a
/// fatal error rather than a silent partial copy.
pub fn write_param(
    kernel: &mut dyn ParametricKernel,
    index: u32,
    shape: &ParamShape,
    value: &ParamValue,
) -> Result<(), KernelError> {
    if !value.matches(shape) {
        return Err(KernelError::Shape(camber_types::ShapeError::Mismatch {
            expected: *shape,
            got: value.describe(),
        }));
    }
    for (row, col) in shape.positions() {
        kernel.set_value(index, row, col, value.element(shape, row, col)?)?;
    }
    Ok(())
}
