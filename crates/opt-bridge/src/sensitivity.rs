//! Analytic surface sensitivities.
//!
//! One scalar design-parameter element at a time: zero every velocity, set
//! a unit velocity on the requested element, rebuild with velocity
//! propagation, and scatter the per-entity velocities of the rebuilt body
//! onto the reference tessellation's global indexing.

use nalgebra::{DMatrix, DVector};
use tracing::info;

use camber_types::{ParamKind, ParamShape};
use geom_kernel::ParametricKernel;
use surface_tess::tess_sensitivity;

use crate::component::SurfaceComponent;
use crate::errors::SensitivityError;

/// Jacobian of the surface coordinates with respect to the scalar design
/// parameters, one column per parameter in table order.
#[derive(Debug, Clone)]
pub struct SurfaceJacobian {
    pub wrt: Vec<String>,
    pub matrix: DMatrix<f64>,
}

/// Resolve a design parameter by name and validate the requested element.
pub(crate) fn find_design_parameter(
    kernel: &dyn ParametricKernel,
    name: &str,
    row: u32,
    col: u32,
) -> Result<(u32, ParamShape), SensitivityError> {
    if row < 1 {
        return Err(SensitivityError::InvalidIndex {
            which: "row",
            value: row,
        });
    }
    if col < 1 {
        return Err(SensitivityError::InvalidIndex {
            which: "column",
            value: col,
        });
    }

    let mut found = None;
    for index in 1..=kernel.pmtr_count() {
        let info = kernel.pmtr_info(index)?;
        if info.kind == ParamKind::Design && info.name == name {
            found = Some((index, info.shape));
            break;
        }
    }
    let (index, shape) = found.ok_or_else(|| SensitivityError::UnknownParameter {
        name: name.to_string(),
    })?;

    if row > shape.rows() {
        return Err(SensitivityError::RowOutOfRange {
            name: name.to_string(),
            row,
            rows: shape.rows(),
        });
    }
    if col > shape.cols() {
        return Err(SensitivityError::ColOutOfRange {
            name: name.to_string(),
            col,
            cols: shape.cols(),
        });
    }
    Ok((index, shape))
}

impl SurfaceComponent {
    /// Derivative of `x_surf` with respect to one element of a design
    /// parameter, as a `3 × vertex_count` column.
    pub fn partial_surface_element(
        &mut self,
        name: &str,
        row: u32,
        col: u32,
    ) -> Result<DVector<f64>, SensitivityError> {
        let (index, _shape) = find_design_parameter(self.kernel_ref(), name, row, col)?;

        self.kernel_mut().clear_velocities();
        self.kernel_mut().set_velocity(index, row, col, 1.0)?;
        info!(parameter = name, row, col, "building sensitivity information");

        let handles = self.kernel_mut().rebuild()?;
        let first = handles.first().ok_or(SensitivityError::NoBodyBuilt)?;
        let dsen = {
            let body = self.kernel_ref().body(first)?;
            tess_sensitivity(self.base_tess(), body)?
        };
        self.kernel_mut().clear_velocities();
        Ok(dsen)
    }

    /// Derivative of `x_surf` with respect to a scalar design parameter.
    /// Non-scalar parameters are a usage error.
    pub fn partial_surface_wrt(&mut self, name: &str) -> Result<DVector<f64>, SensitivityError> {
        let (_, shape) = find_design_parameter(self.kernel_ref(), name, 1, 1)?;
        if !shape.is_scalar() {
            return Err(SensitivityError::NonScalar {
                name: name.to_string(),
                shape,
            });
        }
        self.partial_surface_element(name, 1, 1)
    }

    /// Assemble the full surface Jacobian over every design parameter.
    /// Fails on the first non-scalar design parameter.
    pub fn compute_partials(&mut self) -> Result<SurfaceJacobian, SensitivityError> {
        let slots: Vec<(String, ParamShape)> = self
            .design
            .iter()
            .map(|slot| (slot.name.clone(), slot.shape))
            .collect();

        let mut wrt = Vec::with_capacity(slots.len());
        let mut columns = Vec::with_capacity(slots.len());
        for (name, shape) in slots {
            if !shape.is_scalar() {
                return Err(SensitivityError::NonScalar { name, shape });
            }
            columns.push(self.partial_surface_element(&name, 1, 1)?);
            wrt.push(name);
        }

        let matrix = if columns.is_empty() {
            DMatrix::zeros(self.surface_len(), 0)
        } else {
            DMatrix::from_columns(&columns)
        };
        Ok(SurfaceJacobian { wrt, matrix })
    }
}
