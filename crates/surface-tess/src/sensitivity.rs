//! Scatter of kernel velocities onto tessellation vertices.
//!
//! The kernel reports coordinate velocities per topological entity, not per
//! global vertex, so the scatter walks each face's (or, for wire-only
//! tessellations, each edge's) local points, evaluates the velocity field at
//! the stored parametric location, and writes through the local→global map
//! into a 3·npt vector.

use nalgebra::DVector;
use tracing::debug;

use geom_kernel::SolidBody;

use crate::tess::{TessError, Tessellation};

/// Per-vertex coordinate velocities for the currently set parameter
/// perturbation, in global-index order.
///
/// The returned vector has length `3 × vertex_count`; rows `3g-3..3g`
/// (0-based) hold the (x,y,z) velocity of global vertex `g`.
pub fn tess_sensitivity(tess: &Tessellation, body: &SolidBody) -> Result<DVector<f64>, TessError> {
    tess.check_compatible(body)?;

    let npt = tess.vertex_count() as usize;
    let mut dsen = DVector::zeros(3 * npt);

    if tess.faces.is_empty() {
        for (ei, edge) in tess.edges.iter().enumerate() {
            let ordinal = ei as u32 + 1;
            for (j, point) in edge.points.iter().enumerate() {
                let vel = body.eval_edge_velocity(ordinal, point.t)?;
                let global = tess.edge_local_to_global(ordinal, j as u32 + 1)?;
                scatter(&mut dsen, global, vel);
            }
        }
    } else {
        for (fi, face) in tess.faces.iter().enumerate() {
            let ordinal = fi as u32 + 1;
            for (j, point) in face.points.iter().enumerate() {
                let vel = body.eval_face_velocity(ordinal, point.uv[0], point.uv[1])?;
                let global = tess.face_local_to_global(ordinal, j as u32 + 1)?;
                scatter(&mut dsen, global, vel);
            }
        }
    }

    debug!(points = npt, "sensitivity scatter complete");
    Ok(dsen)
}

fn scatter(dsen: &mut DVector<f64>, global: u32, vel: [f64; 3]) {
    let base = 3 * (global as usize - 1);
    dsen[base] = vel[0];
    dsen[base + 1] = vel[1];
    dsen[base + 2] = vel[2];
}
