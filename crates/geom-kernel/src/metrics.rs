//! Body metrics driving config parameters.
//!
//! Both metrics split each quad face into two triangles. Volume uses the
//! divergence theorem over the outward-wound boundary, so a closed body with
//! consistent winding yields the signed enclosed volume.

use nalgebra::Vector3;

use crate::body::SolidBody;
use crate::types::KernelError;

/// Enclosed volume of a closed body.
pub fn volume(body: &SolidBody) -> Result<f64, KernelError> {
    let mut total = 0.0;
    for face in 1..=body.face_count() {
        let corners = body.face_corner_positions(face)?;
        let [a, b, c, d] = corners.map(Vector3::from);
        total += a.dot(&b.cross(&c)) / 6.0;
        total += a.dot(&c.cross(&d)) / 6.0;
    }
    Ok(total)
}

/// Total surface area of a body.
pub fn surface_area(body: &SolidBody) -> Result<f64, KernelError> {
    let mut total = 0.0;
    for face in 1..=body.face_count() {
        let corners = body.face_corner_positions(face)?;
        let [a, b, c, d] = corners.map(Vector3::from);
        total += (b - a).cross(&(c - a)).norm() / 2.0;
        total += (c - a).cross(&(d - a)).norm() / 2.0;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::tests::build_test_box;
    use approx::assert_relative_eq;

    #[test]
    fn box_volume_and_area() {
        let body = build_test_box(2.0, 0.5, 3.0);
        assert_relative_eq!(volume(&body).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(surface_area(&body).unwrap(), 17.0, epsilon = 1e-12);
    }
}
