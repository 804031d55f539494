//! Tessellation data model and body mapping.
//!
//! A tessellation is the immutable reference triangulation of one solid
//! body. Global 1-based vertex indices are the stable addressing scheme;
//! every global point records which topological entity owns it, so the
//! whole tessellation can be re-evaluated on a rebuilt body of identical
//! topology without changing counts or ordering. That re-mapping is what
//! makes the flattened surface coordinates a continuous function of the
//! design parameters.

pub mod sensitivity;
pub mod tess;

pub use sensitivity::tess_sensitivity;
pub use tess::{EdgePoint, EdgeTess, FacePoint, FaceTess, GlobalPoint, PointOwner, TessError, Tessellation};
