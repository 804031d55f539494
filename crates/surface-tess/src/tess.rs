use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use geom_kernel::SolidBody;

/// Which topological entity owns a global tessellation point.
///
/// `point` indices refer back into the owning entity's local table, where
/// the parametric location of the point is stored. All indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PointOwner {
    Node { node: u32 },
    Edge { edge: u32, point: u32 },
    Face { face: u32, point: u32 },
}

/// A global tessellation point: owner plus current coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalPoint {
    pub owner: PointOwner,
    pub position: [f64; 3],
}

/// A local point of one face's tessellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacePoint {
    /// Parametric location on the face, each component in [0,1].
    pub uv: [f64; 2],
    /// 1-based global index.
    pub global: u32,
}

/// Per-face tessellation: local points and triangles over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceTess {
    pub points: Vec<FacePoint>,
    /// Triangles as 1-based local point indices.
    pub triangles: Vec<[u32; 3]>,
}

/// A local point of one edge's tessellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgePoint {
    /// Parametric location along the edge in [0,1].
    pub t: f64,
    /// 1-based global index.
    pub global: u32,
}

/// Per-edge tessellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeTess {
    pub points: Vec<EdgePoint>,
}

/// Errors from tessellation queries and mapping.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TessError {
    #[error("tessellation has no points")]
    Empty,

    #[error("tessellation has neither face nor edge tables")]
    NoLocalTables,

    #[error("tessellation is inconsistent: {reason}")]
    Inconsistent { reason: String },

    #[error("{entity} index {index} out of range (tessellation has {count})")]
    LocalOutOfRange {
        entity: &'static str,
        index: u32,
        count: u32,
    },

    #[error(
        "tessellation topology does not match body: {entity} count {expected} vs body {found}"
    )]
    TopologyMismatch {
        entity: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("kernel error: {0}")]
    Kernel(#[from] geom_kernel::KernelError),
}

/// A triangulated surface with stable global vertex indexing.
///
/// `faces[i]` and `edges[i]` tessellate body face/edge ordinal `i+1`; the
/// tables must cover every topological entity of the body they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tessellation {
    pub faces: Vec<FaceTess>,
    pub edges: Vec<EdgeTess>,
    pub global: Vec<GlobalPoint>,
}

impl Tessellation {
    /// Number of global tessellation points.
    pub fn vertex_count(&self) -> u32 {
        self.global.len() as u32
    }

    /// Flattened (x,y,z) coordinates in global-index order, length 3·npt.
    pub fn coords_flat(&self) -> DVector<f64> {
        let mut out = DVector::zeros(self.global.len() * 3);
        for (i, point) in self.global.iter().enumerate() {
            out[3 * i] = point.position[0];
            out[3 * i + 1] = point.position[1];
            out[3 * i + 2] = point.position[2];
        }
        out
    }

    /// Global index of local point `j` of face `face` (both 1-based).
    pub fn face_local_to_global(&self, face: u32, j: u32) -> Result<u32, TessError> {
        let table = self
            .faces
            .get(face.wrapping_sub(1) as usize)
            .ok_or(TessError::LocalOutOfRange {
                entity: "face",
                index: face,
                count: self.faces.len() as u32,
            })?;
        let point = table
            .points
            .get(j.wrapping_sub(1) as usize)
            .ok_or(TessError::LocalOutOfRange {
                entity: "face point",
                index: j,
                count: table.points.len() as u32,
            })?;
        Ok(point.global)
    }

    /// Global index of local point `j` of edge `edge` (both 1-based).
    pub fn edge_local_to_global(&self, edge: u32, j: u32) -> Result<u32, TessError> {
        let table = self
            .edges
            .get(edge.wrapping_sub(1) as usize)
            .ok_or(TessError::LocalOutOfRange {
                entity: "edge",
                index: edge,
                count: self.edges.len() as u32,
            })?;
        let point = table
            .points
            .get(j.wrapping_sub(1) as usize)
            .ok_or(TessError::LocalOutOfRange {
                entity: "edge point",
                index: j,
                count: table.points.len() as u32,
            })?;
        Ok(point.global)
    }

    /// Owner of a 1-based global index.
    pub fn global_owner(&self, global: u32) -> Result<PointOwner, TessError> {
        self.global
            .get(global.wrapping_sub(1) as usize)
            .map(|p| p.owner)
            .ok_or(TessError::LocalOutOfRange {
                entity: "global point",
                index: global,
                count: self.global.len() as u32,
            })
    }

    /// Structural validation: non-empty, local tables reference existing
    /// globals, owner back-references agree with the local tables, and
    /// every global point is reachable from the tables the scatter loops
    /// over (faces when present, edges otherwise).
    pub fn validate(&self) -> Result<(), TessError> {
        if self.global.is_empty() {
            return Err(TessError::Empty);
        }
        if self.faces.is_empty() && self.edges.is_empty() {
            return Err(TessError::NoLocalTables);
        }

        let npt = self.global.len() as u32;
        let check_global = |global: u32, what: &str| -> Result<(), TessError> {
            if global < 1 || global > npt {
                return Err(TessError::Inconsistent {
                    reason: format!("{} references global {} of {}", what, global, npt),
                });
            }
            Ok(())
        };

        let mut covered = vec![false; self.global.len()];
        for (fi, face) in self.faces.iter().enumerate() {
            for point in &face.points {
                check_global(point.global, &format!("face {}", fi + 1))?;
                covered[point.global as usize - 1] = true;
            }
            for tri in &face.triangles {
                for &local in tri {
                    if local < 1 || local as usize > face.points.len() {
                        return Err(TessError::Inconsistent {
                            reason: format!(
                                "face {} triangle references local point {} of {}",
                                fi + 1,
                                local,
                                face.points.len()
                            ),
                        });
                    }
                }
            }
        }
        let edges_cover = self.faces.is_empty();
        for (ei, edge) in self.edges.iter().enumerate() {
            for point in &edge.points {
                check_global(point.global, &format!("edge {}", ei + 1))?;
                if edges_cover {
                    covered[point.global as usize - 1] = true;
                }
            }
        }
        if let Some(missed) = covered.iter().position(|c| !c) {
            return Err(TessError::Inconsistent {
                reason: format!("global point {} is not referenced by any local table", missed + 1),
            });
        }

        for (gi, point) in self.global.iter().enumerate() {
            let global = gi as u32 + 1;
            let consistent = match point.owner {
                PointOwner::Node { .. } => true,
                PointOwner::Edge { edge, point } => {
                    self.edge_local_to_global(edge, point).ok() == Some(global)
                }
                PointOwner::Face { face, point } => {
                    self.face_local_to_global(face, point).ok() == Some(global)
                }
            };
            if !consistent {
                return Err(TessError::Inconsistent {
                    reason: format!("owner of global point {} does not point back to it", global),
                });
            }
        }

        Ok(())
    }

    /// Check that this tessellation addresses a body of compatible
    /// topology: one local table per body face and edge, and node owners
    /// within the body's vertex ordinals.
    pub fn check_compatible(&self, body: &SolidBody) -> Result<(), TessError> {
        if self.faces.len() as u32 != body.face_count() {
            return Err(TessError::TopologyMismatch {
                entity: "face",
                expected: self.faces.len() as u32,
                found: body.face_count(),
            });
        }
        if self.edges.len() as u32 != body.edge_count() {
            return Err(TessError::TopologyMismatch {
                entity: "edge",
                expected: self.edges.len() as u32,
                found: body.edge_count(),
            });
        }
        for point in &self.global {
            if let PointOwner::Node { node } = point.owner {
                if node < 1 || node > body.vertex_count() {
                    return Err(TessError::TopologyMismatch {
                        entity: "node",
                        expected: node,
                        found: body.vertex_count(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Map this tessellation onto a rebuilt body.
    ///
    /// Every global point is re-evaluated at its stored parametric
    /// location on its owning entity. Counts, owners, ordering, and local
    /// tables are preserved exactly; only coordinates change.
    pub fn map_to_body(&self, body: &SolidBody) -> Result<Tessellation, TessError> {
        self.check_compatible(body)?;

        let mut mapped = self.clone();
        for point in mapped.global.iter_mut() {
            point.position = match point.owner {
                PointOwner::Node { node } => body.vertex_position(node)?,
                PointOwner::Edge { edge, point: j } => {
                    let t = self.edge_param(edge, j)?;
                    body.eval_edge(edge, t)?
                }
                PointOwner::Face { face, point: j } => {
                    let uv = self.face_param(face, j)?;
                    body.eval_face(face, uv[0], uv[1])?
                }
            };
        }
        debug!(points = mapped.global.len(), "tessellation mapped onto body");
        Ok(mapped)
    }

    pub(crate) fn face_param(&self, face: u32, j: u32) -> Result<[f64; 2], TessError> {
        let table = self
            .faces
            .get(face.wrapping_sub(1) as usize)
            .ok_or(TessError::LocalOutOfRange {
                entity: "face",
                index: face,
                count: self.faces.len() as u32,
            })?;
        table
            .points
            .get(j.wrapping_sub(1) as usize)
            .map(|p| p.uv)
            .ok_or(TessError::LocalOutOfRange {
                entity: "face point",
                index: j,
                count: table.points.len() as u32,
            })
    }

    pub(crate) fn edge_param(&self, edge: u32, j: u32) -> Result<f64, TessError> {
        let table = self
            .edges
            .get(edge.wrapping_sub(1) as usize)
            .ok_or(TessError::LocalOutOfRange {
                entity: "edge",
                index: edge,
                count: self.edges.len() as u32,
            })?;
        table
            .points
            .get(j.wrapping_sub(1) as usize)
            .map(|p| p.t)
            .ok_or(TessError::LocalOutOfRange {
                entity: "edge point",
                index: j,
                count: table.points.len() as u32,
            })
    }
}
