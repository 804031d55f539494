//! Ordinal solid topology with parametric evaluators.
//!
//! Bodies address their vertices, edges, and faces by 1-based ordinals, the
//! same index space a tessellation's point owners refer to. Each vertex
//! carries a coordinate velocity alongside its position; evaluators come in
//! position/velocity pairs so a tessellation can be re-evaluated on either
//! field.

use crate::types::KernelError;

/// A body vertex: position plus its coordinate velocity with respect to the
/// currently set parameter perturbation (zero when no velocity is set).
#[derive(Debug, Clone, Copy)]
pub struct BodyVertex {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

/// A straight edge between two vertex ordinals.
#[derive(Debug, Clone, Copy)]
pub struct BodyEdge {
    pub start: u32,
    pub end: u32,
}

/// A planar quad face over four vertex ordinals, wound outward.
/// Corners map to (u,v) = (0,0), (1,0), (1,1), (0,1).
#[derive(Debug, Clone, Copy)]
pub struct BodyFace {
    pub corners: [u32; 4],
}

/// A solid built by the kernel (or loaded from a geometry file).
#[derive(Debug, Clone)]
pub struct SolidBody {
    vertices: Vec<BodyVertex>,
    edges: Vec<BodyEdge>,
    faces: Vec<BodyFace>,
}

impl SolidBody {
    /// Assemble a body from raw topology with zero velocities, validating
    /// that every ordinal reference is in range.
    pub fn from_topology(
        vertices: Vec<[f64; 3]>,
        edges: Vec<[u32; 2]>,
        faces: Vec<[u32; 4]>,
    ) -> Result<Self, KernelError> {
        let n = vertices.len() as u32;
        let check = |ordinal: u32| -> Result<(), KernelError> {
            if ordinal < 1 || ordinal > n {
                return Err(KernelError::BadTopology {
                    reason: format!("vertex ordinal {} out of range (body has {})", ordinal, n),
                });
            }
            Ok(())
        };
        for [start, end] in &edges {
            check(*start)?;
            check(*end)?;
            if start == end {
                return Err(KernelError::BadTopology {
                    reason: format!("edge joins vertex {} to itself", start),
                });
            }
        }
        for corners in &faces {
            for c in corners {
                check(*c)?;
            }
        }

        Ok(Self {
            vertices: vertices
                .into_iter()
                .map(|position| BodyVertex {
                    position,
                    velocity: [0.0; 3],
                })
                .collect(),
            edges: edges
                .into_iter()
                .map(|[start, end]| BodyEdge { start, end })
                .collect(),
            faces: faces.into_iter().map(|corners| BodyFace { corners }).collect(),
        })
    }

    /// Used by the kernel to attach analytically propagated velocities.
    pub(crate) fn from_parts(
        vertices: Vec<BodyVertex>,
        edges: Vec<BodyEdge>,
        faces: Vec<BodyFace>,
    ) -> Self {
        Self {
            vertices,
            edges,
            faces,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn edge_count(&self) -> u32 {
        self.edges.len() as u32
    }

    pub fn face_count(&self) -> u32 {
        self.faces.len() as u32
    }

    fn vertex(&self, ordinal: u32) -> Result<&BodyVertex, KernelError> {
        self.vertices
            .get(ordinal.wrapping_sub(1) as usize)
            .ok_or(KernelError::EntityOutOfRange {
                entity: "vertex",
                index: ordinal,
                count: self.vertex_count(),
            })
    }

    fn edge(&self, ordinal: u32) -> Result<&BodyEdge, KernelError> {
        self.edges
            .get(ordinal.wrapping_sub(1) as usize)
            .ok_or(KernelError::EntityOutOfRange {
                entity: "edge",
                index: ordinal,
                count: self.edge_count(),
            })
    }

    pub fn face(&self, ordinal: u32) -> Result<&BodyFace, KernelError> {
        self.faces
            .get(ordinal.wrapping_sub(1) as usize)
            .ok_or(KernelError::EntityOutOfRange {
                entity: "face",
                index: ordinal,
                count: self.face_count(),
            })
    }

    pub fn vertex_position(&self, ordinal: u32) -> Result<[f64; 3], KernelError> {
        Ok(self.vertex(ordinal)?.position)
    }

    pub fn vertex_velocity(&self, ordinal: u32) -> Result<[f64; 3], KernelError> {
        Ok(self.vertex(ordinal)?.velocity)
    }

    /// Evaluate a point on an edge at parameter `t` in [0,1].
    pub fn eval_edge(&self, ordinal: u32, t: f64) -> Result<[f64; 3], KernelError> {
        let edge = self.edge(ordinal)?;
        let a = self.vertex(edge.start)?.position;
        let b = self.vertex(edge.end)?.position;
        Ok(lerp(a, b, t))
    }

    pub fn eval_edge_velocity(&self, ordinal: u32, t: f64) -> Result<[f64; 3], KernelError> {
        let edge = self.edge(ordinal)?;
        let a = self.vertex(edge.start)?.velocity;
        let b = self.vertex(edge.end)?.velocity;
        Ok(lerp(a, b, t))
    }

    /// Evaluate a point on a face at parameters (u,v) in [0,1]².
    pub fn eval_face(&self, ordinal: u32, u: f64, v: f64) -> Result<[f64; 3], KernelError> {
        let face = self.face(ordinal)?;
        let mut corners = [[0.0; 3]; 4];
        for (slot, &c) in corners.iter_mut().zip(face.corners.iter()) {
            *slot = self.vertex(c)?.position;
        }
        Ok(bilinear(&corners, u, v))
    }

    pub fn eval_face_velocity(&self, ordinal: u32, u: f64, v: f64) -> Result<[f64; 3], KernelError> {
        let face = self.face(ordinal)?;
        let mut corners = [[0.0; 3]; 4];
        for (slot, &c) in corners.iter_mut().zip(face.corners.iter()) {
            *slot = self.vertex(c)?.velocity;
        }
        Ok(bilinear(&corners, u, v))
    }

    /// Positions of a face's four corners in winding order.
    pub fn face_corner_positions(&self, ordinal: u32) -> Result<[[f64; 3]; 4], KernelError> {
        let face = self.face(ordinal)?;
        let mut out = [[0.0; 3]; 4];
        for (slot, &c) in out.iter_mut().zip(face.corners.iter()) {
            *slot = self.vertex(c)?.position;
        }
        Ok(out)
    }
}

fn lerp(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn bilinear(corners: &[[f64; 3]; 4], u: f64, v: f64) -> [f64; 3] {
    let [a, b, c, d] = corners;
    let mut out = [0.0; 3];
    for axis in 0..3 {
        out[axis] = a[axis] * (1.0 - u) * (1.0 - v)
            + b[axis] * u * (1.0 - v)
            + c[axis] * u * v
            + d[axis] * (1.0 - u) * v;
    }
    out
}
