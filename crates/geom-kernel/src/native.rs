//! NativeKernel — deterministic in-process parametric kernel.
//!
//! Holds the parameter table and the primitive recipe. Every rebuild
//! replays the recipe from scratch (no dirty tracking), stores the built
//! bodies in a keyed arena, and refreshes config parameters from body
//! metrics. Parameter velocities propagate analytically onto per-vertex
//! coordinate velocities during the same rebuild.

use std::collections::HashSet;

use nalgebra::DMatrix;
use slotmap::SlotMap;
use tracing::{debug, info, instrument};

use crate::body::{BodyEdge, BodyFace, BodyVertex, SolidBody};
use crate::metrics;
use crate::recipe::{Dim, Primitive, Recipe};
use crate::traits::ParametricKernel;
use crate::types::*;

/// One parameter table entry. Values and velocities share dimensions.
#[derive(Debug, Clone)]
struct Pmtr {
    name: String,
    kind: ParamKind,
    shape: ParamShape,
    values: DMatrix<f64>,
    velocities: DMatrix<f64>,
}

impl Pmtr {
    fn check_element(&self, row: u32, col: u32) -> Result<(), KernelError> {
        if !self.shape.contains(row, col) {
            return Err(KernelError::ElementOutOfBounds {
                name: self.name.clone(),
                shape: self.shape,
                row,
                col,
            });
        }
        Ok(())
    }
}

pub struct NativeKernel {
    table: Vec<Pmtr>,
    recipe: Recipe,
    bindings: Vec<ConfigBinding>,
    bodies: SlotMap<BodyKey, SolidBody>,
}

impl NativeKernel {
    /// Build a kernel from parameter declarations, a recipe, and config
    /// bindings. Declaration order defines table order.
    pub fn new(
        decls: Vec<PmtrDecl>,
        recipe: Recipe,
        bindings: Vec<ConfigBinding>,
    ) -> Result<Self, KernelError> {
        let mut seen = HashSet::new();
        let mut table = Vec::with_capacity(decls.len());
        for decl in decls {
            if decl.values.is_empty() {
                return Err(KernelError::EmptyPmtr { name: decl.name });
            }
            if !seen.insert(decl.name.clone()) {
                return Err(KernelError::DuplicatePmtr { name: decl.name });
            }
            let shape = ParamShape::from_dims(decl.values.nrows() as u32, decl.values.ncols() as u32);
            let velocities = DMatrix::zeros(decl.values.nrows(), decl.values.ncols());
            table.push(Pmtr {
                name: decl.name,
                kind: decl.kind,
                shape,
                values: decl.values,
                velocities,
            });
        }

        for binding in &bindings {
            let pmtr = table
                .iter()
                .find(|p| p.name == binding.name)
                .ok_or_else(|| KernelError::InvalidBinding {
                    name: binding.name.clone(),
                    reason: "no such parameter".to_string(),
                })?;
            if pmtr.kind != ParamKind::Config {
                return Err(KernelError::InvalidBinding {
                    name: binding.name.clone(),
                    reason: "bound parameter must be a config parameter".to_string(),
                });
            }
            if !pmtr.shape.is_scalar() {
                return Err(KernelError::InvalidBinding {
                    name: binding.name.clone(),
                    reason: format!("body metrics are scalar, parameter is {}", pmtr.shape),
                });
            }
        }

        Ok(Self {
            table,
            recipe,
            bindings,
            bodies: SlotMap::with_key(),
        })
    }

    fn pmtr(&self, index: u32) -> Result<&Pmtr, KernelError> {
        self.table
            .get(index.wrapping_sub(1) as usize)
            .ok_or(KernelError::PmtrOutOfRange {
                index,
                count: self.table.len() as u32,
            })
    }

    fn pmtr_mut(&mut self, index: u32) -> Result<&mut Pmtr, KernelError> {
        let count = self.table.len() as u32;
        self.table
            .get_mut(index.wrapping_sub(1) as usize)
            .ok_or(KernelError::PmtrOutOfRange { index, count })
    }
}

/// Evaluate a recipe dimension against the table: (value, velocity).
fn eval_dim(table: &[Pmtr], dim: &Dim) -> Result<(f64, f64), KernelError> {
    match dim {
        Dim::Literal(v) => Ok((*v, 0.0)),
        Dim::Param { param, row, col } => {
            let pmtr = table
                .iter()
                .find(|p| p.name == *param)
                .ok_or_else(|| KernelError::UnknownPmtr {
                    name: param.clone(),
                })?;
            pmtr.check_element(*row, *col)?;
            let at = (*row as usize - 1, *col as usize - 1);
            Ok((pmtr.values[at], pmtr.velocities[at]))
        }
    }
}

/// Corner selectors of the canonical box vertex order: four bottom corners
/// counter-clockwise, then the four top corners above them.
const BOX_CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// 12 edges: bottom ring, top ring, verticals.
const BOX_EDGES: [[u32; 2]; 12] = [
    [1, 2],
    [2, 3],
    [3, 4],
    [4, 1],
    [5, 6],
    [6, 7],
    [7, 8],
    [8, 5],
    [1, 5],
    [2, 6],
    [3, 7],
    [4, 8],
];

/// 6 faces wound outward: bottom, top, front (y=0), back, left (x=0), right.
const BOX_FACES: [[u32; 4]; 6] = [
    [1, 4, 3, 2],
    [5, 6, 7, 8],
    [1, 2, 6, 5],
    [3, 4, 8, 7],
    [1, 5, 8, 4],
    [2, 3, 7, 6],
];

fn build_box(table: &[Pmtr], origin: &[Dim; 3], lengths: &[Dim; 3]) -> Result<SolidBody, KernelError> {
    let mut o = [0.0; 3];
    let mut od = [0.0; 3];
    let mut l = [0.0; 3];
    let mut ld = [0.0; 3];
    for axis in 0..3 {
        let (value, dot) = eval_dim(table, &origin[axis])?;
        o[axis] = value;
        od[axis] = dot;
        let (value, dot) = eval_dim(table, &lengths[axis])?;
        l[axis] = value;
        ld[axis] = dot;
    }

    for (axis, name) in ["x", "y", "z"].iter().enumerate() {
        if l[axis] <= 0.0 {
            return Err(KernelError::DegenerateGeometry {
                detail: format!("box {} length is {}", name, l[axis]),
            });
        }
    }

    let vertices = BOX_CORNERS
        .iter()
        .map(|s| BodyVertex {
            position: [
                o[0] + s[0] * l[0],
                o[1] + s[1] * l[1],
                o[2] + s[2] * l[2],
            ],
            velocity: [
                od[0] + s[0] * ld[0],
                od[1] + s[1] * ld[1],
                od[2] + s[2] * ld[2],
            ],
        })
        .collect();
    let edges = BOX_EDGES
        .iter()
        .map(|&[start, end]| BodyEdge { start, end })
        .collect();
    let faces = BOX_FACES.iter().map(|&corners| BodyFace { corners }).collect();

    Ok(SolidBody::from_parts(vertices, edges, faces))
}

impl ParametricKernel for NativeKernel {
    fn pmtr_count(&self) -> u32 {
        self.table.len() as u32
    }

    fn pmtr_info(&self, index: u32) -> Result<PmtrInfo, KernelError> {
        let pmtr = self.pmtr(index)?;
        Ok(PmtrInfo {
            name: pmtr.name.clone(),
            kind: pmtr.kind,
            shape: pmtr.shape,
        })
    }

    fn get_value(&self, index: u32, row: u32, col: u32) -> Result<f64, KernelError> {
        let pmtr = self.pmtr(index)?;
        pmtr.check_element(row, col)?;
        Ok(pmtr.values[(row as usize - 1, col as usize - 1)])
    }

    fn set_value(
        &mut self,
        index: u32,
        row: u32,
        col: u32,
        value: f64,
    ) -> Result<(), KernelError> {
        let pmtr = self.pmtr_mut(index)?;
        if pmtr.kind != ParamKind::Design {
            return Err(KernelError::ReadOnly {
                name: pmtr.name.clone(),
            });
        }
        pmtr.check_element(row, col)?;
        pmtr.values[(row as usize - 1, col as usize - 1)] = value;
        Ok(())
    }

    fn clear_velocities(&mut self) {
        for pmtr in &mut self.table {
            pmtr.velocities.fill(0.0);
        }
    }

    fn set_velocity(
        &mut self,
        index: u32,
        row: u32,
        col: u32,
        value: f64,
    ) -> Result<(), KernelError> {
        let pmtr = self.pmtr_mut(index)?;
        if pmtr.kind != ParamKind::Design {
            return Err(KernelError::ReadOnly {
                name: pmtr.name.clone(),
            });
        }
        pmtr.check_element(row, col)?;
        pmtr.velocities[(row as usize - 1, col as usize - 1)] = value;
        Ok(())
    }

    #[instrument(skip(self))]
    fn rebuild(&mut self) -> Result<Vec<BodyHandle>, KernelError> {
        let mut new_bodies = Vec::with_capacity(self.recipe.steps.len());
        for step in &self.recipe.steps {
            let body = match &step.primitive {
                Primitive::Box { origin, lengths } => build_box(&self.table, origin, lengths),
            }
            .map_err(|e| KernelError::RebuildFailed {
                step: step.name.clone(),
                reason: e.to_string(),
            })?;
            debug!(step = %step.name, vertices = body.vertex_count(), "step built");
            new_bodies.push(body);
        }
        if new_bodies.is_empty() {
            return Err(KernelError::EmptyRecipe);
        }

        self.bodies.clear();
        let handles: Vec<BodyHandle> = new_bodies
            .into_iter()
            .map(|body| BodyHandle(self.bodies.insert(body)))
            .collect();

        // Config parameters mirror metrics of the first body on the stack.
        let first = self
            .bodies
            .get(handles[0].0)
            .ok_or(KernelError::UnknownBody)?;
        let mut updates = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            let value = match binding.metric {
                BodyMetric::Volume => metrics::volume(first)?,
                BodyMetric::SurfaceArea => metrics::surface_area(first)?,
            };
            updates.push((binding.name.clone(), value));
        }
        for (name, value) in updates {
            if let Some(pmtr) = self.table.iter_mut().find(|p| p.name == name) {
                pmtr.values[(0, 0)] = value;
            }
        }

        info!(bodies = handles.len(), "rebuild complete");
        Ok(handles)
    }

    fn body(&self, handle: &BodyHandle) -> Result<&SolidBody, KernelError> {
        self.bodies.get(handle.0).ok_or(KernelError::UnknownBody)
    }
}
