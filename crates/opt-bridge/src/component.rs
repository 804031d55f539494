use std::path::Path;

use tracing::{debug, info, instrument};

use camber_types::{ParamKind, ParamShape, ParamValue};
use geom_kernel::{NativeKernel, ParametricKernel};
use model_format::{read_geometry_file, read_model_file, GeomModel};
use surface_tess::Tessellation;

use crate::errors::{ComputeError, SetupError};
use crate::marshal::{read_param, write_param};
use crate::variables::{VariableSet, VariableSpec};

/// Name of the fixed surface-coordinate output slot.
pub const SURFACE_OUTPUT: &str = "x_surf";

/// A registered parameter slot: table index plus the shape it was
/// registered with at setup.
#[derive(Debug, Clone)]
pub(crate) struct PmtrSlot {
    pub name: String,
    pub index: u32,
    pub shape: ParamShape,
}

/// The adapter component.
///
/// Owns the kernel and the reference tessellation for the lifetime of the
/// optimization run; every evaluation goes through `&mut self`, so the
/// kernel state has a single writer by construction.
pub struct SurfaceComponent {
    kernel: Box<dyn ParametricKernel>,
    base_tess: Tessellation,
    pub(crate) design: Vec<PmtrSlot>,
    pub(crate) config: Vec<PmtrSlot>,
    inputs: Vec<VariableSpec>,
    outputs: Vec<VariableSpec>,
}

impl SurfaceComponent {
    /// Set up the component from a parametric model file and a tessellated
    /// geometry file.
    #[instrument]
    pub fn from_files(
        model_path: impl AsRef<Path> + std::fmt::Debug,
        geometry_path: impl AsRef<Path> + std::fmt::Debug,
    ) -> Result<Self, SetupError> {
        let model = read_model_file(model_path)?;
        let kernel = NativeKernel::new(model.parameters, model.recipe, model.config_bindings)?;
        let geometry = read_geometry_file(geometry_path)?;
        Self::from_parts(Box::new(kernel), geometry)
    }

    /// Set up the component from an already-built kernel and geometry
    /// model. This is the seam tests use to substitute kernel doubles.
    pub fn from_parts(
        kernel: Box<dyn ParametricKernel>,
        geometry: GeomModel,
    ) -> Result<Self, SetupError> {
        let mut bodies = geometry.bodies;
        let entry = match bodies.len() {
            0 => return Err(SetupError::NoBody),
            1 => bodies.remove(0),
            count => return Err(SetupError::MultipleBodies { count }),
        };
        let base_tess = entry.tessellation.ok_or(SetupError::MissingTessellation)?;
        base_tess.validate()?;
        base_tess.check_compatible(&entry.body)?;

        let mut design = Vec::new();
        let mut config = Vec::new();
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();

        for index in 1..=kernel.pmtr_count() {
            let pmtr = kernel.pmtr_info(index)?;
            let initial = read_param(kernel.as_ref(), index, &pmtr.shape)?;
            let slot = PmtrSlot {
                name: pmtr.name.clone(),
                index,
                shape: pmtr.shape,
            };
            let spec = VariableSpec {
                name: pmtr.name,
                shape: pmtr.shape,
                initial,
            };
            match pmtr.kind {
                ParamKind::Design => {
                    design.push(slot);
                    inputs.push(spec);
                }
                ParamKind::Config => {
                    config.push(slot);
                    outputs.push(spec);
                }
            }
        }

        let npt = base_tess.vertex_count();
        outputs.push(VariableSpec {
            name: SURFACE_OUTPUT.to_string(),
            shape: ParamShape::ColVector { rows: 3 * npt },
            initial: ParamValue::Vector(base_tess.coords_flat()),
        });

        info!(
            design_parameters = design.len(),
            config_parameters = config.len(),
            surface_points = npt,
            "component setup complete"
        );

        Ok(Self {
            kernel,
            base_tess,
            design,
            config,
            inputs,
            outputs,
        })
    }

    /// Input specs: one per design parameter, in table order.
    pub fn inputs(&self) -> &[VariableSpec] {
        &self.inputs
    }

    /// Output specs: one per config parameter, plus `x_surf` last.
    pub fn outputs(&self) -> &[VariableSpec] {
        &self.outputs
    }

    /// Length of the flattened surface-coordinate output.
    pub fn surface_len(&self) -> usize {
        3 * self.base_tess.vertex_count() as usize
    }

    pub(crate) fn kernel_ref(&self) -> &dyn ParametricKernel {
        self.kernel.as_ref()
    }

    pub(crate) fn kernel_mut(&mut self) -> &mut dyn ParametricKernel {
        self.kernel.as_mut()
    }

    pub(crate) fn base_tess(&self) -> &Tessellation {
        &self.base_tess
    }

    /// Current table value of a design parameter.
    pub fn design_value(&self, name: &str) -> Result<ParamValue, ComputeError> {
        let slot = self.design_slot(name)?;
        read_param(self.kernel.as_ref(), slot.index, &slot.shape).map_err(|e| {
            ComputeError::Parameter {
                name: slot.name.clone(),
                source: e,
            }
        })
    }

    /// Write a design parameter into the table without rebuilding.
    pub fn set_design_value(&mut self, name: &str, value: &ParamValue) -> Result<(), ComputeError> {
        let slot = self.design_slot(name)?.clone();
        write_param(self.kernel.as_mut(), slot.index, &slot.shape, value).map_err(|e| {
            ComputeError::Parameter {
                name: slot.name,
                source: e,
            }
        })
    }

    fn design_slot(&self, name: &str) -> Result<&PmtrSlot, ComputeError> {
        self.design
            .iter()
            .find(|slot| slot.name == name)
            .ok_or_else(|| ComputeError::UnknownParameter {
                name: name.to_string(),
            })
    }

    /// One evaluation: push inputs, rebuild, re-map the reference
    /// tessellation, publish outputs.
    ///
    /// Config outputs are snapshotted from the table before the inputs are
    /// written, so they reflect the state the kernel was left in by the
    /// previous rebuild.
    pub fn compute(
        &mut self,
        inputs: &VariableSet,
        outputs: &mut VariableSet,
    ) -> Result<(), ComputeError> {
        let mut snapshot = Vec::with_capacity(self.config.len());
        for slot in &self.config {
            let value =
                read_param(self.kernel.as_ref(), slot.index, &slot.shape).map_err(|e| {
                    ComputeError::Parameter {
                        name: slot.name.clone(),
                        source: e,
                    }
                })?;
            snapshot.push((slot.name.clone(), value));
        }

        for slot in &self.design {
            let value = inputs
                .get(&slot.name)
                .ok_or_else(|| ComputeError::MissingInput {
                    name: slot.name.clone(),
                })?;
            write_param(self.kernel.as_mut(), slot.index, &slot.shape, value).map_err(|e| {
                ComputeError::Parameter {
                    name: slot.name.clone(),
                    source: e,
                }
            })?;
        }

        let handles = self.kernel.rebuild()?;
        let first = handles.first().ok_or(ComputeError::NoBodyBuilt)?;
        let body = self.kernel.body(first)?;

        let mapped = self.base_tess.map_to_body(body)?;
        debug!(points = mapped.vertex_count(), "surface re-mapped");
        outputs.set(SURFACE_OUTPUT, ParamValue::Vector(mapped.coords_flat()));

        for (name, value) in snapshot {
            outputs.set(name, value);
        }
        Ok(())
    }
}
