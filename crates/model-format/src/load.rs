use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::info;

use camber_types::ParamKind;
use geom_kernel::{ConfigBinding, PmtrDecl, Recipe};

use crate::errors::LoadError;
use crate::metadata::ProjectMetadata;
use crate::save::FORMAT_VERSION;

/// The top-level model file structure for (de)serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFileRaw {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    pub parameters: Vec<PmtrDeclRaw>,
    pub recipe: Recipe,
    #[serde(default)]
    pub config_bindings: Vec<ConfigBinding>,
}

/// A parameter declaration as stored on disk: row-major value rows.
/// The row/column counts define the parameter shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmtrDeclRaw {
    pub name: String,
    pub kind: ParamKind,
    pub values: Vec<Vec<f64>>,
}

/// A loaded, validated model file.
#[derive(Debug, Clone)]
pub struct ModelFile {
    pub project: ProjectMetadata,
    pub parameters: Vec<PmtrDecl>,
    pub recipe: Recipe,
    pub config_bindings: Vec<ConfigBinding>,
}

/// Deserialize a parametric model from a JSON string.
///
/// Validates the format identifier and version, applies migrations for
/// older versions, and converts raw value rows into shaped declarations.
pub fn load_model(json: &str) -> Result<ModelFile, LoadError> {
    let raw: ModelFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != "camber-model" {
        return Err(LoadError::UnknownFormat(raw.format));
    }
    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }
    let raw = if raw.version < FORMAT_VERSION {
        let version = raw.version;
        crate::migrate::migrate_model(raw, version, FORMAT_VERSION)?
    } else {
        raw
    };

    let mut parameters = Vec::with_capacity(raw.parameters.len());
    for decl in raw.parameters {
        parameters.push(convert_decl(decl)?);
    }

    info!(
        model = %raw.project.name,
        parameters = parameters.len(),
        steps = raw.recipe.steps.len(),
        "model file loaded"
    );

    Ok(ModelFile {
        project: raw.project,
        parameters,
        recipe: raw.recipe,
        config_bindings: raw.config_bindings,
    })
}

/// Load a model file from disk.
pub fn read_model_file(path: impl AsRef<Path>) -> Result<ModelFile, LoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    load_model(&json)
}

fn convert_decl(raw: PmtrDeclRaw) -> Result<PmtrDecl, LoadError> {
    if raw.values.is_empty() || raw.values[0].is_empty() {
        return Err(LoadError::BadParameter {
            name: raw.name,
            reason: "value block is empty".to_string(),
        });
    }
    let rows = raw.values.len();
    let cols = raw.values[0].len();
    for row in &raw.values {
        if row.len() != cols {
            return Err(LoadError::BadParameter {
                name: raw.name,
                reason: format!("ragged value rows ({} vs {})", row.len(), cols),
            });
        }
    }
    let values = DMatrix::from_fn(rows, cols, |r, c| raw.values[r][c]);
    Ok(PmtrDecl {
        name: raw.name,
        kind: raw.kind,
        values,
    })
}
