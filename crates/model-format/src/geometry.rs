use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use geom_kernel::SolidBody;
use surface_tess::Tessellation;

use crate::errors::LoadError;
use crate::save::FORMAT_VERSION;

/// The top-level geometry file structure for (de)serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryFileRaw {
    pub format: String,
    pub version: u32,
    pub bodies: Vec<GeomBodyRaw>,
}

/// A body entry as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeomBodyRaw {
    pub topology: BodyTopology,
    pub tessellation: Option<Tessellation>,
}

/// Raw body topology: vertex coordinates, edges as vertex-ordinal pairs,
/// quad faces as vertex-ordinal quadruples (all ordinals 1-based).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyTopology {
    pub vertices: Vec<[f64; 3]>,
    pub edges: Vec<[u32; 2]>,
    pub faces: Vec<[u32; 4]>,
}

/// A loaded geometry model.
#[derive(Debug)]
pub struct GeomModel {
    pub bodies: Vec<GeomBody>,
}

/// One loaded body with its optional tessellation.
#[derive(Debug)]
pub struct GeomBody {
    pub body: SolidBody,
    pub tessellation: Option<Tessellation>,
}

/// Deserialize a tessellated geometry model from a JSON string.
///
/// Validates the format identifier and version and assembles each body's
/// topology. Body-count and tessellation-presence rules are enforced by
/// the component that consumes the model, not here.
pub fn load_geometry(json: &str) -> Result<GeomModel, LoadError> {
    let raw: GeometryFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != "camber-geom" {
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
        crate::migrate::migrate_geometry(raw, version, FORMAT_VERSION)?
    } else {
        raw
    };

    let mut bodies = Vec::with_capacity(raw.bodies.len());
    for entry in raw.bodies {
        let body = SolidBody::from_topology(
            entry.topology.vertices,
            entry.topology.edges,
            entry.topology.faces,
        )
        .map_err(|e| LoadError::BadTopology {
            reason: e.to_string(),
        })?;
        bodies.push(GeomBody {
            body,
            tessellation: entry.tessellation,
        });
    }

    info!(bodies = bodies.len(), "geometry file loaded");
    Ok(GeomModel { bodies })
}

/// Load a geometry file from disk.
pub fn read_geometry_file(path: impl AsRef<Path>) -> Result<GeomModel, LoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    load_geometry(&json)
}
