use crate::errors::LoadError;
use crate::geometry::GeometryFileRaw;
use crate::load::ModelFileRaw;

/// Apply model-file migrations from `from_version` to `to_version`.
///
/// Migrations are applied sequentially: v1→v2, v2→v3, etc.
/// Currently version 1 is the only version, so no migrations exist yet.
pub fn migrate_model(
    raw: ModelFileRaw,
    from_version: u32,
    to_version: u32,
) -> Result<ModelFileRaw, LoadError> {
    if from_version != to_version {
        return Err(LoadError::MigrationFailed {
            from: from_version,
            to: to_version,
            reason: format!("no migration path from v{} to v{}", from_version, to_version),
        });
    }
    Ok(raw)
}

/// Apply geometry-file migrations from `from_version` to `to_version`.
pub fn migrate_geometry(
    raw: GeometryFileRaw,
    from_version: u32,
    to_version: u32,
) -> Result<GeometryFileRaw, LoadError> {
    if from_version != to_version {
        return Err(LoadError::MigrationFailed {
            from: from_version,
            to: to_version,
            reason: format!("no migration path from v{} to v{}", from_version, to_version),
        });
    }
    Ok(raw)
}
