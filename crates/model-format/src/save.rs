use crate::geometry::{GeomBodyRaw, GeometryFileRaw};
use crate::load::{ModelFile, ModelFileRaw, PmtrDeclRaw};

/// Current file format version (shared by both file kinds).
pub const FORMAT_VERSION: u32 = 1;

/// Serialize a parametric model to a pretty-printed JSON string.
pub fn save_model(model: &ModelFile) -> String {
    let parameters = model
        .parameters
        .iter()
        .map(|decl| PmtrDeclRaw {
            name: decl.name.clone(),
            kind: decl.kind,
            values: (0..decl.values.nrows())
                .map(|r| decl.values.row(r).iter().copied().collect())
                .collect(),
        })
        .collect();

    let raw = ModelFileRaw {
        format: "camber-model".to_string(),
        version: FORMAT_VERSION,
        project: model.project.clone(),
        parameters,
        recipe: model.recipe.clone(),
        config_bindings: model.config_bindings.clone(),
    };
    serde_json::to_string_pretty(&raw).expect("model serialization should never fail")
}

/// Serialize a geometry model to a pretty-printed JSON string.
pub fn save_geometry(bodies: Vec<GeomBodyRaw>) -> String {
    let raw = GeometryFileRaw {
        format: "camber-geom".to_string(),
        version: FORMAT_VERSION,
        bodies,
    };
    serde_json::to_string_pretty(&raw).expect("geometry serialization should never fail")
}
