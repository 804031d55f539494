//! Canonical box fixtures.
//!
//! The box model drives a single box primitive from three scalar design
//! parameters `dx, dy, dz`; the matching geometry file carries the box
//! topology and a corner-only reference tessellation whose global point
//! ordering is the one the component tests assert against.

use std::path::{Path, PathBuf};

use nalgebra::DMatrix;

use camber_types::ParamKind;
use geom_kernel::{BodyMetric, ConfigBinding, Dim, PmtrDecl, Primitive, Recipe};
use model_format::{save_geometry, save_model, BodyTopology, GeomBodyRaw, ModelFile, ProjectMetadata};
use surface_tess::{EdgePoint, EdgeTess, FacePoint, FaceTess, GlobalPoint, PointOwner, Tessellation};

/// Errors from fixture helpers.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to write {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Write fixture contents into a directory, returning the file path.
pub fn write_fixture(
    dir: impl AsRef<Path>,
    name: &str,
    contents: &str,
) -> Result<PathBuf, HarnessError> {
    let path = dir.as_ref().join(name);
    std::fs::write(&path, contents).map_err(|e| HarnessError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(path)
}

// ── Box topology ────────────────────────────────────────────────────────────

/// Box vertex ordinals: four bottom corners counter-clockwise, then the
/// four top corners above them (the order the kernel builds them in).
fn corner(node: u32, dx: f64, dy: f64, dz: f64) -> [f64; 3] {
    match node {
        1 => [0.0, 0.0, 0.0],
        2 => [dx, 0.0, 0.0],
        3 => [dx, dy, 0.0],
        4 => [0.0, dy, 0.0],
        5 => [0.0, 0.0, dz],
        6 => [dx, 0.0, dz],
        7 => [dx, dy, dz],
        8 => [0.0, dy, dz],
        _ => unreachable!("box has eight corners"),
    }
}

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

const BOX_FACES: [[u32; 4]; 6] = [
    [1, 4, 3, 2],
    [5, 6, 7, 8],
    [1, 2, 6, 5],
    [3, 4, 8, 7],
    [1, 5, 8, 4],
    [2, 3, 7, 6],
];

/// Global index each box corner is filed under in the reference
/// tessellation. The resulting global order matches the coordinate list
/// the component tests expect.
const NODE_TO_GLOBAL: [u32; 8] = [1, 6, 7, 2, 4, 5, 8, 3];

/// Inverse of [`NODE_TO_GLOBAL`].
const GLOBAL_TO_NODE: [u32; 8] = [1, 4, 8, 5, 6, 2, 3, 7];

fn box_topology(dx: f64, dy: f64, dz: f64) -> BodyTopology {
    BodyTopology {
        vertices: (1..=8).map(|n| corner(n, dx, dy, dz)).collect(),
        edges: BOX_EDGES.to_vec(),
        faces: BOX_FACES.to_vec(),
    }
}

/// Corner-only tessellation of the box: eight global points owned by the
/// body's corner nodes, with full per-face and per-edge local tables.
fn box_tessellation(dx: f64, dy: f64, dz: f64) -> Tessellation {
    let faces = BOX_FACES
        .iter()
        .map(|&[a, b, c, d]| FaceTess {
            points: vec![
                FacePoint {
                    uv: [0.0, 0.0],
                    global: NODE_TO_GLOBAL[a as usize - 1],
                },
                FacePoint {
                    uv: [1.0, 0.0],
                    global: NODE_TO_GLOBAL[b as usize - 1],
                },
                FacePoint {
                    uv: [1.0, 1.0],
                    global: NODE_TO_GLOBAL[c as usize - 1],
                },
                FacePoint {
                    uv: [0.0, 1.0],
                    global: NODE_TO_GLOBAL[d as usize - 1],
                },
            ],
            triangles: vec![[1, 2, 3], [1, 3, 4]],
        })
        .collect();

    let edges = BOX_EDGES
        .iter()
        .map(|&[start, end]| EdgeTess {
            points: vec![
                EdgePoint {
                    t: 0.0,
                    global: NODE_TO_GLOBAL[start as usize - 1],
                },
                EdgePoint {
                    t: 1.0,
                    global: NODE_TO_GLOBAL[end as usize - 1],
                },
            ],
        })
        .collect();

    let global = GLOBAL_TO_NODE
        .iter()
        .map(|&node| GlobalPoint {
            owner: PointOwner::Node { node },
            position: corner(node, dx, dy, dz),
        })
        .collect();

    Tessellation {
        faces,
        edges,
        global,
    }
}

// ── Model files ─────────────────────────────────────────────────────────────

fn scalar_decl(name: &str, kind: ParamKind, value: f64) -> PmtrDecl {
    PmtrDecl {
        name: name.to_string(),
        kind,
        values: DMatrix::from_element(1, 1, value),
    }
}

fn box_model(dx: f64, dy: f64, dz: f64) -> ModelFile {
    let mut recipe = Recipe::new();
    recipe.push(
        "Box 1",
        Primitive::Box {
            origin: [Dim::Literal(0.0), Dim::Literal(0.0), Dim::Literal(0.0)],
            lengths: [Dim::param("dx"), Dim::param("dy"), Dim::param("dz")],
        },
    );

    ModelFile {
        project: ProjectMetadata::new("Test Box"),
        parameters: vec![
            scalar_decl("dx", ParamKind::Design, dx),
            scalar_decl("dy", ParamKind::Design, dy),
            scalar_decl("dz", ParamKind::Design, dz),
            scalar_decl("volume", ParamKind::Config, dx * dy * dz),
            scalar_decl(
                "surface_area",
                ParamKind::Config,
                2.0 * (dx * dy + dy * dz + dz * dx),
            ),
        ],
        recipe,
        config_bindings: vec![
            ConfigBinding {
                name: "volume".to_string(),
                metric: BodyMetric::Volume,
            },
            ConfigBinding {
                name: "surface_area".to_string(),
                metric: BodyMetric::SurfaceArea,
            },
        ],
    }
}

/// Box model with scalar design parameters only.
pub fn box_model_json(dx: f64, dy: f64, dz: f64) -> String {
    save_model(&box_model(dx, dy, dz))
}

/// Box model extended with vector- and matrix-shaped design parameters
/// that do not drive the recipe. Exercises the full marshalling dispatch.
pub fn box_model_extended_json(dx: f64, dy: f64, dz: f64) -> String {
    let mut model = box_model(dx, dy, dz);
    model.parameters.push(PmtrDecl {
        name: "sweep_offsets".to_string(),
        kind: ParamKind::Design,
        values: DMatrix::from_row_slice(1, 3, &[0.1, 0.2, 0.3]),
    });
    model.parameters.push(PmtrDecl {
        name: "station_heights".to_string(),
        kind: ParamKind::Design,
        values: DMatrix::from_column_slice(3, 1, &[1.0, 2.0, 3.0]),
    });
    model.parameters.push(PmtrDecl {
        name: "panel_weights".to_string(),
        kind: ParamKind::Design,
        values: DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
    });
    save_model(&model)
}

// ── Geometry files ──────────────────────────────────────────────────────────

/// Geometry file with one box body and the corner-only tessellation.
pub fn box_geometry_json(dx: f64, dy: f64, dz: f64) -> String {
    save_geometry(vec![GeomBodyRaw {
        topology: box_topology(dx, dy, dz),
        tessellation: Some(box_tessellation(dx, dy, dz)),
    }])
}

/// Geometry file whose tessellation adds a face-owned point at the center
/// of the top face (global index 9).
pub fn box_geometry_with_face_point_json(dx: f64, dy: f64, dz: f64) -> String {
    let mut tess = box_tessellation(dx, dy, dz);
    tess.faces[1].points.push(FacePoint {
        uv: [0.5, 0.5],
        global: 9,
    });
    tess.faces[1].triangles = vec![[1, 2, 5], [2, 3, 5], [3, 4, 5], [4, 1, 5]];
    tess.global.push(GlobalPoint {
        owner: PointOwner::Face { face: 2, point: 5 },
        position: [dx / 2.0, dy / 2.0, dz],
    });
    save_geometry(vec![GeomBodyRaw {
        topology: box_topology(dx, dy, dz),
        tessellation: Some(tess),
    }])
}

/// Geometry file with a body but no tessellation; setup must reject it.
pub fn geometry_without_tess_json(dx: f64, dy: f64, dz: f64) -> String {
    save_geometry(vec![GeomBodyRaw {
        topology: box_topology(dx, dy, dz),
        tessellation: None,
    }])
}

/// Geometry file with two bodies; setup must reject it.
pub fn two_body_geometry_json() -> String {
    save_geometry(vec![
        GeomBodyRaw {
            topology: box_topology(1.0, 1.0, 1.0),
            tessellation: Some(box_tessellation(1.0, 1.0, 1.0)),
        },
        GeomBodyRaw {
            topology: box_topology(2.0, 2.0, 2.0),
            tessellation: Some(box_tessellation(2.0, 2.0, 2.0)),
        },
    ])
}

/// The exact surface coordinates of the corner-only box tessellation, in
/// global-index order.
pub fn box_surface_coords(dx: f64, dy: f64, dz: f64) -> Vec<f64> {
    GLOBAL_TO_NODE
        .iter()
        .flat_map(|&node| corner(node, dx, dy, dz))
        .collect()
}
