use approx::assert_abs_diff_eq;
use geom_kernel::SolidBody;
use surface_tess::{
    tess_sensitivity, EdgePoint, EdgeTess, FacePoint, FaceTess, GlobalPoint, PointOwner, TessError,
    Tessellation,
};

/// A single quad face in the z=0 plane with side length `s`.
fn quad_body(s: f64) -> SolidBody {
    SolidBody::from_topology(
        vec![[0.0, 0.0, 0.0], [s, 0.0, 0.0], [s, s, 0.0], [0.0, s, 0.0]],
        vec![[1, 2], [2, 3], [3, 4], [4, 1]],
        vec![[1, 2, 3, 4]],
    )
    .unwrap()
}

/// Tessellation of the quad: four corner points plus a face-center point.
fn quad_tess(s: f64) -> Tessellation {
    Tessellation {
        faces: vec![FaceTess {
            points: vec![
                FacePoint {
                    uv: [0.0, 0.0],
                    global: 1,
                },
                FacePoint {
                    uv: [1.0, 0.0],
                    global: 2,
                },
                FacePoint {
                    uv: [1.0, 1.0],
                    global: 3,
                },
                FacePoint {
                    uv: [0.0, 1.0],
                    global: 4,
                },
                FacePoint {
                    uv: [0.5, 0.5],
                    global: 5,
                },
            ],
            triangles: vec![[1, 2, 5], [2, 3, 5], [3, 4, 5], [4, 1, 5]],
        }],
        edges: (0..4)
            .map(|i| EdgeTess {
                points: vec![
                    EdgePoint {
                        t: 0.0,
                        global: [1, 2, 3, 4][i],
                    },
                    EdgePoint {
                        t: 1.0,
                        global: [2, 3, 4, 1][i],
                    },
                ],
            })
            .collect(),
        global: vec![
            GlobalPoint {
                owner: PointOwner::Node { node: 1 },
                position: [0.0, 0.0, 0.0],
            },
            GlobalPoint {
                owner: PointOwner::Node { node: 2 },
                position: [s, 0.0, 0.0],
            },
            GlobalPoint {
                owner: PointOwner::Node { node: 3 },
                position: [s, s, 0.0],
            },
            GlobalPoint {
                owner: PointOwner::Node { node: 4 },
                position: [0.0, s, 0.0],
            },
            GlobalPoint {
                owner: PointOwner::Face { face: 1, point: 5 },
                position: [s / 2.0, s / 2.0, 0.0],
            },
        ],
    }
}

#[test]
fn validate_accepts_consistent_tessellation() {
    quad_tess(1.0).validate().unwrap();
}

#[test]
fn validate_rejects_dangling_global_reference() {
    let mut tess = quad_tess(1.0);
    tess.faces[0].points[0].global = 9;
    assert!(matches!(
        tess.validate(),
        Err(TessError::Inconsistent { .. })
    ));
}

#[test]
fn validate_rejects_owner_not_pointing_back() {
    let mut tess = quad_tess(1.0);
    tess.global[4].owner = PointOwner::Face { face: 1, point: 1 };
    assert!(matches!(
        tess.validate(),
        Err(TessError::Inconsistent { .. })
    ));
}

#[test]
fn local_to_global_is_one_based() {
    let tess = quad_tess(1.0);
    assert_eq!(tess.face_local_to_global(1, 5).unwrap(), 5);
    assert_eq!(tess.edge_local_to_global(2, 1).unwrap(), 2);
    assert!(matches!(
        tess.face_local_to_global(2, 1),
        Err(TessError::LocalOutOfRange { .. })
    ));
}

#[test]
fn map_re_evaluates_all_owner_kinds() {
    let tess = quad_tess(1.0);
    let scaled = quad_body(3.0);
    let mapped = tess.map_to_body(&scaled).unwrap();

    assert_eq!(mapped.vertex_count(), tess.vertex_count());
    let coords = mapped.coords_flat();
    // corner node follows the body
    assert_abs_diff_eq!(coords[3], 3.0);
    // face-center point re-evaluates at its stored (u,v)
    assert_abs_diff_eq!(coords[12], 1.5);
    assert_abs_diff_eq!(coords[13], 1.5);
}

#[test]
fn map_preserves_owners_and_ordering() {
    let tess = quad_tess(1.0);
    let mapped = tess.map_to_body(&quad_body(2.0)).unwrap();
    for (before, after) in tess.global.iter().zip(mapped.global.iter()) {
        assert_eq!(before.owner, after.owner);
    }
}

#[test]
fn map_rejects_mismatched_topology() {
    let tess = quad_tess(1.0);
    let wire = SolidBody::from_topology(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        vec![[1, 2]],
        vec![],
    )
    .unwrap();
    assert!(matches!(
        tess.map_to_body(&wire),
        Err(TessError::TopologyMismatch { .. })
    ));
}

#[test]
fn wire_tessellation_maps_through_edges() {
    let wire = SolidBody::from_topology(
        vec![[0.0, 0.0, 0.0], [4.0, 0.0, 0.0]],
        vec![[1, 2]],
        vec![],
    )
    .unwrap();
    let tess = Tessellation {
        faces: vec![],
        edges: vec![EdgeTess {
            points: vec![
                EdgePoint { t: 0.0, global: 1 },
                EdgePoint { t: 0.5, global: 2 },
                EdgePoint { t: 1.0, global: 3 },
            ],
        }],
        global: vec![
            GlobalPoint {
                owner: PointOwner::Node { node: 1 },
                position: [0.0, 0.0, 0.0],
            },
            GlobalPoint {
                owner: PointOwner::Edge { edge: 1, point: 2 },
                position: [2.0, 0.0, 0.0],
            },
            GlobalPoint {
                owner: PointOwner::Node { node: 2 },
                position: [4.0, 0.0, 0.0],
            },
        ],
    };
    tess.validate().unwrap();

    let mapped = tess.map_to_body(&wire).unwrap();
    let coords = mapped.coords_flat();
    assert_abs_diff_eq!(coords[3], 2.0);
    assert_abs_diff_eq!(coords[6], 4.0);

    // zero velocity field scatters to zeros through the edge path
    let dsen = tess_sensitivity(&tess, &wire).unwrap();
    assert_eq!(dsen.len(), 9);
    assert!(dsen.iter().all(|v| *v == 0.0));
}
