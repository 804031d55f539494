use geom_kernel::NativeKernel;
use geom_kernel::ParametricKernel;
use model_format::{load_geometry, load_model};
use surface_tess::tess_sensitivity;
use test_harness::assert_coords_close;
use test_harness::fixtures::{
    box_geometry_json, box_geometry_with_face_point_json, box_model_extended_json, box_model_json,
    box_surface_coords, write_fixture,
};

#[test]
fn box_model_fixture_loads_and_builds() {
    let model = load_model(&box_model_json(1.0, 1.0, 1.0)).unwrap();
    assert_eq!(model.parameters.len(), 5);

    let mut kernel =
        NativeKernel::new(model.parameters, model.recipe, model.config_bindings).unwrap();
    let handles = kernel.rebuild().unwrap();
    assert_eq!(handles.len(), 1);
    assert_eq!(kernel.body(&handles[0]).unwrap().vertex_count(), 8);
}

#[test]
fn extended_model_fixture_declares_all_shapes() {
    let model = load_model(&box_model_extended_json(1.0, 1.0, 1.0)).unwrap();
    let dims: Vec<(usize, usize)> = model
        .parameters
        .iter()
        .map(|p| (p.values.nrows(), p.values.ncols()))
        .collect();
    assert!(dims.contains(&(1, 3)));
    assert!(dims.contains(&(3, 1)));
    assert!(dims.contains(&(2, 3)));
}

#[test]
fn box_geometry_fixture_is_a_valid_tessellation() {
    let geometry = load_geometry(&box_geometry_json(2.0, 0.5, 3.0)).unwrap();
    assert_eq!(geometry.bodies.len(), 1);

    let body = &geometry.bodies[0].body;
    let tess = geometry.bodies[0].tessellation.as_ref().unwrap();
    tess.validate().unwrap();
    tess.check_compatible(body).unwrap();

    assert_coords_close(
        &tess.coords_flat(),
        &box_surface_coords(2.0, 0.5, 3.0),
        1e-14,
    );
}

#[test]
fn fixture_tessellation_maps_onto_fixture_body() {
    let small = load_geometry(&box_geometry_json(1.0, 1.0, 1.0)).unwrap();
    let large = load_geometry(&box_geometry_json(2.0, 0.5, 3.0)).unwrap();

    let tess = small.bodies[0].tessellation.as_ref().unwrap();
    let mapped = tess.map_to_body(&large.bodies[0].body).unwrap();
    assert_coords_close(
        &mapped.coords_flat(),
        &box_surface_coords(2.0, 0.5, 3.0),
        1e-14,
    );
}

#[test]
fn kernel_velocities_scatter_onto_fixture_tessellation() {
    let model = load_model(&box_model_json(1.0, 1.0, 1.0)).unwrap();
    let mut kernel =
        NativeKernel::new(model.parameters, model.recipe, model.config_bindings).unwrap();

    // unit velocity on dz (table index 3)
    kernel.set_velocity(3, 1, 1, 1.0).unwrap();
    let handles = kernel.rebuild().unwrap();
    let body = kernel.body(&handles[0]).unwrap();

    let geometry = load_geometry(&box_geometry_with_face_point_json(1.0, 1.0, 1.0)).unwrap();
    let tess = geometry.bodies[0].tessellation.as_ref().unwrap();
    let dsen = tess_sensitivity(tess, body).unwrap();

    // global point 3 is the (0, dy, dz) corner: moves 1:1 with dz
    assert_eq!(dsen[8], 1.0);
    // global point 1 is the origin corner: does not move
    assert_eq!(dsen[2], 0.0);
    // the top-face center rides the top face
    assert_eq!(dsen[26], 1.0);
}

#[test]
fn write_fixture_creates_readable_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "a.json", "{}").unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
}
