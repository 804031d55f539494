use std::path::PathBuf;

use nalgebra::{DMatrix, DVector};
use tempfile::TempDir;

use camber_types::{ParamShape, ParamValue};
use opt_bridge::{
    ComputeError, SensitivityError, SetupError, SurfaceComponent, VariableSet, SURFACE_OUTPUT,
};
use test_harness::fixtures::{
    box_geometry_json, box_geometry_with_face_point_json, box_model_extended_json, box_model_json,
    box_surface_coords, geometry_without_tess_json, two_body_geometry_json, write_fixture,
};
use test_harness::{assert_coords_close, assert_vectors_close};

// ── Helper Functions ─────────────────────────────────────────────────────

fn setup(model_json: &str, geometry_json: &str) -> (TempDir, SurfaceComponent) {
    let dir = tempfile::tempdir().expect("tempdir");
    let model = write_fixture(dir.path(), "box.model.json", model_json).expect("model fixture");
    let geometry =
        write_fixture(dir.path(), "box.geom.json", geometry_json).expect("geometry fixture");
    let component = SurfaceComponent::from_files(&model, &geometry).expect("setup");
    (dir, component)
}

fn setup_err(model_json: &str, geometry_json: &str) -> SetupError {
    let dir = tempfile::tempdir().expect("tempdir");
    let model = write_fixture(dir.path(), "box.model.json", model_json).expect("model fixture");
    let geometry =
        write_fixture(dir.path(), "box.geom.json", geometry_json).expect("geometry fixture");
    SurfaceComponent::from_files(&model, &geometry).err().expect("setup should fail")
}

fn box_component() -> (TempDir, SurfaceComponent) {
    setup(&box_model_json(1.0, 1.0, 1.0), &box_geometry_json(1.0, 1.0, 1.0))
}

fn surf(outputs: &VariableSet) -> &DVector<f64> {
    outputs.vector(SURFACE_OUTPUT).expect("x_surf output")
}

/// Run one evaluation with the given box dimensions.
fn evaluate(component: &mut SurfaceComponent, dx: f64, dy: f64, dz: f64) -> VariableSet {
    let mut inputs = VariableSet::from_specs(component.inputs());
    inputs.set_scalar("dx", dx);
    inputs.set_scalar("dy", dy);
    inputs.set_scalar("dz", dz);
    let mut outputs = VariableSet::new();
    component.compute(&inputs, &mut outputs).expect("compute");
    outputs
}

// ── Setup-Time Introspection ─────────────────────────────────────────────

#[test]
fn setup_registers_design_inputs_with_initial_values() {
    let (_dir, component) = box_component();

    let names: Vec<&str> = component.inputs().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["dx", "dy", "dz"]);
    for spec in component.inputs() {
        assert_eq!(spec.shape, ParamShape::Scalar);
        assert_eq!(spec.initial, ParamValue::Scalar(1.0));
    }
}

#[test]
fn setup_registers_config_outputs_and_surface() {
    let (_dir, component) = box_component();

    let names: Vec<&str> = component
        .outputs()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["volume", "surface_area", "x_surf"]);

    let x_surf = component.outputs().last().unwrap();
    assert_eq!(x_surf.shape, ParamShape::ColVector { rows: 24 });
    match &x_surf.initial {
        ParamValue::Vector(v) => assert_coords_close(v, &box_surface_coords(1.0, 1.0, 1.0), 1e-14),
        other => panic!("x_surf initial should be a vector, got {}", other.describe()),
    }
}

#[test]
fn setup_rejects_geometry_without_tessellation() {
    let err = setup_err(
        &box_model_json(1.0, 1.0, 1.0),
        &geometry_without_tess_json(1.0, 1.0, 1.0),
    );
    assert!(matches!(err, SetupError::MissingTessellation));
}

#[test]
fn setup_rejects_multi_body_geometry() {
    let err = setup_err(&box_model_json(1.0, 1.0, 1.0), &two_body_geometry_json());
    assert!(matches!(err, SetupError::MultipleBodies { count: 2 }));
}

// ── Evaluation ───────────────────────────────────────────────────────────

#[test]
fn compute_reproduces_exact_box_coordinates() {
    let (_dir, mut component) = box_component();
    let outputs = evaluate(&mut component, 2.0, 0.5, 3.0);

    let expected = [
        0.0, 0.0, 0.0, //
        0.0, 0.5, 0.0, //
        0.0, 0.5, 3.0, //
        0.0, 0.0, 3.0, //
        2.0, 0.0, 3.0, //
        2.0, 0.0, 0.0, //
        2.0, 0.5, 0.0, //
        2.0, 0.5, 3.0,
    ];
    assert_coords_close(surf(&outputs), &expected, 1e-12);
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let (_dir, mut component) = box_component();
    let first = evaluate(&mut component, 1.7, 0.9, 2.2);
    let second = evaluate(&mut component, 1.7, 0.9, 2.2);
    assert_vectors_close(surf(&second), surf(&first), 0.0);
}

#[test]
fn surface_layout_is_fixed_across_rebuilds() {
    let (_dir, mut component) = box_component();
    let a = evaluate(&mut component, 1.0, 1.0, 1.0);
    let b = evaluate(&mut component, 4.0, 2.0, 0.25);

    assert_eq!(surf(&a).len(), component.surface_len());
    assert_eq!(surf(&b).len(), component.surface_len());
    // global vertex 1 stays the origin corner in both evaluations
    assert_eq!(surf(&b)[0], 0.0);
    // global vertex 8 stays the far corner
    assert_eq!(surf(&b)[21], 4.0);
    assert_eq!(surf(&b)[22], 2.0);
    assert_eq!(surf(&b)[23], 0.25);
}

#[test]
fn config_outputs_lag_one_evaluation_behind() {
    let (_dir, mut component) = box_component();

    // first evaluation sees the file-initial table values
    let first = evaluate(&mut component, 2.0, 0.5, 3.0);
    assert_eq!(first.scalar("volume"), Some(1.0));
    assert_eq!(first.scalar("surface_area"), Some(6.0));

    // second evaluation sees the metrics of the first rebuild
    let second = evaluate(&mut component, 2.0, 0.5, 3.0);
    assert_eq!(second.scalar("volume"), Some(3.0));
    assert_eq!(second.scalar("surface_area"), Some(17.0));
}

#[test]
fn missing_design_input_aborts_evaluation() {
    let (_dir, mut component) = box_component();
    let mut inputs = VariableSet::new();
    inputs.set_scalar("dx", 1.0);
    let mut outputs = VariableSet::new();
    assert!(matches!(
        component.compute(&inputs, &mut outputs),
        Err(ComputeError::MissingInput { .. })
    ));
}

#[test]
fn degenerate_rebuild_propagates_as_fatal() {
    let (_dir, mut component) = box_component();
    let mut inputs = VariableSet::from_specs(component.inputs());
    inputs.set_scalar("dx", -1.0);
    let mut outputs = VariableSet::new();
    assert!(matches!(
        component.compute(&inputs, &mut outputs),
        Err(ComputeError::Kernel(_))
    ));
    assert!(outputs.get(SURFACE_OUTPUT).is_none());
}

// ── Value Marshalling ────────────────────────────────────────────────────

#[test]
fn every_shape_round_trips_without_rebuild() {
    let (_dir, mut component) = setup(
        &box_model_extended_json(1.0, 1.0, 1.0),
        &box_geometry_json(1.0, 1.0, 1.0),
    );

    let cases = vec![
        ("dx", ParamValue::Scalar(4.25)),
        (
            "sweep_offsets",
            ParamValue::Vector(DVector::from_vec(vec![7.0, 8.0, 9.0])),
        ),
        (
            "station_heights",
            ParamValue::Vector(DVector::from_vec(vec![-1.0, -2.0, -3.0])),
        ),
        (
            "panel_weights",
            ParamValue::Matrix(DMatrix::from_row_slice(2, 3, &[9.0, 8.0, 7.0, 6.0, 5.0, 4.0])),
        ),
    ];
    for (name, value) in cases {
        component.set_design_value(name, &value).unwrap();
        assert_eq!(component.design_value(name).unwrap(), value);
    }
}

#[test]
fn mismatched_input_shape_is_a_fatal_error() {
    let (_dir, mut component) = setup(
        &box_model_extended_json(1.0, 1.0, 1.0),
        &box_geometry_json(1.0, 1.0, 1.0),
    );

    let mut inputs = VariableSet::from_specs(component.inputs());
    inputs.set_scalar("sweep_offsets", 0.5);
    let mut outputs = VariableSet::new();
    assert!(matches!(
        component.compute(&inputs, &mut outputs),
        Err(ComputeError::Parameter { .. })
    ));
}

// ── Sensitivities ────────────────────────────────────────────────────────

#[test]
fn analytic_partial_matches_finite_difference() {
    let (_dir, mut component) = box_component();

    let delta = 1e-4;
    let base = evaluate(&mut component, 1.0, 1.0, 1.0);
    let perturbed = evaluate(&mut component, 1.0 + delta, 1.0, 1.0);
    let fd: DVector<f64> = (surf(&perturbed) - surf(&base)) / delta;

    let dsen = component.partial_surface_wrt("dx").unwrap();
    assert_vectors_close(&dsen, &fd, 1e-9);
}

#[test]
fn face_owned_points_carry_sensitivities() {
    let (_dir, mut component) = setup(
        &box_model_json(1.0, 1.0, 1.0),
        &box_geometry_with_face_point_json(1.0, 1.0, 1.0),
    );

    let outputs = evaluate(&mut component, 2.0, 0.5, 3.0);
    let coords = surf(&outputs);
    assert_eq!(coords.len(), 27);
    // the top-face center re-evaluates at (dx/2, dy/2, dz)
    assert_eq!(coords[24], 1.0);
    assert_eq!(coords[25], 0.25);
    assert_eq!(coords[26], 3.0);

    // and moves at half the rate of dx
    let dsen = component.partial_surface_wrt("dx").unwrap();
    assert_eq!(dsen[24], 0.5);
    assert_eq!(dsen[25], 0.0);
}

#[test]
fn jacobian_collects_one_column_per_scalar_parameter() {
    let (_dir, mut component) = box_component();

    let jacobian = component.compute_partials().unwrap();
    assert_eq!(jacobian.wrt, vec!["dx", "dy", "dz"]);
    assert_eq!(jacobian.matrix.nrows(), component.surface_len());
    assert_eq!(jacobian.matrix.ncols(), 3);

    let dx_col = component.partial_surface_wrt("dx").unwrap();
    let first_col = jacobian.matrix.column(0).clone_owned();
    assert_vectors_close(&first_col, &dx_col, 0.0);
}

#[test]
fn non_scalar_partial_is_a_usage_error() {
    let (_dir, mut component) = setup(
        &box_model_extended_json(1.0, 1.0, 1.0),
        &box_geometry_json(1.0, 1.0, 1.0),
    );

    assert!(matches!(
        component.partial_surface_wrt("panel_weights"),
        Err(SensitivityError::NonScalar { .. })
    ));
    assert!(matches!(
        component.compute_partials(),
        Err(SensitivityError::NonScalar { .. })
    ));
}

#[test]
fn partial_element_bounds_are_checked() {
    let (_dir, mut component) = box_component();

    assert!(matches!(
        component.partial_surface_element("dx", 0, 1),
        Err(SensitivityError::InvalidIndex { .. })
    ));
    assert!(matches!(
        component.partial_surface_element("dx", 1, 2),
        Err(SensitivityError::ColOutOfRange { .. })
    ));
    assert!(matches!(
        component.partial_surface_element("missing", 1, 1),
        Err(SensitivityError::UnknownParameter { .. })
    ));
}

#[test]
fn vector_element_partial_is_addressable() {
    let (_dir, mut component) = setup(
        &box_model_extended_json(1.0, 1.0, 1.0),
        &box_geometry_json(1.0, 1.0, 1.0),
    );

    // element-wise access works for non-scalar parameters even though the
    // whole-parameter partial does not; the offsets don't drive the box,
    // so the column is zero.
    let dsen = component.partial_surface_element("sweep_offsets", 1, 2).unwrap();
    assert_eq!(dsen.len(), component.surface_len());
    assert!(dsen.iter().all(|v| *v == 0.0));
}

#[test]
fn setup_from_missing_paths_fails_with_load_error() {
    let missing: PathBuf = PathBuf::from("/nonexistent/box.model.json");
    let err = SurfaceComponent::from_files(&missing, &missing).err().unwrap();
    assert!(matches!(err, SetupError::Load(_)));
}
