mod support;

use approx::abs_diff_eq;
use meshforge::float_types::Real;
use meshforge::ops::{Boolean, BooleanOperation, MergeModel, ModelOperation};
use meshforge::Model;
use nalgebra::{Matrix4, Vector3};

use crate::support::cube;

const TOLERANCE: Real = 0.02;

fn offset(x: Real, y: Real, z: Real) -> Matrix4<Real> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

fn assert_extents(model: &Model, mins: [Real; 3], maxs: [Real; 3]) {
    let aabb = model.bounding_box();
    for i in 0..3 {
        assert!(
            abs_diff_eq!(aabb.mins[i], mins[i], epsilon = TOLERANCE),
            "min[{i}] = {} expected {}",
            aabb.mins[i],
            mins[i]
        );
        assert!(
            abs_diff_eq!(aabb.maxs[i], maxs[i], epsilon = TOLERANCE),
            "max[{i}] = {} expected {}",
            aabb.maxs[i],
            maxs[i]
        );
    }
}

#[test]
fn union_of_overlapping_cubes() {
    let mut model = Model::new();
    Boolean::new(
        cube(2.0),
        Matrix4::identity(),
        cube(2.0),
        offset(0.5, 0.5, 0.5),
        BooleanOperation::Union,
    )
    .apply(&mut model)
    .unwrap();

    assert!(model.polygon_count() > 0);
    assert_extents(&model, [-1.0, -1.0, -1.0], [1.5, 1.5, 1.5]);
}

#[test]
fn intersection_of_overlapping_cubes() {
    let mut model = Model::new();
    Boolean::new(
        cube(2.0),
        Matrix4::identity(),
        cube(2.0),
        offset(0.5, 0.5, 0.5),
        BooleanOperation::Intersection,
    )
    .apply(&mut model)
    .unwrap();

    assert!(model.polygon_count() > 0);
    assert_extents(&model, [-0.5, -0.5, -0.5], [1.0, 1.0, 1.0]);
}

#[test]
fn difference_of_overlapping_cubes() {
    let mut model = Model::new();
    Boolean::new(
        cube(2.0),
        Matrix4::identity(),
        cube(2.0),
        offset(0.5, 0.5, 0.5),
        BooleanOperation::Difference,
    )
    .apply(&mut model)
    .unwrap();

    // Subtracting a corner overlap leaves the first cube's full extents.
    assert!(model.polygon_count() > 0);
    assert_extents(&model, [-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);
}

#[test]
fn union_of_disjoint_cubes_keeps_both() {
    let mut model = Model::new();
    Boolean::new(
        cube(2.0),
        Matrix4::identity(),
        cube(2.0),
        offset(10.0, 0.0, 0.0),
        BooleanOperation::Union,
    )
    .apply(&mut model)
    .unwrap();

    assert_extents(&model, [-1.0, -1.0, -1.0], [11.0, 1.0, 1.0]);
}

#[test]
fn empty_second_operand_degenerates_to_merge() {
    let mut result = Model::new();
    Boolean::new(
        cube(2.0),
        offset(3.0, 0.0, 0.0),
        Model::new(),
        Matrix4::identity(),
        BooleanOperation::Difference,
    )
    .apply(&mut result)
    .unwrap();

    let mut merged = Model::new();
    MergeModel::new(cube(2.0), offset(3.0, 0.0, 0.0))
        .apply(&mut merged)
        .unwrap();

    assert_eq!(result.polygon_count(), merged.polygon_count());
    assert_extents(&result, [2.0, -1.0, -1.0], [4.0, 1.0, 1.0]);
}

#[test]
fn empty_first_operand() {
    let mut union = Model::new();
    Boolean::new(
        Model::new(),
        Matrix4::identity(),
        cube(2.0),
        Matrix4::identity(),
        BooleanOperation::Union,
    )
    .apply(&mut union)
    .unwrap();
    assert_eq!(union.polygon_count(), 6);

    let mut intersection = Model::new();
    Boolean::new(
        Model::new(),
        Matrix4::identity(),
        cube(2.0),
        Matrix4::identity(),
        BooleanOperation::Intersection,
    )
    .apply(&mut intersection)
    .unwrap();
    assert_eq!(intersection.polygon_count(), 0);
}

#[test]
fn target_model_is_replaced() {
    // Whatever the target held before the operation is discarded.
    let mut model = cube(50.0);
    Boolean::new(
        cube(2.0),
        Matrix4::identity(),
        cube(2.0),
        offset(0.5, 0.5, 0.5),
        BooleanOperation::Intersection,
    )
    .apply(&mut model)
    .unwrap();

    assert_extents(&model, [-0.5, -0.5, -0.5], [1.0, 1.0, 1.0]);
}

#[test]
fn materials_of_both_operands_survive() {
    let mut a = cube(2.0);
    let mut b = cube(2.0);
    let mut model = Model::new();

    // Distinct names so the offsetting is observable.
    a.clear(meshforge::ClearFlags::MATERIALS);
    let red = a.add_material(meshforge::model::Material::named("red"));
    for polygon in a.polygons_mut() {
        polygon.set_material(red);
    }
    b.clear(meshforge::ClearFlags::MATERIALS);
    let blue = b.add_material(meshforge::model::Material::named("blue"));
    for polygon in b.polygons_mut() {
        polygon.set_material(blue);
    }

    Boolean::new(
        a,
        Matrix4::identity(),
        b,
        offset(0.5, 0.5, 0.5),
        BooleanOperation::Union,
    )
    .apply(&mut model)
    .unwrap();

    assert_eq!(model.material_count(), 2);
    assert_eq!(model.material(0).name(), "red");
    assert_eq!(model.material(1).name(), "blue");
    let materials: Vec<u32> = model.polygons().iter().map(|p| p.material()).collect();
    assert!(materials.contains(&0));
    assert!(materials.contains(&1));
}
