mod support;

use meshforge::ops::{MergeCoplanarAdjacents, ModelOperation};

use crate::support::{approx_eq, cube, triangulated_cube};

#[test]
fn triangulated_cube_fuses_back_to_six_faces() {
    let mut model = triangulated_cube(2.0);
    assert_eq!(model.polygon_count(), 12);

    MergeCoplanarAdjacents::default().apply(&mut model).unwrap();

    assert_eq!(model.polygon_count(), 6);
    assert!(model.polygons().iter().all(|p| p.vertex_count() == 4));
}

#[test]
fn merge_preserves_extents() {
    let mut model = triangulated_cube(2.0);
    let before = model.bounding_box();

    MergeCoplanarAdjacents::default().apply(&mut model).unwrap();

    let after = model.bounding_box();
    for i in 0..3 {
        assert!(approx_eq(before.mins[i], after.mins[i], 1e-6));
        assert!(approx_eq(before.maxs[i], after.maxs[i], 1e-6));
    }
}

#[test]
fn quad_faces_are_left_alone() {
    let mut model = cube(2.0);
    MergeCoplanarAdjacents::default().apply(&mut model).unwrap();
    // Faces meet at right angles; nothing qualifies for fusion.
    assert_eq!(model.polygon_count(), 6);
    assert!(model.polygons().iter().all(|p| p.vertex_count() == 4));
}

#[test]
fn materials_split_merge_groups() {
    let mut model = triangulated_cube(2.0);
    // Retag one triangle of a face pair; its partner can no longer fuse
    // with it, so more than six polygons survive.
    let other = model.add_material(meshforge::model::Material::named("other"));
    model.polygon_mut(0).set_material(other);

    MergeCoplanarAdjacents::default().apply(&mut model).unwrap();

    assert!(model.polygon_count() > 6);
    assert!(
        model
            .polygons()
            .iter()
            .any(|p| p.material() == other && p.vertex_count() == 3)
    );
}
