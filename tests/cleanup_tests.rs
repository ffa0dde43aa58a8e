mod support;

use meshforge::float_types::Real;
use meshforge::model::{Polygon, Vertex};
use meshforge::ops::{CleanDegenerate, CleanDuplicates, ModelOperation};
use meshforge::Model;
use nalgebra::Point3;

use crate::support::triangulated_cube;

/// A triangle whose corner positions were added without welding.
fn unwelded_triangle(points: [[Real; 3]; 3]) -> Model {
    let mut model = Model::new();
    let vertices: Vec<u32> = points
        .into_iter()
        .map(|p| {
            let position = model.add_position(Point3::new(p[0], p[1], p[2]));
            model.add_vertex(Vertex::with_position(position))
        })
        .collect();
    model.add_polygon(Polygon::new(0, vertices));
    model
}

#[test]
fn duplicates_collapse_near_positions() {
    let mut model = unwelded_triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    // A second triangle whose corners sit within weld distance of the first.
    let offset = unwelded_triangle([[0.001, 0.0, 0.0], [1.0, 0.001, 0.0], [0.0, 1.0, 0.001]]);
    let polygon = offset.polygon(0).clone();
    let vertices: Vec<u32> = polygon
        .vertices()
        .iter()
        .map(|&v| {
            let position = model.add_position(offset.vertex_position(v));
            model.add_vertex(Vertex::with_position(position))
        })
        .collect();
    model.add_polygon(Polygon::new(0, vertices));

    assert_eq!(model.position_count(), 6);
    CleanDuplicates::default().apply(&mut model).unwrap();

    assert_eq!(model.position_count(), 3);
    assert_eq!(model.vertex_count(), 3);
    // The two triangles became literal duplicates and merged.
    assert_eq!(model.polygon_count(), 1);
}

#[test]
fn duplicates_pass_is_idempotent() {
    let mut model = triangulated_cube(2.0);
    CleanDuplicates::default().apply(&mut model).unwrap();
    let positions = model.position_count();
    let vertices = model.vertex_count();
    let polygons = model.polygon_count();

    CleanDuplicates::default().apply(&mut model).unwrap();
    assert_eq!(model.position_count(), positions);
    assert_eq!(model.vertex_count(), vertices);
    assert_eq!(model.polygon_count(), polygons);
}

#[test]
fn duplicates_drop_unreferenced_attributes() {
    let mut model = triangulated_cube(2.0);
    // An orphaned position no polygon references.
    model.add_position(Point3::new(100.0, 100.0, 100.0));
    CleanDuplicates::default().apply(&mut model).unwrap();
    assert_eq!(model.position_count(), 8);
}

#[test]
fn degenerate_repeated_corner_is_removed() {
    let mut model = Model::new();
    let positions: Vec<u32> = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]
    .into_iter()
    .map(|p| model.add_position(p))
    .collect();
    let vertices: Vec<u32> = positions
        .iter()
        .map(|&p| model.add_vertex(Vertex::with_position(p)))
        .collect();
    // Distinct vertex records referencing the same position count as a repeat.
    let stutter = model.add_vertex(Vertex::with_position(positions[1]));
    model.add_polygon(Polygon::new(
        0,
        vec![vertices[0], vertices[1], stutter, vertices[2], vertices[3]],
    ));

    CleanDegenerate.apply(&mut model).unwrap();

    assert_eq!(model.polygon_count(), 1);
    assert_eq!(model.polygon(0).vertex_count(), 4);
}

#[test]
fn degenerate_wrapping_repeat_is_trimmed() {
    let mut model = unwelded_triangle([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    // Append a vertex on the same position as the loop head.
    let head_position = model.vertex(model.polygon(0).vertex(0)).position();
    let tail = model.add_vertex(Vertex::with_position(head_position));
    model.polygon_mut(0).add_vertex(tail);

    CleanDegenerate.apply(&mut model).unwrap();
    assert_eq!(model.polygon(0).vertex_count(), 3);
}

#[test]
fn degenerate_thin_polygons_are_dropped() {
    // A "triangle" with only two distinct positions collapses to a sliver.
    let mut model = Model::new();
    let p0 = model.add_position(Point3::new(0.0, 0.0, 0.0));
    let p1 = model.add_position(Point3::new(1.0, 0.0, 0.0));
    let v0 = model.add_vertex(Vertex::with_position(p0));
    let v1 = model.add_vertex(Vertex::with_position(p1));
    let v2 = model.add_vertex(Vertex::with_position(p1));
    model.add_polygon(Polygon::new(0, vec![v0, v1, v2]));

    CleanDegenerate.apply(&mut model).unwrap();
    assert_eq!(model.polygon_count(), 0);
}

#[test]
fn degenerate_pass_keeps_healthy_mesh() {
    let mut model = triangulated_cube(2.0);
    CleanDegenerate.apply(&mut model).unwrap();
    assert_eq!(model.polygon_count(), 12);
}
