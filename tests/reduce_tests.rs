mod support;

use meshforge::model::EdgeMode;
use meshforge::ops::{ModelOperation, Reduce};
use meshforge::{MeshError, ModelAdjacency};

use crate::support::{icosahedron, triangulated_cube};

#[test]
fn target_outside_unit_interval_is_rejected() {
    let mut model = icosahedron(1.0);
    assert_eq!(
        Reduce::new(0.0).apply(&mut model),
        Err(MeshError::InvalidTarget(0.0))
    );
    assert_eq!(
        Reduce::new(1.5).apply(&mut model),
        Err(MeshError::InvalidTarget(1.5))
    );
    assert!(Reduce::new(-0.25).apply(&mut model).is_err());
}

#[test]
fn full_target_keeps_the_mesh() {
    let mut model = triangulated_cube(2.0);
    Reduce::new(1.0).apply(&mut model).unwrap();
    assert_eq!(model.polygon_count(), 12);
}

#[test]
fn quads_are_triangulated_before_decimation() {
    let mut model = crate::support::cube(2.0);
    Reduce::new(1.0).apply(&mut model).unwrap();
    assert_eq!(model.polygon_count(), 12);
    assert!(model.polygons().iter().all(|p| p.vertex_count() == 3));
}

#[test]
fn icosahedron_halves_towards_target() {
    let mut model = icosahedron(1.0);
    Reduce::new(0.5).apply(&mut model).unwrap();

    // The target bound holds and only triangles remain.
    assert!(model.polygon_count() <= 10);
    assert!(model.polygon_count() > 0);
    assert!(model.polygons().iter().all(|p| p.vertex_count() == 3));

    // Collapsing a closed manifold must not open it up or fan edges.
    let adjacency = ModelAdjacency::new(&model, EdgeMode::ByPosition);
    for edge in adjacency.edge_ids() {
        assert_eq!(adjacency.shared_edge_count(edge), 1);
    }
}

#[test]
fn decimated_mesh_stays_consistent() {
    let mut model = icosahedron(1.0);
    Reduce::new(0.5).apply(&mut model).unwrap();

    // No polygon references a vertex or position past its table.
    for polygon in model.polygons() {
        for &vertex in polygon.vertices() {
            assert!(vertex < model.vertex_count());
            let position = model.vertex(vertex).position();
            assert!(position < model.position_count());
        }
    }

    // Share lists of the result still mirror each other.
    let adjacency = ModelAdjacency::new(&model, EdgeMode::ByPosition);
    for edge in adjacency.edge_ids() {
        for &share in adjacency.shared_edges(edge) {
            assert!(adjacency.shared_edges(share).contains(&edge));
        }
    }
}

#[test]
fn open_mesh_is_left_untouched() {
    // A lone quad has only boundary edges; every triangle error is pinned
    // at infinity and nothing collapses.
    let mut model = meshforge::Model::new();
    let vertices: Vec<u32> = [
        nalgebra::Point3::new(0.0, 0.0, 0.0),
        nalgebra::Point3::new(1.0, 0.0, 0.0),
        nalgebra::Point3::new(1.0, 1.0, 0.0),
        nalgebra::Point3::new(0.0, 1.0, 0.0),
    ]
    .into_iter()
    .map(|p| {
        let position = model.add_position(p);
        model.add_vertex(meshforge::Vertex::with_position(position))
    })
    .collect();
    model.add_polygon(meshforge::Polygon::new(0, vertices));

    Reduce::new(0.5).apply(&mut model).unwrap();
    assert_eq!(model.polygon_count(), 2);
}
