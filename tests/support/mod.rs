//! Test support library
//! Shared mesh builders and float helpers for the integration tests.

#![allow(dead_code)]

use meshforge::float_types::Real;
use meshforge::model::{Material, Polygon, Vertex};
use meshforge::ops::{ModelOperation, Triangulate};
use meshforge::Model;
use nalgebra::Point3;

/// Quick float comparison with an explicit tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Axis-aligned cube centered at the origin with the given edge length,
/// built from six outward-wound quads sharing welded corner positions.
pub fn cube(size: Real) -> Model {
    let h = size / 2.0;
    let mut model = Model::new();
    let material = model.add_material(Material::named("default"));

    let corners = [
        Point3::new(-h, -h, -h),
        Point3::new(h, -h, -h),
        Point3::new(h, h, -h),
        Point3::new(-h, h, -h),
        Point3::new(-h, -h, h),
        Point3::new(h, -h, h),
        Point3::new(h, h, h),
        Point3::new(-h, h, h),
    ];
    let vertices: Vec<u32> = corners
        .into_iter()
        .map(|corner| {
            let position = model.add_position(corner);
            model.add_vertex(Vertex::with_position(position))
        })
        .collect();

    let faces: [[usize; 4]; 6] = [
        [0, 3, 2, 1], // bottom, -z
        [4, 5, 6, 7], // top, +z
        [0, 1, 5, 4], // -y
        [2, 3, 7, 6], // +y
        [0, 4, 7, 3], // -x
        [1, 2, 6, 5], // +x
    ];
    for face in faces {
        let loop_: Vec<u32> = face.into_iter().map(|i| vertices[i]).collect();
        model.add_polygon(Polygon::new(material, loop_));
    }

    model
}

/// The cube split into twelve triangles.
pub fn triangulated_cube(size: Real) -> Model {
    let mut model = cube(size);
    Triangulate.apply(&mut model).unwrap();
    model
}

/// Regular icosahedron with the given circumradius: a closed manifold of
/// twenty triangles, every vertex of valence five.
pub fn icosahedron(radius: Real) -> Model {
    let phi = (1.0 + (5.0 as Real).sqrt()) / 2.0;
    let scale = radius / (1.0 + phi * phi).sqrt();

    let mut model = Model::new();
    let material = model.add_material(Material::named("default"));

    let corners = [
        Point3::new(-1.0, phi, 0.0),
        Point3::new(1.0, phi, 0.0),
        Point3::new(-1.0, -phi, 0.0),
        Point3::new(1.0, -phi, 0.0),
        Point3::new(0.0, -1.0, phi),
        Point3::new(0.0, 1.0, phi),
        Point3::new(0.0, -1.0, -phi),
        Point3::new(0.0, 1.0, -phi),
        Point3::new(phi, 0.0, -1.0),
        Point3::new(phi, 0.0, 1.0),
        Point3::new(-phi, 0.0, -1.0),
        Point3::new(-phi, 0.0, 1.0),
    ];
    let vertices: Vec<u32> = corners
        .into_iter()
        .map(|corner| {
            let position = model.add_position(Point3::from(corner.coords * scale));
            model.add_vertex(Vertex::with_position(position))
        })
        .collect();

    let faces: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    for face in faces {
        model.add_polygon(Polygon::triangle(
            material,
            vertices[face[0]],
            vertices[face[1]],
            vertices[face[2]],
        ));
    }

    model
}
