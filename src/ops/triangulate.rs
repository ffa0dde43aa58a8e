//! Fan triangulation.

use crate::errors::MeshError;
use crate::model::{Model, Polygon};
use crate::ops::ModelOperation;

/// Split every polygon with more than three vertices into a triangle fan
/// around its first vertex, carrying material and cached normal. Polygons
/// with fewer than three vertices are dropped.
///
/// Convex polygons only; the decimation path runs this before collapsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Triangulate;

impl ModelOperation for Triangulate {
    fn apply(&self, model: &mut Model) -> Result<(), MeshError> {
        let source = model.polygons().to_vec();
        let mut triangles = Vec::with_capacity(source.len());
        for polygon in source {
            let count = polygon.vertex_count();
            match count {
                0..3 => {},
                3 => triangles.push(polygon),
                _ => {
                    for i in 1..count - 1 {
                        let mut triangle = Polygon::triangle(
                            polygon.material(),
                            polygon.vertex(0),
                            polygon.vertex(i),
                            polygon.vertex(i + 1),
                        );
                        triangle.set_normal(polygon.normal());
                        triangles.push(triangle);
                    }
                },
            }
        }
        model.set_polygons(triangles);
        Ok(())
    }
}
