//! Progressive decimation driven by a volumetric error metric.
//!
//! Loosely based on the tetrahedron-volume error heuristic from
//! <http://www.jofcis.com/publishedpapers/2013_9_11_4271_4279.pdf>

use crate::errors::MeshError;
use crate::float_types::{EPSILON, Real};
use crate::model::{EdgeMode, INVALID_INDEX, Model, ModelAdjacency};
use crate::ops::{CleanDuplicates, ModelOperation, Triangulate};
use nalgebra::{Point2, Point3, Vector3};

use crate::plane::Plane;

/// Decimate a triangulated model down to `target` (a polygon-count ratio in
/// `(0, 1]`) by repeatedly collapsing the triangle with the smallest
/// volumetric error into a single join point.
///
/// Boundary triangles and triangles in low-valence regions get an infinite
/// error and are never collapsed, preserving mesh borders. The model is
/// triangulated first; orphaned attributes are swept up afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Reduce {
    target: Real,
}

impl Reduce {
    pub fn new(target: Real) -> Self {
        Reduce { target }
    }
}

/// Volume of the tetrahedron spanned by triangle `abc` and apex `tip`.
fn tetrahedron_volume(
    a: Point3<Real>,
    b: Point3<Real>,
    c: Point3<Real>,
    tip: Point3<Real>,
) -> Real {
    let area = (a - b).cross(&(c - b)).norm() / 2.0;
    match Plane::from_points(a, b, c) {
        Some(plane) => ((1.0 / 3.0) * area * plane.signed_distance(&tip)).abs(),
        None => 0.0,
    }
}

fn triangle_normal(model: &Model, triangle: u32) -> Option<Vector3<Real>> {
    let polygon = model.polygon(triangle);
    if polygon.vertex_count() < 3 {
        return None;
    }
    let p0 = model.vertex_position(polygon.vertex(0));
    let p1 = model.vertex_position(polygon.vertex(1));
    let p2 = model.vertex_position(polygon.vertex(2));
    let normal = (p2 - p0).cross(&(p1 - p0));
    if normal.norm_squared() < EPSILON * EPSILON {
        return None;
    }
    Some(normal.normalize())
}

fn triangle_mid_point(model: &Model, triangle: u32) -> Point3<Real> {
    let polygon = model.polygon(triangle);
    let mut mid = Vector3::zeros();
    for i in 0..3 {
        mid += model.vertex_position(polygon.vertex(i)).coords;
    }
    Point3::from(mid / 3.0)
}

fn triangle_mid_tex_coord(model: &Model, triangle: u32) -> Option<Point2<Real>> {
    let polygon = model.polygon(triangle);
    let mut mid = nalgebra::Vector2::zeros();
    for i in 0..3 {
        let tex_coord = model.vertex(polygon.vertex(i)).tex_coord(0);
        if tex_coord == INVALID_INDEX {
            return None;
        }
        mid += model.tex_coord(tex_coord).coords;
    }
    Some(Point2::from(mid / 3.0))
}

/// Predict where the triangle's neighborhood "points": per edge, intersect
/// the edge with the plane through the midpoint spanned by the face normal
/// and the midpoint difference to the edge neighbor, then extrapolate past
/// the pivot. Averages valid contributions, falls back to the midpoint.
fn triangle_tip_point(model: &Model, adjacency: &ModelAdjacency, triangle: u32) -> Point3<Real> {
    let mid_point = triangle_mid_point(model, triangle);
    let Some(normal) = triangle_normal(model, triangle) else {
        return mid_point;
    };

    let mut tip = Vector3::zeros();
    let mut count = 0;

    for j in 0..3 {
        let shares = adjacency.shared_edges_of(triangle, j);
        let Some(&share) = shares.first() else {
            continue;
        };
        let shared_mid = triangle_mid_point(model, adjacency.polygon(share));
        let diff = mid_point - shared_mid;

        let polygon = model.polygon(triangle);
        let p0 = model.vertex_position(polygon.vertex(j));
        let p1 = model.vertex_position(polygon.vertex((j + 1) % 3));
        let edge = p1 - p0;
        if edge.norm_squared() < EPSILON * EPSILON {
            continue;
        }

        let pivot_normal = normal.cross(&diff);
        if pivot_normal.norm_squared() < EPSILON * EPSILON {
            continue;
        }
        let pivot_plane = Plane::new(pivot_normal.normalize(), mid_point);
        let Some((_, pivot)) = pivot_plane.ray_intersection(&p0, &edge.normalize()) else {
            continue;
        };

        let v = pivot - shared_mid;
        if v.norm_squared() < EPSILON * EPSILON {
            continue;
        }
        let v = v.normalize();

        let to_mid = mid_point - pivot;
        let length = to_mid.norm();
        if length < EPSILON {
            continue;
        }
        let kd = (to_mid / length).dot(&v);
        if kd <= EPSILON {
            continue;
        }

        tip += (pivot + v * (length / kd)).coords;
        count += 1;
    }

    if count > 0 {
        Point3::from(tip / count as Real)
    } else {
        mid_point
    }
}

/// First edge-sharing triangle across each of the triangle's edges.
fn triangle_edge_neighbors(adjacency: &ModelAdjacency, triangle: u32) -> Vec<u32> {
    let mut neighbors = Vec::with_capacity(3);
    for j in 0..3 {
        if let Some(&share) = adjacency.shared_edges_of(triangle, j).first() {
            neighbors.push(adjacency.polygon(share));
        }
    }
    neighbors
}

/// Triangles sharing exactly one welded position with `triangle` (and no
/// edge), paired with the sharing vertex id.
fn triangle_single_vertex_neighbors(model: &Model, triangle: u32) -> Vec<(u32, u32)> {
    let polygon = model.polygon(triangle);
    if polygon.vertex_count() < 3 {
        return Vec::new();
    }
    let positions = [
        model.vertex(polygon.vertex(0)).position(),
        model.vertex(polygon.vertex(1)).position(),
        model.vertex(polygon.vertex(2)).position(),
    ];

    let mut neighbors = Vec::new();
    for other in 0..model.polygon_count() {
        if other == triangle {
            continue;
        }
        let candidate = model.polygon(other);
        if candidate.vertex_count() != 3 {
            continue;
        }

        let mut sharing = 0;
        let mut sharing_vertex = 0;
        for &vertex in candidate.vertices() {
            if positions.contains(&model.vertex(vertex).position()) {
                sharing += 1;
                sharing_vertex = vertex;
            }
        }
        if sharing == 1 {
            neighbors.push((other, sharing_vertex));
        }
    }
    neighbors
}

/// Summed tetrahedron volume between the predicted tip point and the
/// triangle, its edge neighbors and its single-vertex neighbors. Boundary
/// triangles and triangles with fewer than three single-vertex neighbors
/// are pinned at infinity so they are never collapsed.
fn triangle_volume_error(model: &Model, adjacency: &ModelAdjacency, triangle: u32) -> Real {
    let polygon = model.polygon(triangle);
    if polygon.vertex_count() < 3 {
        return Real::INFINITY;
    }

    let tip = triangle_tip_point(model, adjacency, triangle);
    let mut error = tetrahedron_volume(
        model.vertex_position(polygon.vertex(0)),
        model.vertex_position(polygon.vertex(1)),
        model.vertex_position(polygon.vertex(2)),
        tip,
    );

    for j in 0..3 {
        let shares = adjacency.shared_edges_of(triangle, j);
        let Some(&share) = shares.first() else {
            return Real::INFINITY;
        };
        let shared = model.polygon(adjacency.polygon(share));
        error += tetrahedron_volume(
            model.vertex_position(shared.vertex(0)),
            model.vertex_position(shared.vertex(1)),
            model.vertex_position(shared.vertex(2)),
            tip,
        );
    }

    let neighbors = triangle_single_vertex_neighbors(model, triangle);
    if neighbors.len() < 3 {
        return Real::INFINITY;
    }
    for &(neighbor, _) in &neighbors {
        let shared = model.polygon(neighbor);
        error += tetrahedron_volume(
            model.vertex_position(shared.vertex(0)),
            model.vertex_position(shared.vertex(1)),
            model.vertex_position(shared.vertex(2)),
            tip,
        );
    }

    error
}

impl ModelOperation for Reduce {
    fn apply(&self, model: &mut Model) -> Result<(), MeshError> {
        if !(self.target > 0.0 && self.target <= 1.0) {
            return Err(MeshError::InvalidTarget(self.target));
        }

        Triangulate.apply(model)?;

        let mut adjacency = ModelAdjacency::new(model, EdgeMode::ByPosition);
        let mut errors: Vec<Real> = (0..model.polygon_count())
            .map(|triangle| triangle_volume_error(model, &adjacency, triangle))
            .collect();

        let target_count = (model.polygon_count() as Real * self.target + 0.5) as i64;
        let mut current_count = model.polygon_count() as i64;

        while current_count > target_count {
            // Smallest finite error wins; ties go to the first found.
            let mut min_triangle = None;
            let mut min_error = Real::INFINITY;
            for (triangle, &error) in errors.iter().enumerate() {
                if error < min_error {
                    min_triangle = Some(triangle as u32);
                    min_error = error;
                }
            }
            let Some(min_triangle) = min_triangle else {
                break;
            };

            let tip = triangle_tip_point(model, &adjacency, min_triangle);
            let mid = triangle_mid_point(model, min_triangle);
            let join_point = Point3::from(tip.coords.lerp(&mid.coords, 0.6));
            let join_tex_coord = triangle_mid_tex_coord(model, min_triangle);

            let single_neighbors = triangle_single_vertex_neighbors(model, min_triangle);

            // Discard the triangle and its edge-sharing neighbors.
            for j in 0..3 {
                let shares = adjacency.shared_edges_of(min_triangle, j);
                if shares.len() != 1 {
                    continue;
                }
                let shared = adjacency.polygon(shares[0]);
                model.polygon_mut(shared).clear_vertices();
                errors[shared as usize] = Real::INFINITY;
                adjacency.remove(shared, true);
                current_count -= 1;
            }
            model.polygon_mut(min_triangle).clear_vertices();
            errors[min_triangle as usize] = Real::INFINITY;
            adjacency.remove(min_triangle, true);
            current_count -= 1;

            let join_position = model.add_unique_position(join_point);
            let join_tex = join_tex_coord.map(|tc| model.add_unique_tex_coord(tc));

            // Pull every single-vertex neighbor's sharing vertex onto the
            // join point and recompute errors in the affected neighborhood.
            for &(neighbor, vertex_id) in &single_neighbors {
                if model.polygon(neighbor).vertex_count() < 3 {
                    continue;
                }

                let mut vertex = model.vertex(vertex_id).clone();
                vertex.set_position(join_position);
                if let Some(tex) = join_tex {
                    vertex.set_tex_coord(0, tex);
                }
                model.set_vertex(vertex_id, vertex);

                // The move can collapse the neighbor onto an existing corner.
                let polygon = model.polygon(neighbor);
                let degenerate = (0..3).any(|i| {
                    model.vertex(polygon.vertex(i)).position()
                        == model.vertex(polygon.vertex((i + 1) % 3)).position()
                });
                if degenerate {
                    model.polygon_mut(neighbor).clear_vertices();
                    errors[neighbor as usize] = Real::INFINITY;
                    adjacency.remove(neighbor, true);
                    current_count -= 1;
                    continue;
                }

                adjacency.update(model, neighbor);
                errors[neighbor as usize] = triangle_volume_error(model, &adjacency, neighbor);
                for edge_neighbor in triangle_edge_neighbors(&adjacency, neighbor) {
                    errors[edge_neighbor as usize] =
                        triangle_volume_error(model, &adjacency, edge_neighbor);
                }
                for (vertex_neighbor, _) in triangle_single_vertex_neighbors(model, neighbor) {
                    errors[vertex_neighbor as usize] =
                        triangle_volume_error(model, &adjacency, vertex_neighbor);
                }
            }
        }

        model.retain_polygons(|polygon| polygon.vertex_count() > 0);
        CleanDuplicates::default().apply(model)
    }
}
