//! BSP trees over free-standing polygons, the engine behind [`Boolean`].
//!
//! [`Boolean`]: crate::ops::Boolean

use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{EPSILON, Real};
use crate::plane::{BACK, COPLANAR, FRONT, Plane, SPANNING};
use nalgebra::{Point2, Point3, Vector3};

/// A polygon corner with the attributes that survive plane splitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspVertex {
    pub position: Point3<Real>,
    pub normal: Vector3<Real>,
    pub uv: Point2<Real>,
}

impl BspVertex {
    pub fn new(position: Point3<Real>, normal: Vector3<Real>, uv: Point2<Real>) -> Self {
        BspVertex {
            position,
            normal,
            uv,
        }
    }

    /// Linearly interpolate all attributes towards `other` at parameter `t`.
    pub fn interpolate(&self, other: &BspVertex, t: Real) -> BspVertex {
        BspVertex {
            position: Point3::from(self.position.coords.lerp(&other.position.coords, t)),
            normal: self.normal.lerp(&other.normal, t),
            uv: Point2::from(self.uv.coords.lerp(&other.uv.coords, t)),
        }
    }

    /// Flip the vertex normal.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }
}

/// A free-standing polygon carrying its own plane and a material tag.
#[derive(Debug, Clone)]
pub struct BspPolygon {
    pub vertices: Vec<BspVertex>,
    pub plane: Plane,
    pub material: u32,
}

impl BspPolygon {
    /// Build a polygon from at least three vertices, deriving the plane by
    /// Newell's method. Returns `None` when the loop spans no plane.
    pub fn new(vertices: Vec<BspVertex>, material: u32) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let mut normal = Vector3::zeros();
        for i in 0..vertices.len() {
            let p0 = vertices[i].position;
            let p1 = vertices[(i + 1) % vertices.len()].position;
            normal.x += (p0.y - p1.y) * (p0.z + p1.z);
            normal.y += (p0.z - p1.z) * (p0.x + p1.x);
            normal.z += (p0.x - p1.x) * (p0.y + p1.y);
        }
        if normal.norm_squared() < EPSILON * EPSILON {
            return None;
        }
        let plane = Plane::new(normal.normalize(), vertices[0].position);
        Some(BspPolygon {
            vertices,
            plane,
            material,
        })
    }

    /// Reverse winding and flip every normal.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for vertex in &mut self.vertices {
            vertex.flip();
        }
        self.plane.flip();
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::new_invalid();
        for vertex in &self.vertices {
            aabb.take_point(vertex.position);
        }
        aabb
    }
}

impl Plane {
    /// Which side of `self` another plane faces.
    fn orient_plane(&self, other: &Plane) -> i8 {
        if self.normal.dot(&other.normal) > 0.0 {
            FRONT
        } else {
            BACK
        }
    }

    /// Split `polygon` by this plane into four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`. Split pieces inherit
    /// the parent's plane and material.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &BspPolygon,
    ) -> (
        Vec<BspPolygon>,
        Vec<BspPolygon>,
        Vec<BspPolygon>,
        Vec<BspPolygon>,
    ) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|vertex| self.orient_point(&vertex.position))
            .collect();
        let polygon_type = types.iter().fold(0, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.orient_plane(&polygon.plane) == FRONT {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),

            // True spanning, do the split.
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.position - vertex_i.position));
                        if denom.abs() > EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.position.coords)) / denom;
                            let vertex_new = vertex_i.interpolate(vertex_j, t);
                            split_front.push(vertex_new);
                            split_back.push(vertex_new);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(BspPolygon {
                        vertices: split_front,
                        plane: polygon.plane,
                        material: polygon.material,
                    });
                }
                if split_back.len() >= 3 {
                    back.push(BspPolygon {
                        vertices: split_back,
                        plane: polygon.plane,
                        material: polygon.material,
                    });
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}

const SPAN_WEIGHT: Real = 8.0;
const BALANCE_WEIGHT: Real = 1.0;

/// Pick a splitting plane from a sample of the polygons, scoring each
/// candidate by the spans it causes and the front/back imbalance it leaves.
fn pick_best_splitting_plane(polygons: &[BspPolygon]) -> Plane {
    let mut best_plane = polygons[0].plane;
    let mut best_score = Real::MAX;

    let sample_size = polygons.len().min(20);
    for candidate in polygons.iter().take(sample_size) {
        let plane = &candidate.plane;

        let mut num_front = 0i64;
        let mut num_back = 0i64;
        let mut num_spanning = 0i64;
        for polygon in polygons {
            let polygon_type = polygon
                .vertices
                .iter()
                .fold(0, |acc, vertex| acc | plane.orient_point(&vertex.position));
            match polygon_type {
                FRONT => num_front += 1,
                BACK => num_back += 1,
                SPANNING => num_spanning += 1,
                _ => {},
            }
        }

        let score = SPAN_WEIGHT * num_spanning as Real
            + BALANCE_WEIGHT * ((num_front - num_back) as Real).abs();
        if score < best_score {
            best_score = score;
            best_plane = *plane;
        }
    }

    best_plane
}

/// A BSP tree node holding the polygons coplanar with its splitting plane.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub plane: Option<Plane>,
    pub front: Option<Box<Node>>,
    pub back: Option<Box<Node>>,
    pub polygons: Vec<BspPolygon>,
}

impl Node {
    pub fn new() -> Self {
        Node::default()
    }

    pub fn from_polygons(polygons: &[BspPolygon]) -> Self {
        let mut node = Node::new();
        node.build(polygons);
        node
    }

    /// Convert solid space to empty space and vice versa.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            for polygon in &mut current.polygons {
                polygon.flip();
            }
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }
            std::mem::swap(&mut current.front, &mut current.back);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    /// Return `polygons` with the parts inside this tree's solid removed.
    pub fn clip_polygons(&self, polygons: &[BspPolygon]) -> Vec<BspPolygon> {
        let Some(plane) = &self.plane else {
            return polygons.to_vec();
        };

        let mut front_polys = Vec::with_capacity(polygons.len());
        let mut back_polys = Vec::with_capacity(polygons.len());

        for polygon in polygons {
            let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                plane.split_polygon(polygon);

            for coplanar in coplanar_front.into_iter().chain(coplanar_back) {
                if plane.orient_plane(&coplanar.plane) == FRONT {
                    front_parts.push(coplanar);
                } else {
                    back_parts.push(coplanar);
                }
            }

            front_polys.append(&mut front_parts);
            back_polys.append(&mut back_parts);
        }

        let mut result = match &self.front {
            Some(front) => front.clip_polygons(&front_polys),
            // No front child: front space is empty space, keep the polygons.
            None => front_polys,
        };
        if let Some(back) = &self.back {
            result.extend(back.clip_polygons(&back_polys));
        }
        // No back child: back space is solid, the polygons are discarded.

        result
    }

    /// Remove the parts of this tree's polygons that lie inside `bsp`.
    pub fn clip_to(&mut self, bsp: &Node) {
        self.polygons = bsp.clip_polygons(&self.polygons);
        if let Some(ref mut front) = self.front {
            front.clip_to(bsp);
        }
        if let Some(ref mut back) = self.back {
            back.clip_to(bsp);
        }
    }

    /// Collect every polygon stored in the tree.
    pub fn all_polygons(&self) -> Vec<BspPolygon> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);
            stack.extend(
                [&current.front, &current.back]
                    .iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        result
    }

    /// Insert `polygons`, extending the tree where needed.
    pub fn build(&mut self, polygons: &[BspPolygon]) {
        if polygons.is_empty() {
            return;
        }

        // (node, polygons still to place under it)
        let mut stack: Vec<(&mut Node, Vec<BspPolygon>)> = vec![(self, polygons.to_vec())];

        while let Some((node, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }

            if node.plane.is_none() {
                node.plane = Some(pick_best_splitting_plane(&polygons));
            }
            let plane = node.plane.unwrap_or(polygons[0].plane);

            let mut front = Vec::with_capacity(polygons.len() / 2);
            let mut back = Vec::with_capacity(polygons.len() / 2);

            for polygon in &polygons {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);
                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.append(&mut front_parts);
                back.append(&mut back_parts);
            }

            if !front.is_empty() {
                let child = node.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((child.as_mut(), front));
            }
            if !back.is_empty() {
                let child = node.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((child.as_mut(), back));
            }
        }
    }
}
