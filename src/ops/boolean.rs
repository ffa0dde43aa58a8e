//! Boolean set operations between two models.

use crate::errors::MeshError;
use crate::float_types::parry3d::bounding_volume::{Aabb, BoundingVolume};
use crate::float_types::{EPSILON, Real};
use crate::model::{ClearFlags, INVALID_INDEX, Model, Polygon, Vertex};
use crate::ops::bsp::{BspPolygon, BspVertex, Node};
use crate::ops::{MergeModel, ModelOperation};
use nalgebra::{Matrix4, Point2};

/// The set operation performed by [`Boolean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperation {
    Union,
    Intersection,
    Difference,
}

/// Combine two transformed models with a CSG set operation, replacing the
/// target model with the result.
///
/// Both operands are converted to free-standing BSP polygons; the result is
/// welded back into indexed form, so coincident boundaries produced by the
/// clipping share positions. Operand materials are carried through, with the
/// second operand's material indices offset past the first's.
#[derive(Debug, Clone)]
pub struct Boolean {
    model_a: Model,
    transform_a: Matrix4<Real>,
    model_b: Model,
    transform_b: Matrix4<Real>,
    operation: BooleanOperation,
}

impl Boolean {
    pub fn new(
        model_a: Model,
        transform_a: Matrix4<Real>,
        model_b: Model,
        transform_b: Matrix4<Real>,
        operation: BooleanOperation,
    ) -> Self {
        Boolean {
            model_a,
            transform_a,
            model_b,
            transform_b,
            operation,
        }
    }
}

/// Convert an operand's polygons to free-standing BSP polygons under a
/// transform. Polygons spanning no plane are logged and skipped.
fn to_bsp_polygons(
    model: &Model,
    transform: &Matrix4<Real>,
    material_offset: u32,
) -> Vec<BspPolygon> {
    let normals = crate::ops::merge_model::normal_matrix(transform);
    let mut polygons = Vec::with_capacity(model.polygon_count() as usize);

    for (id, polygon) in model.polygons().iter().enumerate() {
        if polygon.vertex_count() < 3 {
            continue;
        }

        let mut vertices = Vec::with_capacity(polygon.vertex_count() as usize);
        for &vertex_id in polygon.vertices() {
            let vertex = model.vertex(vertex_id);
            let position = transform.transform_point(&model.position(vertex.position()));

            let mut normal = nalgebra::Vector3::zeros();
            if vertex.normal() != INVALID_INDEX {
                let transformed = normals * model.normal(vertex.normal());
                if transformed.norm_squared() > EPSILON * EPSILON {
                    normal = transformed.normalize();
                }
            }

            let uv = if vertex.tex_coord(0) != INVALID_INDEX {
                model.tex_coord(vertex.tex_coord(0))
            } else {
                Point2::origin()
            };

            vertices.push(BspVertex::new(position, normal, uv));
        }

        let material = if polygon.material() != INVALID_INDEX {
            polygon.material() + material_offset
        } else {
            INVALID_INDEX
        };

        match BspPolygon::new(vertices, material) {
            Some(bsp_polygon) => polygons.push(bsp_polygon),
            None => log::warn!("skipping degenerate polygon {id}, no plane"),
        }
    }

    polygons
}

/// Split the operand polygons into the pairs whose bounding boxes overlap
/// the other operand and the remainder that cannot interact with it.
fn partition_polys(
    polys1: &[BspPolygon],
    polys2: &[BspPolygon],
) -> (
    Vec<BspPolygon>,
    Vec<BspPolygon>,
    Vec<BspPolygon>,
    Vec<BspPolygon>,
) {
    let mut aabb2 = Aabb::new_invalid();
    for polygon in polys2 {
        aabb2.merge(&polygon.bounding_box());
    }
    let mut aabb1 = Aabb::new_invalid();
    for polygon in polys1 {
        aabb1.merge(&polygon.bounding_box());
    }

    let mut inter1 = Vec::new();
    let mut outside1 = Vec::new();
    for polygon in polys1 {
        if polygon.bounding_box().intersects(&aabb2) {
            inter1.push(polygon.clone());
        } else {
            outside1.push(polygon.clone());
        }
    }

    let mut inter2 = Vec::new();
    let mut outside2 = Vec::new();
    for polygon in polys2 {
        if polygon.bounding_box().intersects(&aabb1) {
            inter2.push(polygon.clone());
        } else {
            outside2.push(polygon.clone());
        }
    }

    (inter1, outside1, inter2, outside2)
}

fn union(polys_a: &[BspPolygon], polys_b: &[BspPolygon]) -> Vec<BspPolygon> {
    // Only polygons whose bounds overlap the other operand go through the
    // BSP clip; the rest pass straight into the result.
    let (a_clip, a_noclip, b_clip, b_noclip) = partition_polys(polys_a, polys_b);

    let mut a = Node::from_polygons(&a_clip);
    let mut b = Node::from_polygons(&b_clip);

    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(&b.all_polygons());

    let mut result = a.all_polygons();
    result.extend(a_noclip);
    result.extend(b_noclip);
    result
}

fn difference(polys_a: &[BspPolygon], polys_b: &[BspPolygon]) -> Vec<BspPolygon> {
    // Polygons of A away from B survive unclipped; B polygons away from A
    // cannot bound the subtracted region and are dropped.
    let (a_clip, a_noclip, b_clip, _b_noclip) = partition_polys(polys_a, polys_b);

    let mut a = Node::from_polygons(&a_clip);
    let mut b = Node::from_polygons(&b_clip);

    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(&b.all_polygons());
    a.invert();

    let mut result = a.all_polygons();
    result.extend(a_noclip);
    result
}

fn intersection(polys_a: &[BspPolygon], polys_b: &[BspPolygon]) -> Vec<BspPolygon> {
    // Polygons clear of the other operand's bounds cannot contribute.
    let (a_clip, _a_outside, b_clip, _b_outside) = partition_polys(polys_a, polys_b);

    let mut a = Node::from_polygons(&a_clip);
    let mut b = Node::from_polygons(&b_clip);

    a.invert();
    b.clip_to(&a);
    b.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    a.build(&b.all_polygons());
    a.invert();

    a.all_polygons()
}

/// Weld the clipped polygons back into indexed form.
fn extract(model: &mut Model, polygons: Vec<BspPolygon>) {
    for bsp_polygon in polygons {
        let mut polygon = Polygon::new(bsp_polygon.material, Vec::new());

        let face_normal = model.add_unique_normal(bsp_polygon.plane.normal);
        polygon.set_normal(face_normal);

        for bsp_vertex in &bsp_polygon.vertices {
            let mut vertex = Vertex::default();
            vertex.set_position(model.add_unique_position(bsp_vertex.position));

            if bsp_vertex.normal.norm_squared() > EPSILON * EPSILON {
                // Splitting interpolates normals; keep them on the side of
                // the face they came in on.
                let normal = if bsp_vertex.normal.dot(&bsp_polygon.plane.normal) < 0.0 {
                    -bsp_vertex.normal
                } else {
                    bsp_vertex.normal
                };
                vertex.set_normal(model.add_unique_normal(normal.normalize()));
            }
            vertex.set_tex_coord(0, model.add_unique_tex_coord(bsp_vertex.uv));

            polygon.add_vertex(model.add_unique_vertex(vertex));
        }

        model.add_polygon(polygon);
    }
}

impl ModelOperation for Boolean {
    fn apply(&self, model: &mut Model) -> Result<(), MeshError> {
        model.clear(ClearFlags::ALL);

        // An empty operand degenerates to a plain transformed merge.
        if self.model_b.polygon_count() == 0 {
            return MergeModel::new(self.model_a.clone(), self.transform_a).apply(model);
        }
        if self.model_a.polygon_count() == 0 {
            return match self.operation {
                BooleanOperation::Union => {
                    MergeModel::new(self.model_b.clone(), self.transform_b).apply(model)
                },
                BooleanOperation::Intersection | BooleanOperation::Difference => Ok(()),
            };
        }

        for material in self.model_a.materials() {
            model.add_material(material.clone());
        }
        let material_offset = model.material_count();
        for material in self.model_b.materials() {
            model.add_material(material.clone());
        }
        for channel in self
            .model_a
            .tex_coord_channels()
            .iter()
            .chain(self.model_b.tex_coord_channels())
        {
            model.add_unique_tex_coord_channel(channel);
        }

        let polys_a = to_bsp_polygons(&self.model_a, &self.transform_a, 0);
        if polys_a.is_empty() {
            return Err(MeshError::NoValidPolygons("first"));
        }
        let polys_b = to_bsp_polygons(&self.model_b, &self.transform_b, material_offset);
        if polys_b.is_empty() {
            return Err(MeshError::NoValidPolygons("second"));
        }

        let result = match self.operation {
            BooleanOperation::Union => union(&polys_a, &polys_b),
            BooleanOperation::Difference => difference(&polys_a, &polys_b),
            BooleanOperation::Intersection => intersection(&polys_a, &polys_b),
        };

        extract(model, result);
        Ok(())
    }
}
