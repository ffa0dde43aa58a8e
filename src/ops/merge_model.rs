//! Model-into-model merging.

use crate::errors::MeshError;
use crate::float_types::{EPSILON, Real};
use crate::model::{INVALID_INDEX, Model, Polygon, Vertex};
use crate::ops::ModelOperation;
use nalgebra::{Matrix3, Matrix4, Point2};

/// Merge a source model into the target under a transform, welding every
/// attribute through the target's `add_unique_*` path. Materials are
/// unioned, texcoord channels are unioned by name, normals go through the
/// transform's inverse-transpose.
///
/// Geometry only: the source's skeleton is not merged (joint tables belong
/// to the surrounding pipeline's rig handling).
#[derive(Debug, Clone)]
pub struct MergeModel {
    source: Model,
    transform: Matrix4<Real>,
}

impl MergeModel {
    pub fn new(source: Model, transform: Matrix4<Real>) -> Self {
        MergeModel { source, transform }
    }
}

/// Matrix applied to normals: inverse-transpose of the linear part, falling
/// back to the linear part itself for a singular transform.
pub(crate) fn normal_matrix(transform: &Matrix4<Real>) -> Matrix3<Real> {
    let linear: Matrix3<Real> = transform.fixed_view::<3, 3>(0, 0).into_owned();
    linear
        .try_inverse()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}

impl ModelOperation for MergeModel {
    fn apply(&self, model: &mut Model) -> Result<(), MeshError> {
        let normals = normal_matrix(&self.transform);

        let material_map: Vec<u32> = self
            .source
            .materials()
            .iter()
            .map(|material| model.add_unique_material(material.clone()))
            .collect();
        let channel_map: Vec<u32> = self
            .source
            .tex_coord_channels()
            .iter()
            .map(|channel| model.add_unique_tex_coord_channel(channel))
            .collect();

        for polygon in self.source.polygons() {
            if polygon.vertex_count() == 0 {
                continue;
            }

            let material = if polygon.material() != INVALID_INDEX {
                material_map[polygon.material() as usize]
            } else {
                INVALID_INDEX
            };
            let mut merged = Polygon::new(material, Vec::new());
            if polygon.normal() != INVALID_INDEX {
                let normal = normals * self.source.normal(polygon.normal());
                if normal.norm_squared() > EPSILON * EPSILON {
                    merged.set_normal(model.add_unique_normal(normal.normalize()));
                }
            }

            for &vertex_id in polygon.vertices() {
                let vertex = self.source.vertex(vertex_id);
                let mut fresh = Vertex::default();

                if vertex.position() != INVALID_INDEX {
                    let position = self
                        .transform
                        .transform_point(&self.source.position(vertex.position()));
                    fresh.set_position(model.add_unique_position(position));
                }
                if vertex.color() != INVALID_INDEX {
                    fresh.set_color(model.add_unique_color(self.source.color(vertex.color())));
                }
                if vertex.normal() != INVALID_INDEX {
                    let normal = normals * self.source.normal(vertex.normal());
                    if normal.norm_squared() > EPSILON * EPSILON {
                        fresh.set_normal(model.add_unique_normal(normal.normalize()));
                    }
                }
                for channel in 0..vertex.tex_coord_count() {
                    let tex_coord = vertex.tex_coord(channel);
                    if tex_coord != INVALID_INDEX {
                        let mapped = channel_map
                            .get(channel as usize)
                            .copied()
                            .unwrap_or(channel);
                        let value: Point2<Real> = self.source.tex_coord(tex_coord);
                        fresh.set_tex_coord(mapped, model.add_unique_tex_coord(value));
                    }
                }

                merged.add_vertex(model.add_unique_vertex(fresh));
            }

            model.add_polygon(merged);
        }

        Ok(())
    }
}
