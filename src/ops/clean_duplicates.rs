//! Attribute welding.

use crate::errors::MeshError;
use crate::float_types::{POSITION_WELD_DISTANCE, Real};
use crate::model::{INVALID_INDEX, Model, Polygon, Vertex};
use crate::ops::ModelOperation;

/// Rebuild the model from scratch, pushing every referenced attribute back
/// through the `add_unique_*` merge path so near-duplicate positions,
/// normals, colors, texcoords, vertices and polygons collapse. Material and
/// texcoord-channel order is preserved; attributes no polygon references
/// disappear. Idempotent; the canonical post-pass after any
/// topology-mutating operation.
#[derive(Debug, Clone, Copy)]
pub struct CleanDuplicates {
    position_distance: Real,
}

impl Default for CleanDuplicates {
    fn default() -> Self {
        CleanDuplicates {
            position_distance: POSITION_WELD_DISTANCE,
        }
    }
}

impl CleanDuplicates {
    pub fn new(position_distance: Real) -> Self {
        CleanDuplicates { position_distance }
    }
}

impl ModelOperation for CleanDuplicates {
    fn apply(&self, model: &mut Model) -> Result<(), MeshError> {
        let mut clean = Model::new();

        for material in model.materials() {
            clean.add_material(material.clone());
        }
        for channel in model.tex_coord_channels() {
            clean.add_unique_tex_coord_channel(channel);
        }
        for joint in model.joints() {
            clean.add_joint(joint.clone());
        }
        for animation in model.animations() {
            clean.add_animation(animation.clone());
        }

        for polygon in model.polygons() {
            if polygon.vertex_count() == 0 {
                continue;
            }

            let mut rebuilt = Polygon::new(polygon.material(), Vec::new());
            if polygon.normal() != INVALID_INDEX {
                rebuilt.set_normal(clean.add_unique_normal(model.normal(polygon.normal())));
            }

            for &vertex_id in polygon.vertices() {
                let vertex = model.vertex(vertex_id);
                let mut fresh = Vertex::default();

                if vertex.position() != INVALID_INDEX {
                    fresh.set_position(clean.add_unique_position_within(
                        model.position(vertex.position()),
                        self.position_distance,
                    ));
                }
                if vertex.color() != INVALID_INDEX {
                    fresh.set_color(clean.add_unique_color(model.color(vertex.color())));
                }
                if vertex.normal() != INVALID_INDEX {
                    fresh.set_normal(clean.add_unique_normal(model.normal(vertex.normal())));
                }
                if vertex.tangent() != INVALID_INDEX {
                    fresh.set_tangent(clean.add_unique_normal(model.normal(vertex.tangent())));
                }
                if vertex.binormal() != INVALID_INDEX {
                    fresh.set_binormal(clean.add_unique_normal(model.normal(vertex.binormal())));
                }
                for channel in 0..vertex.tex_coord_count() {
                    let tex_coord = vertex.tex_coord(channel);
                    if tex_coord != INVALID_INDEX {
                        fresh.set_tex_coord(
                            channel,
                            clean.add_unique_tex_coord(model.tex_coord(tex_coord)),
                        );
                    }
                }
                for joint in 0..vertex.joint_influence_count() {
                    let influence = vertex.joint_influence(joint);
                    if influence != 0.0 {
                        fresh.set_joint_influence(joint, influence);
                    }
                }

                rebuilt.add_vertex(clean.add_unique_vertex(fresh));
            }

            clean.add_unique_polygon(rebuilt);
        }

        *model = clean;
        Ok(())
    }
}
