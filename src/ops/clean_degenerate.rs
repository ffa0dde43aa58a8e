//! Degenerate polygon removal.

use crate::errors::MeshError;
use crate::model::Model;
use crate::ops::ModelOperation;

/// Remove polygon vertices that repeat the previous vertex's underlying
/// position (cyclically), then drop polygons left with two or fewer
/// vertices. Idempotent, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanDegenerate;

impl ModelOperation for CleanDegenerate {
    fn apply(&self, model: &mut Model) -> Result<(), MeshError> {
        for id in 0..model.polygon_count() {
            let polygon = model.polygon(id);
            let mut kept: Vec<u32> = Vec::with_capacity(polygon.vertex_count() as usize);
            for &vertex in polygon.vertices() {
                let position = model.vertex(vertex).position();
                match kept.last() {
                    Some(&last) if model.vertex(last).position() == position => {},
                    _ => kept.push(vertex),
                }
            }
            // The loop wraps around: trim a tail repeating the head.
            while kept.len() > 1
                && model.vertex(kept[0]).position()
                    == model.vertex(kept[kept.len() - 1]).position()
            {
                kept.pop();
            }
            if kept.len() != polygon.vertex_count() as usize {
                model.polygon_mut(id).set_vertices(kept);
            }
        }

        model.retain_polygons(|polygon| polygon.vertex_count() > 2);
        Ok(())
    }
}
