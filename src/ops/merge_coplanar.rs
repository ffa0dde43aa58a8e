//! Coplanar polygon fusion.

use crate::errors::MeshError;
use crate::float_types::{EPSILON, PI, POSITION_WELD_DISTANCE, Real};
use crate::model::{EdgeMode, Model, ModelAdjacency};
use crate::ops::{CleanDuplicates, ModelOperation};
use nalgebra::Vector3;

/// Iteratively fuse pairs of adjacent, near-coplanar polygons into single
/// larger polygons.
///
/// Candidate pairs must share exactly one manifold edge and carry the same
/// material; merging runs to a fixpoint, internal spikes and T-vertices left
/// by the fusion are pruned, and a final [`CleanDuplicates`] sweeps up the
/// orphaned attributes.
#[derive(Debug, Clone, Copy)]
pub struct MergeCoplanarAdjacents {
    /// Maximum angle between face normals, in radians.
    angle_threshold: Real,
}

impl Default for MergeCoplanarAdjacents {
    fn default() -> Self {
        MergeCoplanarAdjacents {
            angle_threshold: 0.1 * PI / 180.0,
        }
    }
}

impl MergeCoplanarAdjacents {
    pub fn new(angle_threshold: Real) -> Self {
        MergeCoplanarAdjacents { angle_threshold }
    }
}

/// Face normal from the polygon's winding (Newell's method), `None` for a
/// degenerate loop.
fn face_normal(model: &Model, polygon: u32) -> Option<Vector3<Real>> {
    let loop_ = model.polygon(polygon);
    let count = loop_.vertex_count();
    if count < 3 {
        return None;
    }
    let mut normal = Vector3::zeros();
    for i in 0..count {
        let p0 = model.vertex_position(loop_.vertex(i));
        let p1 = model.vertex_position(loop_.vertex((i + 1) % count));
        normal.x += (p0.y - p1.y) * (p0.z + p1.z);
        normal.y += (p0.z - p1.z) * (p0.x + p1.x);
        normal.z += (p0.x - p1.x) * (p0.y + p1.y);
    }
    if normal.norm_squared() < EPSILON * EPSILON {
        return None;
    }
    Some(normal.normalize())
}

/// Rotate `vertices` so the element at `first` comes first.
fn rotated(vertices: &[u32], first: u32) -> Vec<u32> {
    let split = first as usize % vertices.len();
    let mut out = Vec::with_capacity(vertices.len());
    out.extend_from_slice(&vertices[split..]);
    out.extend_from_slice(&vertices[..split]);
    out
}

/// Remove internal two-step loops: a position recurring two steps later
/// marks an excursion over a fully shared edge; the pair walking out and
/// back is dropped.
fn remove_two_step_loops(model: &Model, loop_: &mut Vec<u32>) {
    let mut changed = true;
    while changed && loop_.len() >= 3 {
        changed = false;
        let count = loop_.len();
        for i in 0..count {
            let here = model.vertex(loop_[i]).position();
            let there = model.vertex(loop_[(i + 2) % count]).position();
            if here == there {
                let mut drop = [(i + 1) % count, (i + 2) % count];
                drop.sort_unstable();
                loop_.remove(drop[1]);
                loop_.remove(drop[0]);
                changed = true;
                break;
            }
        }
    }
}

/// Remove T-vertices: a vertex whose projection onto the segment joining its
/// neighbors lands strictly inside it, within the weld distance.
fn remove_t_vertices(model: &Model, loop_: &mut Vec<u32>) {
    let mut changed = true;
    while changed && loop_.len() > 3 {
        changed = false;
        let count = loop_.len();
        for i in 0..count {
            let prev = model.vertex_position(loop_[(i + count - 1) % count]);
            let here = model.vertex_position(loop_[i]);
            let next = model.vertex_position(loop_[(i + 1) % count]);

            let segment = next - prev;
            let length_squared = segment.norm_squared();
            if length_squared < EPSILON * EPSILON {
                continue;
            }
            let k = (here - prev).dot(&segment) / length_squared;
            if k <= 0.0 || k >= 1.0 {
                continue;
            }
            let foot = prev + segment * k;
            if (here - foot).norm_squared()
                <= POSITION_WELD_DISTANCE * POSITION_WELD_DISTANCE
            {
                loop_.remove(i);
                changed = true;
                break;
            }
        }
    }
}

impl ModelOperation for MergeCoplanarAdjacents {
    fn apply(&self, model: &mut Model) -> Result<(), MeshError> {
        let mut adjacency = ModelAdjacency::new(model, EdgeMode::ByPosition);
        let min_dot = self.angle_threshold.cos();

        loop {
            let mut merged_any = false;

            for left in 0..model.polygon_count() {
                let left_count = model.polygon(left).vertex_count();
                if left_count < 3 {
                    continue;
                }
                let Some(left_normal) = face_normal(model, left) else {
                    continue;
                };

                for left_edge in 0..left_count {
                    let shares = adjacency.shared_edges_of(left, left_edge);
                    if shares.len() != 1 {
                        continue;
                    }
                    let share = shares[0];
                    let right = adjacency.polygon(share);
                    if right == left
                        || model.polygon(right).vertex_count() < 3
                        || model.polygon(right).material() != model.polygon(left).material()
                    {
                        continue;
                    }

                    // The pair must share exactly this one edge.
                    let mut shared_between = 0;
                    for edge in 0..left_count {
                        for &other in adjacency.shared_edges_of(left, edge) {
                            if adjacency.polygon(other) == right {
                                shared_between += 1;
                            }
                        }
                    }
                    if shared_between != 1 {
                        continue;
                    }

                    let Some(right_normal) = face_normal(model, right) else {
                        continue;
                    };
                    if left_normal.dot(&right_normal) < min_dot {
                        continue;
                    }

                    // Rotate both loops so the shared edge comes first, then
                    // splice: shared start, right's free run, shared end,
                    // left's free run.
                    let right_edge = adjacency.polygon_edge(share);
                    let left_loop = rotated(model.polygon(left).vertices(), left_edge);
                    let right_loop = rotated(model.polygon(right).vertices(), right_edge);

                    let mut merged = Vec::with_capacity(left_loop.len() + right_loop.len() - 2);
                    merged.push(left_loop[0]);
                    merged.extend_from_slice(&right_loop[2..]);
                    merged.push(left_loop[1]);
                    merged.extend_from_slice(&left_loop[2..]);

                    remove_two_step_loops(model, &mut merged);
                    remove_t_vertices(model, &mut merged);
                    if merged.len() < 3 {
                        continue;
                    }

                    model.polygon_mut(left).set_vertices(merged);
                    model.polygon_mut(right).clear_vertices();
                    adjacency.update(model, left);
                    adjacency.update(model, right);
                    merged_any = true;
                    break;
                }
            }

            if !merged_any {
                break;
            }
        }

        model.retain_polygons(|polygon| polygon.vertex_count() > 0);
        CleanDuplicates::default().apply(model)
    }
}
