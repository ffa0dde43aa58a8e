//! Vertex records: tuples of indices into the model's attribute tables.

use crate::float_types::Real;
use crate::model::INVALID_INDEX;

/// A vertex, referencing entries of the owning [`Model`](crate::Model)'s
/// attribute tables by index. `INVALID_INDEX` marks an unset attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    position: u32,
    color: u32,
    normal: u32,
    tangent: u32,
    binormal: u32,
    tex_coords: Vec<u32>,
    joint_influences: Vec<Real>,
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            position: INVALID_INDEX,
            color: INVALID_INDEX,
            normal: INVALID_INDEX,
            tangent: INVALID_INDEX,
            binormal: INVALID_INDEX,
            tex_coords: Vec::new(),
            joint_influences: Vec::new(),
        }
    }
}

impl Vertex {
    /// A vertex carrying only a position.
    pub fn with_position(position: u32) -> Self {
        Vertex {
            position,
            ..Vertex::default()
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    pub fn normal(&self) -> u32 {
        self.normal
    }

    pub fn set_normal(&mut self, normal: u32) {
        self.normal = normal;
    }

    pub fn tangent(&self) -> u32 {
        self.tangent
    }

    pub fn set_tangent(&mut self, tangent: u32) {
        self.tangent = tangent;
    }

    pub fn binormal(&self) -> u32 {
        self.binormal
    }

    pub fn set_binormal(&mut self, binormal: u32) {
        self.binormal = binormal;
    }

    /// Texcoord index for `channel`, or `INVALID_INDEX` when unset.
    pub fn tex_coord(&self, channel: u32) -> u32 {
        self.tex_coords
            .get(channel as usize)
            .copied()
            .unwrap_or(INVALID_INDEX)
    }

    pub fn set_tex_coord(&mut self, channel: u32, tex_coord: u32) {
        let channel = channel as usize;
        if channel >= self.tex_coords.len() {
            self.tex_coords.resize(channel + 1, INVALID_INDEX);
        }
        self.tex_coords[channel] = tex_coord;
    }

    pub fn tex_coord_count(&self) -> u32 {
        self.tex_coords.len() as u32
    }

    pub fn clear_tex_coords(&mut self) {
        self.tex_coords.clear();
    }

    /// Influence weight of `joint`, zero when unset.
    pub fn joint_influence(&self, joint: u32) -> Real {
        self.joint_influences.get(joint as usize).copied().unwrap_or(0.0)
    }

    pub fn set_joint_influence(&mut self, joint: u32, influence: Real) {
        let joint = joint as usize;
        if joint >= self.joint_influences.len() {
            self.joint_influences.resize(joint + 1, 0.0);
        }
        self.joint_influences[joint] = influence;
    }

    pub fn joint_influence_count(&self) -> u32 {
        self.joint_influences.len() as u32
    }

    pub fn clear_joint_influences(&mut self) {
        self.joint_influences.clear();
    }
}
