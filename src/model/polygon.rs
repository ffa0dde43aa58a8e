//! Polygon records: ordered vertex-index loops with a material.

use crate::model::INVALID_INDEX;

/// A polygon: an ordered loop of vertex indices (winding defines the face
/// normal), a material index and an optional cached normal index.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    material: u32,
    normal: u32,
    vertices: Vec<u32>,
}

impl Default for Polygon {
    fn default() -> Self {
        Polygon {
            material: INVALID_INDEX,
            normal: INVALID_INDEX,
            vertices: Vec::new(),
        }
    }
}

impl Polygon {
    pub fn new(material: u32, vertices: Vec<u32>) -> Self {
        Polygon {
            material,
            normal: INVALID_INDEX,
            vertices,
        }
    }

    /// Triangle constructor, used by the triangulation and reduction paths.
    pub fn triangle(material: u32, v0: u32, v1: u32, v2: u32) -> Self {
        Polygon::new(material, vec![v0, v1, v2])
    }

    pub fn material(&self) -> u32 {
        self.material
    }

    pub fn set_material(&mut self, material: u32) {
        self.material = material;
    }

    /// Cached face normal index, or `INVALID_INDEX` when never derived.
    pub fn normal(&self) -> u32 {
        self.normal
    }

    pub fn set_normal(&mut self, normal: u32) {
        self.normal = normal;
    }

    pub fn vertex(&self, index: u32) -> u32 {
        self.vertices[index as usize]
    }

    pub fn set_vertex(&mut self, index: u32, vertex: u32) {
        self.vertices[index as usize] = vertex;
    }

    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<u32>) {
        self.vertices = vertices;
    }

    pub fn add_vertex(&mut self, vertex: u32) {
        self.vertices.push(vertex);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn clear_vertices(&mut self) {
        self.vertices.clear();
    }
}
