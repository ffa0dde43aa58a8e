//! The in-memory mesh representation: epsilon-welded attribute tables,
//! vertex/polygon records and skeleton side-tables.

use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{
    COLOR_WELD_TOLERANCE, EPSILON, NORMAL_QUANTIZATION, NORMAL_WELD_TOLERANCE,
    POSITION_WELD_DISTANCE, Real, TEXCOORD_WELD_TOLERANCE,
};
use nalgebra::{Isometry3, Point2, Point3, Vector3, Vector4};
use std::ops::BitOr;

pub mod adjacency;
pub mod grid;
pub mod joint;
pub mod material;
pub mod polygon;
pub mod vertex;

pub use adjacency::{EdgeMode, ModelAdjacency};
pub use joint::{Animation, Joint, KeyFrame};
pub use material::Material;
pub use polygon::Polygon;
pub use vertex::Vertex;

use grid::WeldTable;

/// Null attribute/record handle.
pub const INVALID_INDEX: u32 = u32::MAX;

/// Bitmask selecting which parts of a [`Model`] to drop in [`Model::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearFlags(u32);

impl ClearFlags {
    pub const MATERIALS: ClearFlags = ClearFlags(1 << 0);
    pub const VERTICES: ClearFlags = ClearFlags(1 << 1);
    pub const POLYGONS: ClearFlags = ClearFlags(1 << 2);
    pub const POSITIONS: ClearFlags = ClearFlags(1 << 3);
    pub const COLORS: ClearFlags = ClearFlags(1 << 4);
    pub const NORMALS: ClearFlags = ClearFlags(1 << 5);
    pub const TEX_COORDS: ClearFlags = ClearFlags(1 << 6);
    pub const JOINTS: ClearFlags = ClearFlags(1 << 7);
    pub const ALL: ClearFlags = ClearFlags(0xff);

    pub fn contains(self, flags: ClearFlags) -> bool {
        self.0 & flags.0 == flags.0
    }
}

impl BitOr for ClearFlags {
    type Output = ClearFlags;
    fn bitor(self, rhs: ClearFlags) -> ClearFlags {
        ClearFlags(self.0 | rhs.0)
    }
}

/// Return true when a replacing vertex matches or "exceeds" an existing one:
/// every attribute the existing vertex has set agrees, and the replacement
/// may fill in attributes the existing vertex left unset.
fn should_replace(existing: &Vertex, replace_with: &Vertex) -> bool {
    if existing.position() != INVALID_INDEX && existing.position() != replace_with.position() {
        return false;
    }
    if existing.color() != INVALID_INDEX && existing.color() != replace_with.color() {
        return false;
    }
    if existing.normal() != INVALID_INDEX && existing.normal() != replace_with.normal() {
        return false;
    }
    if existing.tangent() != INVALID_INDEX && existing.tangent() != replace_with.tangent() {
        return false;
    }
    if existing.binormal() != INVALID_INDEX && existing.binormal() != replace_with.binormal() {
        return false;
    }

    if existing.tex_coord_count() > replace_with.tex_coord_count() {
        return false;
    }
    for channel in 0..existing.tex_coord_count() {
        if existing.tex_coord(channel) != replace_with.tex_coord(channel) {
            return false;
        }
    }

    if existing.joint_influence_count() != replace_with.joint_influence_count() {
        return false;
    }
    for joint in 0..existing.joint_influence_count() {
        if (existing.joint_influence(joint) - replace_with.joint_influence(joint)).abs() > EPSILON {
            return false;
        }
    }

    true
}

/// A mutable polygon mesh.
///
/// Attribute values (positions, colors, normals, texcoords) live in
/// deduplicated tables addressed by stable `u32` indices; [`Vertex`] records
/// tie attribute indices together, [`Polygon`] records hold ordered vertex
/// loops. `add_unique_*` insertion merges with an existing value within the
/// table's weld tolerance or appends; indices are never reused or relocated
/// within a processing pass.
#[derive(Debug, Clone)]
pub struct Model {
    materials: Vec<Material>,
    vertices: Vec<Vertex>,
    polygons: Vec<Polygon>,
    positions: WeldTable<Point3<Real>>,
    colors: WeldTable<Vector4<Real>>,
    normals: WeldTable<Vector3<Real>>,
    tex_coords: WeldTable<Point2<Real>>,
    tex_coord_channels: Vec<String>,
    joints: Vec<Joint>,
    animations: Vec<Animation>,
}

impl Default for Model {
    fn default() -> Self {
        Model::new()
    }
}

impl Model {
    pub fn new() -> Self {
        Model {
            materials: Vec::new(),
            vertices: Vec::new(),
            polygons: Vec::new(),
            positions: WeldTable::new(2.0),
            colors: WeldTable::new(0.1),
            normals: WeldTable::new(0.1),
            tex_coords: WeldTable::new(0.1),
            tex_coord_channels: Vec::new(),
            joints: Vec::new(),
            animations: Vec::new(),
        }
    }

    /// Selectively drop tables and reset the corresponding indices inside
    /// surviving vertices and polygons.
    pub fn clear(&mut self, flags: ClearFlags) {
        if flags.contains(ClearFlags::MATERIALS) {
            self.materials.clear();
        }
        if flags.contains(ClearFlags::VERTICES) {
            self.vertices.clear();
        }
        if flags.contains(ClearFlags::POLYGONS) {
            self.polygons.clear();
        }
        if flags.contains(ClearFlags::POSITIONS) {
            self.positions.clear();
        }
        if flags.contains(ClearFlags::COLORS) {
            self.colors.clear();
        }
        if flags.contains(ClearFlags::NORMALS) {
            self.normals.clear();
        }
        if flags.contains(ClearFlags::TEX_COORDS) {
            self.tex_coords.clear();
            self.tex_coord_channels.clear();
        }
        if flags.contains(ClearFlags::JOINTS) {
            self.joints.clear();
            self.animations.clear();
        }

        for vertex in &mut self.vertices {
            if flags.contains(ClearFlags::POSITIONS) {
                vertex.set_position(INVALID_INDEX);
            }
            if flags.contains(ClearFlags::COLORS) {
                vertex.set_color(INVALID_INDEX);
            }
            if flags.contains(ClearFlags::NORMALS) {
                vertex.set_normal(INVALID_INDEX);
                vertex.set_tangent(INVALID_INDEX);
                vertex.set_binormal(INVALID_INDEX);
            }
            if flags.contains(ClearFlags::TEX_COORDS) {
                vertex.clear_tex_coords();
            }
            if flags.contains(ClearFlags::JOINTS) {
                vertex.clear_joint_influences();
            }
        }

        for polygon in &mut self.polygons {
            if flags.contains(ClearFlags::MATERIALS) {
                polygon.set_material(INVALID_INDEX);
            }
            if flags.contains(ClearFlags::NORMALS) {
                polygon.set_normal(INVALID_INDEX);
            }
            if flags.contains(ClearFlags::VERTICES) {
                polygon.clear_vertices();
            }
        }
    }

    /// Axis-aligned bounding box over the position table.
    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::new_invalid();
        for position in self.positions.values() {
            aabb.take_point(*position);
        }
        aabb
    }

    // ------------------------------------------------------------------
    // materials

    pub fn add_material(&mut self, material: Material) -> u32 {
        let id = self.materials.len() as u32;
        self.materials.push(material);
        id
    }

    pub fn add_unique_material(&mut self, material: Material) -> u32 {
        if let Some(id) = self.materials.iter().position(|m| *m == material) {
            return id as u32;
        }
        self.add_material(material)
    }

    pub fn material(&self, id: u32) -> &Material {
        &self.materials[id as usize]
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material_count(&self) -> u32 {
        self.materials.len() as u32
    }

    // ------------------------------------------------------------------
    // vertices

    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let id = self.vertices.len() as u32;
        self.vertices.push(vertex);
        id
    }

    /// Merge `vertex` with an existing record it matches-or-exceeds, or
    /// append. A matched record is upgraded in place so previously unset
    /// attributes get filled in.
    pub fn add_unique_vertex(&mut self, vertex: Vertex) -> u32 {
        for (id, existing) in self.vertices.iter_mut().enumerate() {
            if should_replace(existing, &vertex) {
                *existing = vertex;
                return id as u32;
            }
        }
        self.add_vertex(vertex)
    }

    pub fn vertex(&self, id: u32) -> &Vertex {
        &self.vertices[id as usize]
    }

    pub fn set_vertex(&mut self, id: u32, vertex: Vertex) {
        self.vertices[id as usize] = vertex;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Position value referenced by vertex `id`.
    pub fn vertex_position(&self, id: u32) -> Point3<Real> {
        *self.positions.get(self.vertex(id).position())
    }

    // ------------------------------------------------------------------
    // polygons

    pub fn add_polygon(&mut self, polygon: Polygon) -> u32 {
        let id = self.polygons.len() as u32;
        self.polygons.push(polygon);
        id
    }

    pub fn add_unique_polygon(&mut self, polygon: Polygon) -> u32 {
        if let Some(id) = self.polygons.iter().position(|p| *p == polygon) {
            return id as u32;
        }
        self.add_polygon(polygon)
    }

    pub fn polygon(&self, id: u32) -> &Polygon {
        &self.polygons[id as usize]
    }

    pub fn polygon_mut(&mut self, id: u32) -> &mut Polygon {
        &mut self.polygons[id as usize]
    }

    pub fn set_polygon(&mut self, id: u32, polygon: Polygon) {
        self.polygons[id as usize] = polygon;
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn polygons_mut(&mut self) -> &mut [Polygon] {
        &mut self.polygons
    }

    pub fn set_polygons(&mut self, polygons: Vec<Polygon>) {
        self.polygons = polygons;
    }

    /// Drop polygons failing `keep`, preserving order of the survivors.
    pub fn retain_polygons(&mut self, keep: impl FnMut(&Polygon) -> bool) {
        self.polygons.retain(keep);
    }

    pub fn polygon_count(&self) -> u32 {
        self.polygons.len() as u32
    }

    // ------------------------------------------------------------------
    // positions

    pub fn add_position(&mut self, position: Point3<Real>) -> u32 {
        self.positions.add(position)
    }

    /// Weld with the nearest position within the default distance, or append.
    pub fn add_unique_position(&mut self, position: Point3<Real>) -> u32 {
        self.add_unique_position_within(position, POSITION_WELD_DISTANCE)
    }

    /// Weld with the nearest position within `distance`, or append.
    pub fn add_unique_position_within(&mut self, position: Point3<Real>, distance: Real) -> u32 {
        match self.positions.find(&position, distance) {
            Some(id) => id,
            None => self.positions.add(position),
        }
    }

    pub fn position(&self, id: u32) -> Point3<Real> {
        *self.positions.get(id)
    }

    pub fn set_position(&mut self, id: u32, position: Point3<Real>) {
        self.positions.set(id, position);
    }

    pub fn positions(&self) -> &[Point3<Real>] {
        self.positions.values()
    }

    pub fn position_count(&self) -> u32 {
        self.positions.len()
    }

    pub fn reserve_positions(&mut self, additional: usize) {
        self.positions.reserve(additional);
    }

    // ------------------------------------------------------------------
    // colors

    pub fn add_color(&mut self, color: Vector4<Real>) -> u32 {
        self.colors.add(color)
    }

    pub fn add_unique_color(&mut self, color: Vector4<Real>) -> u32 {
        match self.colors.find(&color, COLOR_WELD_TOLERANCE) {
            Some(id) => id,
            None => self.colors.add(color),
        }
    }

    pub fn color(&self, id: u32) -> Vector4<Real> {
        *self.colors.get(id)
    }

    pub fn colors(&self) -> &[Vector4<Real>] {
        self.colors.values()
    }

    pub fn color_count(&self) -> u32 {
        self.colors.len()
    }

    // ------------------------------------------------------------------
    // normals

    pub fn add_normal(&mut self, normal: Vector3<Real>) -> u32 {
        self.normals.add(normal)
    }

    /// Quantize, then weld with an existing normal within tolerance.
    pub fn add_unique_normal(&mut self, normal: Vector3<Real>) -> u32 {
        let quantized = Vector3::new(
            (normal.x * NORMAL_QUANTIZATION).trunc() / NORMAL_QUANTIZATION,
            (normal.y * NORMAL_QUANTIZATION).trunc() / NORMAL_QUANTIZATION,
            (normal.z * NORMAL_QUANTIZATION).trunc() / NORMAL_QUANTIZATION,
        );
        match self.normals.find(&quantized, NORMAL_WELD_TOLERANCE) {
            Some(id) => id,
            None => self.normals.add(quantized),
        }
    }

    pub fn normal(&self, id: u32) -> Vector3<Real> {
        *self.normals.get(id)
    }

    pub fn normals(&self) -> &[Vector3<Real>] {
        self.normals.values()
    }

    pub fn normal_count(&self) -> u32 {
        self.normals.len()
    }

    // ------------------------------------------------------------------
    // texcoords

    pub fn add_tex_coord(&mut self, tex_coord: Point2<Real>) -> u32 {
        self.tex_coords.add(tex_coord)
    }

    pub fn add_unique_tex_coord(&mut self, tex_coord: Point2<Real>) -> u32 {
        match self.tex_coords.find(&tex_coord, TEXCOORD_WELD_TOLERANCE) {
            Some(id) => id,
            None => self.tex_coords.add(tex_coord),
        }
    }

    pub fn tex_coord(&self, id: u32) -> Point2<Real> {
        *self.tex_coords.get(id)
    }

    pub fn tex_coords(&self) -> &[Point2<Real>] {
        self.tex_coords.values()
    }

    pub fn tex_coord_count(&self) -> u32 {
        self.tex_coords.len()
    }

    /// Index of the named texcoord channel, adding it when missing.
    pub fn add_unique_tex_coord_channel(&mut self, channel_id: &str) -> u32 {
        if let Some(id) = self.tex_coord_channel(channel_id) {
            return id;
        }
        let id = self.tex_coord_channels.len() as u32;
        self.tex_coord_channels.push(channel_id.to_string());
        id
    }

    pub fn tex_coord_channel(&self, channel_id: &str) -> Option<u32> {
        self.tex_coord_channels
            .iter()
            .position(|name| name == channel_id)
            .map(|id| id as u32)
    }

    pub fn tex_coord_channels(&self) -> &[String] {
        &self.tex_coord_channels
    }

    // ------------------------------------------------------------------
    // joints and animations

    pub fn add_joint(&mut self, joint: Joint) -> u32 {
        let id = self.joints.len() as u32;
        self.joints.push(joint);
        id
    }

    pub fn add_unique_joint(&mut self, joint: Joint) -> u32 {
        if let Some(id) = self.joints.iter().position(|j| *j == joint) {
            return id as u32;
        }
        self.add_joint(joint)
    }

    pub fn joint(&self, id: u32) -> &Joint {
        &self.joints[id as usize]
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint_count(&self) -> u32 {
        self.joints.len() as u32
    }

    pub fn find_joint_index(&self, name: &str) -> Option<u32> {
        self.joints
            .iter()
            .position(|joint| joint.name() == name)
            .map(|id| id as u32)
    }

    pub fn find_child_joints(&self, id: u32) -> Vec<u32> {
        self.joints
            .iter()
            .enumerate()
            .filter(|(_, joint)| joint.parent() == id)
            .map(|(child, _)| child as u32)
            .collect()
    }

    /// Accumulated joint transform from the root down to `id`.
    pub fn joint_global_transform(&self, id: u32) -> Isometry3<Real> {
        let mut global = Isometry3::identity();
        let mut current = id;
        while current != INVALID_INDEX {
            let joint = &self.joints[current as usize];
            global = joint.transform() * global;
            current = joint.parent();
        }
        global
    }

    pub fn add_animation(&mut self, animation: Animation) -> u32 {
        let id = self.animations.len() as u32;
        self.animations.push(animation);
        id
    }

    pub fn find_animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name() == name)
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }
}
