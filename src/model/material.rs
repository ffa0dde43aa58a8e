//! Material records.

use crate::float_types::Real;
use nalgebra::Vector4;

/// A surface material. Texture maps and shading parameters live with the
/// external pipeline; the core only needs identity and a few flags so
/// polygons survive the processing passes with their assignment intact.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    color: Vector4<Real>,
    double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            name: String::new(),
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            double_sided: false,
        }
    }
}

impl Material {
    pub fn named(name: impl Into<String>) -> Self {
        Material {
            name: name.into(),
            ..Material::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn color(&self) -> Vector4<Real> {
        self.color
    }

    pub fn set_color(&mut self, color: Vector4<Real>) {
        self.color = color;
    }

    pub fn double_sided(&self) -> bool {
        self.double_sided
    }

    pub fn set_double_sided(&mut self, double_sided: bool) {
        self.double_sided = double_sided;
    }
}
