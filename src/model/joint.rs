//! Skeleton and animation side-tables.

use crate::float_types::Real;
use crate::model::INVALID_INDEX;
use nalgebra::Isometry3;

/// A skeleton joint with a transform local to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    name: String,
    parent: u32,
    transform: Isometry3<Real>,
}

impl Default for Joint {
    fn default() -> Self {
        Joint {
            name: String::new(),
            parent: INVALID_INDEX,
            transform: Isometry3::identity(),
        }
    }
}

impl Joint {
    pub fn new(name: impl Into<String>, parent: u32, transform: Isometry3<Real>) -> Self {
        Joint {
            name: name.into(),
            parent,
            transform,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent joint index, `INVALID_INDEX` for a root joint.
    pub fn parent(&self) -> u32 {
        self.parent
    }

    pub fn set_parent(&mut self, parent: u32) {
        self.parent = parent;
    }

    pub fn transform(&self) -> &Isometry3<Real> {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Isometry3<Real>) {
        self.transform = transform;
    }
}

/// One sampled skeleton pose: a local transform per joint.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFrame {
    pub time: Real,
    pub pose: Vec<Isometry3<Real>>,
}

/// A named keyframe animation over the model's joint table.
///
/// The core never evaluates animations; the table only rides along so the
/// external pipeline round-trips through the processing passes losslessly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
    name: String,
    key_frames: Vec<KeyFrame>,
}

impl Animation {
    pub fn named(name: impl Into<String>) -> Self {
        Animation {
            name: name.into(),
            key_frames: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_key_frame(&mut self, key_frame: KeyFrame) {
        self.key_frames.push(key_frame);
    }

    pub fn key_frames(&self) -> &[KeyFrame] {
        &self.key_frames
    }
}
