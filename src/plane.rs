//! Planes and point classification against them.

use crate::float_types::{EPSILON, Real};
use nalgebra::{Point3, Vector3};

// Classification of a point (or the union of a polygon's points)
// relative to a plane.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane in normal form, `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane.
    pub normal: Vector3<Real>,
    /// Distance from origin along the normal.
    pub w: Real,
}

impl Plane {
    /// Plane through a point with the given (normalized) normal.
    pub fn new(normal: Vector3<Real>, point: Point3<Real>) -> Self {
        let w = normal.dot(&point.coords);
        Plane { normal, w }
    }

    /// Plane through three points, normal following the right-hand rule
    /// `(b - a) × (c - a)`. Returns `None` when the points are (nearly)
    /// colinear and define no plane.
    pub fn from_points(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        if normal.norm_squared() < EPSILON * EPSILON {
            return None;
        }
        let normal = normal.normalize();
        Some(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Signed distance from `point` to the plane; positive on the front side.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`COPLANAR`], [`FRONT`] or [`BACK`].
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.signed_distance(point);
        if distance > EPSILON {
            FRONT
        } else if distance < -EPSILON {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Flip the plane's orientation in place.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Intersect the ray `origin + k * direction` with the plane.
    ///
    /// Returns the ray parameter and the intersection point, or `None` when
    /// the ray runs (nearly) parallel to the plane.
    pub fn ray_intersection(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Option<(Real, Point3<Real>)> {
        let denom = self.normal.dot(direction);
        if denom.abs() < EPSILON {
            return None;
        }
        let k = (self.w - self.normal.dot(&origin.coords)) / denom;
        Some((k, origin + direction * k))
    }
}
