//! Renderable primitives.
//!
//! Every primitive answers the same questions: where does a ray first hit
//! it, what is the outward normal at a surface point, how large is it, how
//! is a point drawn uniformly from its surface, and what box bounds it.
//! [`Geometry`] is the closed set of primitives a scene is made of.

mod area_light;
mod sphere;
mod triangle;

use std::sync::Arc;

use chroma_core::GeometryRecord;
use chroma_math::{Aabb, Mat3, Ray, Vec3};

pub use area_light::AreaLight;
pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::error::GeometryError;
use crate::material::Material;

/// Operations shared by all primitives.
pub trait Shape: Send + Sync {
    /// Parametric distance of the first hit inside the ray's valid range.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, point: Vec3) -> Vec3;

    fn area(&self) -> f32;

    /// Map two uniform numbers in [0, 1) to a uniformly distributed
    /// point on the surface.
    fn sample_surface(&self, u: f32, v: f32) -> Vec3;

    fn bounding_box(&self) -> Aabb;
}

/// A primitive with its material.
#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere(Sphere),
    Triangle(Triangle),
    AreaLight(AreaLight),
}

macro_rules! dispatch {
    ($self:ident, $shape:ident => $body:expr) => {
        match $self {
            Geometry::Sphere($shape) => $body,
            Geometry::Triangle($shape) => $body,
            Geometry::AreaLight($shape) => $body,
        }
    };
}

impl Geometry {
    /// Build a primitive from an imported record.
    pub fn from_record(
        record: &GeometryRecord,
        material: Arc<Material>,
    ) -> Result<Self, GeometryError> {
        let geometry = match *record {
            GeometryRecord::Triangle { p0, p1, p2, .. } => {
                Geometry::Triangle(Triangle::new(p0, p1, p2, material)?)
            }
            GeometryRecord::Sphere { center, radius, .. } => {
                Geometry::Sphere(Sphere::new(center, radius, material)?)
            }
            GeometryRecord::AreaLight {
                corner,
                edge_u,
                edge_v,
                ..
            } => Geometry::AreaLight(AreaLight::new(corner, edge_u, edge_v, material)?),
        };
        Ok(geometry)
    }

    pub fn material(&self) -> &Arc<Material> {
        dispatch!(self, shape => shape.material())
    }

    pub fn is_emitter(&self) -> bool {
        self.material().is_emissive()
    }

    /// Copy of this primitive moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        match self {
            Geometry::Sphere(s) => Geometry::Sphere(s.translated(offset)),
            Geometry::Triangle(t) => Geometry::Triangle(t.translated(offset)),
            Geometry::AreaLight(l) => Geometry::AreaLight(l.translated(offset)),
        }
    }

    /// Copy of this primitive rotated about the origin. `rotation` must be
    /// orthonormal.
    pub fn rotated(&self, rotation: &Mat3) -> Self {
        match self {
            Geometry::Sphere(s) => Geometry::Sphere(s.rotated(rotation)),
            Geometry::Triangle(t) => Geometry::Triangle(t.rotated(rotation)),
            Geometry::AreaLight(l) => Geometry::AreaLight(l.rotated(rotation)),
        }
    }
}

impl Shape for Geometry {
    #[inline]
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        dispatch!(self, shape => shape.intersect(ray))
    }

    #[inline]
    fn normal_at(&self, point: Vec3) -> Vec3 {
        dispatch!(self, shape => shape.normal_at(point))
    }

    fn area(&self) -> f32 {
        dispatch!(self, shape => shape.area())
    }

    fn sample_surface(&self, u: f32, v: f32) -> Vec3 {
        dispatch!(self, shape => shape.sample_surface(u, v))
    }

    fn bounding_box(&self) -> Aabb {
        dispatch!(self, shape => shape.bounding_box())
    }
}

/// Möller-Trumbore test against the plane spanned by `edge1` and `edge2`
/// from `origin`. Returns `(t, u, v)` with `u`, `v` the edge coordinates of
/// the hit; callers decide which (u, v) region counts as inside.
#[inline]
pub(crate) fn edge_plane_hit(ray: &Ray, origin: Vec3, edge1: Vec3, edge2: Vec3) -> Option<(f32, f32, f32)> {
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to the plane
    if a.abs() < 1e-8 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - origin;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if !(0.0..=1.0).contains(&v) {
        return None;
    }

    let t = f * edge2.dot(q);
    ray.is_on_ray(t).then_some((t, u, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;

    fn wall() -> Arc<Material> {
        Arc::new(Material::diffuse(Color::splat(0.5)))
    }

    #[test]
    fn test_from_record() {
        let record = GeometryRecord::Sphere {
            center: Vec3::ZERO,
            radius: 2.0,
            material: 0,
        };
        let geometry = Geometry::from_record(&record, wall()).unwrap();
        assert!(matches!(geometry, Geometry::Sphere(_)));
        assert!(!geometry.is_emitter());
    }

    #[test]
    fn test_degenerate_record_is_rejected() {
        let record = GeometryRecord::Triangle {
            p0: Vec3::ZERO,
            p1: Vec3::X,
            p2: Vec3::X * 2.0,
            material: 0,
        };
        assert_eq!(
            Geometry::from_record(&record, wall()).unwrap_err(),
            GeometryError::DegenerateTriangle
        );
    }

    #[test]
    fn test_translate_then_intersect() {
        let sphere = Geometry::Sphere(Sphere::new(Vec3::ZERO, 1.0, wall()).unwrap());
        let moved = sphere.translated(Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let t = moved.intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-4);
        assert!(sphere.intersect(&ray).is_some_and(|t| (t - 1.0).abs() < 1e-4));
    }

    #[test]
    fn test_rotate_triangle() {
        let triangle = Geometry::Triangle(
            Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, wall()).unwrap(),
        );
        // Quarter turn about Y maps +X to -Z
        let rotation = Mat3::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let rotated = triangle.rotated(&rotation);
        let normal = rotated.normal_at(Vec3::ZERO);
        assert!((normal - Vec3::X).length() < 1e-5);
        assert!((rotated.area() - 0.5).abs() < 1e-5);
    }
}
