//! Sphere primitive.

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use chroma_math::{Aabb, Mat3, Ray, Vec3};

use super::Shape;
use crate::error::GeometryError;
use crate::material::Material;

#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Result<Self, GeometryError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(GeometryError::InvalidRadius(radius));
        }

        let rvec = Vec3::splat(radius);
        Ok(Self {
            center,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub(crate) fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            bbox: self.bbox.translate(offset),
            ..self.clone()
        }
    }

    pub(crate) fn rotated(&self, rotation: &Mat3) -> Self {
        let center = *rotation * self.center;
        let rvec = Vec3::splat(self.radius);
        Self {
            center,
            bbox: Aabb::from_points(center - rvec, center + rvec),
            ..self.clone()
        }
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in the acceptable range
        let near = (h - sqrtd) / a;
        if ray.is_on_ray(near) {
            return Some(near);
        }
        let far = (h + sqrtd) / a;
        ray.is_on_ray(far).then_some(far)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn sample_surface(&self, u: f32, v: f32) -> Vec3 {
        let z = 1.0 - 2.0 * u;
        let r = (1.0 - z * z).max(0.0).sqrt();
        let phi = TAU * v;
        self.center + self.radius * Vec3::new(r * phi.cos(), r * phi.sin(), z)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
