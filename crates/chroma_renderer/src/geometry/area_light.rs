//! Parallelogram area light.

use std::sync::Arc;

use chroma_math::{Aabb, Mat3, Ray, Vec3};

use super::{edge_plane_hit, Shape};
use crate::error::GeometryError;
use crate::material::Material;

/// Flat emitter spanned by `edge_u` and `edge_v` from `corner`.
#[derive(Debug, Clone)]
pub struct AreaLight {
    corner: Vec3,
    edge_u: Vec3,
    edge_v: Vec3,
    normal: Vec3,
    area: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl AreaLight {
    pub fn new(
        corner: Vec3,
        edge_u: Vec3,
        edge_v: Vec3,
        material: Arc<Material>,
    ) -> Result<Self, GeometryError> {
        let cross = edge_u.cross(edge_v);
        let area = cross.length();
        if !(area > 1e-12 && area.is_finite()) {
            return Err(GeometryError::DegenerateAreaLight);
        }

        Ok(Self {
            corner,
            edge_u,
            edge_v,
            normal: cross / area,
            area,
            material,
            bbox: Self::bounds(corner, edge_u, edge_v),
        })
    }

    fn bounds(corner: Vec3, edge_u: Vec3, edge_v: Vec3) -> Aabb {
        Aabb::from_points(corner, corner + edge_u + edge_v)
            .include(corner + edge_u)
            .include(corner + edge_v)
    }

    pub fn corner(&self) -> Vec3 {
        self.corner
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub(crate) fn translated(&self, offset: Vec3) -> Self {
        Self {
            corner: self.corner + offset,
            bbox: self.bbox.translate(offset),
            ..self.clone()
        }
    }

    pub(crate) fn rotated(&self, rotation: &Mat3) -> Self {
        let corner = *rotation * self.corner;
        let edge_u = *rotation * self.edge_u;
        let edge_v = *rotation * self.edge_v;
        Self {
            corner,
            edge_u,
            edge_v,
            normal: (*rotation * self.normal).normalize(),
            bbox: Self::bounds(corner, edge_u, edge_v),
            ..self.clone()
        }
    }
}

impl Shape for AreaLight {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        edge_plane_hit(ray, self.corner, self.edge_u, self.edge_v).map(|(t, _, _)| t)
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn sample_surface(&self, u: f32, v: f32) -> Vec3 {
        self.corner + self.edge_u * u + self.edge_v * v
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;

    fn ceiling_light() -> AreaLight {
        // 1x1 square at y=2 facing down
        AreaLight::new(
            Vec3::new(-0.5, 2.0, -0.5),
            Vec3::X,
            Vec3::Z,
            Arc::new(Material::emitting(Color::ONE, 10.0)),
        )
        .unwrap()
    }

    #[test]
    fn test_normal_and_area() {
        let light = ceiling_light();
        assert_eq!(light.normal_at(Vec3::ZERO), Vec3::NEG_Y);
        assert!((light.area() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hit_inside_and_outside() {
        let light = ceiling_light();
        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!((light.intersect(&up).unwrap() - 2.0).abs() < 1e-5);

        // A triangle test would reject this corner region
        let corner = Ray::new(Vec3::new(0.45, 0.0, 0.45), Vec3::Y);
        assert!(light.intersect(&corner).is_some());

        let outside = Ray::new(Vec3::new(0.6, 0.0, 0.0), Vec3::Y);
        assert!(light.intersect(&outside).is_none());
    }

    #[test]
    fn test_samples_cover_parallelogram() {
        let light = ceiling_light();
        let p = light.sample_surface(0.999, 0.999);
        assert!(p.x > 0.49 && p.z > 0.49);
        assert_eq!(light.sample_surface(0.0, 0.0), light.corner());
        let bounds = light.bounding_box();
        assert!(bounds.y.min <= 2.0 && 2.0 <= bounds.y.max);
    }

    #[test]
    fn test_degenerate_light() {
        let err = AreaLight::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::X * 3.0,
            Arc::new(Material::emitting(Color::ONE, 1.0)),
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::DegenerateAreaLight);
    }
}
