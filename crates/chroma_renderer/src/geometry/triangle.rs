//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use chroma_math::{Aabb, Mat3, Ray, Vec3};

use super::{edge_plane_hit, Shape};
use crate::error::GeometryError;
use crate::material::Material;

#[derive(Debug, Clone)]
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    area: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a triangle from three vertices. Fails when the vertices are
    /// collinear or coincide.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Result<Self, GeometryError> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let cross = edge1.cross(edge2);
        let length = cross.length();

        if !(length > 1e-12 && length.is_finite()) {
            return Err(GeometryError::DegenerateTriangle);
        }

        Ok(Self {
            v0,
            edge1,
            edge2,
            normal: cross / length,
            area: 0.5 * length,
            material,
            bbox: Self::bounds(v0, v1, v2),
        })
    }

    fn bounds(v0: Vec3, v1: Vec3, v2: Vec3) -> Aabb {
        Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2))
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v0 + self.edge1, self.v0 + self.edge2]
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub(crate) fn translated(&self, offset: Vec3) -> Self {
        Self {
            v0: self.v0 + offset,
            bbox: self.bbox.translate(offset),
            ..self.clone()
        }
    }

    pub(crate) fn rotated(&self, rotation: &Mat3) -> Self {
        let v0 = *rotation * self.v0;
        let edge1 = *rotation * self.edge1;
        let edge2 = *rotation * self.edge2;
        Self {
            v0,
            edge1,
            edge2,
            normal: (*rotation * self.normal).normalize(),
            bbox: Self::bounds(v0, v0 + edge1, v0 + edge2),
            ..self.clone()
        }
    }
}

impl Shape for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        edge_plane_hit(ray, self.v0, self.edge1, self.edge2)
            .and_then(|(t, u, v)| (u + v <= 1.0).then_some(t))
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn sample_surface(&self, u: f32, v: f32) -> Vec3 {
        let su = u.sqrt();
        self.v0 + self.edge1 * (su * (1.0 - v)) + self.edge2 * (su * v)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
