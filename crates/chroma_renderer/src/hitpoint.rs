//! Ray-surface intersection records.

use std::f32::consts::TAU;

use chroma_math::{Frame, Ray, Vec3, EPSILON};

use crate::context::RenderContext;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::settings::HemisphereSampling;

/// A point on a primitive, either where a ray hit it or drawn as a light
/// sample.
#[derive(Debug, Clone, Copy)]
pub struct Hitpoint<'a> {
    /// Index of the primitive in the scene's geometry list
    pub index: usize,
    pub geometry: &'a Geometry,
    /// Ray parameter of the hit; zero for light samples
    pub distance: f32,
    pub point: Vec3,
    /// Unit normal. Faces the incoming ray for ray hits, outward for light
    /// samples.
    pub normal: Vec3,
    /// Reciprocal of the sampling density that produced this point.
    pub inverse_sample_weight: f32,
}

impl<'a> Hitpoint<'a> {
    pub fn material(&self) -> &'a Material {
        self.geometry.material()
    }

    /// Hit point pushed off the surface along the normal.
    #[inline]
    pub fn offset_point(&self) -> Vec3 {
        self.point + self.normal * EPSILON
    }

    /// Ray leaving the surface on the normal side, mailboxed with this
    /// primitive.
    pub fn spawn_ray(&self, direction: Vec3) -> Ray {
        Ray::new(self.offset_point(), direction).with_mailbox(self.index)
    }

    pub fn frame(&self) -> Frame {
        Frame::from_normal(self.normal)
    }

    /// Draw a world-space direction over the hemisphere around the normal.
    ///
    /// Returns the direction and the cosine to the normal.
    pub fn sample_hemisphere(&self, sampling: HemisphereSampling, ctx: &mut RenderContext) -> (Vec3, f32) {
        let u = ctx.random_f32();
        let v = ctx.random_f32();
        let local = match sampling {
            HemisphereSampling::Cosine => cosine_hemisphere(u, v),
            HemisphereSampling::Uniform => uniform_hemisphere(u, v),
        };
        (self.frame().to_world(local).normalize(), local.z)
    }
}

/// Local-frame direction with density `1 / 2π`.
pub fn uniform_hemisphere(u: f32, v: f32) -> Vec3 {
    let z = u;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = TAU * v;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Local-frame direction with density `cos θ / π`.
pub fn cosine_hemisphere(u: f32, v: f32) -> Vec3 {
    let r = u.sqrt();
    let phi = TAU * v;
    Vec3::new(r * phi.cos(), r * phi.sin(), (1.0 - u).max(0.0).sqrt())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::Sphere;
    use crate::material::Color;

    #[test]
    fn test_hemisphere_samples_are_unit_and_upward() {
        for i in 0..8 {
            for j in 0..8 {
                let (u, v) = (i as f32 / 8.0, j as f32 / 8.0);
                for d in [uniform_hemisphere(u, v), cosine_hemisphere(u, v)] {
                    assert!((d.length() - 1.0).abs() < 1e-5);
                    assert!(d.z >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_cosine_samples_mean_cosine() {
        // E[cos] under the cosine density is 2/3
        let n = 256;
        let mut sum = 0.0;
        for i in 0..n {
            let u = (i as f32 + 0.5) / n as f32;
            sum += cosine_hemisphere(u, 0.3).z;
        }
        assert!((sum / n as f32 - 2.0 / 3.0).abs() < 1e-2);
    }

    #[test]
    fn test_world_samples_follow_normal() {
        let geometry = Geometry::Sphere(
            Sphere::new(Vec3::ZERO, 1.0, Arc::new(Material::diffuse(Color::ONE))).unwrap(),
        );
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let hit = Hitpoint {
            index: 0,
            geometry: &geometry,
            distance: 1.0,
            point: normal,
            normal,
            inverse_sample_weight: 1.0,
        };

        let mut ctx = RenderContext::new(5, 0);
        for sampling in [HemisphereSampling::Cosine, HemisphereSampling::Uniform] {
            for _ in 0..64 {
                let (d, cos) = hit.sample_hemisphere(sampling, &mut ctx);
                assert!((d.dot(normal) - cos).abs() < 1e-4);
                assert!(cos >= 0.0);
            }
        }

        let ray = hit.spawn_ray(normal);
        assert!(ray.is_mailboxed(0));
        assert!(ray.origin.length() > 1.0);
    }
}
