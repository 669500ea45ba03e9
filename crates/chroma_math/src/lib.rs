//! Chroma math primitives.
//!
//! Re-exports `glam` for vectors and matrices and adds the ray tracing
//! specific types: parametric intervals, axis-aligned boxes, rays with
//! precomputed slab data and local shading frames.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod frame;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use frame::{orthonormalize_basis, Frame};
pub use interval::Interval;
pub use ray::{Ray, EPSILON};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.max_element(), 3.0);
    }

    #[test]
    fn test_zero_vector_cannot_be_normalized() {
        assert!(Vec3::ZERO.try_normalize().is_none());
    }
}
