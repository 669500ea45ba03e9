use crate::Vec3;

/// Offset used to push spawned rays off surfaces and to shrink shadow ray
/// intervals, so a surface never re-intersects itself numerically.
pub const EPSILON: f32 = 1e-4;

/// A ray with precomputed slab-test data.
///
/// The parametric range `[t_min, t_max]` bounds valid hits. The inverse
/// direction and per-axis sign bits are computed once at construction and
/// used by every bounding box test along the traversal. Zero direction
/// components yield signed infinities in `inv_direction`.
///
/// Apart from the builder-style annotations (`with_mailbox`,
/// `with_sample_weight`, `with_transparency`) a ray never changes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
    /// 1 where the direction component is negative, 0 otherwise.
    pub sign: [usize; 3],
    pub t_min: f32,
    pub t_max: f32,
    /// Index of the primitive this ray starts on, skipped by shadow queries.
    pub mailbox: Option<usize>,
    pub sample_weight: f32,
    pub transparent: bool,
}

impl Ray {
    /// Create a ray valid over `(EPSILON, f32::MAX]`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::bounded(origin, direction, EPSILON, f32::MAX)
    }

    /// Create a ray valid over `(t_min, t_max]`.
    pub fn bounded(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        let inv_direction = direction.recip();
        let sign = [
            usize::from(inv_direction.x < 0.0),
            usize::from(inv_direction.y < 0.0),
            usize::from(inv_direction.z < 0.0),
        ];

        Self {
            origin,
            direction,
            inv_direction,
            sign,
            t_min,
            t_max,
            mailbox: None,
            sample_weight: 1.0,
            transparent: false,
        }
    }

    /// Tag the ray with the primitive it leaves from.
    #[inline]
    pub fn with_mailbox(mut self, primitive: usize) -> Self {
        self.mailbox = Some(primitive);
        self
    }

    #[inline]
    pub fn with_sample_weight(mut self, sample_weight: f32) -> Self {
        self.sample_weight = sample_weight;
        self
    }

    #[inline]
    pub fn with_transparency(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True if `t` lies in `(t_min, t_max]`.
    #[inline]
    pub fn is_on_ray(&self, t: f32) -> bool {
        t > self.t_min && t <= self.t_max
    }

    /// Whether `primitive` is the one this ray is mailboxed with.
    #[inline]
    pub fn is_mailboxed(&self, primitive: usize) -> bool {
        self.mailbox == Some(primitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_precomputes_inverse_and_signs() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, -4.0, 0.0));

        assert_eq!(ray.inv_direction.x, 0.5);
        assert_eq!(ray.inv_direction.y, -0.25);
        assert_eq!(ray.inv_direction.z, f32::INFINITY);
        assert_eq!(ray.sign, [0, 1, 0]);
    }

    #[test]
    fn test_negative_zero_direction_has_negative_sign() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.0, 0.0));
        assert_eq!(ray.inv_direction.y, f32::NEG_INFINITY);
        assert_eq!(ray.sign[1], 1);
    }

    #[test]
    fn test_ray_interval_is_half_open() {
        let ray = Ray::bounded(Vec3::ZERO, Vec3::Z, 1.0, 5.0);

        assert!(!ray.is_on_ray(1.0));
        assert!(ray.is_on_ray(1.5));
        assert!(ray.is_on_ray(5.0));
        assert!(!ray.is_on_ray(5.1));
    }

    #[test]
    fn test_ray_annotations() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y)
            .with_mailbox(7)
            .with_sample_weight(0.5)
            .with_transparency(true);

        assert!(ray.is_mailboxed(7));
        assert!(!ray.is_mailboxed(3));
        assert_eq!(ray.sample_weight, 0.5);
        assert!(ray.transparent);
    }
}
