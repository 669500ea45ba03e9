use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    ///
    /// Flat boxes (e.g. around an axis-aligned triangle) are padded so they
    /// keep a non-zero extent on every axis.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Grow the box to include a point.
    pub fn include(&self, p: Vec3) -> Self {
        Self {
            x: Interval::new(self.x.min.min(p.x), self.x.max.max(p.x)),
            y: Interval::new(self.y.min.min(p.y), self.y.max.max(p.y)),
            z: Interval::new(self.z.min.min(p.z), self.z.max.max(p.z)),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Distance at which the ray enters this box, clipped to `ray_t`.
    ///
    /// Slab test using the ray's precomputed inverse direction and sign
    /// bits. A zero direction component makes the inverse infinite; when the
    /// origin lies exactly on that slab plane the product is `0 * inf = NaN`.
    /// `f32::max`/`f32::min` drop a NaN operand, so that axis then leaves
    /// the running interval untouched instead of poisoning it.
    pub fn hit_distance(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let mut t_min = ray_t.min;
        let mut t_max = ray_t.max;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let (near, far) = if ray.sign[axis] == 0 {
                (slab.min, slab.max)
            } else {
                (slab.max, slab.min)
            };

            let origin = ray.origin[axis];
            let inv = ray.inv_direction[axis];
            let t0 = (near - origin) * inv;
            let t1 = (far - origin) * inv;

            t_min = t0.max(t_min);
            t_max = t1.min(t_max);
            if t_max < t_min {
                return None;
            }
        }

        Some(t_min)
    }

    /// Test if a ray intersects this AABB within the given interval.
    #[inline]
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.hit_distance(ray, ray_t).is_some()
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            x: self.x.add_scalar(offset.x),
            y: self.y.add_scalar(offset.y),
            z: self.z.add_scalar(offset.z),
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_flat_box_is_padded() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert!(aabb.z.size() > 0.0);
    }

    #[test]
    fn test_aabb_surrounding_and_include() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let box2 = Aabb::from_points(Vec3::splat(3.0), Vec3::splat(10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.x.min, 0.0);
        assert_eq!(surrounding.x.max, 10.0);

        let grown = Aabb::EMPTY.include(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(grown.min(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(grown.max(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let range = Interval::new(0.0, 100.0);

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert_eq!(aabb.hit_distance(&ray, range), Some(4.0));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.hit(&ray, range));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z);
        assert!(!aabb.hit(&ray, range));
    }

    #[test]
    fn test_origin_inside_box_enters_at_range_start() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(aabb.hit_distance(&ray, Interval::new(0.0, 100.0)), Some(0.0));
    }

    #[test]
    fn test_axis_parallel_ray_on_slab_plane() {
        // Origin on the x = -1 face, direction has zero x: 0 * inf = NaN.
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(-1.0, 0.0, -5.0), Vec3::Z);

        let t = aabb.hit_distance(&ray, Interval::new(0.0, 100.0));
        assert_eq!(t, Some(4.0));
    }

    #[test]
    fn test_axis_parallel_ray_outside_slab() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(-2.0, 0.0, -5.0), Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        let ray = Ray::new(Vec3::new(-2.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_longest_axis() {
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0)).longest_axis(), 1);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)).longest_axis(), 2);
    }

    #[test]
    fn test_aabb_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let translated = aabb.translate(Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(translated.x.min, 5.0);
        assert_eq!(translated.x.max, 6.0);
        assert_eq!(translated.y.min, 0.0);
    }
}
