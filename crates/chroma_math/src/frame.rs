use crate::{Mat3, Vec3};

/// Local orthonormal shading frame around a surface normal.
///
/// `n` is the normal, `t1`/`t2` span the tangent plane. Hemisphere samples
/// are generated in (t1, t2, n) coordinates and mapped to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub t1: Vec3,
    pub t2: Vec3,
    pub n: Vec3,
}

impl Frame {
    /// Build a frame from a unit-length normal.
    pub fn from_normal(n: Vec3) -> Self {
        let (t1, t2) = n.any_orthonormal_pair();
        Self { t1, t2, n }
    }

    /// Map a local (t1, t2, n) direction to world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.t1 * local.x + self.t2 * local.y + self.n * local.z
    }
}

/// Gram-Schmidt re-orthonormalization of a camera basis.
///
/// Columns are (right, up, forward). Forward is kept as the reference
/// direction, up is made perpendicular to it and right is rebuilt from the
/// two, which removes drift accumulated by repeated incremental rotations.
pub fn orthonormalize_basis(basis: Mat3) -> Mat3 {
    let forward = basis.z_axis.normalize();
    let up = (basis.y_axis - forward * forward.dot(basis.y_axis)).normalize();
    let right = forward.cross(up);
    Mat3::from_cols(right, up, forward)
}
