//! Pinhole camera for primary ray generation.

use chroma_core::CameraDescriptor;
use chroma_math::{orthonormalize_basis, EulerRot, Mat3, Ray, Vec3};

use crate::context::RenderContext;
use crate::error::SceneError;

/// Pinhole camera with a physical sensor.
///
/// The basis columns are (right, up, forward). Rays leave the eye position
/// through points on a sensor placed `focal_length` along forward. Pixel
/// (0, 0) is the top-left corner of the image.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    basis: Mat3,
    focal_length: f32,
    sensor_width: f32,
    sensor_height: f32,

    // Image settings
    width: u32,
    height: u32,
    pixel_width: f32,
    pixel_height: f32,

    // Pose restored by reset_to_initial()
    initial_position: Vec3,
    initial_basis: Mat3,
}

impl Camera {
    pub fn new(descriptor: &CameraDescriptor, width: u32, height: u32) -> Result<Self, SceneError> {
        let forward = descriptor
            .view_direction
            .try_normalize()
            .ok_or(SceneError::DegenerateCamera)?;
        let up = (descriptor.up_vector - forward * forward.dot(descriptor.up_vector))
            .try_normalize()
            .ok_or(SceneError::DegenerateCamera)?;
        let valid = |x: f32| x > 0.0 && x.is_finite();
        if !(valid(descriptor.focal_length)
            && valid(descriptor.sensor_width)
            && valid(descriptor.sensor_height))
        {
            return Err(SceneError::DegenerateCamera);
        }

        let basis = Mat3::from_cols(forward.cross(up), up, forward);
        let mut camera = Self {
            position: descriptor.position,
            basis,
            focal_length: descriptor.focal_length,
            sensor_width: descriptor.sensor_width,
            sensor_height: descriptor.sensor_height,
            width: 1,
            height: 1,
            pixel_width: descriptor.sensor_width,
            pixel_height: descriptor.sensor_height,
            initial_position: descriptor.position,
            initial_basis: basis,
        };
        camera.recalibrate_sensor(width, height);
        Ok(camera)
    }

    /// Adapt the pixel pitch to a new image resolution. The physical sensor
    /// size stays the same.
    pub fn recalibrate_sensor(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.pixel_width = self.sensor_width / self.width as f32;
        self.pixel_height = self.sensor_height / self.height as f32;
    }

    /// Ray through the center of pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32) -> Ray {
        self.ray_through(x as f32 + 0.5, y as f32 + 0.5)
    }

    /// Ray through a uniformly random point of pixel (x, y).
    pub fn get_jittered_ray(&self, x: u32, y: u32, ctx: &mut RenderContext) -> Ray {
        let dx = ctx.random_f32();
        let dy = ctx.random_f32();
        self.ray_through(x as f32 + dx, y as f32 + dy)
    }

    /// Ray through continuous image coordinates `(px, py)`, in pixels.
    fn ray_through(&self, px: f32, py: f32) -> Ray {
        let sx = px * self.pixel_width - 0.5 * self.sensor_width;
        let sy = 0.5 * self.sensor_height - py * self.pixel_height;
        let direction = self.forward() * self.focal_length + self.right() * sx + self.up() * sy;
        Ray::new(self.position, direction.normalize())
    }

    /// Move in camera space and rotate by Euler angles (radians).
    ///
    /// `translation` is (right, up, forward). `rotation` is (yaw, pitch,
    /// roll): yaw turns about the up axis, pitch about the right axis and
    /// roll about the forward axis. The basis is re-orthonormalized
    /// afterwards.
    pub fn move_by(&mut self, translation: Vec3, rotation: Vec3) {
        self.position += self.basis * translation;
        let local = Mat3::from_euler(EulerRot::YXZ, rotation.x, rotation.y, rotation.z);
        self.basis = orthonormalize_basis(self.basis * local);
    }

    /// Restore the pose the camera was constructed with.
    pub fn reset_to_initial(&mut self) {
        self.position = self.initial_position;
        self.basis = self.initial_basis;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn basis(&self) -> Mat3 {
        self.basis
    }

    pub fn right(&self) -> Vec3 {
        self.basis.x_axis
    }

    pub fn up(&self) -> Vec3 {
        self.basis.y_axis
    }

    pub fn forward(&self) -> Vec3 {
        self.basis.z_axis
    }

    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
