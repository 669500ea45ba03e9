//! Surface materials.

use std::f32::consts::TAU;

use chroma_core::{MaterialKind, MaterialRecord};
use chroma_math::{Frame, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// An immutable surface description shared between primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    kind: MaterialKind,
    color: Color,
    refractive_index: f32,
    emittance: f32,
    specular_hardness: f32,
}

impl Material {
    pub fn new(
        kind: MaterialKind,
        color: Color,
        refractive_index: f32,
        emittance: f32,
        specular_hardness: f32,
    ) -> Self {
        Self {
            kind,
            color,
            refractive_index,
            emittance,
            specular_hardness: specular_hardness.max(0.0),
        }
    }

    /// Lambertian surface with the given albedo.
    pub fn diffuse(color: Color) -> Self {
        Self::new(MaterialKind::Diffuse, color, 1.0, 0.0, 0.0)
    }

    /// Mirror (`hardness == 0`) or glossy Phong reflector.
    pub fn specular(color: Color, hardness: f32) -> Self {
        Self::new(MaterialKind::Specular, color, 1.0, 0.0, hardness)
    }

    /// Light emitter with radiance `color * emittance`.
    pub fn emitting(color: Color, emittance: f32) -> Self {
        Self::new(MaterialKind::Emitting, color, 1.0, emittance, 0.0)
    }

    pub fn from_record(record: &MaterialRecord) -> Self {
        Self::new(
            record.kind,
            record.color,
            record.refractive_index,
            record.emittance,
            record.specular_hardness,
        )
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn refractive_index(&self) -> f32 {
        self.refractive_index
    }

    pub fn specular_hardness(&self) -> f32 {
        self.specular_hardness
    }

    pub fn is_emissive(&self) -> bool {
        self.kind == MaterialKind::Emitting
    }

    /// Emitted radiance; black for non-emitters.
    pub fn emission(&self) -> Color {
        if self.is_emissive() {
            self.color * self.emittance
        } else {
            Color::ZERO
        }
    }

    /// Sample an outgoing direction for a specular bounce.
    ///
    /// `normal` must face the incoming side. Returns `None` when a glossy
    /// lobe sample ends up below the surface (the path is absorbed).
    pub fn sample_specular(&self, incoming: Vec3, normal: Vec3, u: f32, v: f32) -> Option<Vec3> {
        let mirrored = reflect(incoming, normal);
        if self.specular_hardness <= 0.0 {
            return Some(mirrored);
        }

        // Phong lobe around the mirror direction
        let cos_alpha = u.powf(1.0 / (self.specular_hardness + 1.0));
        let sin_alpha = (1.0 - cos_alpha * cos_alpha).max(0.0).sqrt();
        let phi = v * TAU;
        let local = Vec3::new(phi.cos() * sin_alpha, phi.sin() * sin_alpha, cos_alpha);
        let direction = Frame::from_normal(mirrored).to_world(local).normalize();

        (direction.dot(normal) > 0.0).then_some(direction)
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
