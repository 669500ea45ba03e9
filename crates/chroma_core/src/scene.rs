//! Scene description records.
//!
//! These are the renderer-agnostic records an importer hands to the
//! engine: an indexed material list, a flat geometry list referencing
//! materials by index, and a single camera descriptor.

use std::fmt;
use std::str::FromStr;

use chroma_math::Vec3;
use serde::{Deserialize, Serialize};

/// How a surface interacts with light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialKind {
    Diffuse,
    Specular,
    Emitting,
}

impl FromStr for MaterialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DIFFUSE" => Ok(MaterialKind::Diffuse),
            "SPECULAR" => Ok(MaterialKind::Specular),
            "EMITTING" => Ok(MaterialKind::Emitting),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaterialKind::Diffuse => "DIFFUSE",
            MaterialKind::Specular => "SPECULAR",
            MaterialKind::Emitting => "EMITTING",
        };
        f.write_str(name)
    }
}

/// A material definition as exported by the scene tools.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialRecord {
    /// Material name (for logging only)
    pub name: String,

    pub kind: MaterialKind,

    /// Base color (RGB, 0-1)
    pub color: Vec3,

    pub refractive_index: f32,

    /// Emitted radiance scale, multiplied with `color` for emitters
    pub emittance: f32,

    /// Phong exponent for glossy specular surfaces; 0 means perfect mirror
    pub specular_hardness: f32,
}

impl MaterialRecord {
    pub fn diffuse(name: impl Into<String>, color: Vec3) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Diffuse,
            color,
            refractive_index: 1.0,
            emittance: 0.0,
            specular_hardness: 0.0,
        }
    }

    pub fn specular(name: impl Into<String>, color: Vec3, specular_hardness: f32) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Specular,
            color,
            refractive_index: 1.0,
            emittance: 0.0,
            specular_hardness,
        }
    }

    pub fn emitting(name: impl Into<String>, color: Vec3, emittance: f32) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Emitting,
            color,
            refractive_index: 1.0,
            emittance,
            specular_hardness: 0.0,
        }
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.kind == MaterialKind::Emitting
    }
}

/// One primitive of the scene. `material` indexes `SceneDescription::materials`.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryRecord {
    Triangle {
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        material: usize,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        material: usize,
    },
    /// Parallelogram emitter spanned by two edges from a corner.
    AreaLight {
        corner: Vec3,
        edge_u: Vec3,
        edge_v: Vec3,
        material: usize,
    },
}

impl GeometryRecord {
    pub fn material(&self) -> usize {
        match self {
            GeometryRecord::Triangle { material, .. }
            | GeometryRecord::Sphere { material, .. }
            | GeometryRecord::AreaLight { material, .. } => *material,
        }
    }
}

/// Pinhole camera placement.
///
/// Lengths are in scene units (meters for exported scenes).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDescriptor {
    pub position: Vec3,
    pub up_vector: Vec3,
    pub view_direction: Vec3,
    pub focal_length: f32,
    pub sensor_width: f32,
    pub sensor_height: f32,
}

impl CameraDescriptor {
    /// Default physical sensor edge (35mm film width).
    pub const DEFAULT_SENSOR_SIZE: f32 = 0.036;

    pub fn new(position: Vec3, up_vector: Vec3, view_direction: Vec3, focal_length: f32) -> Self {
        Self {
            position,
            up_vector,
            view_direction,
            focal_length,
            sensor_width: Self::DEFAULT_SENSOR_SIZE,
            sensor_height: Self::DEFAULT_SENSOR_SIZE,
        }
    }

    pub fn with_sensor(mut self, sensor_width: f32, sensor_height: f32) -> Self {
        self.sensor_width = sensor_width;
        self.sensor_height = sensor_height;
        self
    }
}

impl Default for CameraDescriptor {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Y, Vec3::NEG_Z, 0.035)
    }
}

/// Everything the renderer needs to build a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    pub name: String,
    pub materials: Vec<MaterialRecord>,
    pub geometry: Vec<GeometryRecord>,
    pub camera: CameraDescriptor,
}

impl SceneDescription {
    pub fn new(name: impl Into<String>, camera: CameraDescriptor) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
            geometry: Vec::new(),
            camera,
        }
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: MaterialRecord) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_geometry(&mut self, geometry: GeometryRecord) {
        self.geometry.push(geometry);
    }

    pub fn extend_geometry(&mut self, geometry: impl IntoIterator<Item = GeometryRecord>) {
        self.geometry.extend(geometry);
    }

    /// Number of records whose material emits light.
    pub fn light_count(&self) -> usize {
        self.geometry
            .iter()
            .filter(|g| {
                self.materials
                    .get(g.material())
                    .is_some_and(MaterialRecord::is_emissive)
            })
            .count()
    }
}
