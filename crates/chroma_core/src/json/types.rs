//! Raw JSON shapes of the exported record files.

use serde::{Deserialize, Serialize};

/// Mesh type tag for triangle soups, the only supported kind.
pub const TRIANGULAR_MESH: &str = "TRIANGULAR_MESH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMaterial {
    pub name: String,
    pub color: [f32; 3],
    pub ior: f32,
    pub emits: f32,
    pub spec_hardness: f32,
    /// Kept as a string so unknown kinds produce a dedicated import error.
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonTriangle {
    pub p0: [f32; 3],
    pub p1: [f32; 3],
    pub p2: [f32; 3],
    pub m: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonMesh {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub triangles: Vec<JsonTriangle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCamera {
    pub position: [f32; 3],
    pub up_vector: [f32; 3],
    pub view_direction: [f32; 3],
    pub focal_length: f32,
    #[serde(default)]
    pub sensor_width: Option<f32>,
    #[serde(default)]
    pub sensor_height: Option<f32>,
}
