//! High-level loading of exported record sets into a `SceneDescription`.

use std::fs;
use std::path::Path;

use chroma_math::Vec3;
use thiserror::Error;

use crate::json::types::{JsonCamera, JsonMaterial, JsonMesh, TRIANGULAR_MESH};
use crate::scene::{CameraDescriptor, GeometryRecord, MaterialKind, MaterialRecord, SceneDescription};

/// Errors that can occur while importing a scene.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown material type: {0}")]
    UnknownMaterialType(String),

    #[error("Unsupported mesh type: {0} (only TRIANGULAR_MESH is supported)")]
    UnsupportedMeshType(String),

    #[error("Material index {index} out of range ({count} materials)")]
    MaterialIndexOutOfRange { index: usize, count: usize },

    #[error("No geometry found in scene")]
    NoGeometry,
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Load the record set `<dir>/<scene_name>.{mat,mesh,cam}.json`.
pub fn load_scene<P: AsRef<Path>>(dir: P, scene_name: &str) -> ImportResult<SceneDescription> {
    let dir = dir.as_ref();
    let read = |suffix: &str| fs::read_to_string(dir.join(format!("{scene_name}.{suffix}.json")));

    let materials = read("mat")?;
    let meshes = read("mesh")?;
    let camera = read("cam")?;

    load_scene_from_strings(scene_name, &materials, &meshes, &camera)
}

/// Build a scene from the contents of the three record files.
pub fn load_scene_from_strings(
    scene_name: &str,
    materials_json: &str,
    meshes_json: &str,
    camera_json: &str,
) -> ImportResult<SceneDescription> {
    let materials = parse_materials(materials_json)?;
    let geometry = parse_meshes(meshes_json, materials.len())?;
    let camera = parse_camera(camera_json)?;

    if geometry.is_empty() {
        return Err(ImportError::NoGeometry);
    }

    log::info!(
        "Imported scene '{}': {} materials, {} triangles",
        scene_name,
        materials.len(),
        geometry.len()
    );

    Ok(SceneDescription {
        name: scene_name.to_string(),
        materials,
        geometry,
        camera,
    })
}

/// Parse the material array.
pub fn parse_materials(json: &str) -> ImportResult<Vec<MaterialRecord>> {
    let raw: Vec<JsonMaterial> = serde_json::from_str(json)?;

    raw.into_iter()
        .map(|m| {
            let kind: MaterialKind = m.kind.parse().map_err(ImportError::UnknownMaterialType)?;
            log::debug!("Material '{}' identified as {}", m.name, kind);
            Ok(MaterialRecord {
                name: m.name,
                kind,
                color: Vec3::from_array(m.color),
                refractive_index: m.ior,
                emittance: m.emits,
                specular_hardness: m.spec_hardness,
            })
        })
        .collect()
}

/// Parse the mesh array into triangle records, validating material indices.
pub fn parse_meshes(json: &str, material_count: usize) -> ImportResult<Vec<GeometryRecord>> {
    let raw: Vec<JsonMesh> = serde_json::from_str(json)?;
    let mut result = Vec::new();

    for mesh in raw {
        if mesh.kind != TRIANGULAR_MESH {
            return Err(ImportError::UnsupportedMeshType(mesh.kind));
        }

        for triangle in mesh.triangles {
            if triangle.m >= material_count {
                return Err(ImportError::MaterialIndexOutOfRange {
                    index: triangle.m,
                    count: material_count,
                });
            }
            result.push(GeometryRecord::Triangle {
                p0: Vec3::from_array(triangle.p0),
                p1: Vec3::from_array(triangle.p1),
                p2: Vec3::from_array(triangle.p2),
                material: triangle.m,
            });
        }
    }

    Ok(result)
}

/// Sensor width Blender assumes when exporting a lens, in meters.
pub const BLENDER_SENSOR_WIDTH: f32 = 0.032;

/// Parse the single camera object.
///
/// `focalLength` is the Blender lens in meters. Without an explicit sensor
/// it is rescaled from Blender's 32mm sensor to the 36mm default so the
/// field of view survives the import.
pub fn parse_camera(json: &str) -> ImportResult<CameraDescriptor> {
    let raw: JsonCamera = serde_json::from_str(json)?;

    let focal_length = match raw.sensor_width {
        Some(_) => raw.focal_length,
        None => raw.focal_length * (CameraDescriptor::DEFAULT_SENSOR_SIZE / BLENDER_SENSOR_WIDTH),
    };
    let camera = CameraDescriptor::new(
        Vec3::from_array(raw.position),
        Vec3::from_array(raw.up_vector),
        Vec3::from_array(raw.view_direction),
        focal_length,
    );

    Ok(camera.with_sensor(
        raw.sensor_width.unwrap_or(CameraDescriptor::DEFAULT_SENSOR_SIZE),
        raw.sensor_height.unwrap_or(CameraDescriptor::DEFAULT_SENSOR_SIZE),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATERIALS: &str = r#"[
        {"name": "Wall", "color": [0.9, 0.85, 0.8], "ior": 1.0, "emits": 0.0, "specHardness": 0.0, "type": "DIFFUSE"},
        {"name": "Lamp", "color": [1.0, 1.0, 1.0], "ior": 1.0, "emits": 25.0, "specHardness": 0.0, "type": "EMITTING"}
    ]"#;

    const MESHES: &str = r#"[
        {"type": "TRIANGULAR_MESH", "triangles": [
            {"p0": [0, 0, 0], "p1": [1, 0, 0], "p2": [0, 1, 0], "m": 0},
            {"p0": [0, 2, 0], "p1": [1, 2, 0], "p2": [0, 2, 1], "m": 1}
        ]}
    ]"#;

    const CAMERA: &str = r#"{
        "position": [0, 0, 5], "upVector": [0, 1, 0], "viewDirection": [0, 0, -1], "focalLength": 0.05
    }"#;

    #[test]
    fn test_load_from_strings() {
        let _ = env_logger::builder().is_test(true).try_init();

        let scene = load_scene_from_strings("box", MATERIALS, MESHES, CAMERA).unwrap();

        assert_eq!(scene.name, "box");
        assert_eq!(scene.materials.len(), 2);
        assert_eq!(scene.materials[1].kind, MaterialKind::Emitting);
        assert_eq!(scene.materials[1].emittance, 25.0);
        assert_eq!(scene.geometry.len(), 2);
        assert_eq!(scene.light_count(), 1);
        assert_eq!(scene.camera.view_direction, Vec3::NEG_Z);
        assert_eq!(scene.camera.sensor_width, CameraDescriptor::DEFAULT_SENSOR_SIZE);
    }

    #[test]
    fn test_unknown_material_type() {
        let json = r#"[{"name": "Glass", "color": [1, 1, 1], "ior": 1.5, "emits": 0, "specHardness": 0, "type": "GLASS"}]"#;
        let err = parse_materials(json).unwrap_err();
        assert!(matches!(err, ImportError::UnknownMaterialType(kind) if kind == "GLASS"));
    }

    #[test]
    fn test_unsupported_mesh_type() {
        let json = r#"[{"type": "NURBS"}]"#;
        let err = parse_meshes(json, 1).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedMeshType(_)));
    }

    #[test]
    fn test_material_index_out_of_range() {
        let err = parse_meshes(MESHES, 1).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MaterialIndexOutOfRange { index: 1, count: 1 }
        ));
    }

    #[test]
    fn test_empty_scene_is_rejected() {
        let err = load_scene_from_strings("empty", MATERIALS, "[]", CAMERA).unwrap_err();
        assert!(matches!(err, ImportError::NoGeometry));
    }

    #[test]
    fn test_blender_lens_keeps_field_of_view() {
        let camera = parse_camera(CAMERA).unwrap();
        // 50mm on a 32mm sensor is 56.25mm on a 36mm sensor
        assert!((camera.focal_length - 0.05625).abs() < 1e-6);
        let blender_ratio = 0.05 / BLENDER_SENSOR_WIDTH;
        assert!((camera.focal_length / camera.sensor_width - blender_ratio).abs() < 1e-5);

        let explicit = r#"{
            "position": [0, 0, 5], "upVector": [0, 1, 0], "viewDirection": [0, 0, -1],
            "focalLength": 0.05, "sensorWidth": 0.07, "sensorHeight": 0.07
        }"#;
        let camera = parse_camera(explicit).unwrap();
        assert_eq!(camera.focal_length, 0.05);
        assert_eq!(camera.sensor_width, 0.07);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_camera("{"), Err(ImportError::Json(_))));
    }

    #[test]
    fn test_missing_files() {
        let err = load_scene(std::env::temp_dir(), "chroma-scene-that-does-not-exist").unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
