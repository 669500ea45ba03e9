//! Chroma Core - scene records and exported-scene loading.
//!
//! This crate provides:
//!
//! - **Scene records**: `SceneDescription`, `MaterialRecord`,
//!   `GeometryRecord`, `CameraDescriptor`
//! - **JSON support**: loading of the `.mat.json` / `.mesh.json` /
//!   `.cam.json` record sets written by the Blender export script
//!
//! # Example
//!
//! ```ignore
//! use chroma_core::json::load_scene;
//!
//! let scene = load_scene("scenes", "cornell")?;
//! println!("Loaded {} primitives, {} lights",
//!     scene.geometry.len(),
//!     scene.light_count());
//! ```

pub mod json;
pub mod scene;

// Re-export commonly used types
pub use json::{load_scene, load_scene_from_strings, ImportError, ImportResult};
pub use scene::{CameraDescriptor, GeometryRecord, MaterialKind, MaterialRecord, SceneDescription};
