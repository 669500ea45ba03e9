//! Loading of exported scene record sets.
//!
//! A scene named `foo` is stored as three sibling files:
//!
//! - `foo.mat.json`: array of materials
//!   (`name`, `color`, `ior`, `emits`, `specHardness`, `type`)
//! - `foo.mesh.json`: array of meshes; only `TRIANGULAR_MESH` is supported,
//!   each triangle is `{p0, p1, p2, m}` with `m` a material index
//! - `foo.cam.json`: `{position, upVector, viewDirection, focalLength}`,
//!   with `focalLength` a Blender lens unless `sensorWidth` is given
//!
//! Binary record sets are not supported.

mod loader;
mod types;

pub use loader::*;
pub use types::*;
