//! Ray query acceleration.
//!
//! An accelerator indexes the scene's primitive list and answers two
//! queries: the nearest hit along a ray, and whether anything at all blocks
//! it. Both return primitive indices into the slice they were built from,
//! so the scene owns the geometry and the accelerator only owns structure.

mod bvh;
mod list;

use std::fmt;

use chroma_math::Ray;

pub use bvh::{Bvh, LEAF_MAX_SIZE};
pub use list::PrimitiveList;

use crate::geometry::Geometry;
use crate::settings::AccelerationStructureType;

pub trait Accelerator: fmt::Debug + Send + Sync {
    /// Index and distance of the closest primitive hit inside the ray's
    /// valid range.
    fn nearest_hit(&self, geometry: &[Geometry], ray: &Ray) -> Option<(usize, f32)>;

    /// True if any primitive other than the ray's mailbox is hit inside the
    /// ray's valid range.
    fn any_hit(&self, geometry: &[Geometry], ray: &Ray) -> bool;

    fn kind(&self) -> AccelerationStructureType;
}

/// Build the accelerator of the requested kind over `geometry`.
pub fn build(kind: AccelerationStructureType, geometry: &[Geometry]) -> Box<dyn Accelerator> {
    match kind {
        AccelerationStructureType::List => Box::new(PrimitiveList::new(geometry.len())),
        AccelerationStructureType::Bvh => Box::new(Bvh::new(geometry)),
    }
}
