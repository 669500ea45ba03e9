use chroma_math::Ray;

use super::Accelerator;
use crate::geometry::{Geometry, Shape};
use crate::settings::AccelerationStructureType;

/// Brute-force scan over every primitive.
#[derive(Debug, Clone)]
pub struct PrimitiveList {
    len: usize,
}

impl PrimitiveList {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Accelerator for PrimitiveList {
    fn nearest_hit(&self, geometry: &[Geometry], ray: &Ray) -> Option<(usize, f32)> {
        geometry[..self.len]
            .iter()
            .enumerate()
            .filter_map(|(index, g)| g.intersect(ray).map(|t| (index, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn any_hit(&self, geometry: &[Geometry], ray: &Ray) -> bool {
        geometry[..self.len]
            .iter()
            .enumerate()
            .any(|(index, g)| !ray.is_mailboxed(index) && g.intersect(ray).is_some())
    }

    fn kind(&self) -> AccelerationStructureType {
        AccelerationStructureType::List
    }
}
