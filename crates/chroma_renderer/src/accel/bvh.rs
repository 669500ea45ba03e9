//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over primitive indices. Construction splits at the median
//! centroid along the longest axis of the centroid bounds. Traversal visits
//! the child on the ray's near side first and skips any subtree whose entry
//! distance lies beyond the best hit found so far.

use chroma_math::{Aabb, Interval, Ray, Vec3};

use super::Accelerator;
use crate::geometry::{Geometry, Shape};
use crate::settings::AccelerationStructureType;

/// Maximum primitives per leaf node before splitting.
pub const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
#[derive(Debug)]
enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
        /// Split axis; `left` holds the smaller centroids on it
        axis: usize,
    },
    Leaf {
        indices: Vec<usize>,
        bbox: Aabb,
    },
    Empty,
}

/// Primitive summary used during construction.
#[derive(Clone, Copy)]
struct BuildItem {
    index: usize,
    bbox: Aabb,
    centroid: Vec3,
}

#[derive(Debug)]
pub struct Bvh {
    root: BvhNode,
}

impl Bvh {
    pub fn new(geometry: &[Geometry]) -> Self {
        let items: Vec<BuildItem> = geometry
            .iter()
            .enumerate()
            .map(|(index, g)| {
                let bbox = g.bounding_box();
                BuildItem {
                    index,
                    bbox,
                    centroid: bbox.centroid(),
                }
            })
            .collect();

        let root = if items.is_empty() {
            BvhNode::Empty
        } else {
            BvhNode::build(items)
        };
        Self { root }
    }

    /// Depth of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl BvhNode {
    /// Simple median-split approach: sort by centroid on the longest
    /// centroid axis, split in half, recurse.
    fn build(mut items: Vec<BuildItem>) -> Self {
        let n = items.len();
        let bbox = items
            .iter()
            .skip(1)
            .fold(items[0].bbox, |acc, item| Aabb::surrounding(&acc, &item.bbox));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                indices: items.iter().map(|item| item.index).collect(),
                bbox,
            };
        }

        let centroid_bounds = items
            .iter()
            .fold(Aabb::EMPTY, |acc, item| acc.include(item.centroid));
        let axis = centroid_bounds.longest_axis();

        items.sort_unstable_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));

        let right_items = items.split_off(n / 2);
        let left = Self::build(items);
        let right = Self::build(right_items);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
            axis,
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn bbox(&self) -> Option<&Aabb> {
        match self {
            BvhNode::Empty => None,
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => Some(bbox),
        }
    }

    /// Entry test clipped to `(t_min, limit]`.
    #[inline]
    fn entered(&self, ray: &Ray, limit: f32) -> bool {
        self.bbox()
            .is_some_and(|bbox| bbox.hit(ray, Interval::new(ray.t_min, limit)))
    }

    fn nearest(&self, geometry: &[Geometry], ray: &Ray, best: &mut Option<(usize, f32)>) {
        let limit = best.map_or(ray.t_max, |(_, t)| t);
        if !self.entered(ray, limit) {
            return;
        }

        match self {
            BvhNode::Empty => {}
            BvhNode::Leaf { indices, .. } => {
                for &index in indices {
                    if let Some(t) = geometry[index].intersect(ray) {
                        if best.map_or(true, |(_, best_t)| t < best_t) {
                            *best = Some((index, t));
                        }
                    }
                }
            }
            BvhNode::Branch {
                left, right, axis, ..
            } => {
                let (near, far) = if ray.sign[*axis] == 0 {
                    (left, right)
                } else {
                    (right, left)
                };
                near.nearest(geometry, ray, best);
                far.nearest(geometry, ray, best);
            }
        }
    }

    fn any(&self, geometry: &[Geometry], ray: &Ray) -> bool {
        if !self.entered(ray, ray.t_max) {
            return false;
        }

        match self {
            BvhNode::Empty => false,
            BvhNode::Leaf { indices, .. } => indices
                .iter()
                .any(|&index| !ray.is_mailboxed(index) && geometry[index].intersect(ray).is_some()),
            BvhNode::Branch {
                left, right, axis, ..
            } => {
                let (near, far) = if ray.sign[*axis] == 0 {
                    (left, right)
                } else {
                    (right, left)
                };
                near.any(geometry, ray) || far.any(geometry, ray)
            }
        }
    }
}

impl Accelerator for Bvh {
    fn nearest_hit(&self, geometry: &[Geometry], ray: &Ray) -> Option<(usize, f32)> {
        let mut best = None;
        self.root.nearest(geometry, ray, &mut best);
        best
    }

    fn any_hit(&self, geometry: &[Geometry], ray: &Ray) -> bool {
        self.root.any(geometry, ray)
    }

    fn kind(&self) -> AccelerationStructureType {
        AccelerationStructureType::Bvh
    }
}
