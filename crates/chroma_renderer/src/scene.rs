//! Renderable scene: primitives, lights and the acceleration structure.

use std::sync::Arc;

use chroma_core::SceneDescription;
use chroma_math::Ray;

use crate::accel::{self, Accelerator};
use crate::context::RenderContext;
use crate::error::SceneError;
use crate::geometry::{Geometry, Shape};
use crate::hitpoint::Hitpoint;
use crate::material::Material;
use crate::settings::AccelerationStructureType;

#[derive(Debug)]
pub struct Scene {
    name: String,
    geometry: Vec<Geometry>,
    /// Indices of emitting primitives
    lights: Vec<usize>,
    accelerator: Box<dyn Accelerator>,
}

impl Scene {
    pub fn new(
        name: impl Into<String>,
        geometry: Vec<Geometry>,
        acceleration_structure: AccelerationStructureType,
    ) -> Self {
        let name = name.into();
        let lights: Vec<usize> = geometry
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_emitter())
            .map(|(index, _)| index)
            .collect();
        let accelerator = accel::build(acceleration_structure, &geometry);

        log::info!(
            "Scene '{}': {} primitives, {} lights, {} acceleration",
            name,
            geometry.len(),
            lights.len(),
            acceleration_structure
        );

        Self {
            name,
            geometry,
            lights,
            accelerator,
        }
    }

    /// Convert imported records into primitives.
    ///
    /// Records that reference a missing material are an error. Degenerate
    /// records are skipped with a warning.
    pub fn from_description(
        description: &SceneDescription,
        acceleration_structure: AccelerationStructureType,
    ) -> Result<Self, SceneError> {
        let materials: Vec<Arc<Material>> = description
            .materials
            .iter()
            .map(|record| Arc::new(Material::from_record(record)))
            .collect();

        let mut geometry = Vec::with_capacity(description.geometry.len());
        for (i, record) in description.geometry.iter().enumerate() {
            let material = materials
                .get(record.material())
                .ok_or(SceneError::MissingMaterial {
                    index: record.material(),
                    count: materials.len(),
                })?;

            match Geometry::from_record(record, Arc::clone(material)) {
                Ok(g) => geometry.push(g),
                Err(err) => log::warn!("Skipping geometry record {}: {}", i, err),
            }
        }

        Ok(Self::new(description.name.clone(), geometry, acceleration_structure))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &[Geometry] {
        &self.geometry
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn acceleration_structure(&self) -> AccelerationStructureType {
        self.accelerator.kind()
    }

    /// Rebuild the acceleration structure if `kind` differs from the
    /// current one.
    pub fn rebuild_acceleration_structure(&mut self, kind: AccelerationStructureType) {
        if self.accelerator.kind() == kind {
            return;
        }
        log::info!("Rebuilding acceleration structure: {} -> {}", self.accelerator.kind(), kind);
        self.accelerator = accel::build(kind, &self.geometry);
    }

    /// Check the scene can produce an image.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.lights.is_empty() {
            return Err(SceneError::NoLightSources);
        }
        Ok(())
    }

    /// Closest hit along the ray, with the normal turned toward the ray
    /// origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Hitpoint<'_>> {
        let (index, distance) = self.accelerator.nearest_hit(&self.geometry, ray)?;
        let geometry = &self.geometry[index];
        let point = ray.at(distance);
        let outward = geometry.normal_at(point);
        let normal = if outward.dot(ray.direction) > 0.0 {
            -outward
        } else {
            outward
        };

        Some(Hitpoint {
            index,
            geometry,
            distance,
            point,
            normal,
            inverse_sample_weight: 1.0,
        })
    }

    /// True if something other than the ray's mailbox blocks the ray inside
    /// its valid range.
    pub fn is_obstructed(&self, ray: &Ray) -> bool {
        self.accelerator.any_hit(&self.geometry, ray)
    }

    /// Pick a light uniformly, then a point uniformly on its surface.
    ///
    /// The returned hitpoint carries the outward normal and an inverse
    /// sample weight of `area * light count`.
    pub fn sample_light(&self, ctx: &mut RenderContext) -> Option<Hitpoint<'_>> {
        if self.lights.is_empty() {
            return None;
        }

        let pick = ((ctx.random_f32() * self.lights.len() as f32) as usize).min(self.lights.len() - 1);
        let index = self.lights[pick];
        let geometry = &self.geometry[index];
        let point = geometry.sample_surface(ctx.random_f32(), ctx.random_f32());

        Some(Hitpoint {
            index,
            geometry,
            distance: 0.0,
            point,
            normal: geometry.normal_at(point),
            inverse_sample_weight: geometry.area() * self.lights.len() as f32,
        })
    }
}
