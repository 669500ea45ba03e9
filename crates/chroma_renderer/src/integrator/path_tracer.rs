//! Monte Carlo path tracing with next-event estimation.
//!
//! At every diffuse hit one light sample is connected to the surface by a
//! shadow ray (the direct term) and one hemisphere direction is followed
//! (the indirect term). Emitters found by such indirect bounces are not
//! counted again while direct light estimation is on. Paths end when they
//! reach `max_ray_depth` segments, leave the scene, or hit an emitter.

use std::f32::consts::FRAC_1_PI;

use chroma_core::MaterialKind;
use chroma_math::{Ray, EPSILON};

use super::{Integrator, PassInput};
use crate::context::RenderContext;
use crate::hitpoint::Hitpoint;
use crate::material::Color;
use crate::scene::Scene;
use crate::settings::{HemisphereSampling, Settings};

/// Upper bound of `G * max(albedo)` for one light sample.
const PRECISION_BOUND: f32 = 10.0;

/// Surface type a path segment starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Camera,
    Diffuse,
    Specular,
}

#[derive(Debug, Clone)]
pub struct MonteCarloPathTracer {
    max_ray_depth: u32,
    direct_light_estimation: bool,
    hemisphere_sampling: HemisphereSampling,
}

impl MonteCarloPathTracer {
    pub fn new(
        max_ray_depth: u32,
        direct_light_estimation: bool,
        hemisphere_sampling: HemisphereSampling,
    ) -> Self {
        Self {
            max_ray_depth,
            direct_light_estimation,
            hemisphere_sampling,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.max_ray_depth,
            settings.direct_light_estimation,
            settings.hemisphere_sampling,
        )
    }

    fn radiance(
        &self,
        scene: &Scene,
        ray: &Ray,
        depth: u32,
        weight: Color,
        origin: Origin,
        ctx: &mut RenderContext,
    ) -> Color {
        if depth >= self.max_ray_depth {
            return Color::ZERO;
        }

        ctx.count_ray();
        let Some(hit) = scene.intersect(ray) else {
            return Color::ZERO;
        };
        let material = hit.material();

        match material.kind() {
            MaterialKind::Emitting => {
                if self.direct_light_estimation && origin == Origin::Diffuse {
                    Color::ZERO
                } else {
                    material.emission() * weight
                }
            }

            MaterialKind::Diffuse => {
                let albedo = material.color();
                let mut color = if self.direct_light_estimation {
                    self.direct_light(scene, &hit, weight, ctx)
                } else {
                    Color::ZERO
                };

                if depth + 1 < self.max_ray_depth && albedo.max_element() > 0.0 {
                    let (direction, cos) = hit.sample_hemisphere(self.hemisphere_sampling, ctx);
                    // BRDF * cos / pdf
                    let bounce = match self.hemisphere_sampling {
                        HemisphereSampling::Cosine => albedo,
                        HemisphereSampling::Uniform => albedo * (2.0 * cos),
                    };
                    color += self.radiance(
                        scene,
                        &hit.spawn_ray(direction),
                        depth + 1,
                        weight * bounce,
                        Origin::Diffuse,
                        ctx,
                    );
                }
                color
            }

            MaterialKind::Specular => {
                if depth + 1 >= self.max_ray_depth {
                    return Color::ZERO;
                }
                let (u, v) = (ctx.random_f32(), ctx.random_f32());
                match material.sample_specular(ray.direction, hit.normal, u, v) {
                    Some(direction) => self.radiance(
                        scene,
                        &hit.spawn_ray(direction),
                        depth + 1,
                        weight * material.color(),
                        Origin::Specular,
                        ctx,
                    ),
                    None => Color::ZERO,
                }
            }
        }
    }

    /// Next-event estimate at a diffuse hit.
    fn direct_light(&self, scene: &Scene, hit: &Hitpoint<'_>, weight: Color, ctx: &mut RenderContext) -> Color {
        match scene.sample_light(ctx) {
            Some(light) => light_contribution(scene, hit, &light, weight, ctx),
            None => Color::ZERO,
        }
    }
}

/// Radiance a single light sample sends to a diffuse hit.
///
/// Zero when the light lies behind the surface or the shadow ray is
/// blocked.
fn light_contribution(
    scene: &Scene,
    hit: &Hitpoint<'_>,
    light: &Hitpoint<'_>,
    weight: Color,
    ctx: &mut RenderContext,
) -> Color {
    let albedo = hit.material().color();
    let max_albedo = albedo.max_element();
    if max_albedo <= 0.0 {
        return Color::ZERO;
    }

    let origin = hit.offset_point();
    let to_light = light.point - origin;
    let distance = to_light.length();
    if distance <= 2.0 * EPSILON {
        return Color::ZERO;
    }

    let direction = to_light / distance;
    let cos_surface = direction.dot(hit.normal);
    if cos_surface <= 0.0 {
        return Color::ZERO;
    }

    let shadow = Ray::bounded(origin, direction, EPSILON, distance - EPSILON).with_mailbox(hit.index);
    ctx.count_ray();
    if scene.is_obstructed(&shadow) {
        return Color::ZERO;
    }

    // Emitters radiate from both faces
    let cos_light = direction.dot(light.normal).abs();
    let geometry_term = (cos_surface * cos_light / (distance * distance)).min(PRECISION_BOUND / max_albedo);

    light.material().emission() * albedo * FRAC_1_PI * geometry_term * light.inverse_sample_weight * weight
}

impl Integrator for MonteCarloPathTracer {
    fn sample(&self, x: u32, y: u32, input: &PassInput<'_>, ctx: &mut RenderContext) -> Color {
        let ray = input.camera.get_jittered_ray(x, y, ctx);
        self.radiance(input.scene, &ray, 0, Color::ONE, Origin::Camera, ctx)
    }

    fn accumulates(&self) -> bool {
        true
    }
}
