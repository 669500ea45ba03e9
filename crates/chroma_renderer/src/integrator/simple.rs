use super::{Integrator, PassInput};
use crate::context::RenderContext;
use crate::material::Color;

/// Shades every primary hit with its absolute normal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRayCaster;

impl Integrator for SimpleRayCaster {
    fn sample(&self, x: u32, y: u32, input: &PassInput<'_>, ctx: &mut RenderContext) -> Color {
        let ray = input.camera.get_ray(x, y);
        ctx.count_ray();
        input
            .scene
            .intersect(&ray)
            .map_or(Color::ZERO, |hit| hit.normal.abs())
    }

    fn accumulates(&self) -> bool {
        false
    }
}
