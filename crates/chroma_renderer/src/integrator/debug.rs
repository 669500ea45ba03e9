//! Scene-independent debug integrators.

use super::{Integrator, PassInput};
use crate::context::RenderContext;
use crate::material::Color;

/// Uniform noise per channel. Averaged over passes it converges to mid grey,
/// which makes the accumulation path visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovingAverage;

impl Integrator for MovingAverage {
    fn sample(&self, _x: u32, _y: u32, _input: &PassInput<'_>, ctx: &mut RenderContext) -> Color {
        Color::new(ctx.random_f32(), ctx.random_f32(), ctx.random_f32())
    }

    fn accumulates(&self) -> bool {
        true
    }
}

/// Gradient over the pixel position: red grows to the right, green grows
/// downwards and blue fades along the diagonal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCube;

impl Integrator for ColorCube {
    fn sample(&self, x: u32, y: u32, input: &PassInput<'_>, _ctx: &mut RenderContext) -> Color {
        let r = x as f32 / input.width.saturating_sub(1).max(1) as f32;
        let g = y as f32 / input.height.saturating_sub(1).max(1) as f32;
        Color::new(r, g, 1.0 - 0.5 * (r + g))
    }

    fn accumulates(&self) -> bool {
        false
    }
}
