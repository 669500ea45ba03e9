//! Per-pixel radiance estimators.
//!
//! An integrator turns a pixel coordinate into one color sample. The render
//! loop decides what to do with it: accumulating integrators are blended
//! into a running average, the others overwrite the pixel on every pass.

mod debug;
mod path_tracer;
mod simple;

pub use debug::{ColorCube, MovingAverage};
pub use path_tracer::MonteCarloPathTracer;
pub use simple::SimpleRayCaster;

use crate::camera::Camera;
use crate::context::RenderContext;
use crate::material::Color;
use crate::scene::Scene;
use crate::settings::{RenderMode, Settings};

/// Read-only state shared by all workers during one pass.
pub struct PassInput<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub width: u32,
    pub height: u32,
    /// 1-based index of the pass since the last flush
    pub frame_index: u64,
}

pub trait Integrator: Send + Sync {
    /// One color sample for pixel (x, y).
    fn sample(&self, x: u32, y: u32, input: &PassInput<'_>, ctx: &mut RenderContext) -> Color;

    /// Whether samples are averaged over passes.
    fn accumulates(&self) -> bool;
}

/// Build the integrator for the configured render mode.
pub fn create(settings: &Settings) -> Box<dyn Integrator> {
    match settings.mode {
        RenderMode::Simple => Box::new(SimpleRayCaster),
        RenderMode::Avg => Box::new(MovingAverage),
        RenderMode::ColorCube => Box::new(ColorCube),
        RenderMode::MonteCarloPathTracer => Box::new(MonteCarloPathTracer::from_settings(settings)),
    }
}
