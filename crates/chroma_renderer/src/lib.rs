//! Chroma Renderer - CPU Monte Carlo path tracing
//!
//! A progressive path tracer with next-event estimation, BVH acceleration
//! and deterministic per-worker sampling. [`Renderer`] runs single passes;
//! [`ChromaCore`] drives it from a background render loop.

pub mod accel;
mod band;
mod camera;
mod canvas;
mod context;
mod control;
mod error;
pub mod geometry;
mod hitpoint;
pub mod integrator;
mod material;
mod renderer;
mod scene;
pub mod scene_factory;
mod settings;
mod sink;
mod statistics;

pub use accel::Accelerator;
pub use band::{generate_bands, rows_per_band, Band};
pub use camera::Camera;
pub use canvas::{color_to_rgb, store_sample, Canvas};
pub use context::{worker_seed, RenderContext};
pub use control::{ChromaCore, RenderState};
pub use error::{ChromaError, ChromaResult, ConfigError, GeometryError, SceneError};
pub use geometry::{Geometry, Shape};
pub use hitpoint::{cosine_hemisphere, uniform_hemisphere, Hitpoint};
pub use integrator::{Integrator, PassInput};
pub use material::{reflect, Color, Material};
pub use renderer::Renderer;
pub use scene::Scene;
pub use settings::{AccelerationStructureType, HemisphereSampling, RenderMode, Settings};
pub use sink::{Frame, FrameSink, MemorySink, PngSink};
pub use statistics::{PassReport, Statistics, StatisticsSnapshot};

/// Re-export the math and scene record crates
pub use chroma_core;
pub use chroma_math::{self, Vec3};
