//! Render settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which integrator produces pixel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderMode {
    /// Absolute surface normal as color.
    Simple,
    /// Moving average over uniform noise; converges to mid grey.
    Avg,
    /// Pixel-position color gradient.
    ColorCube,
    /// Monte Carlo path tracing with optional next-event estimation.
    MonteCarloPathTracer,
}

impl FromStr for RenderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SIMPLE" => Ok(RenderMode::Simple),
            "AVG" => Ok(RenderMode::Avg),
            "COLOR_CUBE" => Ok(RenderMode::ColorCube),
            "MONTE_CARLO_PATH_TRACER" | "MT_PTDL" => Ok(RenderMode::MonteCarloPathTracer),
            _ => Err(ConfigError::UnknownRenderMode(s.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Simple => "SIMPLE",
            RenderMode::Avg => "AVG",
            RenderMode::ColorCube => "COLOR_CUBE",
            RenderMode::MonteCarloPathTracer => "MONTE_CARLO_PATH_TRACER",
        };
        f.write_str(name)
    }
}

/// Acceleration structure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccelerationStructureType {
    /// Linear scan over all primitives.
    List,
    Bvh,
}

impl FromStr for AccelerationStructureType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LIST" => Ok(AccelerationStructureType::List),
            "BVH" => Ok(AccelerationStructureType::Bvh),
            _ => Err(ConfigError::UnknownAccelerationStructure(s.to_string())),
        }
    }
}

impl fmt::Display for AccelerationStructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccelerationStructureType::List => f.write_str("LIST"),
            AccelerationStructureType::Bvh => f.write_str("BVH"),
        }
    }
}

/// Distribution of indirect bounce directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HemisphereSampling {
    #[default]
    Cosine,
    Uniform,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub mode: RenderMode,
    pub acceleration_structure: AccelerationStructureType,
    /// Next-event estimation at diffuse hits
    pub direct_light_estimation: bool,
    /// Maximum number of ray segments per path
    pub max_ray_depth: u32,
    /// Keep rendering passes until stopped
    pub continuous: bool,
    pub thread_count: usize,
    /// Base seed of the per-worker random streams
    pub seed: u64,
    pub hemisphere_sampling: HemisphereSampling,
    /// Track the mean per-channel change of each pass
    pub compute_l1_norm: bool,
}

impl Settings {
    pub const DEFAULT_SEED: u64 = 13499;

    pub fn new(width: u32, height: u32, mode: RenderMode) -> Self {
        Self {
            width,
            height,
            mode,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_acceleration_structure(mut self, kind: AccelerationStructureType) -> Self {
        self.acceleration_structure = kind;
        self
    }

    pub fn with_direct_light_estimation(mut self, enabled: bool) -> Self {
        self.direct_light_estimation = enabled;
        self
    }

    pub fn with_max_ray_depth(mut self, depth: u32) -> Self {
        self.max_ray_depth = depth;
        self
    }

    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_hemisphere_sampling(mut self, sampling: HemisphereSampling) -> Self {
        self.hemisphere_sampling = sampling;
        self
    }

    pub fn with_l1_norm(mut self, enabled: bool) -> Self {
        self.compute_l1_norm = enabled;
        self
    }

    /// Check all values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_ray_depth == 0 {
            return Err(ConfigError::InvalidMaxRayDepth(self.max_ray_depth));
        }
        if self.thread_count == 0 {
            return Err(ConfigError::InvalidThreadCount(self.thread_count));
        }
        Ok(())
    }

    /// Number of pixels of the configured image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            mode: RenderMode::MonteCarloPathTracer,
            acceleration_structure: AccelerationStructureType::Bvh,
            direct_light_estimation: true,
            max_ray_depth: 3,
            continuous: true,
            thread_count: std::thread::available_parallelism().map_or(1, |n| n.get()),
            seed: Self::DEFAULT_SEED,
            hemisphere_sampling: HemisphereSampling::Cosine,
            compute_l1_norm: false,
        }
    }
}
