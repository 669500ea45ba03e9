//! Error types for the rendering engine.

use thiserror::Error;

/// Invalid render settings. Detected before any pass starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid resolution {width}x{height}: both dimensions must be positive")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid max ray depth {0}: must be at least 1")]
    InvalidMaxRayDepth(u32),

    #[error("Invalid thread count {0}: must be at least 1")]
    InvalidThreadCount(usize),

    #[error("Unknown render mode: {0}")]
    UnknownRenderMode(String),

    #[error("Unknown acceleration structure type: {0}")]
    UnknownAccelerationStructure(String),
}

/// The scene cannot be rendered as it is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Scene has no light sources")]
    NoLightSources,

    #[error("Geometry references material {index}, but only {count} materials exist")]
    MissingMaterial { index: usize, count: usize },

    #[error("Degenerate camera: view direction and up vector must be non-zero and not parallel")]
    DegenerateCamera,
}

/// A primitive could not be constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Degenerate triangle: vertices are collinear or coincide")]
    DegenerateTriangle,

    #[error("Degenerate area light: edges are parallel or zero")]
    DegenerateAreaLight,

    #[error("Sphere radius must be positive, got {0}")]
    InvalidRadius(f32),
}

/// Top-level error of the engine.
#[derive(Error, Debug)]
pub enum ChromaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene validation error: {0}")]
    Scene(#[from] SceneError),

    #[error("Import error: {0}")]
    Import(#[from] chroma_core::ImportError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type ChromaResult<T> = Result<T, ChromaError>;
