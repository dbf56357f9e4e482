//! Error types for the Orrery demo.
//!
//! Invalid parameters are rejected at call time with [`ConfigError`].
//! Geometry that cannot produce a well-defined result (a camera looking
//! straight along its up vector, a malformed mesh) yields [`GeometryError`].
//! [`OrreryError`] wraps both for callers that also load assets.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Sphere resolution must be in 1..=65534 so every vertex fits a `u32` index.
    #[error("Invalid sphere resolution: {0} (must be between 1 and 65534)")]
    InvalidResolution(u32),

    /// Field of view outside the open interval (0, 180) degrees.
    #[error("Invalid field of view: {0} degrees (must be in (0, 180))")]
    InvalidFieldOfView(f32),

    /// Aspect ratio must be finite and positive.
    #[error("Invalid aspect ratio: {0} (must be > 0)")]
    InvalidAspectRatio(f32),

    /// Clip planes must satisfy 0 < near < far.
    #[error("Invalid clip planes: near = {near}, far = {far} (must satisfy 0 < near < far)")]
    InvalidClipPlanes { near: f32, far: f32 },

    /// A direction vector was zero or not finite.
    #[error("Invalid {name} vector: [{x}, {y}, {z}]")]
    InvalidDirection {
        name: &'static str,
        x: f32,
        y: f32,
        z: f32,
    },

    /// A numeric configuration value was out of range.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: f32 },

    /// An environment override could not be parsed.
    #[error("Invalid value for environment variable {var}: {value:?}")]
    InvalidEnvValue { var: &'static str, value: String },
}

/// Geometry that cannot be turned into a well-defined result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Facing direction is parallel to the up vector, so no view basis exists.
    #[error("Invalid camera orientation: facing direction is parallel to the up vector")]
    InvalidCameraOrientation,

    /// Attribute arrays do not describe the same number of vertices.
    #[error(
        "Mismatched vertex attributes: {positions} positions, {normals} normals, {tex_coords} texture coordinates"
    )]
    MismatchedAttributes {
        positions: usize,
        normals: usize,
        tex_coords: usize,
    },

    /// An index references a vertex that does not exist.
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// Index list length is not a multiple of three.
    #[error("Index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Top-level error for the demo library.
#[derive(Debug, Error)]
pub enum OrreryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A texture file could not be read or decoded.
    #[error("Failed to load texture {path:?}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A render pipeline refers to a shader that was never loaded.
    #[error("Pipeline {pipeline:?} uses unknown shader {shader:?}")]
    UnknownShader { pipeline: String, shader: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for geometry operations.
pub type GeometryResult<T> = std::result::Result<T, GeometryError>;

/// Result type for library operations that may touch assets.
pub type OrreryResult<T> = std::result::Result<T, OrreryError>;
