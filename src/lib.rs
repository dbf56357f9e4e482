// src/lib.rs
//! Orrery
//!
//! A small solar system (sun, earth and moon) rendered with wgpu and winit.
//! The reusable core is the UV sphere generator in [`gfx::geometry`] and the
//! camera in [`gfx::camera`]; the rest is the demo built on top of them.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod simulation;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::OrreryApp;
pub use config::OrreryConfig;
pub use error::{ConfigError, GeometryError, OrreryError};
