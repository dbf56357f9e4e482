//! # Orrery Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use orrery::prelude::*;
//!
//! let sphere = generate_sphere(8)?;
//! let mut camera = Camera::new();
//! camera.set_position(Point3::new(0.0, 5.0, 20.0));
//! let view = camera.compute_view_matrix()?;
//! # let _ = (sphere, view);
//! # Ok::<(), OrreryError>(())
//! ```

// Application
pub use crate::app::OrreryApp;
pub use crate::config::{OrbitalConfig, OrreryConfig};
pub use crate::error::{ConfigError, GeometryError, OrreryError, OrreryResult};

// Core geometry and camera
pub use crate::gfx::camera::{Camera, CameraController, CameraManager};
pub use crate::gfx::geometry::{generate_sphere, MeshData};

// Scene and simulation
pub use crate::gfx::resources::BodyMaterial;
pub use crate::gfx::scene::{BodyKind, Scene};
pub use crate::simulation::{Simulation, SimulationManager, SolarSystem};

// Common external types
pub use cgmath::{Matrix4, Point3, Vector3};
