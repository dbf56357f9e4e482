//! # Scene Management Module
//!
//! Owns everything drawn each frame: the meshes, the textures, the bodies
//! that reference them and the camera looking at them.
//!
//! ## Key Components
//!
//! - [`Scene`] - Arena container addressed by [`MeshId`], [`TextureId`] and [`BodyId`]
//! - [`CelestialBody`] - A body with a shared mesh, a [`BodyMaterial`] and a model matrix
//! - [`Mesh`] - Mesh data plus its GPU buffers
//! - [`Vertex3D`] - Interleaved vertex layout with position, normal, and texture coordinates
//!
//! ## Usage
//!
//! ```no_run
//! use orrery::gfx::camera::{Camera, CameraController, CameraManager};
//! use orrery::gfx::geometry::generate_sphere;
//! use orrery::gfx::resources::BodyMaterial;
//! use orrery::gfx::scene::{BodyKind, Scene};
//!
//! let mut scene = Scene::new(CameraManager::new(Camera::new(), CameraController::default()));
//! let sphere = scene.add_mesh(generate_sphere(16).unwrap()).unwrap();
//! scene.add_body(BodyKind::Sun, sphere, BodyMaterial::new(1.0, 1.0, 0.0));
//! ```
//!
//! [`BodyMaterial`]: crate::gfx::resources::BodyMaterial

pub mod body;
pub mod mesh;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use body::{BodyKind, CelestialBody, DrawBody};
pub use mesh::Mesh;
pub use scene::{BodyId, MeshId, Scene, SceneStatistics, TextureId};
pub use vertex::Vertex3D;
