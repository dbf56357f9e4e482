//! # Graphics Module
//!
//! Everything needed to put the solar system on screen: the camera, the
//! sphere generator, the scene arena, GPU resources and the render engine.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Free-look camera with view and projection matrices
//! - **Geometry** ([`geometry`]) - CPU-side mesh data and the UV sphere generator
//! - **Scene Management** ([`scene`]) - Arena of meshes, textures and bodies
//! - **Resource Management** ([`resources`]) - Textures, uniforms and bind groups
//! - **Rendering Pipeline** ([`rendering`]) - Phong shading in fill or wireframe mode
//!
//! The camera and geometry modules do not touch the GPU and can be used on
//! their own:
//!
//! ```rust
//! use orrery::gfx::camera::Camera;
//! use orrery::gfx::geometry::generate_sphere;
//!
//! let sphere = generate_sphere(16).unwrap();
//! let camera = Camera::new();
//! let view = camera.compute_view_matrix().unwrap();
//! let projection = camera.compute_projection_matrix();
//! # let _ = (sphere, view, projection);
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::Camera;
pub use rendering::render_engine::RenderEngine;
