// src/simulation/mod.rs
//! Simulation system
//!
//! A [`Simulation`] advances its own clock and writes body transforms into
//! the scene; the [`SimulationManager`] feeds it frame time, honoring pause
//! and time scale. [`SolarSystem`] is the sun, earth and moon animation.

pub mod manager;
pub mod solar_system;
pub mod traits;

pub use manager::SimulationManager;
pub use solar_system::{body_transforms, BodyTransforms, SolarSystem};
pub use traits::Simulation;
