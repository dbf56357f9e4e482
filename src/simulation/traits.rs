//! Core simulation trait
//!
//! A simulation owns some notion of time and writes the results into the
//! scene every frame.

use crate::gfx::scene::Scene;

/// Lifecycle hooks called by [`SimulationManager`](super::manager::SimulationManager)
pub trait Simulation {
    /// Called once when the simulation is attached. Use it to locate or
    /// create the bodies it drives.
    fn initialize(&mut self, scene: &mut Scene);

    /// Advances the simulation by `delta_time` seconds and updates the scene
    fn update(&mut self, delta_time: f32, scene: &mut Scene);

    fn name(&self) -> &str;

    fn set_running(&mut self, running: bool);

    /// Reset simulation to initial state
    fn reset(&mut self, scene: &mut Scene);
}
