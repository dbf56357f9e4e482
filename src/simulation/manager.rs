//! Simulation manager
//!
//! Owns the attached simulation and feeds it frame time unless paused.

use super::traits::Simulation;
use crate::gfx::scene::Scene;

/// Drives at most one simulation from the frame loop
#[derive(Default)]
pub struct SimulationManager {
    simulation: Option<Box<dyn Simulation>>,
    is_paused: bool,
}

impl SimulationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches and initializes `simulation`, replacing any previous one
    pub fn attach_simulation(&mut self, mut simulation: Box<dyn Simulation>, scene: &mut Scene) {
        simulation.initialize(scene);
        log::info!("Attached simulation '{}'", simulation.name());
        self.simulation = Some(simulation);
        self.is_paused = false;
    }

    /// Advances the simulation by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        if self.is_paused {
            return;
        }
        if let Some(simulation) = &mut self.simulation {
            simulation.update(delta_time, scene);
        }
    }

    /// Rewinds the simulation to its starting state
    pub fn reset(&mut self, scene: &mut Scene) {
        if let Some(simulation) = &mut self.simulation {
            simulation.reset(scene);
            log::info!("Simulation '{}' reset", simulation.name());
        }
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
        if let Some(simulation) = &mut self.simulation {
            simulation.set_running(!paused);
        }
    }

    /// Flips the pause state and returns the new one
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.is_paused);
        log::info!(
            "Simulation {}",
            if self.is_paused { "paused" } else { "resumed" }
        );
        self.is_paused
    }
}
