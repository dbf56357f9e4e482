//! # Orrery
//!
//! Opens the solar system window.
//!
//! ## Controls
//! - W/A/S/D or arrow keys: move
//! - Left mouse drag: look around
//! - Scroll: zoom
//! - L / F: wireframe / filled
//! - Space: pause the orbits
//! - R: restart the orbits
//! - Esc or Q: quit
//!
//! Set `ORRERY_MEDIA_DIR` to the directory holding `earth.jpg` and
//! `moon.jpg`, and `ORRERY_SPHERE_RESOLUTION` to change the sphere detail.

use anyhow::Context;
use env_logger::Env;
use orrery::{OrreryApp, OrreryConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = OrreryConfig::from_env().context("Failed to read configuration")?;
    log::info!(
        "Starting {:?} ({}x{}, media in {})",
        config.title,
        config.window_width,
        config.window_height,
        config.media_dir.display()
    );

    OrreryApp::new(config)?.run()
}
