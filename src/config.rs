//! Application configuration
//!
//! [`OrreryConfig`] collects every tunable of the demo: window, camera,
//! input, body sizes and orbital speeds, and the media directory holding the
//! textures. Defaults reproduce the classic course scene; a few values can be
//! overridden from the environment.

use std::path::PathBuf;

use cgmath::{Deg, Point3};

use crate::error::{ConfigError, ConfigResult};
use crate::gfx::geometry::sphere::{check_resolution, DEFAULT_SPHERE_RESOLUTION};

/// Environment variable overriding [`OrreryConfig::media_dir`]
pub const MEDIA_DIR_ENV: &str = "ORRERY_MEDIA_DIR";
/// Environment variable overriding [`OrreryConfig::sphere_resolution`]
pub const SPHERE_RESOLUTION_ENV: &str = "ORRERY_SPHERE_RESOLUTION";

/// Sizes, orbit radii and angular speeds of the three bodies
///
/// Speeds are in radians per second of simulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalConfig {
    pub sun_size: f32,
    pub earth_size: f32,
    pub moon_size: f32,
    pub earth_orbit_radius: f32,
    pub moon_orbit_radius: f32,
    pub earth_spin_speed: f32,
    pub earth_orbit_speed: f32,
    pub moon_orbit_speed: f32,
    pub moon_spin_speed: f32,
    /// Earth axial tilt
    pub earth_tilt: Deg<f32>,
}

impl Default for OrbitalConfig {
    fn default() -> Self {
        let earth_spin_speed = 1.0;
        Self {
            sun_size: 1.0,
            earth_size: 0.5,
            moon_size: 0.25,
            earth_orbit_radius: 10.0,
            moon_orbit_radius: 2.0,
            earth_spin_speed,
            earth_orbit_speed: earth_spin_speed / 2.0,
            moon_orbit_speed: earth_spin_speed * 2.0,
            // the moon turns at the same rate the earth orbits
            moon_spin_speed: earth_spin_speed / 2.0,
            earth_tilt: Deg(-23.5),
        }
    }
}

impl OrbitalConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("sun_size", self.sun_size),
            ("earth_size", self.earth_size),
            ("moon_size", self.moon_size),
            ("earth_orbit_radius", self.earth_orbit_radius),
            ("moon_orbit_radius", self.moon_orbit_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }

        let finite = [
            ("earth_spin_speed", self.earth_spin_speed),
            ("earth_orbit_speed", self.earth_orbit_speed),
            ("moon_orbit_speed", self.moon_orbit_speed),
            ("moon_spin_speed", self.moon_spin_speed),
            ("earth_tilt", self.earth_tilt.0),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        Ok(())
    }
}

/// Top-level configuration for the demo
#[derive(Debug, Clone, PartialEq)]
pub struct OrreryConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub sphere_resolution: u32,
    pub camera_position: Point3<f32>,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Camera movement speed in world units per second
    pub camera_speed: f32,
    /// Mouse look sensitivity in degrees per pixel
    pub mouse_sensitivity: f32,
    pub clear_color: [f64; 3],
    pub media_dir: PathBuf,
    pub vsync: bool,
    pub orbits: OrbitalConfig,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            title: "Interactive 3D Applications - Simple Solar System".to_string(),
            window_width: 1024,
            window_height: 768,
            sphere_resolution: DEFAULT_SPHERE_RESOLUTION,
            camera_position: Point3::new(0.0, 0.0, 25.0),
            fov: 45.0,
            near: 0.1,
            far: 80.1,
            camera_speed: 10.0,
            mouse_sensitivity: 0.8,
            clear_color: [0.7, 0.7, 0.7],
            media_dir: PathBuf::from("media"),
            vsync: true,
            orbits: OrbitalConfig::default(),
        }
    }
}

impl OrreryConfig {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_env_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Taking the lookup as a closure keeps tests away from the process
    /// environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(MEDIA_DIR_ENV) {
            self.media_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(SPHERE_RESOLUTION_ENV) {
            let resolution: u32 =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvValue {
                        var: SPHERE_RESOLUTION_ENV,
                        value: raw.clone(),
                    })?;
            self.sphere_resolution = resolution;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_sphere_resolution(mut self, resolution: u32) -> Self {
        self.sphere_resolution = resolution;
        self
    }

    pub fn with_camera_position(mut self, position: Point3<f32>) -> Self {
        self.camera_position = position;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = dir.into();
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_orbits(mut self, orbits: OrbitalConfig) -> Self {
        self.orbits = orbits;
        self
    }

    pub fn earth_texture_path(&self) -> PathBuf {
        self.media_dir.join("earth.jpg")
    }

    pub fn moon_texture_path(&self) -> PathBuf {
        self.media_dir.join("moon.jpg")
    }

    /// Checks every value that would otherwise fail later at runtime
    pub fn validate(&self) -> ConfigResult<()> {
        check_resolution(self.sphere_resolution)?;
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::InvalidAspectRatio(
                self.window_width as f32 / self.window_height.max(1) as f32,
            ));
        }
        if !self.fov.is_finite() || self.fov <= 0.0 || self.fov >= 180.0 {
            return Err(ConfigError::InvalidFieldOfView(self.fov));
        }
        if !self.near.is_finite() || !self.far.is_finite() || self.near <= 0.0 || self.far <= self.near
        {
            return Err(ConfigError::InvalidClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        for (name, value) in [
            ("camera_speed", self.camera_speed),
            ("mouse_sensitivity", self.mouse_sensitivity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        self.orbits.validate()
    }
}
