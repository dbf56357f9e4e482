//! Sun, earth and moon motion
//!
//! All three spheres are generated with their poles on the Z axis, so each
//! model first tips them by -90 degrees about X to stand the poles up along Y.
//! The earth orbits the sun in the XZ plane; the moon orbits the earth.

use cgmath::{Deg, Matrix4, Rad, Vector3};

use crate::{
    config::OrbitalConfig,
    gfx::scene::{BodyId, BodyKind, Scene},
};

use super::traits::Simulation;

/// Model matrices for one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransforms {
    pub sun: Matrix4<f32>,
    pub earth: Matrix4<f32>,
    pub moon: Matrix4<f32>,
}

impl BodyTransforms {
    pub fn get(&self, kind: BodyKind) -> Matrix4<f32> {
        match kind {
            BodyKind::Sun => self.sun,
            BodyKind::Earth => self.earth,
            BodyKind::Moon => self.moon,
        }
    }
}

/// Computes every model matrix at `time` seconds of simulated time
pub fn body_transforms(orbits: &OrbitalConfig, time: f32) -> BodyTransforms {
    let earth_spin = Rad(time * orbits.earth_spin_speed);
    let earth_orbit = Rad(time * orbits.earth_orbit_speed);
    let moon_orbit = Rad(time * orbits.moon_orbit_speed);
    let moon_spin = Rad(time * orbits.moon_spin_speed);
    let poles_up = Matrix4::from_angle_x(Deg(-90.0));

    let sun = Matrix4::from_scale(orbits.sun_size) * poles_up;

    // shared by the earth and the moon
    let earth_center = Matrix4::from_angle_y(earth_orbit)
        * Matrix4::from_translation(Vector3::new(orbits.earth_orbit_radius, 0.0, 0.0));

    let earth = earth_center
        * poles_up
        * Matrix4::from_angle_y(orbits.earth_tilt)
        * Matrix4::from_angle_z(earth_spin)
        * Matrix4::from_scale(orbits.earth_size);

    let moon = earth_center
        * Matrix4::from_angle_y(moon_orbit)
        * Matrix4::from_translation(Vector3::new(orbits.moon_orbit_radius, 0.0, 0.0))
        * poles_up
        * Matrix4::from_angle_z(moon_spin)
        * Matrix4::from_scale(orbits.moon_size);

    BodyTransforms { sun, earth, moon }
}

/// Animates the sun, earth and moon bodies of a scene
pub struct SolarSystem {
    orbits: OrbitalConfig,
    elapsed: f32,
    running: bool,
    bodies: Vec<(BodyKind, BodyId)>,
}

impl SolarSystem {
    pub fn new(orbits: OrbitalConfig) -> Self {
        Self {
            orbits,
            elapsed: 0.0,
            running: true,
            bodies: Vec::new(),
        }
    }

    /// Simulated seconds since start or the last reset
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn transforms(&self) -> BodyTransforms {
        body_transforms(&self.orbits, self.elapsed)
    }

    fn apply(&self, scene: &mut Scene) {
        let transforms = self.transforms();
        for &(kind, id) in &self.bodies {
            if let Some(body) = scene.body_mut(id) {
                body.transform = transforms.get(kind);
            }
        }
    }
}

impl Simulation for SolarSystem {
    fn initialize(&mut self, scene: &mut Scene) {
        self.bodies = scene
            .bodies()
            .map(|(id, body)| (body.kind, id))
            .collect();
        if self.bodies.is_empty() {
            log::warn!("Solar system attached to a scene without bodies");
        }
        self.apply(scene);
    }

    fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        if !self.running {
            return;
        }
        self.elapsed += delta_time;
        self.apply(scene);
    }

    fn name(&self) -> &str {
        "Solar System"
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn reset(&mut self, scene: &mut Scene) {
        self.elapsed = 0.0;
        self.apply(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{Camera, CameraController, CameraManager},
        geometry::generate_sphere,
        resources::BodyMaterial,
    };
    use cgmath::{InnerSpace, Point3, Transform};
    use rand::Rng;

    const EPSILON: f32 = 1e-4;

    fn center(model: Matrix4<f32>) -> Point3<f32> {
        model.transform_point(Point3::new(0.0, 0.0, 0.0))
    }

    #[test]
    fn test_orbit_radii_hold_at_any_time() {
        let orbits = OrbitalConfig::default();
        let mut rng = rand::rng();

        for _ in 0..200 {
            let t = rng.random_range(0.0..1000.0f32);
            let transforms = body_transforms(&orbits, t);
            let sun = center(transforms.sun);
            let earth = center(transforms.earth);
            let moon = center(transforms.moon);

            assert!((sun - Point3::new(0.0, 0.0, 0.0)).magnitude() < EPSILON);
            assert!(((earth - sun).magnitude() - 10.0).abs() < 1e-3, "t = {t}");
            assert!(((moon - earth).magnitude() - 2.0).abs() < 1e-3, "t = {t}");
            assert!(earth.y.abs() < 1e-3);
            assert!(moon.y.abs() < 1e-3);
        }
    }

    #[test]
    fn test_initial_positions() {
        let transforms = body_transforms(&OrbitalConfig::default(), 0.0);
        let earth = center(transforms.earth);
        let moon = center(transforms.moon);
        assert!((earth - Point3::new(10.0, 0.0, 0.0)).magnitude() < EPSILON);
        assert!((moon - Point3::new(12.0, 0.0, 0.0)).magnitude() < EPSILON);
    }

    #[test]
    fn test_sizes_and_poles() {
        let transforms = body_transforms(&OrbitalConfig::default(), 0.0);

        // the sphere's north pole (0, 0, 1) ends up above the sun's center
        let pole = transforms.sun.transform_point(Point3::new(0.0, 0.0, 1.0));
        assert!((pole - Point3::new(0.0, 1.0, 0.0)).magnitude() < EPSILON);

        let earth_pole = transforms.earth.transform_point(Point3::new(0.0, 0.0, 1.0));
        let earth_axis = earth_pole - center(transforms.earth);
        assert!((earth_axis.magnitude() - 0.5).abs() < EPSILON);
        // tilted 23.5 degrees away from +Y
        let tilt = earth_axis.normalize().dot(Vector3::unit_y()).acos().to_degrees();
        assert!((tilt - 23.5).abs() < 1e-2, "tilt {tilt}");

        let moon_pole = transforms.moon.transform_point(Point3::new(0.0, 0.0, 1.0));
        assert!(((moon_pole - center(transforms.moon)).magnitude() - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_earth_orbit_period() {
        let orbits = OrbitalConfig::default();
        let period = std::f32::consts::TAU / orbits.earth_orbit_speed;
        let start = center(body_transforms(&orbits, 0.0).earth);
        let quarter = center(body_transforms(&orbits, period / 4.0).earth);
        let full = center(body_transforms(&orbits, period).earth);

        // counter-clockwise seen from +Y: +X goes to -Z
        assert!((quarter - Point3::new(0.0, 0.0, -10.0)).magnitude() < 1e-3);
        assert!((full - start).magnitude() < 1e-3);
    }

    #[test]
    fn test_drives_scene_bodies() {
        let mut scene = Scene::new(CameraManager::new(
            Camera::new(),
            CameraController::default(),
        ));
        let sphere = scene.add_mesh(generate_sphere(8).unwrap()).unwrap();
        let sun = scene.add_body(BodyKind::Sun, sphere, BodyMaterial::new(1.0, 1.0, 0.0));
        let earth = scene.add_body(BodyKind::Earth, sphere, BodyMaterial::new(0.33, 0.5, 0.18));
        let moon = scene.add_body(BodyKind::Moon, sphere, BodyMaterial::new(0.3, 0.3, 0.7));

        let mut system = SolarSystem::new(OrbitalConfig::default());
        system.initialize(&mut scene);
        assert_eq!(scene.body(earth).unwrap().transform, system.transforms().earth);

        system.update(1.5, &mut scene);
        assert_eq!(system.elapsed(), 1.5);
        let expected = body_transforms(&OrbitalConfig::default(), 1.5);
        assert_eq!(scene.body(sun).unwrap().transform, expected.sun);
        assert_eq!(scene.body(moon).unwrap().transform, expected.moon);

        system.set_running(false);
        system.update(1.0, &mut scene);
        assert_eq!(system.elapsed(), 1.5);

        system.reset(&mut scene);
        assert_eq!(system.elapsed(), 0.0);
        let start = body_transforms(&OrbitalConfig::default(), 0.0);
        assert_eq!(scene.body(moon).unwrap().transform, start.moon);
    }
}
