use std::{path::Path, sync::Arc, time::Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::OrreryConfig,
    error::OrreryResult,
    gfx::{
        camera::{Camera, CameraController, CameraManager},
        geometry::generate_sphere,
        rendering::{RenderEngine, RenderMode},
        resources::BodyMaterial,
        scene::{BodyKind, Scene},
    },
    simulation::{SimulationManager, SolarSystem},
};

/// The solar system window and its event loop
pub struct OrreryApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: OrreryConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    simulation_manager: SimulationManager,
    last_frame: Instant,
    fatal_error: Option<anyhow::Error>,
}

impl OrreryApp {
    /// Builds the scene and attaches the orbital simulation. The window and
    /// GPU are created once the event loop starts.
    pub fn new(config: OrreryConfig) -> anyhow::Result<Self> {
        config.validate().context("Invalid configuration")?;
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let mut scene = build_scene(&config).context("Failed to build scene")?;
        let mut simulation_manager = SimulationManager::new();
        simulation_manager.attach_simulation(
            Box::new(SolarSystem::new(config.orbits)),
            &mut scene,
        );

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                simulation_manager,
                last_frame: Instant::now(),
                fatal_error: None,
            },
        })
    }

    /// Runs until the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut self.app_state)
            .context("Event loop failed")?;

        match self.app_state.fatal_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Creates the camera, the shared sphere mesh and the three bodies
///
/// Textures that fail to load are logged and the body keeps its flat colour.
pub fn build_scene(config: &OrreryConfig) -> OrreryResult<Scene> {
    let mut camera = Camera::new();
    camera.set_position(config.camera_position);
    camera.set_fov(config.fov)?;
    camera.set_clip_planes(config.near, config.far)?;
    camera.resize_projection(config.window_width, config.window_height)?;
    let controller = CameraController::new(config.camera_speed, config.mouse_sensitivity);

    let mut scene = Scene::new(CameraManager::new(camera, controller));

    let sphere_data = generate_sphere(config.sphere_resolution)?;
    log::info!(
        "Generated sphere at resolution {}: {} vertices, {} triangles",
        config.sphere_resolution,
        sphere_data.vertex_count(),
        sphere_data.triangle_count()
    );
    let sphere = scene.add_mesh(sphere_data)?;

    let sun = BodyMaterial::new(1.0, 1.0, 0.0).with_emission(1.0, 0.9, 0.5);
    let earth = textured(
        &mut scene,
        BodyMaterial::new(0.33, 0.5, 0.18),
        &config.earth_texture_path(),
    );
    let moon = textured(
        &mut scene,
        BodyMaterial::new(0.3, 0.3, 0.7),
        &config.moon_texture_path(),
    );

    scene.add_body(BodyKind::Sun, sphere, sun);
    scene.add_body(BodyKind::Earth, sphere, earth);
    scene.add_body(BodyKind::Moon, sphere, moon);

    Ok(scene)
}

fn textured(scene: &mut Scene, material: BodyMaterial, path: &Path) -> BodyMaterial {
    match scene.load_texture(path) {
        Ok(texture) => material.with_texture(texture),
        Err(err) => {
            log::warn!("{err}; using flat colour");
            material
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let PhysicalSize { width, height } = window.inner_size();
        let render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.config,
        ))?;
        log::info!("Surface format: {:?}", render_engine.surface_format());

        if let Err(err) = self
            .scene
            .camera_manager
            .camera
            .resize_projection(width, height)
        {
            log::debug!("Keeping configured aspect ratio: {err}");
        }
        render_engine.upload_scene(&mut self.scene);

        self.window = Some(window);
        self.render_engine = Some(render_engine);
        self.last_frame = Instant::now();
        Ok(())
    }

    /// Handles app-level keys. Returns true when the key was used.
    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) -> bool {
        if event.state != ElementState::Pressed || event.repeat {
            return false;
        }
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return false;
        };

        match key_code {
            KeyCode::Escape | KeyCode::KeyQ => event_loop.exit(),
            KeyCode::KeyL => self.set_render_mode(RenderMode::Wireframe),
            KeyCode::KeyF => self.set_render_mode(RenderMode::Fill),
            KeyCode::Space => {
                self.simulation_manager.toggle_pause();
            }
            KeyCode::KeyR => self.simulation_manager.reset(&mut self.scene),
            _ => return false,
        }
        true
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        if let Some(render_engine) = self.render_engine.as_mut() {
            let active = render_engine.set_render_mode(mode);
            log::debug!("Render mode is now {:?}", active);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Resized to {}x{}", width, height);
        if let Err(err) = self
            .scene
            .camera_manager
            .camera
            .resize_projection(width, height)
        {
            // minimized windows report a zero height
            log::debug!("Skipping projection update: {err}");
        }
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.resize(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        self.simulation_manager.update(delta_time, &mut self.scene);
        self.scene.update(delta_time);
        render_engine.sync_scene(&mut self.scene);

        match self.scene.camera_manager.uniform() {
            Ok(uniform) => render_engine.update(uniform),
            Err(err) => log::warn!("{err}; keeping the previous view"),
        }

        match render_engine.render_frame(&self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, exiting");
                self.fatal_error = Some(anyhow::anyhow!("Surface out of memory"));
                event_loop.exit();
            }
            Err(err) => log::warn!("Dropped frame: {err}"),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            log::error!("{err:#}");
            self.fatal_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if !self.scene.camera_manager.process_keyboard_event(&event) {
                    self.handle_key(event_loop, &event);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.scene
                    .camera_manager
                    .process_mouse_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Err(err) = self.scene.camera_manager.process_scroll(&delta) {
                    log::warn!("Ignoring zoom: {err}");
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => self.resize(width, height),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Err(err) = self.scene.camera_manager.process_mouse_motion(delta) {
                log::warn!("Ignoring mouse look: {err}");
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, OrreryError};

    fn offline_config() -> OrreryConfig {
        OrreryConfig::default().with_media_dir("does/not/exist")
    }

    #[test]
    fn test_scene_has_three_bodies_sharing_one_mesh() {
        let scene = build_scene(&offline_config()).unwrap();
        let stats = scene.statistics();
        assert_eq!(stats.body_count, 3);
        assert_eq!(stats.mesh_count, 1);

        let meshes: Vec<_> = scene.bodies().map(|(_, body)| body.mesh).collect();
        assert!(meshes.iter().all(|&mesh| mesh == meshes[0]));
        for kind in BodyKind::ALL {
            assert!(scene.find_body(kind).is_some(), "missing {kind}");
        }
    }

    #[test]
    fn test_missing_textures_fall_back_to_flat_colour() {
        let scene = build_scene(&offline_config()).unwrap();
        assert_eq!(scene.statistics().texture_count, 0);

        let earth = scene.find_body(BodyKind::Earth).unwrap();
        let earth = scene.body(earth).unwrap();
        assert_eq!(earth.material.texture, None);
        assert_eq!(earth.material.color, [0.33, 0.5, 0.18]);

        let sun = scene.find_body(BodyKind::Sun).unwrap();
        assert!(scene.body(sun).unwrap().material.is_emissive());
    }

    #[test]
    fn test_camera_follows_config() {
        let config = offline_config().with_fov(30.0);
        let scene = build_scene(&config).unwrap();
        let camera = &scene.camera_manager.camera;
        assert_eq!(camera.position(), config.camera_position);
        assert_eq!(camera.fov(), 30.0);
        assert_eq!(camera.far(), config.far);
        assert!((camera.aspect_ratio() - 1024.0 / 768.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        let mut config = offline_config();
        config.sphere_resolution = 0;
        assert!(matches!(
            build_scene(&config),
            Err(OrreryError::Config(ConfigError::InvalidResolution(0)))
        ));
    }
}
