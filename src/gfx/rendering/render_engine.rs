//! WGPU-based rendering engine for the orrery
//!
//! Owns the surface, device and queue, the depth buffer, the global and
//! per-body bindings, and the fill and wireframe pipelines.

use std::sync::Arc;

use anyhow::Context;
use wgpu::{Device, TextureFormat};

use crate::{
    config::OrreryConfig,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
            material::BodyBindings,
            texture_resource::TextureResource,
        },
        scene::{body::DrawBody, scene::Scene},
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const PLANET_SHADER: &str = "planet";
const BODY_BIND_GROUP: u32 = 1;

/// How triangles are rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Fill,
    Wireframe,
}

impl RenderMode {
    fn pipeline_name(self) -> &'static str {
        match self {
            RenderMode::Fill => "Fill",
            RenderMode::Wireframe => "Wireframe",
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    body_bindings: BodyBindings,
    light_config: LightConfig,
    clear_color: wgpu::Color,
    render_mode: RenderMode,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Wireframe rendering is enabled only when the adapter supports
    /// `POLYGON_MODE_LINE`.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        settings: &OrreryConfig,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let supports_wireframe = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if supports_wireframe {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            log::warn!("Adapter lacks POLYGON_MODE_LINE, wireframe mode is unavailable");
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features,
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: choose_present_mode(settings.vsync, &surface_capabilities.present_modes),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, config.width, config.height);

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let body_bindings = BodyBindings::new(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(
            device_handle.clone(),
            &[
                global_bindings.bind_group_layout(),
                body_bindings.bind_group_layout(),
            ],
        );
        pipeline_manager.load_shader(PLANET_SHADER, include_str!("planet.wgsl"));

        let fill = PipelineConfig::default()
            .with_label("Planet Fill")
            .with_shader(PLANET_SHADER)
            .with_color_format(format);
        pipeline_manager
            .register_pipeline(RenderMode::Fill.pipeline_name(), &fill)
            .context("Failed to create fill pipeline")?;

        if supports_wireframe {
            let wireframe = fill
                .with_label("Planet Wireframe")
                .with_polygon_mode(wgpu::PolygonMode::Line);
            pipeline_manager
                .register_pipeline(RenderMode::Wireframe.pipeline_name(), &wireframe)
                .context("Failed to create wireframe pipeline")?;
        }
        log::debug!("{:?}", pipeline_manager.get_stats());

        let [r, g, b] = settings.clear_color;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            body_bindings,
            light_config: LightConfig::default(),
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            render_mode: RenderMode::Fill,
        })
    }

    /// Uploads meshes, textures and per-body uniforms for `scene`
    pub fn upload_scene(&self, scene: &mut Scene) {
        scene.init_gpu_resources(&self.device, &self.queue, &self.body_bindings);
    }

    /// Writes each body's current model matrix to its uniform
    pub fn sync_scene(&self, scene: &mut Scene) {
        scene.update_all_transforms(&self.queue);
    }

    /// Draws every visible body and presents the frame
    ///
    /// Surface errors are returned to the caller; `Lost` and `Outdated` are
    /// fixed by calling [`RenderEngine::reconfigure`].
    pub fn render_frame(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(pipeline) = self
                .pipeline_manager
                .get_pipeline(self.render_mode.pipeline_name())
            {
                render_pass.set_pipeline(pipeline);

                for (body, mesh) in scene.drawables() {
                    render_pass.draw_body(body, mesh, BODY_BIND_GROUP);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Writes camera and light data for the next frame
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            camera_uniform,
            self.light_config,
        );
    }

    /// Switches between fill and wireframe. Returns the mode now in effect.
    pub fn set_render_mode(&mut self, mode: RenderMode) -> RenderMode {
        if !self.pipeline_manager.has_pipeline(mode.pipeline_name()) {
            log::warn!("{:?} mode is not available on this adapter", mode);
            return self.render_mode;
        }
        if mode != self.render_mode {
            log::info!("Render mode: {:?}", mode);
        }
        self.render_mode = mode;
        self.render_mode
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;

        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height);
    }

    /// Configures the surface again at its current size
    pub fn reconfigure(&mut self) {
        let (width, height) = self.get_surface_size();
        self.resize(width, height);
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Fifo is always available; Immediate only when the surface offers it
fn choose_present_mode(vsync: bool, available: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if !vsync && available.contains(&wgpu::PresentMode::Immediate) {
        wgpu::PresentMode::Immediate
    } else {
        wgpu::PresentMode::Fifo
    }
}
