//! Render pipelines for the body shader
//!
//! Every pipeline here draws [`Vertex3D`] triangle lists with the same bind
//! group layouts, so they share one pipeline layout. Pipelines differ only in
//! how triangles are rasterized and are looked up by name.

use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{OrreryError, OrreryResult},
    gfx::{resources::texture_resource::TextureResource, scene::vertex::Vertex3D},
};

/// Rasterization settings for one pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub label: String,
    /// Name given to [`PipelineManager::load_shader`]
    pub shader: String,
    pub polygon_mode: wgpu::PolygonMode,
    pub cull_mode: Option<wgpu::Face>,
    pub color_format: wgpu::TextureFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Body Pipeline".to_string(),
            shader: "planet".to_string(),
            polygon_mode: wgpu::PolygonMode::Fill,
            cull_mode: Some(wgpu::Face::Back),
            color_format: wgpu::TextureFormat::Bgra8Unorm,
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_owned();
        self
    }

    /// `PolygonMode::Line` needs `Features::POLYGON_MODE_LINE` on the device
    pub fn with_polygon_mode(mut self, mode: wgpu::PolygonMode) -> Self {
        self.polygon_mode = mode;
        self
    }

    pub fn with_color_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = format;
        self
    }
}

/// Owns the shader modules and the pipelines built from them
pub struct PipelineManager {
    device: Arc<wgpu::Device>,
    layout: wgpu::PipelineLayout,
    shader_modules: HashMap<String, wgpu::ShaderModule>,
    pipelines: HashMap<String, wgpu::RenderPipeline>,
}

impl PipelineManager {
    /// `bind_group_layouts` are shared by every pipeline, in group order
    pub fn new(device: Arc<wgpu::Device>, bind_group_layouts: &[&wgpu::BindGroupLayout]) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Body Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        Self {
            device,
            layout,
            shader_modules: HashMap::new(),
            pipelines: HashMap::new(),
        }
    }

    /// Compiles a WGSL module under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(name),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        self.shader_modules.insert(name.to_owned(), module);
    }

    /// Builds a pipeline from `config` and stores it under `name`,
    /// replacing any previous one
    ///
    /// # Errors
    /// Returns [`OrreryError::UnknownShader`] if `config.shader` was never loaded.
    pub fn register_pipeline(&mut self, name: &str, config: &PipelineConfig) -> OrreryResult<()> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| OrreryError::UnknownShader {
                pipeline: name.to_owned(),
                shader: config.shader.clone(),
            })?;

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&self.layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: config.polygon_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: TextureResource::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        log::debug!("Created pipeline '{}' ({:?})", name, config.polygon_mode);
        self.pipelines.insert(name.to_owned(), pipeline);
        Ok(())
    }

    pub fn get_pipeline(&self, name: &str) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(name)
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipelines.contains_key(name)
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            total_pipelines: self.pipelines.len(),
            loaded_shaders: self.shader_modules.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub total_pipelines: usize,
    pub loaded_shaders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::default()
            .with_label("Wireframe")
            .with_polygon_mode(wgpu::PolygonMode::Line)
            .with_color_format(wgpu::TextureFormat::Rgba8Unorm);

        assert_eq!(config.label, "Wireframe");
        assert_eq!(config.shader, "planet");
        assert_eq!(config.polygon_mode, wgpu::PolygonMode::Line);
        assert_eq!(config.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(config.color_format, wgpu::TextureFormat::Rgba8Unorm);
    }
}
