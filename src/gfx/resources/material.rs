//! Per-body surface description and its GPU bindings
//!
//! Each body gets a [`BodyUniform`] (model matrix plus shading inputs) and a
//! bind group pairing that uniform with a texture and sampler. Untextured
//! bodies are bound to a plain white texture and the shader ignores it.

use cgmath::Matrix4;

use crate::{
    gfx::{resources::texture_resource::TextureResource, scene::TextureId},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Bit in [`BodyUniform::flags`]`[0]` set when the texture should be sampled
pub const FLAG_TEXTURED: u32 = 1;
/// Bit in [`BodyUniform::flags`]`[0]` set when the body is a light source
pub const FLAG_EMISSIVE: u32 = 1 << 1;

/// Surface description for one body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMaterial {
    /// Diffuse color, replaced by the texture when one is bound
    pub color: [f32; 3],
    /// Self-illumination added after lighting
    pub emission: [f32; 3],
    pub texture: Option<TextureId>,
}

impl BodyMaterial {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            color: [r, g, b],
            emission: [0.0; 3],
            texture: None,
        }
    }

    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emission = [r, g, b];
        self
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn is_emissive(&self) -> bool {
        self.emission.iter().any(|&c| c > 0.0)
    }
}

/// Must match `BodyUniform` in `planet.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodyUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub emission: [f32; 4],
    /// `flags[0]` holds the `FLAG_*` bits, the rest is padding
    pub flags: [u32; 4],
}

impl BodyUniform {
    /// `textured` is whether a texture was actually uploaded for the body,
    /// which may differ from the material when loading failed.
    pub fn new(model: Matrix4<f32>, material: &BodyMaterial, textured: bool) -> Self {
        let [r, g, b] = material.color;
        let [er, eg, eb] = material.emission;

        let mut bits = 0;
        if textured {
            bits |= FLAG_TEXTURED;
        }
        if material.is_emissive() {
            bits |= FLAG_EMISSIVE;
        }

        Self {
            model: model.into(),
            color: [r, g, b, 1.0],
            emission: [er, eg, eb, 1.0],
            flags: [bits, 0, 0, 0],
        }
    }

    pub fn is_textured(&self) -> bool {
        self.flags[0] & FLAG_TEXTURED != 0
    }
}

pub type BodyUBO = UniformBuffer<BodyUniform>;

/// Bind group layout shared by every body (group 1 in the pipeline)
pub struct BodyBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl BodyBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Filtering,
            ))
            .create(device, "Body Bind Group Layout");

        BodyBindings { bind_group_layout }
    }

    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        ubo: &BodyUBO,
        texture: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, label)
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}
