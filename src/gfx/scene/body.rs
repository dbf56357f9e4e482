use std::fmt;

use cgmath::{Matrix4, SquareMatrix};

use crate::gfx::resources::{
    material::{BodyBindings, BodyMaterial, BodyUBO, BodyUniform},
    texture_resource::TextureResource,
};

use super::{mesh::Mesh, scene::MeshId};

/// Which body of the system this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Sun,
    Earth,
    Moon,
}

impl BodyKind {
    pub const ALL: [BodyKind; 3] = [BodyKind::Sun, BodyKind::Earth, BodyKind::Moon];

    pub fn name(&self) -> &'static str {
        match self {
            BodyKind::Sun => "Sun",
            BodyKind::Earth => "Earth",
            BodyKind::Moon => "Moon",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct BodyGpuResources {
    ubo: BodyUBO,
    bind_group: wgpu::BindGroup,
    textured: bool,
}

/// One drawable body: a shared mesh, a material and a model matrix
pub struct CelestialBody {
    pub kind: BodyKind,
    pub mesh: MeshId,
    pub material: BodyMaterial,
    pub transform: Matrix4<f32>,
    pub visible: bool,
    gpu_resources: Option<BodyGpuResources>, // None until init_gpu_resources called
}

impl CelestialBody {
    pub fn new(kind: BodyKind, mesh: MeshId, material: BodyMaterial) -> Self {
        Self {
            kind,
            mesh,
            material,
            transform: Matrix4::identity(),
            visible: true,
            gpu_resources: None,
        }
    }

    /// World position of the body's center
    pub fn position(&self) -> cgmath::Point3<f32> {
        let w = self.transform.w;
        cgmath::Point3::new(w.x, w.y, w.z)
    }

    /// Whether a texture is actually bound, as opposed to requested
    pub fn is_textured(&self) -> bool {
        self.gpu_resources.as_ref().is_some_and(|gpu| gpu.textured)
    }

    pub fn uniform(&self) -> BodyUniform {
        BodyUniform::new(self.transform, &self.material, self.is_textured())
    }

    /// Creates the uniform buffer and bind group.
    ///
    /// `texture` is the resolved material texture, if any; `fallback` is
    /// bound in its place so every body uses the same layout.
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        bindings: &BodyBindings,
        texture: Option<&TextureResource>,
        fallback: &TextureResource,
    ) {
        let textured = texture.is_some();
        let uniform = BodyUniform::new(self.transform, &self.material, textured);
        let ubo = BodyUBO::new_with_data(device, &uniform);
        let bind_group = bindings.create_bind_group(
            device,
            &ubo,
            texture.unwrap_or(fallback),
            &format!("{} Bind Group", self.kind),
        );

        self.gpu_resources = Some(BodyGpuResources {
            ubo,
            bind_group,
            textured,
        });
    }

    /// Sync the model matrix to the GPU if resources exist
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        if let Some(gpu_resources) = &mut self.gpu_resources {
            gpu_resources.ubo.update_content(queue, uniform);
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }
}

/// Draw commands for scene content on a render pass
pub trait DrawBody<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    /// Binds the body at `group` and draws its mesh
    fn draw_body(&mut self, body: &'a CelestialBody, mesh: &'a Mesh, group: u32);
}

impl<'a, 'b> DrawBody<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let Some((vertex_buffer, index_buffer)) = mesh.buffers() else {
            return; // Skip drawing if not uploaded
        };
        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count(), 0, 0..1);
    }

    fn draw_body(&mut self, body: &'b CelestialBody, mesh: &'b Mesh, group: u32) {
        if !body.visible {
            return;
        }
        let Some(bind_group) = body.bind_group() else {
            return;
        };
        self.set_bind_group(group, bind_group, &[]);
        self.draw_mesh(mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::TextureId;
    use cgmath::Vector3;

    #[test]
    fn test_position_from_transform() {
        let material = BodyMaterial::new(1.0, 1.0, 1.0);
        let mut body = CelestialBody::new(BodyKind::Earth, MeshId(0), material);
        assert_eq!(body.position(), cgmath::Point3::new(0.0, 0.0, 0.0));

        body.transform = Matrix4::from_angle_y(cgmath::Deg(90.0))
            * Matrix4::from_translation(Vector3::new(10.0, 0.0, 0.0));
        let p = body.position();
        assert!(p.x.abs() < 1e-5);
        assert!((p.z + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_without_gpu_is_untextured() {
        let material = BodyMaterial::new(0.33, 0.5, 0.18).with_texture(TextureId(0));
        let body = CelestialBody::new(BodyKind::Earth, MeshId(0), material);
        assert!(!body.is_textured());
        assert!(!body.uniform().is_textured());
        assert!(body.bind_group().is_none());
    }

    #[test]
    fn test_kind_names() {
        let names: Vec<String> = BodyKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["Sun", "Earth", "Moon"]);
    }
}
