use wgpu::Device;

use crate::{error::GeometryResult, gfx::geometry::MeshData};

use super::vertex::Vertex3D;

/// Mesh data paired with its vertex and index buffers once uploaded
pub struct Mesh {
    data: MeshData,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    /// Wraps validated mesh data. Buffers are created by [`Mesh::init_gpu_resources`].
    pub fn new(data: MeshData) -> GeometryResult<Self> {
        data.validate()?;
        let index_count = data.indices.len() as u32;
        Ok(Self {
            data,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        })
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn vertex_count(&self) -> usize {
        self.data.vertex_count()
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    /// Uploads interleaved vertices and `u32` indices. Calling again is a no-op.
    pub fn init_gpu_resources(&mut self, device: &Device) {
        if self.is_uploaded() {
            return;
        }

        let vertices: Vec<Vertex3D> = self.data.to_vertices();

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.data.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        log::debug!(
            "Uploaded mesh: {} vertices, {} triangles",
            vertices.len(),
            self.index_count / 3
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }

    pub(crate) fn buffers(&self) -> Option<(&wgpu::Buffer, &wgpu::Buffer)> {
        Some((self.vertex_buffer.as_ref()?, self.index_buffer.as_ref()?))
    }
}
