use std::path::Path;

use wgpu::Device;

use crate::{
    error::{GeometryResult, OrreryResult},
    gfx::{
        camera::camera_utils::CameraManager,
        geometry::MeshData,
        resources::{
            material::{BodyBindings, BodyMaterial},
            texture_resource::{TextureImage, TextureResource},
        },
    },
};

use super::{
    body::{BodyKind, CelestialBody},
    mesh::Mesh,
};

/// Index of a mesh in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Index of a texture in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) usize);

/// Index of a body in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub(crate) usize);

struct SceneTexture {
    label: String,
    // decoded pixels are dropped once uploaded
    image: Option<TextureImage>,
    gpu: Option<TextureResource>,
}

/// Main scene: arenas of meshes, textures and bodies, plus the camera
///
/// Nothing is ever removed, so ids stay valid for the lifetime of the scene.
pub struct Scene {
    pub camera_manager: CameraManager,
    meshes: Vec<Mesh>,
    textures: Vec<SceneTexture>,
    bodies: Vec<CelestialBody>,
    fallback_texture: Option<TextureResource>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            meshes: Vec::new(),
            textures: Vec::new(),
            bodies: Vec::new(),
            fallback_texture: None,
        }
    }

    /// Moves the camera for held keys
    pub fn update(&mut self, delta_time: f32) {
        self.camera_manager.update(delta_time);
    }

    pub fn add_mesh(&mut self, data: MeshData) -> GeometryResult<MeshId> {
        let mesh = Mesh::new(data)?;
        self.meshes.push(mesh);
        Ok(MeshId(self.meshes.len() - 1))
    }

    pub fn add_texture(&mut self, label: &str, image: TextureImage) -> TextureId {
        self.textures.push(SceneTexture {
            label: label.to_owned(),
            image: Some(image),
            gpu: None,
        });
        TextureId(self.textures.len() - 1)
    }

    /// Decodes an image file and registers it as a texture
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> OrreryResult<TextureId> {
        let path = path.as_ref();
        let image = TextureImage::load(path)?;
        log::info!(
            "Loaded texture {} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        Ok(self.add_texture(&path.display().to_string(), image))
    }

    /// Adds a body drawn with `mesh`, which must come from this scene
    pub fn add_body(&mut self, kind: BodyKind, mesh: MeshId, material: BodyMaterial) -> BodyId {
        debug_assert!(mesh.0 < self.meshes.len(), "Mesh {mesh:?} is not in this scene");
        self.bodies.push(CelestialBody::new(kind, mesh, material));
        BodyId(self.bodies.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn body(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut CelestialBody> {
        self.bodies.get_mut(id.0)
    }

    /// First body of the given kind
    pub fn find_body(&self, kind: BodyKind) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|body| body.kind == kind)
            .map(BodyId)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(index, body)| (BodyId(index), body))
    }

    /// Bodies paired with the mesh they draw
    pub fn drawables(&self) -> impl Iterator<Item = (&CelestialBody, &Mesh)> {
        self.bodies
            .iter()
            .filter_map(|body| self.meshes.get(body.mesh.0).map(|mesh| (body, mesh)))
    }

    /// Uploads meshes and textures and creates per-body bindings
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        bindings: &BodyBindings,
    ) {
        for mesh in &mut self.meshes {
            mesh.init_gpu_resources(device);
        }

        let max_dimension = device.limits().max_texture_dimension_2d;
        for texture in &mut self.textures {
            if let Some(image) = texture.image.take() {
                let image = image.fit_within(max_dimension);
                texture.gpu = Some(TextureResource::from_image(
                    device,
                    queue,
                    &image,
                    &texture.label,
                ));
            }
        }

        let fallback = self.fallback_texture.get_or_insert_with(|| {
            TextureResource::from_image(device, queue, &TextureImage::white(), "White Texture")
        });

        for body in &mut self.bodies {
            let texture = body
                .material
                .texture
                .and_then(|id| self.textures.get(id.0))
                .and_then(|texture| texture.gpu.as_ref());
            if body.material.texture.is_some() && texture.is_none() {
                log::warn!("{} texture is unavailable, using its flat color", body.kind);
            }
            body.init_gpu_resources(device, bindings, texture, fallback);
        }

        log::info!("Scene uploaded: {}", self.statistics());
    }

    /// Syncs every body's uniform to the GPU
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for body in &mut self.bodies {
            body.update_transform(queue);
        }
    }

    pub fn statistics(&self) -> SceneStatistics {
        let drawn = || self.drawables().filter(|(body, _)| body.visible);
        SceneStatistics {
            body_count: self.bodies.len(),
            mesh_count: self.meshes.len(),
            texture_count: self.textures.len(),
            total_triangles: drawn().map(|(_, mesh)| mesh.index_count() as usize / 3).sum(),
            total_vertices: drawn().map(|(_, mesh)| mesh.vertex_count()).sum(),
        }
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub body_count: usize,
    pub mesh_count: usize,
    pub texture_count: usize,
    /// Triangles submitted per frame across visible bodies
    pub total_triangles: usize,
    pub total_vertices: usize,
}

impl std::fmt::Display for SceneStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} bodies, {} meshes, {} textures, {} triangles/frame",
            self.body_count, self.mesh_count, self.texture_count, self.total_triangles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{Camera, CameraController},
        geometry::generate_sphere,
    };

    fn scene() -> Scene {
        Scene::new(CameraManager::new(Camera::new(), CameraController::default()))
    }

    #[test]
    fn test_bodies_share_one_mesh() {
        let mut scene = scene();
        let sphere = scene.add_mesh(generate_sphere(8).unwrap()).unwrap();

        let sun = scene.add_body(BodyKind::Sun, sphere, BodyMaterial::new(1.0, 1.0, 0.0));
        let earth = scene.add_body(BodyKind::Earth, sphere, BodyMaterial::new(0.33, 0.5, 0.18));
        let moon = scene.add_body(BodyKind::Moon, sphere, BodyMaterial::new(0.3, 0.3, 0.7));

        assert_ne!(sun, earth);
        assert_ne!(earth, moon);
        assert_eq!(scene.body(earth).unwrap().mesh, sphere);
        assert_eq!(scene.drawables().count(), 3);
        assert!(scene.drawables().all(|(_, mesh)| mesh.vertex_count() == 81));

        let stats = scene.statistics();
        assert_eq!(stats.mesh_count, 1);
        assert_eq!(stats.body_count, 3);
        assert_eq!(stats.total_triangles, 3 * (2 * 64 - 16));
    }

    #[test]
    fn test_ids_are_stable() {
        let mut scene = scene();
        let first = scene.add_mesh(generate_sphere(4).unwrap()).unwrap();
        let second = scene.add_mesh(generate_sphere(6).unwrap()).unwrap();
        let body = scene.add_body(BodyKind::Moon, second, BodyMaterial::new(1.0, 1.0, 1.0));

        scene.add_mesh(generate_sphere(2).unwrap()).unwrap();
        scene.add_body(BodyKind::Sun, first, BodyMaterial::new(1.0, 1.0, 1.0));

        assert_eq!(scene.mesh(first).unwrap().vertex_count(), 25);
        assert_eq!(scene.mesh(second).unwrap().vertex_count(), 49);
        assert_eq!(scene.body(body).unwrap().kind, BodyKind::Moon);
        assert_eq!(scene.find_body(BodyKind::Sun), Some(BodyId(1)));
        assert_eq!(scene.find_body(BodyKind::Earth), None);
        assert!(scene.body(BodyId(7)).is_none());
    }

    #[test]
    fn test_textures_are_registered() {
        let mut scene = scene();
        let white = scene.add_texture("white", TextureImage::white());
        let other = scene.add_texture("other", TextureImage::white());
        assert_ne!(white, other);
        assert_eq!(scene.statistics().texture_count, 2);

        assert!(scene.load_texture("no/such/moon.jpg").is_err());
        assert_eq!(scene.statistics().texture_count, 2);
    }

    #[test]
    fn test_hidden_bodies_are_not_counted() {
        let mut scene = scene();
        let sphere = scene.add_mesh(generate_sphere(4).unwrap()).unwrap();
        let body = scene.add_body(BodyKind::Earth, sphere, BodyMaterial::new(1.0, 1.0, 1.0));
        scene.body_mut(body).unwrap().visible = false;
        assert_eq!(scene.statistics().total_triangles, 0);
    }
}
