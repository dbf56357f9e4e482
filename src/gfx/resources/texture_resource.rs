//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU textures, views and samplers: the
//! depth buffer, surface textures decoded from image files, and the plain
//! white texture bound for bodies drawn with a flat color.

use std::path::Path;

use crate::error::{OrreryError, OrreryResult};

/// Decoded RGBA8 pixels ready for upload
///
/// Row 0 is the top of the image and maps to `v = 0`, which the sphere
/// generator places at the north pole.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decodes an image file of any format enabled on the `image` crate
    pub fn load(path: impl AsRef<Path>) -> OrreryResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| OrreryError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Decoded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::from_dynamic(image))
    }

    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        let rgba = image.into_rgba8();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        }
    }

    /// Downscales so neither side exceeds `max_dimension`, keeping the aspect ratio
    pub fn fit_within(self, max_dimension: u32) -> Self {
        if self.width <= max_dimension && self.height <= max_dimension {
            return self;
        }
        let (width, height) = (self.width, self.height);
        let Some(buffer) = image::RgbaImage::from_raw(width, height, self.rgba) else {
            return Self::white();
        };
        let scale = max_dimension as f32 / width.max(height) as f32;
        let new_width = ((width as f32 * scale) as u32).clamp(1, max_dimension);
        let new_height = ((height as f32 * scale) as u32).clamp(1, max_dimension);
        log::warn!(
            "Texture {}x{} exceeds the device limit, resizing to {}x{}",
            width,
            height,
            new_width,
            new_height
        );
        let resized = image::imageops::resize(
            &buffer,
            new_width,
            new_height,
            image::imageops::FilterType::Triangle,
        );
        Self {
            width: new_width,
            height: new_height,
            rgba: resized.into_raw(),
        }
    }

    /// Single opaque white texel
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth attachment for a `width` x `height` surface
    pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // not sampled
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads a decoded image as a 2D texture
    ///
    /// Addressing repeats in both directions so the sphere seam at `u = 1`
    /// wraps onto `u = 0`. Filtering is linear.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // texels go to the shader unconverted, like the colors in the uniforms
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::debug!("Uploaded texture {label} ({}x{})", image.width, image.height);

        Self {
            texture,
            view,
            sampler,
        }
    }
}
