use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

pub const DEFAULT_BRUSH_SIZE: u32 = 64;
pub const DEFAULT_BASE_SIZE: u32 = 512;

/// Straight-alpha RGBA8 pixels ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            rgba: image.into_raw(),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// The two images the sketch samples: the brush sprite and the base texture
#[derive(Debug, Clone)]
pub struct SketchAssets {
    pub brush: TextureImage,
    pub base: TextureImage,
}

impl SketchAssets {
    /// Load images from disk, generating a default for any path not given
    pub fn load(brush: Option<&Path>, base: Option<&Path>) -> Result<Self> {
        let brush = match brush {
            Some(path) => load_image(path).context("load brush sprite")?,
            None => procedural_brush(DEFAULT_BRUSH_SIZE),
        };
        let base = match base {
            Some(path) => load_image(path).context("load base texture")?,
            None => procedural_base(DEFAULT_BASE_SIZE, DEFAULT_BASE_SIZE),
        };

        log::debug!(
            "assets ready: brush {}x{}, base {}x{}",
            brush.width,
            brush.height,
            base.width,
            base.height
        );
        Ok(Self { brush, base })
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<TextureImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(TextureImage::from_image(dyn_img.to_rgba8()))
}

pub fn load_image(path: &Path) -> Result<TextureImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image {}", path.display()))?;
    decode_image(&bytes).with_context(|| format!("decode image {}", path.display()))
}

/// Soft white ring on a transparent square
pub fn procedural_brush(size: u32) -> TextureImage {
    let half = size as f32 / 2.0;
    let image = RgbaImage::from_fn(size, size, |x, y| {
        let dx = (x as f32 + 0.5 - half) / half;
        let dy = (y as f32 + 0.5 - half) / half;
        let r = (dx * dx + dy * dy).sqrt();

        let alpha = if r >= 1.0 {
            0.0
        } else {
            let band = (r - 0.6) / 0.2;
            (-band * band).exp()
        };
        Rgba([255, 255, 255, (alpha * 255.0).round() as u8])
    });
    TextureImage::from_image(image)
}

/// Opaque diagonal colour bands
pub fn procedural_base(width: u32, height: u32) -> TextureImage {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let u = x as f32 / width as f32;
        let v = y as f32 / height as f32;
        let wave = ((u * 3.0 + v * 2.0) * std::f32::consts::TAU).sin() * 0.5 + 0.5;

        let r = 0.15 + 0.7 * wave;
        let g = 0.25 + 0.5 * (1.0 - v);
        let b = 0.5 + 0.5 * (1.0 - wave) * u;
        Rgba([channel(r), channel(g), channel(b), 255])
    });
    TextureImage::from_image(image)
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
