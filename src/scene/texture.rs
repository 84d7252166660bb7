use crate::error::{RenderError, Result};
use image::RgbImage;
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// A decoded 2D RGB image sampled with nearest-texel lookup.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|e| RenderError::TextureLoad {
            path: path_ref.to_path_buf(),
            reason: e.to_string(),
        })?;

        let texture = Self::from_image(img.to_rgb8()).ok_or_else(|| RenderError::TextureLoad {
            path: path_ref.to_path_buf(),
            reason: "image has no pixels".to_string(),
        })?;

        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    /// Wraps an already decoded image. `None` for an empty image.
    pub fn from_image(image: RgbImage) -> Option<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            image,
            width,
            height,
        })
    }

    /// Samples the texel at `floor(u * width), floor(v * height)`.
    ///
    /// UV is clamped to [0, 1] and the texel index to the last row/column, so
    /// (1, 1) maps to the bottom-right texel. Channels are returned in [0, 1].
    pub fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let u = if uv.x.is_nan() { 0.0 } else { uv.x.clamp(0.0, 1.0) };
        let v = if uv.y.is_nan() { 0.0 } else { uv.y.clamp(0.0, 1.0) };

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        let pixel = self.image.get_pixel(x, y);
        Vector3::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checker() -> Texture {
        // 2x2: red, green / blue, white
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([255, 255, 255]));
        Texture::from_image(img).unwrap()
    }

    #[test]
    fn corners_return_corner_texels() {
        let tex = checker();
        assert_eq!(tex.sample(Vector2::new(0.0, 0.0)), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(Vector2::new(1.0, 1.0)), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(tex.sample(Vector2::new(0.99, 0.0)), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(tex.sample(Vector2::new(0.0, 0.75)), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn out_of_range_uv_is_clamped() {
        let tex = checker();
        assert_eq!(tex.sample(Vector2::new(-3.0, 7.0)), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vector2::new(f32::NAN, -1.0)), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn empty_images_are_rejected() {
        assert!(Texture::from_image(RgbImage::new(0, 4)).is_none());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Texture::load("does/not/exist.png").unwrap_err();
        assert!(matches!(err, RenderError::TextureLoad { .. }));
        assert!(err.to_string().contains("does/not/exist.png"));
    }
}
