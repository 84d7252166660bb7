use crate::core::color::unpack_rgb;
use crate::error::{RenderError, Result};
use chrono::Local;
use image::{ImageBuffer, Rgb};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Saves a row-major 0RGB buffer. The format follows the file extension
/// (`.bmp`, `.png`, ...). Missing parent directories are created.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    if buffer.len() != width * height {
        return Err(RenderError::ImageExport(format!(
            "buffer holds {} pixels, expected {}x{}",
            buffer.len(),
            width,
            height
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Rgb(unpack_rgb(buffer[(y as usize) * width + (x as usize)]))
    });

    img_buf
        .save(path)
        .map_err(|e| RenderError::ImageExport(format!("'{}': {}", path.display(), e)))?;

    info!("Saved {}x{} image to {:?}", width, height, path);
    Ok(())
}

/// `<stem>_<YYYYmmdd_HHMMSS>.bmp` next to `base`, for on-demand snapshots.
pub fn timestamped_path<P: AsRef<Path>>(base: P) -> PathBuf {
    let base = base.as_ref();
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Rasterizer_ColorBuffer");
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    base.with_file_name(format!("{}_{}.bmp", stem, stamp))
}
