//! Crate-wide error type.
//!
//! Only setup can fail: loading configuration, geometry and textures, opening
//! the window and exporting images. The per-triangle and per-pixel paths never
//! produce errors; degenerate or culled primitives are skipped in place.

use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug)]
pub enum RenderError {
    /// Configuration file missing, unparsable, or semantically invalid.
    Config(String),

    /// Filesystem failure outside of asset decoding (output directories).
    Io(std::io::Error),

    /// A texture could not be opened or decoded.
    TextureLoad { path: PathBuf, reason: String },

    /// An OBJ file could not be opened or parsed.
    MeshLoad { path: PathBuf, reason: String },

    /// Geometry violates a structural invariant (e.g. index out of range).
    InvalidGeometry(String),

    /// Writing the color buffer to disk failed.
    ImageExport(String),

    /// The presentation window could not be created or updated.
    Window(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Config(msg) => write!(f, "Configuration error: {}", msg),
            RenderError::Io(e) => write!(f, "IO error: {}", e),
            RenderError::TextureLoad { path, reason } => {
                write!(f, "Failed to load texture '{}': {}", path.display(), reason)
            }
            RenderError::MeshLoad { path, reason } => {
                write!(f, "Failed to load mesh '{}': {}", path.display(), reason)
            }
            RenderError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            RenderError::ImageExport(msg) => write!(f, "Image export failed: {}", msg),
            RenderError::Window(msg) => write!(f, "Window error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}
