use crate::error::Result;
use crate::scene::texture::Texture;
use std::path::Path;

/// Handle to a texture owned by a [`TextureArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

/// Owns every texture of a scene. Loaded once at setup, dropped with the scene.
#[derive(Debug, Default)]
pub struct TextureArena {
    textures: Vec<Texture>,
}

impl TextureArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<TextureId> {
        let texture = Texture::load(path)?;
        Ok(self.insert(texture))
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Surface maps bound to one mesh. Every slot is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Material {
    /// Albedo. Falls back to the interpolated vertex color.
    pub diffuse: Option<TextureId>,
    /// Specular intensity (RGB). Absent means no specular highlight.
    pub specular: Option<TextureId>,
    /// Tangent-space normal map.
    pub normal: Option<TextureId>,
    /// Glossiness; red channel scales the shininess exponent.
    pub gloss: Option<TextureId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn ids_resolve_to_inserted_textures() {
        let mut arena = TextureArena::new();
        let a = arena.insert(Texture::from_image(RgbImage::new(1, 1)).unwrap());
        let b = arena.insert(Texture::from_image(RgbImage::new(4, 2)).unwrap());

        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(b).map(|t| (t.width, t.height)), Some((4, 2)));
    }

    #[test]
    fn failed_load_leaves_arena_untouched() {
        let mut arena = TextureArena::new();
        assert!(arena.load("missing/normal.png").is_err());
        assert!(arena.is_empty());
    }
}
