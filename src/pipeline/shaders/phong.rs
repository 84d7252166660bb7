use crate::core::color::grayscale;
use crate::core::pipeline::{PixelShader, Varying};
use crate::scene::light::DirectionalLight;
use crate::scene::material::{Material, TextureArena, TextureId};
use crate::scene::texture::Texture;
use nalgebra::Vector3;
use serde::Deserialize;
use std::f32::consts::PI;

/// Which term of the lighting model ends up in the color buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// (diffuse + specular) * observed area + ambient.
    #[default]
    Combined,
    /// Grayscale of the cosine between shading normal and light.
    ObservedArea,
    /// Lambert term scaled by the observed area.
    Diffuse,
    /// Phong highlight alone.
    Specular,
}

impl ShadingMode {
    /// Next mode in the hotkey cycle.
    pub fn next(self) -> Self {
        match self {
            ShadingMode::Combined => ShadingMode::ObservedArea,
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShadingMode::Combined => "combined",
            ShadingMode::ObservedArea => "observed area",
            ShadingMode::Diffuse => "diffuse",
            ShadingMode::Specular => "specular",
        }
    }
}

/// Flags and constants of the lighting model, toggled at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingConfig {
    pub mode: ShadingMode,
    pub normal_mapping: bool,
    /// Return the ambient term instead of black for surfaces facing away
    /// from the light.
    pub ambient_when_unlit: bool,
    /// Base Phong exponent, scaled by the gloss map.
    pub shininess: f32,
    pub ambient: Vector3<f32>,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            mode: ShadingMode::Combined,
            normal_mapping: true,
            ambient_when_unlit: false,
            shininess: 25.0,
            ambient: Vector3::new(0.025, 0.025, 0.025),
        }
    }
}

/// Textures bound for one draw, borrowed from the scene's arena.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceMaps<'a> {
    pub diffuse: Option<&'a Texture>,
    pub specular: Option<&'a Texture>,
    pub normal: Option<&'a Texture>,
    pub gloss: Option<&'a Texture>,
}

impl<'a> SurfaceMaps<'a> {
    pub fn resolve(material: &Material, textures: &'a TextureArena) -> Self {
        let get = |id: Option<TextureId>| id.and_then(|id| textures.get(id));
        Self {
            diffuse: get(material.diffuse),
            specular: get(material.specular),
            normal: get(material.normal),
            gloss: get(material.gloss),
        }
    }
}

/// Normal-mapped Lambert + Phong shading for a single directional light.
pub struct PhongShader<'a> {
    pub light: DirectionalLight,
    pub config: ShadingConfig,
    pub maps: SurfaceMaps<'a>,
}

impl<'a> PhongShader<'a> {
    pub fn new(light: DirectionalLight, config: ShadingConfig, maps: SurfaceMaps<'a>) -> Self {
        Self { light, config, maps }
    }

    /// Geometric normal, perturbed by the normal map when enabled and bound.
    fn shading_normal(&self, surface: &Varying) -> Vector3<f32> {
        let normal = surface.normal.try_normalize(1e-8).unwrap_or(surface.normal);

        let Some(normal_map) = self.maps.normal.filter(|_| self.config.normal_mapping) else {
            return normal;
        };

        let tangent = surface.tangent.try_normalize(1e-8).unwrap_or(surface.tangent);
        let bitangent = normal.cross(&tangent);

        // [0, 1] -> [-1, 1], then tangent space -> world space.
        let sampled = normal_map.sample(surface.uv) * 2.0 - Vector3::new(1.0, 1.0, 1.0);
        let perturbed = tangent * sampled.x + bitangent * sampled.y + normal * sampled.z;
        perturbed.try_normalize(1e-8).unwrap_or(normal)
    }

    fn specular(&self, surface: &Varying, normal: &Vector3<f32>) -> Vector3<f32> {
        let Some(specular_map) = self.maps.specular else {
            return Vector3::zeros();
        };
        let ks = specular_map.sample(surface.uv);
        let gloss = self.maps.gloss.map_or(1.0, |g| g.sample(surface.uv).x);
        let exponent = self.config.shininess * gloss;

        let l = self.light.direction;
        let reflected = l - normal * (2.0 * l.dot(normal));
        let view = surface
            .view_direction
            .try_normalize(1e-8)
            .unwrap_or_else(Vector3::zeros);
        let cos_alpha = reflected.dot(&-view).max(0.0);

        ks * cos_alpha.powf(exponent)
    }
}

impl PixelShader for PhongShader<'_> {
    fn shade(&self, surface: &Varying) -> Vector3<f32> {
        let normal = self.shading_normal(surface);

        let observed_area = normal.dot(&-self.light.direction);
        if observed_area < 0.0 {
            return match self.config.mode {
                ShadingMode::Combined if self.config.ambient_when_unlit => self.config.ambient,
                _ => Vector3::zeros(),
            };
        }

        if self.config.mode == ShadingMode::ObservedArea {
            return grayscale(observed_area);
        }

        let albedo = self
            .maps
            .diffuse
            .map_or(surface.color, |t| t.sample(surface.uv));
        // Lambert: kd * cd / pi, times incoming radiance.
        let diffuse = albedo.component_mul(&self.light.radiance()) / PI;

        match self.config.mode {
            ShadingMode::Combined => {
                (diffuse + self.specular(surface, &normal)) * observed_area + self.config.ambient
            }
            ShadingMode::Diffuse => diffuse * observed_area,
            ShadingMode::Specular => self.specular(surface, &normal),
            ShadingMode::ObservedArea => grayscale(observed_area),
        }
    }
}
