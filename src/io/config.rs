use crate::core::rasterizer::RenderMode;
use crate::error::{RenderError, Result};
use crate::pipeline::shaders::phong::{ShadingConfig, ShadingMode};
use crate::scene::light::DirectionalLight;
use nalgebra::Vector3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub shading: ShadingSection,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            shading: ShadingSection::default(),
            light: LightConfig::default(),
            camera: CameraConfig::default(),
            objects: default_objects(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_background")]
    pub background: [f32; 3],

    // --- Rasterizer ---
    #[serde(default = "default_bbox_margin")]
    pub bbox_margin: i32,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default = "default_depth_remap")]
    pub depth_remap: [f32; 2],

    // --- Animation ---
    #[serde(default = "default_true")]
    pub rotate: bool,
    /// Degrees per second about +Y.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            background: default_background(),
            bbox_margin: default_bbox_margin(),
            render_mode: RenderMode::default(),
            depth_remap: default_depth_remap(),
            rotate: true,
            rotation_speed: default_rotation_speed(),
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "Rasterizer_ColorBuffer.bmp".to_string()
}
fn default_background() -> [f32; 3] {
    [100.0 / 255.0; 3]
}
fn default_bbox_margin() -> i32 {
    1
}
fn default_depth_remap() -> [f32; 2] {
    [0.985, 1.0]
}
fn default_rotation_speed() -> f32 {
    45.0
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShadingSection {
    #[serde(default)]
    pub mode: ShadingMode,
    #[serde(default = "default_true")]
    pub normal_mapping: bool,
    #[serde(default)]
    pub ambient_when_unlit: bool,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
}

impl Default for ShadingSection {
    fn default() -> Self {
        Self {
            mode: ShadingMode::default(),
            normal_mapping: true,
            ambient_when_unlit: false,
            shininess: default_shininess(),
            ambient: default_ambient(),
        }
    }
}

impl ShadingSection {
    pub fn to_shading_config(&self) -> ShadingConfig {
        ShadingConfig {
            mode: self.mode,
            normal_mapping: self.normal_mapping,
            ambient_when_unlit: self.ambient_when_unlit,
            shininess: self.shininess,
            ambient: Vector3::from(self.ambient),
        }
    }
}

fn default_shininess() -> f32 {
    25.0
}
fn default_ambient() -> [f32; 3] {
    [0.025; 3]
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            intensity: default_light_intensity(),
            color: default_light_color(),
        }
    }
}

impl LightConfig {
    pub fn to_light(&self) -> DirectionalLight {
        DirectionalLight::new(
            Vector3::from(self.direction),
            Vector3::from(self.color),
            self.intensity,
        )
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_light_intensity() -> f32 {
    7.0
}
fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_origin")]
    pub origin: [f32; 3],
    /// Vertical field of view, degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: default_camera_origin(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            move_speed: default_move_speed(),
            mouse_sensitivity: default_mouse_sensitivity(),
        }
    }
}

fn default_camera_origin() -> [f32; 3] {
    [0.0, 0.0, -10.0]
}
fn default_fov() -> f32 {
    60.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_move_speed() -> f32 {
    5.0
}
fn default_mouse_sensitivity() -> f32 {
    10.0
}

/// Geometry that needs no asset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinShape {
    GridStrip,
    GridList,
    Triangle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectConfig {
    /// OBJ file. Exactly one of `path` and `shape` must be set.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub shape: Option<BuiltinShape>,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    /// Yaw about +Y, degrees.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// Mirror Z and reverse winding (right-handed OBJ exports).
    #[serde(default = "default_true")]
    pub flip_handedness: bool,

    // --- Surface Maps ---
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub normal_texture: Option<String>,
    pub gloss_texture: Option<String>,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            path: None,
            shape: None,
            position: [0.0; 3],
            rotation: 0.0,
            scale: default_scale(),
            flip_handedness: true,
            diffuse_texture: None,
            specular_texture: None,
            normal_texture: None,
            gloss_texture: None,
        }
    }
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_objects() -> Vec<ObjectConfig> {
    vec![ObjectConfig {
        shape: Some(BuiltinShape::GridStrip),
        ..Default::default()
    }]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RenderError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::parse(&content)
    }

    /// Parses and validates TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| RenderError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let r = &self.render;
        if r.width == 0 || r.height == 0 {
            return Err(RenderError::Config(format!(
                "render size must be non-zero, got {}x{}",
                r.width, r.height
            )));
        }
        if r.bbox_margin < 0 {
            return Err(RenderError::Config("bbox_margin must be >= 0".to_string()));
        }

        let c = &self.camera;
        if !(c.near > 0.0 && c.far > c.near) {
            return Err(RenderError::Config(format!(
                "camera planes must satisfy 0 < near < far, got near={} far={}",
                c.near, c.far
            )));
        }
        if !(c.fov > 0.0 && c.fov < 180.0) {
            return Err(RenderError::Config(format!(
                "camera fov must be in (0, 180) degrees, got {}",
                c.fov
            )));
        }

        for (i, object) in self.objects.iter().enumerate() {
            match (&object.path, &object.shape) {
                (Some(_), None) | (None, Some(_)) => {}
                (Some(_), Some(_)) => {
                    return Err(RenderError::Config(format!(
                        "objects[{}]: set either `path` or `shape`, not both",
                        i
                    )));
                }
                (None, None) => {
                    return Err(RenderError::Config(format!(
                        "objects[{}]: needs a `path` or a `shape`",
                        i
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.render.width as f32 / self.render.height as f32
    }
}
