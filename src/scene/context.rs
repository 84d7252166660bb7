use crate::pipeline::shaders::phong::ShadingConfig;
use crate::scene::camera::Camera;
use crate::scene::light::DirectionalLight;
use crate::scene::material::TextureArena;
use crate::scene::scene_object::SceneObject;
use crate::ui::input::InputState;
use std::f32::consts::TAU;

/// Holds all scene resources required for rendering.
///
/// Owns every texture (through the arena) and every mesh for the lifetime of
/// the scene.
pub struct RenderContext {
    pub camera: Camera,
    pub light: DirectionalLight,
    pub shading: ShadingConfig,
    pub objects: Vec<SceneObject>,
    pub textures: TextureArena,

    /// Spin every object about +Y each frame.
    pub rotate: bool,
    /// Radians per second.
    pub rotation_speed: f32,
    spin_angle: f32,
}

impl RenderContext {
    pub fn new(
        camera: Camera,
        light: DirectionalLight,
        shading: ShadingConfig,
        objects: Vec<SceneObject>,
        textures: TextureArena,
    ) -> Self {
        Self {
            camera,
            light,
            shading,
            objects,
            textures,
            rotate: false,
            rotation_speed: 0.0,
            spin_angle: 0.0,
        }
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    pub fn toggle_rotation(&mut self) -> bool {
        self.rotate = !self.rotate;
        self.rotate
    }

    /// Advances one frame: camera input, then mesh rotation.
    pub fn update(&mut self, dt: f32, input: &InputState) {
        self.camera.update(dt, input);

        if self.rotate {
            self.spin_angle = (self.spin_angle + self.rotation_speed * dt).rem_euclid(TAU);
        }
        for object in &mut self.objects {
            object.update_world_matrix(self.spin_angle);
        }
    }
}
