use crate::core::color::pack_rgb;
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::Rasterizer;
use crate::io::config::RenderConfig;
use crate::pipeline::shaders::phong::{PhongShader, ShadingConfig, SurfaceMaps};
use crate::pipeline::vertex_stage::{ViewParams, transform_mesh};
use crate::scene::light::DirectionalLight;
use crate::scene::material::TextureArena;
use crate::scene::scene_object::SceneObject;
use nalgebra::Vector3;

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    /// Renderer sized and configured from the `[render]` section.
    pub fn from_config(render: &RenderConfig) -> Self {
        let mut renderer = Self::new(render.width, render.height);
        renderer.rasterizer.bbox_margin = render.bbox_margin;
        renderer.rasterizer.render_mode = render.render_mode;
        renderer.rasterizer.depth_remap = (render.depth_remap[0], render.depth_remap[1]);
        renderer
    }

    /// Fills color with `background` and resets depth to +infinity.
    pub fn clear(&mut self, background: Vector3<f32>) {
        self.framebuffer.clear(pack_rgb(background));
    }

    /// Runs the vertex stage on the object's mesh, then rasterizes it with
    /// the Phong shader bound to its surface maps.
    pub fn draw_object(
        &self,
        object: &mut SceneObject,
        view: &ViewParams,
        light: &DirectionalLight,
        shading: &ShadingConfig,
        textures: &TextureArena,
    ) {
        transform_mesh(&mut object.mesh, view);

        let maps = SurfaceMaps::resolve(&object.material, textures);
        let shader = PhongShader::new(*light, *shading, maps);
        self.rasterizer
            .rasterize_mesh(&self.framebuffer, &object.mesh, &shader);
    }
}
