use crate::core::framebuffer::FrameBuffer;
use crate::error::Result;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::vertex_stage::ViewParams;
use crate::scene::context::RenderContext;
use log::debug;
use nalgebra::Vector3;
use std::path::Path;

/// Renders one frame: clear, then vertex stage and rasterization per object
/// in scene order.
pub fn render_frame(
    context: &mut RenderContext,
    renderer: &mut Renderer,
    background: Vector3<f32>,
) {
    renderer.clear(background);

    let view = ViewParams {
        view: context.camera.view_matrix(),
        projection: context.camera.projection_matrix(),
        camera_origin: context.camera.origin,
        width: renderer.framebuffer.width,
        height: renderer.framebuffer.height,
    };

    let RenderContext {
        objects,
        textures,
        light,
        shading,
        ..
    } = context;

    for object in objects.iter_mut() {
        renderer.draw_object(object, &view, light, shading, textures);
    }

    debug!(
        "Frame rendered: {} object(s), {:?}",
        objects.len(),
        renderer.rasterizer.render_mode
    );
}

/// Copies the color buffer into a presentation buffer (row-major 0RGB).
pub fn present_to_buffer(framebuffer: &FrameBuffer, buffer: &mut [u32]) {
    framebuffer.copy_to(buffer);
}

/// Writes the current color buffer to `path`.
pub fn export_color_buffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<()> {
    save_buffer_to_image(
        &framebuffer.color_snapshot(),
        framebuffer.width,
        framebuffer.height,
        path,
    )
}
