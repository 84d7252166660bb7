use crate::core::color::{grayscale, pack_rgb, remap};
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexOut;
use crate::core::math::interpolation::{
    barycentric_weights, inverse_area_x2, perspective_correct_depth, perspective_correct_weights,
    weights_sum_to_one,
};
use crate::core::pipeline::{PixelShader, Varying};
use crate::scene::mesh::Mesh;
use nalgebra::{Point2, Vector3};
use rayon::prelude::*;
use serde::Deserialize;

/// What the rasterizer writes for covered pixels.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Output of the pixel shader.
    #[default]
    FinalColor,
    /// Grayscale NDC depth, remapped through `Rasterizer::depth_remap`.
    DepthBuffer,
}

/// The Rasterizer is responsible for drawing a mesh's transformed triangles
/// onto the FrameBuffer.
pub struct Rasterizer {
    pub render_mode: RenderMode,
    /// Pixels added on every side of a triangle's bounding box.
    pub bbox_margin: i32,
    /// NDC depth range shown as black..white in depth-buffer mode.
    pub depth_remap: (f32, f32),
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            render_mode: RenderMode::FinalColor,
            bbox_margin: 1,
            depth_remap: (0.985, 1.0),
        }
    }

    pub fn toggle_render_mode(&mut self) -> RenderMode {
        self.render_mode = match self.render_mode {
            RenderMode::FinalColor => RenderMode::DepthBuffer,
            RenderMode::DepthBuffer => RenderMode::FinalColor,
        };
        self.render_mode
    }

    /// Rasterizes every triangle of `mesh` using its current `vertices_out`.
    ///
    /// Triangles are processed in index order; the pixels of each triangle
    /// are processed in parallel.
    pub fn rasterize_mesh<S: PixelShader>(
        &self,
        framebuffer: &FrameBuffer,
        mesh: &Mesh,
        shader: &S,
    ) {
        let out = &mesh.vertices_out;
        for [i0, i1, i2] in mesh.triangles() {
            if let (Some(v0), Some(v1), Some(v2)) = (out.get(i0), out.get(i1), out.get(i2)) {
                self.rasterize_triangle(framebuffer, shader, [v0, v1, v2]);
            }
        }
    }

    /// Scan-converts one triangle whose vertices are already in screen space.
    ///
    /// Skipped entirely if any vertex is outside the view volume or the
    /// triangle has zero (or negative) screen-space area.
    pub fn rasterize_triangle<S: PixelShader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        vertices: [&VertexOut; 3],
    ) {
        if vertices.iter().any(|v| !v.valid) {
            return;
        }

        let screen = [
            vertices[0].screen_xy(),
            vertices[1].screen_xy(),
            vertices[2].screen_xy(),
        ];
        let Some(inv_area_x2) = inverse_area_x2(screen[0], screen[1], screen[2]) else {
            return;
        };

        let Some((start_x, start_y, end_x, end_y)) =
            self.compute_bounding_box(&screen, framebuffer.width, framebuffer.height)
        else {
            return;
        };

        let view_depths = [
            vertices[0].position.w,
            vertices[1].position.w,
            vertices[2].position.w,
        ];
        let ndc_depths = Vector3::new(
            vertices[0].position.z,
            vertices[1].position.z,
            vertices[2].position.z,
        );
        let varyings = [
            Varying::from(vertices[0]),
            Varying::from(vertices[1]),
            Varying::from(vertices[2]),
        ];

        // Parallelize over rows of the bounding box.
        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let Some(bary) = barycentric_weights(pixel_center, &screen, inv_area_x2) else {
                    continue;
                };
                debug_assert!(weights_sum_to_one(bary), "weights {:?}", bary);

                let Some(depth) = perspective_correct_depth(bary, view_depths) else {
                    continue;
                };

                // Early depth test: skip shading fragments that are already hidden.
                if !framebuffer.is_nearer(x, y, depth) {
                    continue;
                }

                let color = match self.render_mode {
                    RenderMode::FinalColor => {
                        let c = perspective_correct_weights(bary, view_depths, depth);
                        let surface = varyings[0] * c.x + varyings[1] * c.y + varyings[2] * c.z;
                        shader.shade(&surface)
                    }
                    RenderMode::DepthBuffer => {
                        let (lo, hi) = self.depth_remap;
                        grayscale(remap(bary.dot(&ndc_depths), lo, hi))
                    }
                };

                framebuffer.write_if_nearer(x, y, depth, pack_rgb(color));
            }
        });
    }

    /// Integer pixel box around the triangle, grown by `bbox_margin` and
    /// clamped to the frame. `None` if it misses the frame entirely.
    fn compute_bounding_box(
        &self,
        points: &[Point2<f32>; 3],
        width: usize,
        height: usize,
    ) -> Option<(usize, usize, usize, usize)> {
        if width == 0 || height == 0 {
            return None;
        }
        let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32 - self.bbox_margin;
        let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32 - self.bbox_margin;
        let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32 + self.bbox_margin;
        let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32 + self.bbox_margin;

        // Scissor Test
        if max_x < 0 || max_y < 0 || min_x >= width as i32 || min_y >= height as i32 {
            return None;
        }

        Some((
            min_x.max(0) as usize,
            min_y.max(0) as usize,
            max_x.min(width as i32 - 1) as usize,
            max_y.min(height as i32 - 1) as usize,
        ))
    }
}
