use crate::core::geometry::{Vertex, VertexOut};
use crate::core::math::transform::{apply_perspective_division, is_inside_ndc, ndc_to_screen};
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use rayon::prelude::*;

/// Everything the vertex stage needs besides the mesh itself.
#[derive(Debug, Clone, Copy)]
pub struct ViewParams {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub camera_origin: Point3<f32>,
    pub width: usize,
    pub height: usize,
}

/// Rebuilds `mesh.vertices_out`: one output per input vertex.
///
/// Positions go model -> clip through `projection * view * world` (built once
/// per mesh), are divided by w, tested against the view volume and mapped to
/// pixels. Normals and tangents go through the world matrix only.
pub fn transform_mesh(mesh: &mut Mesh, params: &ViewParams) {
    let world = mesh.world_matrix;
    let world_view_projection = params.projection * params.view * world;

    let mut out = std::mem::take(&mut mesh.vertices_out);
    mesh.vertices()
        .par_iter()
        .map(|v| transform_vertex(v, &world, &world_view_projection, params))
        .collect_into_vec(&mut out);
    mesh.vertices_out = out;
}

fn transform_vertex(
    vertex: &Vertex,
    world: &Matrix4<f32>,
    world_view_projection: &Matrix4<f32>,
    params: &ViewParams,
) -> VertexOut {
    let model = vertex.position.to_homogeneous();
    let clip = world_view_projection * model;
    let world_position = (world * model).xyz();

    let (position, valid) = match apply_perspective_division(&clip) {
        Some(ndc) => {
            let screen = ndc_to_screen(ndc.x, ndc.y, params.width as f32, params.height as f32);
            (
                Vector4::new(screen.x, screen.y, ndc.z, clip.w),
                is_inside_ndc(&ndc),
            )
        }
        None => (Vector4::new(0.0, 0.0, 0.0, clip.w), false),
    };

    VertexOut {
        position,
        color: vertex.color,
        uv: vertex.uv,
        normal: transform_direction(world, &vertex.normal),
        tangent: transform_direction(world, &vertex.tangent),
        view_direction: world_position - params.camera_origin.coords,
        valid,
    }
}

#[inline]
fn transform_direction(world: &Matrix4<f32>, direction: &Vector3<f32>) -> Vector3<f32> {
    let transformed = (world * direction.to_homogeneous()).xyz();
    transformed.try_normalize(1e-8).unwrap_or(transformed)
}
