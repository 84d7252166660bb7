use crate::core::geometry::Vertex;
use crate::error::{RenderError, Result};
use crate::scene::mesh::{Mesh, PrimitiveTopology};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file into a single triangle-list Mesh.
///
/// All models in the file are merged. UV v is flipped so (0, 0) is the
/// top-left texel. With `flip_handedness`, Z is mirrored and the winding
/// reversed, turning right-handed exports into the left-handed world space.
/// Missing normals are rebuilt from faces; tangents are always derived from
/// the UV layout.
pub fn load_obj<P: AsRef<Path>>(path: P, flip_handedness: bool) -> Result<Mesh> {
    let path = path.as_ref();
    let mesh_error = |reason: String| RenderError::MeshLoad {
        path: path.to_path_buf(),
        reason,
    };

    if !path.exists() {
        return Err(mesh_error("file not found".to_string()));
    }

    info!("Loading OBJ file: {:?}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Important: Unifies indices for Position/Normal/UV
        ..Default::default()
    };

    // Materials are configured per object, the MTL side is ignored.
    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|e| mesh_error(e.to_string()))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0;
    let mut missing_normals = false;

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_texcoords = mesh.texcoords.len() / 2 == num_vertices;

        if !has_normals {
            warn!("Mesh '{}' is missing normals, rebuilding from faces", model.name);
            missing_normals = true;
        }
        if !has_texcoords {
            debug!("Mesh '{}' has no texture coordinates", model.name);
        }

        for i in 0..num_vertices {
            let z_sign = if flip_handedness { -1.0 } else { 1.0 };

            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2] * z_sign,
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2] * z_sign,
                )
            } else {
                Vector3::zeros()
            };
            let uv = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, uv, normal));
        }

        // Offset by the vertices of previously merged models.
        for tri in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] + index_offset, tri[1] + index_offset, tri[2] + index_offset);
            if flip_handedness {
                indices.extend_from_slice(&[a, c, b]);
            } else {
                indices.extend_from_slice(&[a, b, c]);
            }
        }

        index_offset += num_vertices as u32;
    }

    if missing_normals {
        generate_normals(&mut vertices, &indices);
    }
    generate_tangents(&mut vertices, &indices);

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    Mesh::new(vertices, indices, PrimitiveTopology::TriangleList)
        .map_err(|e| mesh_error(e.to_string()))
}

/// Replaces zero normals with the area-weighted average of adjacent face
/// normals. Faces are assumed clockwise seen from the side they face.
pub fn generate_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vector3::zeros(); vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(p0), Some(p1), Some(p2)) = (vertices.get(a), vertices.get(b), vertices.get(c))
        else {
            continue;
        };
        // Left-handed: clockwise winding faces the viewer.
        let face = (p1.position - p0.position).cross(&(p2.position - p0.position));
        for i in [a, b, c] {
            accumulated[i] += face;
        }
    }

    for (vertex, sum) in vertices.iter_mut().zip(accumulated) {
        if vertex.normal.norm_squared() < 1e-12 {
            vertex.normal = sum.try_normalize(1e-12).unwrap_or_else(Vector3::y);
        }
    }
}

/// Derives per-vertex tangents (+u direction) from positions and UVs,
/// orthogonalized against the vertex normal.
pub fn generate_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vector3::zeros(); vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(v0), Some(v1), Some(v2)) = (vertices.get(a), vertices.get(b), vertices.get(c))
        else {
            continue;
        };

        let edge0 = v1.position - v0.position;
        let edge1 = v2.position - v0.position;
        let diff_x = v1.uv - v0.uv;
        let diff_y = v2.uv - v0.uv;

        let det = diff_x.x * diff_y.y - diff_x.y * diff_y.x;
        if det.abs() < 1e-12 {
            continue;
        }
        let tangent = (edge0 * diff_y.y - edge1 * diff_x.y) / det;
        for i in [a, b, c] {
            accumulated[i] += tangent;
        }
    }

    for (vertex, sum) in vertices.iter_mut().zip(accumulated) {
        let n = vertex.normal;
        // Gram-Schmidt
        let rejected = sum - n * n.dot(&sum);
        vertex.tangent = rejected
            .try_normalize(1e-12)
            .unwrap_or_else(|| any_perpendicular(&n));
    }
}

fn any_perpendicular(n: &Vector3<f32>) -> Vector3<f32> {
    let helper = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    let t = helper - n * n.dot(&helper);
    t.try_normalize(1e-12).unwrap_or(helper)
}
