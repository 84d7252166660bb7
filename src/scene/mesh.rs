use crate::core::geometry::{Vertex, VertexOut};
use crate::error::{RenderError, Result};
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// How the index sequence is assembled into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Every three indices form an independent triangle.
    TriangleList,
    /// Every index after the second closes a triangle with the two before it.
    /// Odd triangles swap their last two vertices to keep a consistent winding.
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Number of index windows the topology yields, degenerate ones included.
    pub fn triangle_count(self, index_count: usize) -> usize {
        match self {
            PrimitiveTopology::TriangleList => index_count / 3,
            PrimitiveTopology::TriangleStrip => index_count.saturating_sub(2),
        }
    }

    /// Resolves the `n`-th triangle to three vertex indices.
    #[inline]
    pub fn triangle(self, indices: &[u32], n: usize) -> [usize; 3] {
        match self {
            PrimitiveTopology::TriangleList => {
                let base = n * 3;
                [
                    indices[base] as usize,
                    indices[base + 1] as usize,
                    indices[base + 2] as usize,
                ]
            }
            PrimitiveTopology::TriangleStrip => {
                let (a, b, c) = (indices[n], indices[n + 1], indices[n + 2]);
                if n % 2 == 0 {
                    [a as usize, b as usize, c as usize]
                } else {
                    [a as usize, c as usize, b as usize]
                }
            }
        }
    }
}

/// A collection of vertices and indices representing a 3D object, plus the
/// per-frame vertex stage output.
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    topology: PrimitiveTopology,

    /// Model -> world transform. Rewritten every frame by the owning object.
    pub world_matrix: Matrix4<f32>,

    /// One entry per vertex (not per index). Cleared and rebuilt every frame.
    pub vertices_out: Vec<VertexOut>,
}

impl Mesh {
    /// Builds a mesh, rejecting indices that point outside `vertices`.
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        topology: PrimitiveTopology,
    ) -> Result<Self> {
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RenderError::InvalidGeometry(format!(
                "index {} out of range for {} vertices",
                bad,
                vertices.len()
            )));
        }

        Ok(Self {
            vertices,
            indices,
            topology,
            world_matrix: Matrix4::identity(),
            vertices_out: Vec::new(),
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Triangles to rasterize, as vertex indices.
    ///
    /// Windows whose three indices are not pairwise distinct (strip stitching,
    /// repeated list entries) are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let topology = self.topology;
        (0..topology.triangle_count(self.indices.len()))
            .map(move |n| topology.triangle(&self.indices, n))
            .filter(|[a, b, c]| a != b && b != c && a != c)
    }

    /// Creates a single triangle in the z = 0 plane facing -Z.
    ///
    /// Vertices run clockwise as seen from a camera looking down +Z.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector2::new(0.5, 0.0), normal),
            Vertex::new(Point3::new(1.0, -1.0, 0.0), Vector2::new(1.0, 1.0), normal),
            Vertex::new(Point3::new(-1.0, -1.0, 0.0), Vector2::new(0.0, 1.0), normal),
        ];

        Self {
            vertices,
            indices: vec![0, 1, 2],
            topology: PrimitiveTopology::TriangleList,
            world_matrix: Matrix4::identity(),
            vertices_out: Vec::new(),
        }
    }

    /// Creates a 6x6 quad made of a 3x3 vertex grid facing -Z, UVs spanning
    /// [0, 1] from the top-left corner.
    ///
    /// The strip variant stitches its two rows with degenerate triangles.
    pub fn create_grid(topology: PrimitiveTopology) -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let mut vertices = Vec::with_capacity(9);
        for row in 0..3 {
            for col in 0..3 {
                let x = -3.0 + 3.0 * col as f32;
                let y = 3.0 - 3.0 * row as f32;
                let uv = Vector2::new(col as f32 * 0.5, row as f32 * 0.5);
                vertices.push(Vertex::new(Point3::new(x, y, 0.0), uv, normal));
            }
        }

        let indices = match topology {
            PrimitiveTopology::TriangleList => vec![
                3, 0, 1, 1, 4, 3, 4, 1, 2, 2, 5, 4, //
                6, 3, 4, 4, 7, 6, 7, 4, 5, 5, 8, 7,
            ],
            PrimitiveTopology::TriangleStrip => {
                vec![3, 0, 4, 1, 5, 2, 2, 6, 6, 3, 7, 4, 8, 5]
            }
        };

        Self {
            vertices,
            indices,
            topology,
            world_matrix: Matrix4::identity(),
            vertices_out: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_vertices() -> Vec<Vertex> {
        let n = Vector3::new(0.0, 0.0, -1.0);
        vec![
            Vertex::new(Point3::new(-1.0, 1.0, 0.0), Vector2::new(0.0, 0.0), n),
            Vertex::new(Point3::new(1.0, 1.0, 0.0), Vector2::new(1.0, 0.0), n),
            Vertex::new(Point3::new(-1.0, -1.0, 0.0), Vector2::new(0.0, 1.0), n),
            Vertex::new(Point3::new(1.0, -1.0, 0.0), Vector2::new(1.0, 1.0), n),
        ]
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let err = Mesh::new(quad_vertices(), vec![0, 1, 4], PrimitiveTopology::TriangleList);
        assert!(matches!(err, Err(RenderError::InvalidGeometry(_))));
    }

    #[test]
    fn list_yields_independent_triples() {
        let mesh = Mesh::new(
            quad_vertices(),
            vec![0, 1, 2, 2, 1, 3, 0],
            PrimitiveTopology::TriangleList,
        )
        .unwrap();
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [2, 1, 3]]);
    }

    #[test]
    fn strip_swaps_odd_triangles() {
        let mesh = Mesh::new(quad_vertices(), vec![0, 1, 2, 3], PrimitiveTopology::TriangleStrip)
            .unwrap();
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn short_strip_yields_nothing() {
        let mesh = Mesh::new(quad_vertices(), vec![0, 1], PrimitiveTopology::TriangleStrip).unwrap();
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn strip_skips_degenerate_stitching() {
        let strip = Mesh::create_grid(PrimitiveTopology::TriangleStrip);
        let list = Mesh::create_grid(PrimitiveTopology::TriangleList);

        assert_eq!(strip.topology().triangle_count(strip.indices().len()), 12);
        assert_eq!(strip.triangles().count(), 8);
        assert_eq!(list.triangles().count(), 8);
    }

    #[test]
    fn strip_and_list_grids_share_winding() {
        // Signed area in the XY plane; the list is clockwise seen from -Z.
        let area = |mesh: &Mesh, [a, b, c]: [usize; 3]| {
            let p = |i: usize| mesh.vertices()[i].position;
            let (a, b, c) = (p(a), p(b), p(c));
            (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
        };

        for topology in [PrimitiveTopology::TriangleList, PrimitiveTopology::TriangleStrip] {
            let mesh = Mesh::create_grid(topology);
            for tri in mesh.triangles() {
                assert!(area(&mesh, tri) < 0.0, "{:?} {:?}", topology, tri);
            }
        }
    }
}
