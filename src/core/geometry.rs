use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// Represents a single input vertex in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Linear RGB in [0, 1]; used as albedo when no diffuse map is bound.
    pub color: Vector3<f32>,
    /// Texture coordinates (UV), origin at the top-left texel.
    pub uv: Vector2<f32>,
    /// Unit normal for lighting calculations.
    pub normal: Vector3<f32>,
    /// Unit tangent for Normal Mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, uv: Vector2<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            color: Vector3::new(1.0, 1.0, 1.0),
            uv,
            normal,
            tangent: Vector3::x(),
        }
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.color = color;
        self
    }
}

/// Output of the vertex stage. Rebuilt every frame, one per input vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOut {
    /// x, y in pixels; z = NDC depth in [0, 1]; w = view-space depth.
    pub position: Vector4<f32>,
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    /// World-space unit normal.
    pub normal: Vector3<f32>,
    /// World-space unit tangent.
    pub tangent: Vector3<f32>,
    /// World position minus camera origin; normalized at use.
    pub view_direction: Vector3<f32>,
    /// False when the vertex falls outside the view volume. Any triangle
    /// touching an invalid vertex is skipped entirely.
    pub valid: bool,
}

impl VertexOut {
    #[inline(always)]
    pub fn screen_xy(&self) -> nalgebra::Point2<f32> {
        nalgebra::Point2::new(self.position.x, self.position.y)
    }
}
