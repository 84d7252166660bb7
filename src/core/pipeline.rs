use crate::core::geometry::VertexOut;
use nalgebra::{Vector2, Vector3};
use std::ops::{Add, Mul};

/// Surface attributes interpolated across a triangle and handed to the pixel
/// shader. Directions are interpolated as-is; shaders normalize them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Varying {
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub view_direction: Vector3<f32>,
}

impl From<&VertexOut> for Varying {
    fn from(v: &VertexOut) -> Self {
        Self {
            color: v.color,
            uv: v.uv,
            normal: v.normal,
            tangent: v.tangent,
            view_direction: v.view_direction,
        }
    }
}

// Linear combination support for barycentric interpolation.
impl Add for Varying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            color: self.color + other.color,
            uv: self.uv + other.uv,
            normal: self.normal + other.normal,
            tangent: self.tangent + other.tangent,
            view_direction: self.view_direction + other.view_direction,
        }
    }
}

impl Mul<f32> for Varying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            color: self.color * scalar,
            uv: self.uv * scalar,
            normal: self.normal * scalar,
            tangent: self.tangent * scalar,
            view_direction: self.view_direction * scalar,
        }
    }
}

/// Per-pixel shading stage.
///
/// Implementations must be thread-safe (Send + Sync) because shading is
/// invoked concurrently across the rows of a triangle. The returned color is
/// linear RGB; the rasterizer clamps it to [0, 1] before packing.
pub trait PixelShader: Send + Sync {
    fn shade(&self, surface: &Varying) -> Vector3<f32>;
}
