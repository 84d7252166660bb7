use nalgebra::Vector3;

/// A light source that is infinitely far away (e.g., Sun). Rays are parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit direction the light travels in.
    pub direction: Vector3<f32>,
    pub color: Vector3<f32>,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(
            Vector3::new(0.577, -0.577, 0.577),
            Vector3::new(1.0, 1.0, 1.0),
            7.0,
        )
    }
}

impl DirectionalLight {
    /// `direction` is normalized; a zero vector falls back to straight down +Z.
    pub fn new(direction: Vector3<f32>, color: Vector3<f32>, intensity: f32) -> Self {
        Self {
            direction: direction.try_normalize(1e-6).unwrap_or_else(Vector3::z),
            color,
            intensity,
        }
    }

    /// Radiance arriving at any surface: `color * intensity`.
    pub fn radiance(&self) -> Vector3<f32> {
        self.color * self.intensity
    }
}
