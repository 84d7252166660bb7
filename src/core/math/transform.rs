use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the transformation matrices used by the pipeline.
///
/// World space is LEFT-handed: +X right, +Y up, +Z into the screen. Matrices
/// follow nalgebra's column-vector convention (`M * v`).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Rotation around the X-axis. Positive angles tilt +Z towards +Y (look up).
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Y-axis. Positive angles turn +Z towards +X (turn right).
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Pitch applied first, then yaw. Roll is always zero for the camera.
    pub fn rotation_pitch_yaw(pitch_rad: f32, yaw_rad: f32) -> Matrix4<f32> {
        Self::rotation_y(yaw_rad) * Self::rotation_x(pitch_rad)
    }

    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Camera-to-world matrix: the orthonormal basis and origin as columns.
    pub fn camera_to_world(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// View matrix: inverse of [`Self::camera_to_world`].
    ///
    /// The basis is orthonormal, so the inverse is the transposed rotation
    /// followed by the rotated, negated origin.
    pub fn view(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        let o = origin.coords;
        Matrix4::new(
            right.x,   right.y,   right.z,   -right.dot(&o),
            up.x,      up.y,      up.z,      -up.dot(&o),
            forward.x, forward.y, forward.z, -forward.dot(&o),
            0.0,       0.0,       0.0,       1.0,
        )
    }

    /// Left-handed perspective projection.
    ///
    /// `fov_tan` is tan(fov_y / 2). After the divide, depth maps `near -> 0`
    /// and `far -> 1`; clip-space w carries the view-space depth.
    pub fn perspective(fov_tan: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let range = far - near;
        Matrix4::new(
            1.0 / (aspect_ratio * fov_tan), 0.0,           0.0,         0.0,
            0.0,                            1.0 / fov_tan, 0.0,         0.0,
            0.0,                            0.0,           far / range, -(far * near) / range,
            0.0,                            0.0,           1.0,         0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division: Clip Space -> NDC.
///
/// Returns `None` when w is too close to zero to divide by.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Option<Point3<f32>> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Some(Point3::new(clip.x / w, clip.y / w, clip.z / w))
    } else {
        None
    }
}

/// True when the point lies in the canonical view volume:
/// x and y in [-1, 1], z in [0, 1]. NaN coordinates are outside.
#[inline]
pub fn is_inside_ndc(ndc: &Point3<f32>) -> bool {
    (-1.0..=1.0).contains(&ndc.x) && (-1.0..=1.0).contains(&ndc.y) && (0.0..=1.0).contains(&ndc.z)
}

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height)
}
