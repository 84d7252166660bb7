use crate::core::math::transform::TransformFactory;
use crate::ui::input::InputState;
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Pitch limit in degrees; keeps forward away from the world up axis.
const MAX_PITCH_DEGREES: f32 = 89.0;

/// First-person camera driven by yaw/pitch. Caches View and Projection.
///
/// Looks down +Z when yaw and pitch are zero.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Point3<f32>,

    /// tan(vertical fov / 2).
    fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    pub forward: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,

    /// Accumulated rotation, radians.
    total_pitch: f32,
    total_yaw: f32,

    /// Units per second for keyboard movement.
    pub move_speed: f32,
    /// Degrees (or units, for panning) per pixel of mouse drag per second.
    pub mouse_sensitivity: f32,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(origin: Point3<f32>, fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            origin,
            fov: (fov_degrees.to_radians() * 0.5).tan(),
            aspect_ratio,
            near,
            far,
            forward: Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
            total_pitch: 0.0,
            total_yaw: 0.0,
            move_speed: 5.0,
            mouse_sensitivity: 10.0,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Current (pitch, yaw) in radians.
    pub fn orientation(&self) -> (f32, f32) {
        (self.total_pitch, self.total_yaw)
    }

    /// Applies one frame of input, then rebuilds the basis and matrices.
    pub fn update(&mut self, dt: f32, input: &InputState) {
        // --- Keyboard Movement ---
        let step = self.move_speed * dt;
        if input.move_forward {
            self.origin += self.forward * step;
        }
        if input.move_back {
            self.origin -= self.forward * step;
        }
        if input.move_right {
            self.origin += self.right * step;
        }
        if input.move_left {
            self.origin -= self.right * step;
        }

        // --- Mouse Drag ---
        let (dx, dy) = input.mouse_delta;
        let scale = dt * self.mouse_sensitivity;
        match (input.left_button, input.right_button) {
            // Both buttons: vertical pan.
            (true, true) => self.origin += self.up * dy * scale,
            // Left: turn and dolly along forward.
            (true, false) => {
                self.total_yaw += (dx * scale).to_radians();
                self.origin += self.forward * dy * scale;
            }
            // Right: free look, vertical inverted.
            (false, true) => {
                self.total_yaw += (dx * scale).to_radians();
                self.total_pitch -= (dy * scale).to_radians();
            }
            (false, false) => {}
        }

        self.rebuild_basis();
        self.update_matrices();
    }

    fn rebuild_basis(&mut self) {
        let limit = MAX_PITCH_DEGREES.to_radians();
        self.total_pitch = self.total_pitch.clamp(-limit, limit);

        let rotation = TransformFactory::rotation_pitch_yaw(self.total_pitch, self.total_yaw);
        self.forward = (rotation * Vector4::z()).xyz().normalize();
        // Roll is always zero, so right stays horizontal.
        self.right = Vector3::y().cross(&self.forward).normalize();
        self.up = self.forward.cross(&self.right).normalize();
    }

    /// Recalculates View and Projection matrices from the current pose.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.right, &self.up, &self.forward, &self.origin);
        self.projection_matrix =
            TransformFactory::perspective(self.fov, self.aspect_ratio, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}
