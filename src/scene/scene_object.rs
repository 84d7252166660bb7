use crate::core::math::transform::TransformFactory;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Vector3};

/// Where an object sits in the world, before any animated spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vector3<f32>,
    /// Rotation about +Y, radians.
    pub yaw: f32,
    pub scale: Vector3<f32>,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            yaw: 0.0,
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Placement {
    /// World matrix `T * Ry(yaw + spin) * S`.
    pub fn world_matrix(&self, spin: f32) -> Matrix4<f32> {
        TransformFactory::translation(&self.position)
            * TransformFactory::rotation_y(self.yaw + spin)
            * TransformFactory::scaling_nonuniform(&self.scale)
    }
}

/// Represents an instance of a mesh in the scene with its surface maps and
/// placement.
pub struct SceneObject {
    pub mesh: Mesh,
    pub material: Material,
    pub placement: Placement,
}

impl SceneObject {
    pub fn new(mesh: Mesh, material: Material, placement: Placement) -> Self {
        let mut object = Self {
            mesh,
            material,
            placement,
        };
        object.update_world_matrix(0.0);
        object
    }

    /// Rewrites the mesh's world matrix for the current spin angle (radians).
    pub fn update_world_matrix(&mut self, spin: f32) {
        self.mesh.world_matrix = self.placement.world_matrix(spin);
    }
}
