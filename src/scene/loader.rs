use crate::error::Result;
use crate::io::config::{BuiltinShape, Config, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::material::{Material, TextureArena, TextureId};
use crate::scene::mesh::{Mesh, PrimitiveTopology};
use crate::scene::scene_object::{Placement, SceneObject};
use log::{debug, info};
use nalgebra::{Point3, Vector3};

/// Builds the whole scene described by `config`.
///
/// Any geometry or texture that fails to load aborts construction.
pub fn init_scene_resources(config: &Config) -> Result<RenderContext> {
    let mut textures = TextureArena::new();
    let mut objects = Vec::with_capacity(config.objects.len());

    for obj_conf in &config.objects {
        objects.push(build_object(obj_conf, &mut textures)?);
    }

    let cam = &config.camera;
    let mut camera = Camera::new(
        Point3::from(cam.origin),
        cam.fov,
        config.aspect_ratio(),
        cam.near,
        cam.far,
    );
    camera.move_speed = cam.move_speed;
    camera.mouse_sensitivity = cam.mouse_sensitivity;

    let mut context = RenderContext::new(
        camera,
        config.light.to_light(),
        config.shading.to_shading_config(),
        objects,
        textures,
    );
    context.rotate = config.render.rotate;
    context.rotation_speed = config.render.rotation_speed.to_radians();

    info!(
        "Scene ready: {} object(s), {} texture(s)",
        context.objects.len(),
        context.textures.len()
    );
    Ok(context)
}

/// Applies the settings that can change without reloading resources:
/// light, shading, animation and camera speeds. Geometry and textures stay.
pub fn apply_runtime_settings(context: &mut RenderContext, config: &Config) {
    context.light = config.light.to_light();
    context.shading = config.shading.to_shading_config();
    context.rotate = config.render.rotate;
    context.rotation_speed = config.render.rotation_speed.to_radians();
    context.camera.move_speed = config.camera.move_speed;
    context.camera.mouse_sensitivity = config.camera.mouse_sensitivity;
}

fn build_object(obj_conf: &ObjectConfig, textures: &mut TextureArena) -> Result<SceneObject> {
    let mesh = match (&obj_conf.path, obj_conf.shape) {
        (Some(path), _) => load_obj(path, obj_conf.flip_handedness)?,
        (None, Some(BuiltinShape::GridStrip)) => {
            Mesh::create_grid(PrimitiveTopology::TriangleStrip)
        }
        (None, Some(BuiltinShape::GridList)) => Mesh::create_grid(PrimitiveTopology::TriangleList),
        (None, Some(BuiltinShape::Triangle)) | (None, None) => Mesh::create_test_triangle(),
    };
    debug!(
        "Mesh: {} vertices, {} indices, {:?}",
        mesh.vertices().len(),
        mesh.indices().len(),
        mesh.topology()
    );

    let mut load = |path: &Option<String>| -> Result<Option<TextureId>> {
        path.as_ref().map(|p| textures.load(p)).transpose()
    };
    let material = Material {
        diffuse: load(&obj_conf.diffuse_texture)?,
        specular: load(&obj_conf.specular_texture)?,
        normal: load(&obj_conf.normal_texture)?,
        gloss: load(&obj_conf.gloss_texture)?,
    };

    let placement = Placement {
        position: Vector3::from(obj_conf.position),
        yaw: obj_conf.rotation.to_radians(),
        scale: Vector3::from(obj_conf.scale),
    };

    Ok(SceneObject::new(mesh, material, placement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::pipeline::shaders::phong::ShadingMode;

    #[test]
    fn default_config_builds_without_assets() {
        let context = init_scene_resources(&Config::default()).unwrap();
        assert_eq!(context.objects.len(), 1);
        assert!(context.textures.is_empty());
        assert_eq!(
            context.objects[0].mesh.topology(),
            PrimitiveTopology::TriangleStrip
        );
        assert!(context.rotate);
        assert_eq!(context.camera.origin, Point3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn missing_texture_aborts_construction() {
        let config = Config::parse(
            "[[objects]]\nshape = \"grid_list\"\nnormal_texture = \"missing/normal.png\"\n",
        )
        .unwrap();
        let err = init_scene_resources(&config).err().unwrap();
        assert!(matches!(err, RenderError::TextureLoad { .. }));
    }

    #[test]
    fn missing_mesh_aborts_construction() {
        let config = Config::parse("[[objects]]\npath = \"missing/vehicle.obj\"\n").unwrap();
        let err = init_scene_resources(&config).err().unwrap();
        assert!(matches!(err, RenderError::MeshLoad { .. }));
    }

    #[test]
    fn runtime_settings_replace_light_and_shading() {
        let mut context = init_scene_resources(&Config::default()).unwrap();
        let config = Config::parse(
            "[light]\nintensity = 2.0\n[shading]\nmode = \"specular\"\n[render]\nrotate = false\n",
        )
        .unwrap();
        apply_runtime_settings(&mut context, &config);

        assert_eq!(context.light.intensity, 2.0);
        assert_eq!(context.shading.mode, ShadingMode::Specular);
        assert!(!context.rotate);
        assert_eq!(context.objects.len(), 1);
    }
}
