use image::{Rgb, RgbImage};
use nalgebra::{Point3, Vector2, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use soft_rasterizer::core::color::{pack_rgb, unpack_rgb};
use soft_rasterizer::core::geometry::Vertex;
use soft_rasterizer::core::rasterizer::RenderMode;
use soft_rasterizer::io::config::Config;
use soft_rasterizer::pipeline::passes::render_frame;
use soft_rasterizer::pipeline::renderer::Renderer;
use soft_rasterizer::pipeline::shaders::phong::{ShadingConfig, ShadingMode};
use soft_rasterizer::scene::camera::Camera;
use soft_rasterizer::scene::context::RenderContext;
use soft_rasterizer::scene::light::DirectionalLight;
use soft_rasterizer::scene::loader::init_scene_resources;
use soft_rasterizer::scene::material::{Material, TextureArena};
use soft_rasterizer::scene::mesh::{Mesh, PrimitiveTopology};
use soft_rasterizer::scene::scene_object::{Placement, SceneObject};
use soft_rasterizer::scene::texture::Texture;
use std::f32::consts::PI;

const SIZE: usize = 32;
/// Full-screen quads sit just inside NDC +-1.
const FULL: f32 = 0.999;

fn background() -> Vector3<f32> {
    Vector3::new(100.0, 100.0, 100.0) / 255.0
}

fn background_pixel() -> u32 {
    pack_rgb(background())
}

fn red() -> Vector3<f32> {
    Vector3::new(1.0, 0.0, 0.0)
}

/// Camera at the origin looking down +Z with a 90 degree FOV, so a point at
/// depth d and |x| = d sits on the frame edge.
fn camera() -> Camera {
    Camera::new(Point3::origin(), 90.0, 1.0, 0.1, 100.0)
}

fn diffuse_scene(objects: Vec<SceneObject>, textures: TextureArena, intensity: f32) -> RenderContext {
    let light = DirectionalLight::new(Vector3::z(), Vector3::new(1.0, 1.0, 1.0), intensity);
    let shading = ShadingConfig {
        mode: ShadingMode::Diffuse,
        ..Default::default()
    };
    RenderContext::new(camera(), light, shading, objects, textures)
}

/// Axis-aligned quad at depth `z` facing the camera, `half` units from the
/// center to each edge. UV (0, 0) at the top-left corner.
fn quad(z: f32, half: f32, color: Vector3<f32>) -> SceneObject {
    let n = Vector3::new(0.0, 0.0, -1.0);
    let corner = |x: f32, y: f32, u: f32, v: f32| {
        Vertex::new(Point3::new(x * half, y * half, z), Vector2::new(u, v), n).with_color(color)
    };
    let vertices = vec![
        corner(-1.0, 1.0, 0.0, 0.0),
        corner(1.0, 1.0, 1.0, 0.0),
        // Nudged so the shared diagonal misses pixel centers.
        corner(-1.0, -0.997, 0.0, 1.0),
        corner(1.0, -1.0, 1.0, 1.0),
    ];
    let mesh = Mesh::new(vertices, vec![0, 1, 2, 1, 3, 2], PrimitiveTopology::TriangleList).unwrap();
    SceneObject::new(mesh, Material::default(), Placement::default())
}

fn render(context: &mut RenderContext) -> Renderer {
    let mut renderer = Renderer::new(SIZE, SIZE);
    render_frame(context, &mut renderer, background());
    renderer
}

#[test]
fn full_screen_red_quad_gets_diffuse_red_everywhere() {
    let mut context = diffuse_scene(vec![quad(2.0, FULL * 2.0, red())], TextureArena::new(), 1.0);
    let renderer = render(&mut context);

    // (1 / pi) * 1 * 1 * observedArea(1), scaled to 8 bits.
    let expected = pack_rgb(Vector3::new(1.0 / PI, 0.0, 0.0));
    assert_eq!(unpack_rgb(expected), [81, 0, 0]);
    assert!(renderer.framebuffer.color_snapshot().iter().all(|&p| p == expected));
    assert!(renderer
        .framebuffer
        .depth_snapshot()
        .iter()
        .all(|d| (d - 2.0).abs() < 1e-4));
}

#[test]
fn bright_light_saturates_to_pure_red() {
    let mut context = diffuse_scene(vec![quad(2.0, FULL * 2.0, red())], TextureArena::new(), 7.0);
    let renderer = render(&mut context);
    assert!(renderer
        .framebuffer
        .color_snapshot()
        .iter()
        .all(|&p| p == 0x00FF_0000));
}

#[test]
fn nearer_quad_wins_regardless_of_draw_order() {
    let blue = Vector3::new(0.0, 0.0, 1.0);
    let near_first = vec![quad(3.0, 1.0, red()), quad(5.0, FULL * 5.0, blue)];
    let far_first = vec![quad(5.0, FULL * 5.0, blue), quad(3.0, 1.0, red())];

    let a = render(&mut diffuse_scene(near_first, TextureArena::new(), 7.0));
    let b = render(&mut diffuse_scene(far_first, TextureArena::new(), 7.0));

    assert_eq!(a.framebuffer.color_snapshot(), b.framebuffer.color_snapshot());
    assert_eq!(a.framebuffer.pixel(16, 16), Some(0x00FF_0000));
    // Red covers the middle third of the frame, blue fills the rest.
    assert_eq!(a.framebuffer.pixel(16, 2), Some(0x0000_00FF));
    assert!((a.framebuffer.depth(16, 16).unwrap() - 3.0).abs() < 1e-4);
}

#[test]
fn strip_and_list_grids_render_identically() {
    let grid = |topology| {
        SceneObject::new(
            Mesh::create_grid(topology),
            Material::default(),
            Placement {
                // Off-center so cell diagonals miss pixel centers.
                position: Vector3::new(0.13, 0.0, 10.0),
                ..Default::default()
            },
        )
    };

    let strip = render(&mut diffuse_scene(
        vec![grid(PrimitiveTopology::TriangleStrip)],
        TextureArena::new(),
        7.0,
    ));
    let list = render(&mut diffuse_scene(
        vec![grid(PrimitiveTopology::TriangleList)],
        TextureArena::new(),
        7.0,
    ));

    let strip_pixels = strip.framebuffer.color_snapshot();
    let covered = strip_pixels.iter().filter(|&&p| p != background_pixel()).count();
    // 6x6 units at depth 10 span 9.6 of 32 pixels per side.
    assert!((81..=121).contains(&covered), "covered {}", covered);
    assert_eq!(strip_pixels, list.framebuffer.color_snapshot());
}

#[test]
fn triangle_behind_the_camera_contributes_nothing() {
    let behind = SceneObject::new(
        Mesh::create_test_triangle(),
        Material::default(),
        Placement {
            position: Vector3::new(0.0, 0.0, -3.0),
            ..Default::default()
        },
    );

    let renderer = render(&mut diffuse_scene(vec![behind], TextureArena::new(), 7.0));
    assert!(renderer
        .framebuffer
        .color_snapshot()
        .iter()
        .all(|&p| p == background_pixel()));
    assert!(renderer
        .framebuffer
        .depth_snapshot()
        .iter()
        .all(|d| d.is_infinite()));
}

#[test]
fn partially_outside_triangle_is_skipped_whole() {
    // Corners project to NDC +-1.5: triangles are culled, not clipped.
    let wide = quad(2.0, 3.0, red());
    let renderer = render(&mut diffuse_scene(vec![wide], TextureArena::new(), 7.0));
    assert!(renderer
        .framebuffer
        .color_snapshot()
        .iter()
        .all(|&p| p == background_pixel()));
}

#[test]
fn rendering_a_static_scene_twice_is_byte_identical() {
    let mut context = init_scene_resources(&Config::default()).unwrap();
    let mut renderer = Renderer::new(64, 48);

    render_frame(&mut context, &mut renderer, background());
    let first = renderer.framebuffer.color_snapshot();
    render_frame(&mut context, &mut renderer, background());
    let second = renderer.framebuffer.color_snapshot();

    assert_eq!(first, second);
    assert!(first.iter().any(|&p| p != background_pixel()));
}

#[test]
fn diffuse_texture_is_sampled_per_quadrant() {
    let mut img = RgbImage::new(2, 2);
    img.put_pixel(0, 0, Rgb([255, 0, 0]));
    img.put_pixel(1, 0, Rgb([0, 255, 0]));
    img.put_pixel(0, 1, Rgb([0, 0, 255]));
    img.put_pixel(1, 1, Rgb([255, 255, 255]));

    let mut textures = TextureArena::new();
    let id = textures.insert(Texture::from_image(img).unwrap());
    let mut object = quad(2.0, FULL * 2.0, Vector3::new(1.0, 1.0, 1.0));
    object.material.diffuse = Some(id);

    // Intensity 2 * pi saturates every lit channel.
    let renderer = render(&mut diffuse_scene(vec![object], textures, 2.0 * PI));
    let fb = &renderer.framebuffer;
    assert_eq!(fb.pixel(4, 4), Some(0x00FF_0000));
    assert_eq!(fb.pixel(27, 4), Some(0x0000_FF00));
    assert_eq!(fb.pixel(4, 27), Some(0x0000_00FF));
    assert_eq!(fb.pixel(27, 27), Some(0x00FF_FFFF));
}

#[test]
fn depth_mode_shows_nearer_surfaces_darker() {
    let mut context = diffuse_scene(
        vec![quad(3.0, 1.0, red()), quad(50.0, FULL * 50.0, red())],
        TextureArena::new(),
        7.0,
    );
    let mut renderer = Renderer::new(SIZE, SIZE);
    renderer.rasterizer.render_mode = RenderMode::DepthBuffer;
    renderer.rasterizer.depth_remap = (0.9, 1.0);
    render_frame(&mut context, &mut renderer, background());

    let [near, ..] = unpack_rgb(renderer.framebuffer.pixel(16, 16).unwrap());
    let [far, g, b] = unpack_rgb(renderer.framebuffer.pixel(1, 1).unwrap());
    assert_eq!((far, far), (g, b));
    assert!(near < far, "near {} far {}", near, far);
}

#[test]
fn shuffled_triangle_order_gives_the_same_image() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let n = Vector3::new(0.0, 0.0, -1.0);

    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    for i in 0..60 {
        // Distinct constant depth per triangle: no ties between surfaces.
        let z = 4.0 + i as f32 * 0.05;
        let color = Vector3::new(rng.random(), rng.random(), rng.random());
        let cx: f32 = rng.random_range(-2.5..2.5);
        let cy: f32 = rng.random_range(-2.5..2.5);
        let mut corners: Vec<Point3<f32>> = (0..3)
            .map(|_| Point3::new(cx + rng.random_range(-1.5..1.5), cy + rng.random_range(-1.5..1.5), z))
            .collect();
        // Clockwise in world XY faces the camera.
        let area = (corners[1].x - corners[0].x) * (corners[2].y - corners[0].y)
            - (corners[1].y - corners[0].y) * (corners[2].x - corners[0].x);
        if area > 0.0 {
            corners.swap(1, 2);
        }

        let base = vertices.len() as u32;
        for p in corners {
            vertices.push(Vertex::new(p, Vector2::zeros(), n).with_color(color));
        }
        triangles.push([base, base + 1, base + 2]);
    }

    let render_order = |order: &[[u32; 3]]| {
        let indices = order.iter().flatten().copied().collect();
        let mesh = Mesh::new(vertices.clone(), indices, PrimitiveTopology::TriangleList).unwrap();
        let object = SceneObject::new(mesh, Material::default(), Placement::default());
        render(&mut diffuse_scene(vec![object], TextureArena::new(), 7.0))
            .framebuffer
            .color_snapshot()
    };

    let reference = render_order(&triangles);
    assert!(reference.iter().filter(|&&p| p != background_pixel()).count() > 100);

    for _ in 0..3 {
        triangles.shuffle(&mut rng);
        assert_eq!(render_order(&triangles), reference);
    }
}
