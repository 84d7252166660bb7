use crate::core::rasterizer::RenderMode;
use crate::error::{RenderError, Result};
use crate::io::config::Config;
use crate::io::image::timestamped_path;
use crate::pipeline::passes::{export_color_buffer, present_to_buffer, render_frame};
use crate::pipeline::renderer::Renderer;
use crate::scene::loader::{apply_runtime_settings, init_scene_resources};
use crate::ui::input::InputTracker;
use log::{info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use nalgebra::Vector3;
use std::path::Path;
use std::time::Instant;

/// Runs the interactive window until it is closed or Escape is pressed.
///
/// `config_path` enables hot reload (R) of light, shading and camera speeds.
pub fn run_gui(config: Config, config_path: Option<&Path>) -> Result<()> {
    let width = config.render.width;
    let height = config.render.height;
    let mut background = Vector3::from(config.render.background);

    info!("Starting GUI mode ({}x{})...", width, height);
    info!(
        "Controls: WASD/Arrows=Move, RMB drag=Look, LMB drag=Turn+Dolly, LMB+RMB drag=Pan, \
         F4=Depth, F5=Shading, F6=Normal map, F7=Rotate, X=Snapshot, R=Reload, Esc=Quit"
    );

    let mut window = Window::new(
        "Software Rasterizer",
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| RenderError::Window(e.to_string()))?;
    window.set_target_fps(60);

    let mut context = init_scene_resources(&config)?;
    let mut renderer = Renderer::from_config(&config.render);
    let mut input = InputTracker::new();
    let mut buffer = vec![0u32; width * height];

    let mut last_frame_time = Instant::now();
    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        // --- Hotkeys ---
        if window.is_key_pressed(Key::F4, KeyRepeat::No) {
            let mode = renderer.rasterizer.toggle_render_mode();
            info!("Render mode: {:?}", mode);
        }
        if window.is_key_pressed(Key::F5, KeyRepeat::No) {
            context.shading.mode = context.shading.mode.next();
            info!("Shading mode: {}", context.shading.mode.label());
        }
        if window.is_key_pressed(Key::F6, KeyRepeat::No) {
            context.shading.normal_mapping = !context.shading.normal_mapping;
            info!("Normal mapping: {}", context.shading.normal_mapping);
        }
        if window.is_key_pressed(Key::F7, KeyRepeat::No) {
            let rotating = context.toggle_rotation();
            info!("Mesh rotation: {}", rotating);
        }
        if window.is_key_pressed(Key::X, KeyRepeat::No) {
            let path = timestamped_path(&config.render.output);
            if let Err(e) = export_color_buffer(&renderer.framebuffer, &path) {
                warn!("{}", e);
            }
        }

        // --- Hot Reloading ---
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            match config_path {
                Some(path) => {
                    info!("Reloading configuration...");
                    match Config::load(path) {
                        Ok(new_config) => {
                            apply_runtime_settings(&mut context, &new_config);
                            background = Vector3::from(new_config.render.background);
                            info!("Hot reload successful!");
                        }
                        Err(e) => warn!("Failed to reload config: {}", e),
                    }
                }
                None => warn!("No config file to reload (started without --config)"),
            }
        }

        // --- Update & Render ---
        let state = input.poll(&window);
        context.update(dt, &state);
        render_frame(&mut context, &mut renderer, background);

        // --- Display ---
        present_to_buffer(&renderer.framebuffer, &mut buffer);
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| RenderError::Window(e.to_string()))?;

        let mode = match renderer.rasterizer.render_mode {
            RenderMode::FinalColor => context.shading.mode.label(),
            RenderMode::DepthBuffer => "depth buffer",
        };
        window.set_title(&format!("Software Rasterizer - {:.1} FPS - {}", 1.0 / dt, mode));

        frame_count += 1;
        if last_fps_update.elapsed().as_secs_f32() >= 2.0 {
            info!(
                "Average FPS: {:.1}",
                frame_count as f32 / last_fps_update.elapsed().as_secs_f32()
            );
            frame_count = 0;
            last_fps_update = Instant::now();
        }
    }

    Ok(())
}

/// Renders a single frame and writes it to `config.render.output`.
pub fn run_cli(config: Config) -> Result<()> {
    info!("Starting CLI mode...");
    let mut context = init_scene_resources(&config)?;
    let mut renderer = Renderer::from_config(&config.render);
    let start_time = Instant::now();

    render_frame(
        &mut context,
        &mut renderer,
        Vector3::from(config.render.background),
    );

    info!("Render completed in {:.2?}", start_time.elapsed());

    info!("Saving output to '{}'...", config.render.output);
    export_color_buffer(&renderer.framebuffer, &config.render.output)?;
    info!("Done.");
    Ok(())
}
