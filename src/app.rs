use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{bail, Context as _};
use log::{info, warn};
use na::{Matrix4, Point3};
use nalgebra as na;
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};
use threadpool::ThreadPool;

use barn_frustum::config::{FilterConfig, SceneConfig};
use barn_frustum::frustum::lights::light_corners;
use barn_frustum::frustum::{build_frustum, FrustumGeometry};
use barn_frustum::scene::camera::Camera;
use barn_frustum::scene::{Color, Scene, AMBER, BLACK, GREY, WHITE};

const MAX_WORKERS: usize = 4;

pub struct Context {
    pub width: u32,
    pub height: u32,
    pub output: Option<PathBuf>,
    pub show: bool,
    pub scene: SceneConfig,
}

/// One built filter, in world space.
struct FilterDrawing {
    name: String,
    vertices: Vec<Point3<f32>>,
    indices: Vec<u32>,
    lights: Vec<Matrix4<f32>>,
}

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape)
            && event.input.state.is_released()
        {
            return true;
        }
    }

    return false;
}

fn build_filter(filter: &FilterConfig) -> barn_frustum::Result<FilterDrawing> {
    let filter_world = filter.transform.to_matrix();
    let lights = filter.light_matrices();
    let geometry: FrustumGeometry = build_frustum(&filter.params, &filter_world, &lights)?;
    return Ok(FilterDrawing {
        name: filter.name.clone(),
        vertices: geometry.to_world(&filter_world),
        indices: geometry.indices,
        lights,
    });
}

/// Builds every filter of the scene, one job per filter. All jobs share the global shape cache.
fn build_filters(scene: &SceneConfig) -> anyhow::Result<Vec<FilterDrawing>> {
    let n_jobs = scene.filters.len();
    let pool = ThreadPool::new(n_jobs.clamp(1, MAX_WORKERS));
    let (tx, rx) = mpsc::channel();
    for (i, filter) in scene.filters.iter().cloned().enumerate() {
        let tx = tx.clone();
        pool.execute(move || {
            // Receiver only goes away if the collecting side already gave up.
            let _ = tx.send((i, build_filter(&filter)));
        });
    }
    drop(tx);

    let mut results: Vec<_> = rx.iter().collect();
    if results.len() != n_jobs {
        bail!("{} of {} filter builds did not finish", n_jobs - results.len(), n_jobs);
    }
    results.sort_by_key(|(i, _)| *i);

    let mut drawings = Vec::<FilterDrawing>::with_capacity(n_jobs);
    for (i, result) in results {
        let drawing = result
            .with_context(|| format!("building filter #{} ({})", i, scene.filters[i].name))?;
        info!(
            "filter '{}': {} vertices, {} lines, {} lights",
            drawing.name,
            drawing.vertices.len(),
            drawing.indices.len() / 2,
            drawing.lights.len()
        );
        drawings.push(drawing);
    }
    return Ok(drawings);
}

/// Outline of an area light, the same unit quad the filter projects toward.
fn draw_light(scene: &mut Scene, camera: &Camera, light_world: &Matrix4<f32>) {
    let corners: Vec<Point3<f32>> = light_corners()
        .iter()
        .map(|corner| light_world.transform_point(corner))
        .collect();
    scene.draw_line_list(camera, &corners, &[0, 1, 1, 2, 2, 3, 3, 0], GREY);
}

/// Renders the scene's filters into an image, then saves it and/or shows it in a window.
pub fn run(context: Context) -> anyhow::Result<()> {
    if context.scene.filters.is_empty() {
        warn!("scene has no barn filters, the image will be empty");
    }
    let drawings = build_filters(&context.scene)?;

    let camera = Camera::from_config(&context.scene.camera);
    let mut scene = Scene::new(context.width, context.height);
    scene.clear(BLACK);
    for (i, drawing) in drawings.iter().enumerate() {
        for light in &drawing.lights {
            draw_light(&mut scene, &camera, light);
        }
        // Tell filters apart by fading them toward white.
        let color = Color::blend(WHITE, AMBER, i as f32 / drawings.len().max(2) as f32);
        scene.draw_line_list(&camera, &drawing.vertices, &drawing.indices, color);
    }

    if let Some(path) = &context.output {
        let image = scene.to_image().context("frame buffer size does not match the image size")?;
        image
            .save(path)
            .with_context(|| format!("saving {}", path.display()))?;
        info!("saved {}", path.display());
    }

    if context.show {
        let window_options: WindowOptions = WindowOptions {
            size: Some([context.width, context.height]),
            ..Default::default()
        };
        let window = create_window("barn filter", window_options)?;
        let image_info = ImageInfo::rgb8(context.width, context.height);
        let image_data = ImageView::new(image_info, scene.as_render_data());
        window.set_image("image", image_data)?;

        // The picture is static, just wait for Escape.
        for window_event in window.event_channel()? {
            if is_exit_event(window_event) {
                break;
            }
        }
    }

    return Ok(());
}
