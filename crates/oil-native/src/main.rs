use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use oil_core::{FrameDriver, ImageData, PointerKind, TuningPreset};
use oil_render::{OilStage, RendererContext, StageOptions, SurfaceAssets};
use winit::{dpi::LogicalSize, event::*, event_loop::EventLoop, window::WindowBuilder};

/// Interactive oil surface with a decaying pointer trail.
#[derive(Parser, Debug)]
#[command(name = "oil-native", version)]
struct Args {
    /// Base image (PNG or JPEG). A flat placeholder is used if missing.
    #[arg(long)]
    texture: Option<PathBuf>,
    /// Flow map image; red/green encode the flow direction.
    #[arg(long)]
    flow_map: Option<PathBuf>,
    /// JSON tuning preset, e.g. {"oil.noise_speed": 0.5, "trail.length": 0.05}
    #[arg(long)]
    preset: Option<PathBuf>,
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Run as if the GPU could not host the trail buffers.
    #[arg(long)]
    no_trail: bool,
}

fn load_image(path: &Path) -> anyhow::Result<ImageData> {
    let img = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(ImageData::new(width, height, img.into_raw())?)
}

fn image_or(path: Option<&Path>, fallback: ImageData) -> ImageData {
    let Some(path) = path else {
        return fallback;
    };
    match load_image(path) {
        Ok(image) => {
            log::info!("[assets] loaded {} ({}x{})", path.display(), image.width(), image.height());
            image
        }
        Err(e) => {
            log::warn!("[assets] {e:#}; using placeholder");
            fallback
        }
    }
}

fn load_preset(path: &Path) -> anyhow::Result<TuningPreset> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read preset {}", path.display()))?;
    Ok(TuningPreset::from_json(&json)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let placeholder = SurfaceAssets::placeholder();
    let assets = SurfaceAssets {
        base: image_or(args.texture.as_deref(), placeholder.base),
        flow_map: image_or(args.flow_map.as_deref(), placeholder.flow_map),
    };

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Oil (native)")
            .with_inner_size(LogicalSize::new(args.width, args.height))
            .build(&event_loop)?,
    );
    let size = window.inner_size();
    let ctx = pollster::block_on(RendererContext::new(
        Arc::clone(&window),
        size.width,
        size.height,
    ))
    .context("GPU initialisation failed")?;

    let options = StageOptions {
        force_trail_unavailable: args.no_trail,
        ..StageOptions::default()
    };
    let mut stage = OilStage::new(ctx, &assets, &options)?;
    if let Some(path) = &args.preset {
        match load_preset(path) {
            Ok(preset) => {
                let applied = stage.apply_preset(&preset);
                log::info!("[tuning] applied {applied} values from {}", path.display());
            }
            Err(e) => log::warn!("[tuning] {e:#}"),
        }
    }
    for param in stage.params() {
        log::debug!("[tuning] {} = {} [{}, {}]", param.key, param.value, param.min, param.max);
    }

    let mut driver = FrameDriver::new(options.max_step);
    // Resizes arrive in bursts; only the last one before a frame matters.
    let mut pending_resize: Option<(u32, u32)> = None;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => pending_resize = Some((size.width, size.height)),
            WindowEvent::CursorMoved { position, .. } => {
                stage.pointer_move(
                    PointerKind::Mouse,
                    Vec2::new(position.x as f32, position.y as f32),
                );
            }
            WindowEvent::Touch(Touch {
                phase: TouchPhase::Started | TouchPhase::Moved,
                location,
                ..
            }) => {
                stage.pointer_move(
                    PointerKind::Touch,
                    Vec2::new(location.x as f32, location.y as f32),
                );
            }
            WindowEvent::RedrawRequested => {
                if let Some((width, height)) = pending_resize.take() {
                    stage.resize(width, height);
                }
                driver.tick(instant::now(), &mut stage);
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;
    Ok(())
}
