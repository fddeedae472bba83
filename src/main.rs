// Copyright 2020 TwoCookingMice

use scivis::core::settings::{FieldSpec, RenderSettings};
use scivis::core::settings_loader::{load_settings, parse_order};
use scivis::io::write_bitmap;
use scivis::math::constants::Float;
use scivis::renderers::simple::{Renderer, SimpleRenderer};
use scivis::volumes::ProceduralVolume;

use console::style;
use std::env;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <output.exr|png> [--settings F] [--time T] [--width N] [--height N] \
               [--max-samples N] [--order front|back] [--grid N] [--no-lighting] [--frames N] [--fps F]",
              program);
    std::process::exit(1);
}

fn fail(message: String) -> ! {
    eprintln!("{} {}", style("error:").red().bold(), message);
    std::process::exit(2);
}

/// `out.png` becomes `out_0003.png` when rendering a sequence.
fn frame_path(output: &str, frame: usize, frames: usize) -> String {
    if frames <= 1 {
        return output.to_string();
    }
    match output.rfind('.') {
        Some(dot) => format!("{}_{:04}{}", &output[..dot], frame, &output[dot..]),
        None => format!("{}_{:04}", output, frame),
    }
}

/// Frames per second of a rendered sequence; must be a positive number.
fn parse_fps(value: &str) -> Result<Float, String> {
    match value.parse::<Float>() {
        Ok(fps) if fps > 0.0 && fps.is_finite() => Ok(fps),
        _ => Err(format!("--fps expects a positive number, got {}", value)),
    }
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1].starts_with("--") {
        usage(&args[0]);
    }
    let output_path = &args[1];

    let mut settings_path: Option<String> = None;
    let mut time: Option<Float> = None;
    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;
    let mut max_samples: Option<usize> = None;
    let mut order: Option<String> = None;
    let mut grid: Option<usize> = None;
    let mut lighting = true;
    let mut frames: usize = 1;
    let mut fps: Float = 24.0;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--settings" => {
                i += 1;
                settings_path = args.get(i).cloned();
            }
            "--time" => {
                i += 1;
                time = args.get(i).and_then(|v| v.parse::<Float>().ok());
            }
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            "--max-samples" => {
                i += 1;
                max_samples = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            "--order" => {
                i += 1;
                order = args.get(i).cloned();
            }
            "--grid" => {
                i += 1;
                grid = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            "--no-lighting" => lighting = false,
            "--frames" => {
                i += 1;
                frames = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(1).max(1);
            }
            "--fps" => {
                i += 1;
                fps = match args.get(i).map(|v| parse_fps(v)) {
                    Some(Ok(v)) => v,
                    Some(Err(e)) => fail(e),
                    None => fail("--fps needs a value".to_string()),
                };
            }
            other => log::warn!("Ignoring unknown argument {}.", other),
        }
        i += 1;
    }

    let mut settings = match settings_path {
        Some(path) => load_settings(&path).unwrap_or_else(|e| fail(format!("failed to load {}: {}", path, e))),
        None => RenderSettings::default(),
    };
    if let Some(t) = time {
        settings.time = t;
    }
    if let Some(w) = width {
        settings.width = w;
    }
    if let Some(h) = height {
        settings.height = h;
    }
    if let Some(n) = max_samples {
        settings.march.max_samples = n;
    }
    if let Some(o) = order {
        settings.march.order = parse_order(&o).unwrap_or_else(|e| fail(e.to_string()));
    }
    if let Some(resolution) = grid {
        let source = match &settings.field {
            FieldSpec::Procedural(volume) | FieldSpec::Voxelized { source: volume, .. } => volume.clone(),
            FieldSpec::Flow { .. } => ProceduralVolume::default_scene(),
        };
        settings.field = FieldSpec::Voxelized { source, resolution };
    }
    settings.march.lighting &= lighting;

    let start_time = settings.time;
    for frame in 0..frames {
        settings.time = start_time + frame as Float / fps;
        let mut scene = settings.build_scene().unwrap_or_else(|e| fail(e));
        let renderer = SimpleRenderer::new(Box::new(settings.build_integrator()));
        let image = renderer.render(&mut scene);

        let path = frame_path(output_path, frame, frames);
        if let Err(e) = write_bitmap(&image, &path) {
            fail(format!("failed to write {}: {}", path, e));
        }
        log::info!("Wrote {} (t = {:.3}s).", path, settings.time);
    }
}
