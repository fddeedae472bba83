use scivis::core::compositing::blend_over_background;
use scivis::core::settings::RenderSettings;
use scivis::core::settings_loader::load_settings;
use scivis::math::constants::{Float, Vector2f};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <x> <y> [--settings F] [--time T] [--max-samples N]", args[0]);
        std::process::exit(1);
    }

    let x: usize = args[1].parse().unwrap_or(0);
    let y: usize = args[2].parse().unwrap_or(0);

    let mut settings_path: Option<String> = None;
    let mut time: Option<Float> = None;
    let mut max_samples: Option<usize> = None;

    let mut i = 3;
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
            "--max-samples" => {
                i += 1;
                max_samples = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            _ => {}
        }
        i += 1;
    }

    let mut settings = match settings_path {
        Some(path) => load_settings(&path).unwrap_or_else(|e| panic!("failed to load settings: {}", e)),
        None => RenderSettings::default(),
    };
    if let Some(t) = time {
        settings.time = t;
    }
    if let Some(n) = max_samples {
        settings.march.max_samples = n;
    }

    let scene = settings.build_scene().unwrap_or_else(|e| panic!("failed to build scene: {}", e));
    let sensor = scene.camera().expect("scene has a camera");
    if x >= settings.width || y >= settings.height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, settings.width, settings.height);
        std::process::exit(2);
    }

    let ray = sensor
        .pixel_ray(&Vector2f::new(x as Float, y as Float))
        .expect("viewport is not empty");
    let hit = scene.bbox().ray_intersect(&ray);
    let integrator = settings.build_integrator();
    let result = integrator.march(scene.field(), &ray);
    let final_color = blend_over_background(result.color, scene.background());

    println!("pixel=({}, {}) t={}", x, y, settings.time);
    println!("ray origin=({:.6}, {:.6}, {:.6}) dir=({:.6}, {:.6}, {:.6})",
             ray.origin().x, ray.origin().y, ray.origin().z, ray.dir().x, ray.dir().y, ray.dir().z);
    println!("bbox hit={} t_near={:.6} t_far={:.6}", hit.hit(), hit.t_near, hit.t_far);
    println!("samples={} terminated_early={}", result.samples, result.terminated_early);
    println!("accumulated=({:.6}, {:.6}, {:.6}, {:.6})",
             result.color.x, result.color.y, result.color.z, result.color.w);
    println!("final=({:.6}, {:.6}, {:.6})", final_color.x, final_color.y, final_color.z);
}
