//! Diagnostic visualizer: rasterises the texture triangle to a PNG.
//!
//! Fill comes from the classifier, pixel by pixel; outlines come from the
//! region table. Where the two disagree the outline and the fill edge drift
//! apart, which is exactly what this image is for.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use texture_core::classifier::classify_composition;
use texture_core::regions::colors_for;
use texture_core::{Composition, Controller, DiagramConfig, Event, ScreenPoint, TextureClass};

// ── Colour helpers ────────────────────────────────────────────────────────────

const BACKGROUND: [u8; 3] = [255, 255, 255];
const GRID: [u8; 3] = [200, 200, 200];
const OUTLINE: [u8; 3] = [90, 90, 90];
const FRAME: [u8; 3] = [30, 30, 30];
const CROSSHAIR: [u8; 3] = [200, 40, 40];
const DOT: [u8; 3] = [180, 0, 0];

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "visualize", about = "Render the soil texture triangle to a PNG")]
struct Args {
    /// Output PNG path.
    #[arg(short, long, default_value = "data/debug/texture_triangle.png")]
    output: PathBuf,

    /// Image width in pixels.
    #[arg(long, default_value = "500")]
    width: u32,

    /// Image height in pixels.
    #[arg(long, default_value = "420")]
    height: u32,

    /// Diagram config JSON (defaults used when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Place the dot at this clay/silt/sand percentage, e.g. "30,40,30".
    #[arg(long, value_delimiter = ',', num_args = 3)]
    at: Option<Vec<f64>>,

    /// Jump the dot to a class centroid instead, e.g. "Silty Clay".
    #[arg(long, conflicts_with = "at")]
    class: Option<TextureClass>,
}

// ── Raster helpers ────────────────────────────────────────────────────────────

fn put(img: &mut RgbImage, x: f64, y: f64, color: [u8; 3]) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (px, py) = (x.round() as u32, y.round() as u32);
    if px < img.width() && py < img.height() {
        img.put_pixel(px, py, Rgb(color));
    }
}

fn draw_line(img: &mut RgbImage, a: ScreenPoint, b: ScreenPoint, color: [u8; 3]) {
    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        put(img, a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t, color);
    }
}

fn draw_polygon(img: &mut RgbImage, points: &[ScreenPoint], color: [u8; 3]) {
    for (i, &a) in points.iter().enumerate() {
        draw_line(img, a, points[(i + 1) % points.len()], color);
    }
}

fn draw_dot(img: &mut RgbImage, center: ScreenPoint, radius: f64, color: [u8; 3]) {
    let r = radius.ceil() as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if ((dx * dx + dy * dy) as f64) <= radius * radius {
                put(img, center.x + dx as f64, center.y + dy as f64, color);
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<DiagramConfig> {
    let Some(path) = path else {
        return Ok(DiagramConfig::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    DiagramConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(at) = &args.at {
        config.initial = Composition::from_percent(at[0], at[1], at[2])
            .normalized()
            .context("--at fractions are all zero")?;
    }
    let mut controller = Controller::new(config)?;
    if let Some(class) = args.class {
        controller.dispatch(Event::SelectClass { class });
    }

    let scene = controller.scene();
    let tri = controller.config().triangle();
    let current = scene.class;
    eprintln!("Rendering {}x{} ({} at {})", args.width, args.height, current, scene.composition);

    let mut img = RgbImage::from_pixel(args.width, args.height, Rgb(BACKGROUND));

    // ── 1. Classifier fill ───────────────────────────────────────────────────
    for py in 0..args.height {
        for px in 0..args.width {
            let c = tri.inverse(ScreenPoint::new(px as f64, py as f64));
            if !c.is_finite() || c.has_negative() {
                continue;
            }
            let class = classify_composition(c.clamped());
            let colors = colors_for(class);
            let fill = if class == current { colors.highlight } else { colors.base };
            img.put_pixel(px, py, Rgb(fill.rgb()));
        }
    }

    // ── 2. Grid ──────────────────────────────────────────────────────────────
    for line in &scene.grid {
        draw_line(&mut img, line.from, line.to, GRID);
    }
    for tick in &scene.ticks {
        draw_line(&mut img, tick.from, tick.to, FRAME);
    }

    // ── 3. Region outlines and triangle frame ───────────────────────────────
    for region in &scene.regions {
        draw_polygon(&mut img, &region.points, OUTLINE);
    }
    draw_polygon(&mut img, &scene.triangle.vertices(), FRAME);

    // ── 4. Crosshairs and dot ────────────────────────────────────────────────
    for hair in &scene.crosshairs {
        draw_line(&mut img, hair.from, hair.to, CROSSHAIR);
    }
    draw_dot(&mut img, scene.dot, 4.0, DOT);

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    img.save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    eprintln!("Wrote {}", args.output.display());
    Ok(())
}
