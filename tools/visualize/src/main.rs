//! Sandbox renderer: writes PNG previews of generator trees.
//!
//! Without `--config` a fixed gallery is rendered: the filtered sigmoid
//! terrain plus one image per basis kernel. With `--config` the JSON tree is
//! rendered on its own. Values are normalised by the tree's declared bounds,
//! not by the observed range, so an image shows how much of its declared
//! range a tree actually uses.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rayon::prelude::*;

use lattice_core::config::BasisKind;
use lattice_core::prelude::*;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "visualize", about = "Render lattice noise trees to PNG")]
struct Args {
    /// Output directory (created if absent)
    #[arg(short, long, default_value = "data/debug")]
    output: PathBuf,

    /// Image width and height in pixels
    #[arg(long, default_value = "256")]
    size: usize,

    /// Feature size in pixels for the gallery scenes
    #[arg(long, default_value = "50")]
    scale: f64,

    #[arg(long, default_value = "3424")]
    seed: i32,

    /// Render this JSON generator config instead of the gallery
    #[arg(long)]
    config: Option<PathBuf>,
}

// ── Colour ───────────────────────────────────────────────────────────────────

/// Turbo colormap, polynomial fit. `t` is clamped to `[0, 1]`.
fn turbo(t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let r = 0.13572138 + t * (4.61539260 + t * (-42.66032258 + t * (132.13108234 + t * (-152.94239396 + t * 59.28637943))));
    let g = 0.09140261 + t * (2.19418839 + t * (4.84296658 + t * (-14.18503333 + t * (4.27729857 + t * 2.82956604))));
    let b = 0.10667330 + t * (12.64194608 + t * (-60.58204836 + t * (110.36276771 + t * (-89.90310912 + t * 27.34824973))));
    let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [byte(r), byte(g), byte(b)]
}

// ── Scenes ───────────────────────────────────────────────────────────────────

struct Scene {
    name: String,
    tree: BoxedNoise<2>,
}

fn gallery(args: &Args) -> Result<Vec<Scene>> {
    let half = args.size as f64 / 2.0;
    let terrain = BicubicNoise::new(args.seed)
        .scale_uniform(args.scale)
        .shift([-half, -half])
        .normalize()
        .sigmoid(4.0, 4.0)?
        .kernel_filter(gaussian5())
        .boxed();

    let mut scenes = vec![Scene { name: "terrain".into(), tree: terrain }];
    for kind in BasisKind::ALL {
        let tree = kind.build::<2>(args.seed).scale_uniform(args.scale).boxed();
        scenes.push(Scene { name: kind.name().into(), tree });
    }
    scenes.push(Scene {
        name: "fbm".into(),
        tree: fbm(5, 2.0, 0.5, |i| BicubicNoise::new(args.seed.wrapping_add(i as i32)))?
            .scale_uniform(args.scale * 2.0)
            .boxed(),
    });
    Ok(scenes)
}

fn from_config(path: &Path) -> Result<Vec<Scene>> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config = GeneratorConfig::from_json(&json)?;
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("config").to_string();
    Ok(vec![Scene { name, tree: config.build::<2>()? }])
}

fn render(scene: &Scene, size: usize, out_dir: &Path) -> Result<PathBuf> {
    let chunk = scene.tree.get_chunk_unit([0.0, 0.0], [size, size])?;
    let bounds = scene.tree.bounds();
    let span = if bounds.span() > 0.0 { bounds.span() } else { 1.0 };

    let mut img = image::RgbImage::new(size as u32, size as u32);
    for [x, y] in chunk.indices() {
        let t = (chunk[[x, y]] - bounds.min) / span;
        img.put_pixel(x as u32, y as u32, image::Rgb(turbo(t)));
    }

    let path = out_dir.join(format!("{}.png", scene.name));
    img.save(&path).with_context(|| format!("writing {}", path.display()))?;
    info!(
        "{}: declared [{:.4}, {:.4}], observed [{:.4}, {:.4}]",
        scene.name,
        bounds.min,
        bounds.max,
        chunk.min_value(),
        chunk.max_value()
    );
    Ok(path)
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let scenes = match &args.config {
        Some(path) => from_config(path)?,
        None => gallery(&args)?,
    };

    fs::create_dir_all(&args.output).with_context(|| format!("creating {}", args.output.display()))?;

    let written = scenes
        .par_iter()
        .map(|scene| render(scene, args.size, &args.output))
        .collect::<Result<Vec<_>>>()?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
