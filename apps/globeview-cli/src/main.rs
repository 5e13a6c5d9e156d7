use anyhow::Context;
use clap::{Parser, Subcommand};
use globeview_assets::{TextureSource, fetch_texture};
use globeview_common::{Rgb, Rgba};
use globeview_render::{DebugTextRenderer, Renderer, shade_texture};
use globeview_scene::{Scene, SceneConfig, SkyField, surface};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "globeview-cli", about = "CLI tool for globe viewer operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Describe the scene a config composes
    Describe {
        /// Scene config file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seconds of rotation to apply before describing
        #[arg(short, long, default_value = "0")]
        elapsed: f64,
    },
    /// Classify one texel and print its shaded color
    Classify {
        r: u8,
        g: u8,
        b: u8,
    },
    /// Apply the surface rule to a color map and write the result as PNG
    Shade {
        /// Source image: http(s) URL or file path
        input: String,
        /// Output PNG path
        output: PathBuf,
    },
    /// Summarize the starfield for a seed
    Stars {
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("globeview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", globeview_common::crate_info());
            println!("input: {}", globeview_input::crate_info());
            println!("assets: {}", globeview_assets::crate_info());
            println!("scene: {}", globeview_scene::crate_info());
            println!("render: {}", globeview_render::crate_info());
        }
        Commands::Describe { config, elapsed } => {
            let config = match config {
                Some(path) => SceneConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => SceneConfig::default(),
            };
            print!("{}", describe(&config, elapsed));
        }
        Commands::Classify { r, g, b } => {
            println!("{}", classify([r, g, b]));
        }
        Commands::Shade { input, output } => {
            let source = TextureSource::parse(&input);
            tracing::info!(%source, output = %output.display(), "shading color map");
            let texture = fetch_texture(&source).with_context(|| format!("loading {source}"))?;
            let shaded = shade_texture(&texture)?;
            let (width, height) = (shaded.width(), shaded.height());
            let image = image::RgbaImage::from_raw(width, height, shaded.into_pixels())
                .context("shaded buffer does not match its dimensions")?;
            image
                .save_with_format(&output, image::ImageFormat::Png)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Shaded {width}x{height} color map -> {}", output.display());
        }
        Commands::Stars { seed } => {
            print!("{}", star_summary(&SkyField::generate(seed)));
        }
    }

    Ok(())
}

fn describe(config: &SceneConfig, elapsed: f64) -> String {
    let mut scene = Scene::new(config);
    // The planet is shown as soon as a texture would exist.
    scene.resolve_planet(globeview_assets::AssetId(0));
    scene.tick(0.0, elapsed);
    let mut out = format!("Texture source: {}\n", config.texture);
    out.push_str(&DebugTextRenderer::new().render(&scene));
    out
}

fn classify(rgb: [u8; 3]) -> String {
    let [r, g, b] = rgb;
    let texel = Rgba::from_rgba8([r, g, b, 255]);
    let kind = if surface::is_ocean(texel) { "ocean" } else { "land" };
    let [sr, sg, sb, _] = surface::shade_rgba8([r, g, b, 255]);
    format!(
        "{} -> {kind} -> {}",
        Rgb::from_rgb8(r, g, b).to_hex(),
        Rgb::from_rgb8(sr, sg, sb).to_hex()
    )
}

fn star_summary(sky: &SkyField) -> String {
    let mut out = format!("Starfield seed={} stars={}\n", sky.seed(), sky.star_count());
    for (i, layer) in sky.layers().iter().enumerate() {
        let radii = layer.stars().iter().map(|s| s.position.length());
        let (min, max) = radii.fold((f32::MAX, f32::MIN), |(lo, hi), r| (lo.min(r), hi.max(r)));
        let mean_size =
            layer.stars().iter().map(|s| s.size).sum::<f32>() / layer.len().max(1) as f32;
        out.push_str(&format!(
            "  layer {}: count={} radius=[{:.1}, {:.1}] mean_size={:.2} speed={}\n",
            i + 1,
            layer.len(),
            min,
            max,
            mean_size,
            layer.spec().speed
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_reports_both_kinds() {
        assert_eq!(classify([100, 80, 40]), "#645028 -> land -> #8c7038");
        assert!(classify([10, 40, 120]).contains("-> ocean ->"));
    }

    #[test]
    fn star_summary_lists_three_layers() {
        let summary = star_summary(&SkyField::generate(42));
        assert!(summary.starts_with("Starfield seed=42 stars=18000"));
        assert!(summary.contains("layer 1: count=8000"));
        assert!(summary.contains("layer 2: count=6000"));
        assert!(summary.contains("layer 3: count=4000"));
    }

    #[test]
    fn describe_applies_elapsed_rotation() {
        let out = describe(&SceneConfig::default(), 20.0);
        assert!(out.contains("Texture source: https://"));
        assert!(out.contains("rotation=1.000rad"));
    }
}
