use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colorthief::decode::palette_from_path;
use colorthief::{PaletteOptions, RGB8};

/// Print the dominant color or color palette of images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Palette size (2..=256, out-of-range values fall back to 5)
    #[arg(short = 'c', long, default_value_t = 5)]
    count: u32,

    /// Sampling stride, 1 = every pixel
    #[arg(short, long, default_value_t = 5)]
    quality: usize,

    /// Print only the dominant color
    #[arg(short, long)]
    dominant: bool,

    /// Print colors as #rrggbb instead of rgb(r, g, b)
    #[arg(long)]
    hex: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn format_color(color: RGB8, hex: bool) -> String {
    if hex {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        format!("rgb({}, {}, {})", color.r, color.g, color.b)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let options = PaletteOptions::new().color_count(args.count).quality(args.quality);

    for input in &args.inputs {
        let palette = palette_from_path(input, options)
            .with_context(|| format!("failed to extract colors from {}", input.display()))?;

        if args.inputs.len() > 1 {
            println!("{}:", input.display());
        }
        let shown = if args.dominant { 1 } else { palette.len() };
        for color in palette.iter().take(shown) {
            println!("{}", format_color(*color, args.hex));
        }
    }

    Ok(())
}
