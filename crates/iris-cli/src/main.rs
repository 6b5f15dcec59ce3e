use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use iris_core::{similarity_transform_estimate, Point, Rect, Stopwatch};
use iris_image::Image;
use std::path::PathBuf;

mod config;

use config::Config;

/// ArcFace reference landmarks for the canonical 112x112 aligned crop
/// (left eye, right eye, nose, left mouth, right mouth).
const REFERENCE_LANDMARKS_112: [Point<f32>; 5] = [
    Point { x: 38.2946, y: 51.6963 },
    Point { x: 73.5318, y: 51.5014 },
    Point { x: 56.0252, y: 71.7366 },
    Point { x: 41.5493, y: 92.3655 },
    Point { x: 70.7299, y: 92.2041 },
];

const ALIGNED_SIZE: u32 = 112;

#[derive(Parser)]
#[command(name = "iris", about = "Iris vision-primitives CLI")]
struct Cli {
    /// TOML config file (also read from IRIS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print timing statistics after the command
    #[arg(long, global = true)]
    timing: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print image dimensions and channel count
    Info {
        file: PathBuf,
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert to grayscale
    Gray { input: PathBuf, output: PathBuf },
    /// Resize to the given dimensions
    Resize {
        input: PathBuf,
        output: PathBuf,
        width: u32,
        height: u32,
    },
    /// Crop a rectangle, clipped to the image bounds
    Crop {
        input: PathBuf,
        output: PathBuf,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    /// Add a constant border on all sides
    Pad {
        input: PathBuf,
        output: PathBuf,
        #[arg(default_value_t = 10)]
        size: u32,
    },
    /// Rotate clockwise by 90, 180 or 270 degrees
    Rotate {
        input: PathBuf,
        output: PathBuf,
        degrees: u32,
    },
    /// Align a face to the canonical 112x112 crop from 5 landmarks
    /// given as "x1,y1,x2,y2,...,x5,y5" (eyes, nose, mouth corners)
    Align {
        input: PathBuf,
        output: PathBuf,
        landmarks: String,
    },
    /// Per-pixel absolute difference of two images
    Diff {
        a: PathBuf,
        b: PathBuf,
        /// Where to write the difference image (omit to only print the mean)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Display an image (writes a snapshot when no display is available)
    Show { file: PathBuf },
}

fn parse_landmarks(s: &str) -> Result<Vec<Point<f32>>> {
    let values: Vec<f32> = s
        .split(',')
        .map(|v| v.trim().parse::<f32>().map_err(Into::into))
        .collect::<Result<_>>()
        .with_context(|| format!("parsing landmarks {s:?}"))?;
    if values.len() != 10 {
        bail!("expected 10 comma-separated values (5 points), got {}", values.len());
    }
    Ok(values.chunks_exact(2).map(|p| Point::new(p[0], p[1])).collect())
}

fn mean_value(img: &Image) -> f64 {
    let bytes = img.as_bytes();
    if bytes.is_empty() {
        return 0.0;
    }
    bytes.iter().map(|&v| v as f64).sum::<f64>() / bytes.len() as f64
}

fn run(cli: Cli, cfg: &Config) -> Result<()> {
    match cli.command {
        Commands::Info { file, json } => {
            let img = Image::open(&file, 3)
                .with_context(|| format!("opening {}", file.display()))?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "file": file,
                        "width": img.width(),
                        "height": img.height(),
                        "channels": img.channels(),
                    })
                );
            } else {
                println!(
                    "{}: {}x{}, {} channel(s)",
                    file.display(),
                    img.width(),
                    img.height(),
                    img.channels()
                );
            }
        }
        Commands::Gray { input, output } => {
            let img = Image::open(&input, 3)?;
            img.to_gray().write(&output)?;
        }
        Commands::Resize {
            input,
            output,
            width,
            height,
        } => {
            let img = Image::open(&input, 3)?;
            img.resize(width, height, cfg.interpolation()?).write(&output)?;
        }
        Commands::Crop {
            input,
            output,
            x,
            y,
            width,
            height,
        } => {
            let img = Image::open(&input, 3)?;
            let out = img.crop(Rect::new(x, y, width, height));
            if out.is_empty() {
                bail!("crop rectangle lies outside the image");
            }
            out.write(&output)?;
        }
        Commands::Pad {
            input,
            output,
            size,
        } => {
            let img = Image::open(&input, 3)?;
            img.pad(size, size, size, size, &cfg.border_color).write(&output)?;
        }
        Commands::Rotate {
            input,
            output,
            degrees,
        } => {
            let img = Image::open(&input, 3)?;
            let out = match degrees {
                90 => img.rotate_90(),
                180 => img.rotate_180(),
                270 => img.rotate_270(),
                other => bail!("rotation must be 90, 180 or 270, got {other}"),
            };
            out.write(&output)?;
        }
        Commands::Align {
            input,
            output,
            landmarks,
        } => {
            let src = parse_landmarks(&landmarks)?;
            let matrix = similarity_transform_estimate(&src, &REFERENCE_LANDMARKS_112)
                .context("estimating the alignment transform")?;
            let img = Image::open(&input, 3)?;
            img.warp_affine(&matrix, ALIGNED_SIZE, ALIGNED_SIZE).write(&output)?;
            println!("transform: {matrix}");
            println!("inverse:   {}", matrix.inverse());
        }
        Commands::Diff { a, b, output } => {
            let ia = Image::open(&a, 3)?;
            let ib = Image::open(&b, 3)?;
            if ia.size() != ib.size() {
                bail!(
                    "image sizes differ: {}x{} vs {}x{}",
                    ia.width(),
                    ia.height(),
                    ib.width(),
                    ib.height()
                );
            }
            let diff = ia.abs_diff(&ib);
            println!("mean abs diff: {:.4}", mean_value(&diff));
            if let Some(path) = output {
                diff.write(&path)?;
            }
        }
        Commands::Show { file } => {
            let img = Image::open(&file, 3)?;
            let name = file.to_string_lossy().into_owned();
            img.show(&name, cfg.show_dir.as_deref())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    iris_core::trace::init();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;
    let timing = cli.timing;

    let mut watch = Stopwatch::named("command");
    watch.start();
    let result = run(cli, &cfg);
    watch.stop();

    if timing {
        eprintln!("{}", watch.report());
    }

    result
}
