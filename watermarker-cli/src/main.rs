use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use watermarker::{
    Dpi, DrawParams, FontFamily, Margin, Orientation, Placement, RasterImage, Rgb8, Rgba8,
    ScaleMode, TextRenderer, Watermarker,
};

#[derive(Parser, Debug)]
#[command(name = "watermarker", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stamp an image (PNG, JPEG, ... or SVG) onto each input.
    Image(ImageArgs),
    /// Stamp rendered text onto each input.
    Text(TextArgs),
}

#[derive(Parser, Debug)]
struct ImageArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Mark image. `.svg` files are rasterized at their intrinsic size.
    #[arg(long)]
    mark: PathBuf,
}

#[derive(Parser, Debug)]
struct TextArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Text to render.
    #[arg(long)]
    text: String,

    /// System font family name (default: generic sans-serif).
    #[arg(long, conflicts_with = "font_file")]
    font_family: Option<String>,

    /// Font file to render with.
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Font size in points.
    #[arg(long)]
    font_size: Option<f32>,

    /// Text color as #rrggbb or #rrggbbaa.
    #[arg(long)]
    font_color: Option<String>,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input images.
    #[arg(long = "in", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Directory receiving the stamped images (same file names as the inputs).
    #[arg(long)]
    out_dir: PathBuf,

    /// JSON draw parameters; the flags below override individual fields.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Mark opacity in [0, 1].
    #[arg(long)]
    opacity: Option<f32>,

    /// Mark scale ratio (> 0).
    #[arg(long)]
    scale: Option<f32>,

    /// Enlarge the mark canvas without resampling the mark pixels.
    #[arg(long, default_value_t = false)]
    canvas_only: bool,

    /// Anchor name (center, top_left, bottom_right, ...) or `absolute`.
    #[arg(long)]
    placement: Option<String>,

    /// Absolute x (implies absolute placement).
    #[arg(long, allow_hyphen_values = true)]
    x: Option<i64>,

    /// Absolute y (implies absolute placement).
    #[arg(long, allow_hyphen_values = true)]
    y: Option<i64>,

    /// Uniform margin around the mark, in pixels.
    #[arg(long)]
    margin: Option<u32>,

    /// Mark color treated as fully transparent (#rrggbb).
    #[arg(long)]
    key_color: Option<String>,

    /// Orientation such as `rotate90_flip_none` or `rotate180_flip_x`.
    #[arg(long)]
    orientation: Option<String>,

    /// Repeat the mark over a grid with this step, e.g. `400x120`.
    #[arg(long)]
    grid: Option<String>,

    /// Resolution of the inputs in DPI (decoders report none; default 96). Sizes text marks.
    #[arg(long)]
    dpi: Option<f32>,

    /// Worker threads for multiple inputs.
    #[arg(long)]
    threads: Option<usize>,
}

enum Mark<'a> {
    Image(&'a RasterImage),
    Text(&'a str),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Image(args) => cmd_image(args),
        Command::Text(args) => cmd_text(args),
    }
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let params = build_params(&args.common)?;
    let mark = load_mark(&args.mark)?;
    run_batch(&args.common, &params, Mark::Image(&mark))
}

fn cmd_text(args: TextArgs) -> anyhow::Result<()> {
    let mut params = build_params(&args.common)?;
    if let Some(name) = args.font_family {
        params.font.family = FontFamily::Named(name);
    }
    if let Some(path) = args.font_file {
        params.font.family = FontFamily::File(path);
    }
    if let Some(size) = args.font_size {
        params.font.size_pt = size;
    }
    if let Some(c) = &args.font_color {
        params.font_color = Rgba8::parse_hex(c)?;
    }
    run_batch(&args.common, &params, Mark::Text(&args.text))
}

fn build_params(args: &CommonArgs) -> anyhow::Result<DrawParams> {
    let mut params = match &args.params {
        Some(path) => DrawParams::from_path(path)?,
        None => DrawParams::default(),
    };

    if let Some(v) = args.opacity {
        params.opacity = v;
    }
    if let Some(v) = args.scale {
        params.scale_ratio = v;
    }
    if args.canvas_only {
        params.scale_mode = ScaleMode::CanvasOnly;
    }
    if let Some(v) = args.margin {
        params.margin = Margin::uniform(v);
    }
    if let Some(c) = &args.key_color {
        params.transparent_color = Some(Rgb8::parse_hex(c)?);
    }
    if let Some(name) = &args.orientation {
        params.orientation = parse_orientation(name)?;
    }

    match args.placement.as_deref() {
        Some("absolute") | None if args.x.is_some() || args.y.is_some() => {
            params.placement = Placement::Absolute {
                x: args.x.unwrap_or(0),
                y: args.y.unwrap_or(0),
            };
        }
        Some("absolute") => params.placement = Placement::default(),
        Some(name) => {
            params.placement = Placement::from_anchor_name(name)
                .with_context(|| format!("unknown placement '{name}'"))?;
        }
        None => {}
    }

    // Fail before decoding anything.
    params.validate()?;
    Ok(params)
}

fn parse_orientation(name: &str) -> anyhow::Result<Orientation> {
    let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
    Orientation::ALL
        .into_iter()
        .find(|o| orientation_name(*o) == wanted)
        .with_context(|| format!("unknown orientation '{name}'"))
}

fn orientation_name(o: Orientation) -> String {
    let rot = match o.rotation_degrees() {
        0 => "none".to_string(),
        d => d.to_string(),
    };
    let flip = if o.flips_x() { "x" } else { "none" };
    format!("rotate{rot}_flip_{flip}")
}

fn parse_grid(s: &str) -> anyhow::Result<(u32, u32)> {
    let (x, y) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("grid '{s}' must look like 400x120"))?;
    let sx: u32 = x.trim().parse().with_context(|| format!("grid step '{x}'"))?;
    let sy: u32 = y.trim().parse().with_context(|| format!("grid step '{y}'"))?;
    anyhow::ensure!(sx > 0 && sy > 0, "grid steps must be > 0");
    Ok((sx, sy))
}

fn load_mark(path: &Path) -> anyhow::Result<RasterImage> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let bytes =
            std::fs::read(path).with_context(|| format!("read mark '{}'", path.display()))?;
        Ok(watermarker::decode_svg_mark(&bytes, 1.0)?)
    } else {
        Ok(watermarker::load_image(path)?)
    }
}

fn output_paths(inputs: &[PathBuf], out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let name = input
                .file_name()
                .with_context(|| format!("input '{}' has no file name", input.display()))?;
            anyhow::ensure!(
                seen.insert(name.to_os_string()),
                "more than one input is named '{}'; outputs would overwrite each other",
                name.to_string_lossy()
            );
            Ok(out_dir.join(name))
        })
        .collect()
}

fn parse_dpi(dpi: Option<f32>) -> anyhow::Result<Option<Dpi>> {
    match dpi {
        None => Ok(None),
        Some(v) if v.is_finite() && v > 0.0 => Ok(Some(Dpi { x: v, y: v })),
        Some(v) => anyhow::bail!("--dpi must be finite and > 0, got {v}"),
    }
}

fn run_batch(args: &CommonArgs, params: &DrawParams, mark: Mark<'_>) -> anyhow::Result<()> {
    let grid = args.grid.as_deref().map(parse_grid).transpose()?;
    let dpi = parse_dpi(args.dpi)?;
    let outputs = output_paths(&args.inputs, &args.out_dir)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        anyhow::ensure!(n > 0, "--threads must be >= 1");
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("build rayon thread pool")?;

    pool.install(|| {
        args.inputs
            .par_iter()
            .zip(outputs.par_iter())
            .try_for_each_init(TextRenderer::new, |renderer, (input, out)| {
                stamp_one(input, out, dpi, params, &mark, grid, renderer)
            })
    })
}

fn stamp_one(
    input: &Path,
    out: &Path,
    dpi: Option<Dpi>,
    params: &DrawParams,
    mark: &Mark<'_>,
    grid: Option<(u32, u32)>,
    renderer: &mut TextRenderer,
) -> anyhow::Result<()> {
    let mut image = watermarker::load_image(input)?;
    if let Some(dpi) = dpi {
        image.set_dpi(dpi);
    }
    let mut wm = Watermarker::new(image);

    let text_mark;
    let mark_img = match mark {
        Mark::Image(img) => *img,
        Mark::Text(text) => {
            text_mark = wm.text_mark(renderer, text, params)?;
            &text_mark
        }
    };

    match grid {
        None => {
            wm.draw_image(mark_img, params)?;
        }
        Some((step_x, step_y)) => {
            let (w, h) = wm.image().dimensions();
            let mut cell = params.clone();
            for y in (0..h).step_by(step_y as usize) {
                for x in (0..w).step_by(step_x as usize) {
                    cell.placement = Placement::Absolute {
                        x: i64::from(x),
                        y: i64::from(y),
                    };
                    wm.draw_image(mark_img, &cell)?;
                }
            }
        }
    }

    watermarker::save_image(wm.image(), out)?;
    tracing::info!(input = %input.display(), out = %out.display(), "stamped");
    eprintln!("wrote {}", out.display());
    Ok(())
}
