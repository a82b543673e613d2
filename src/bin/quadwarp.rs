use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use quadwarp::{
    ContextOpts, Interpolation, PixelBuffer, PixelFormat, Point, Quad, RenderingHints,
    WarpContext, WarpStats,
};

#[derive(Parser, Debug)]
#[command(name = "quadwarp", version)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Warp one PNG onto a quad of a canvas and write the result.
    Warp(WarpArgs),
    /// Run a JSON job: several warps composited onto one canvas.
    Job(JobArgs),
}

#[derive(Parser, Debug)]
struct WarpArgs {
    /// Source PNG.
    #[arg(long)]
    src: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Canvas PNG to composite onto.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    canvas: Option<PathBuf>,

    /// Blank (transparent) canvas width.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Blank (transparent) canvas height.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Destination corners `x0,y0,x1,y1,x2,y2,x3,y3` in order top-left, top-right,
    /// bottom-right, bottom-left.
    #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
    corners: Vec<f64>,

    /// Resampling filter.
    #[arg(long, value_enum, default_value_t = InterpChoice::Bilinear)]
    interp: InterpChoice,

    /// Worker threads (0 renders on the calling thread).
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InterpChoice {
    Nearest,
    Bilinear,
    Bicubic,
    Cubic,
}

impl From<InterpChoice> for Interpolation {
    fn from(c: InterpChoice) -> Self {
        match c {
            InterpChoice::Nearest => Interpolation::NearestNeighbor,
            InterpChoice::Bilinear => Interpolation::Bilinear,
            InterpChoice::Bicubic => Interpolation::Bicubic,
            InterpChoice::Cubic => Interpolation::CubicConvolution,
        }
    }
}

/// `quadwarp job` input. Relative paths resolve against the job file's directory.
#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Job {
    out: PathBuf,
    #[serde(default)]
    canvas: Option<PathBuf>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    /// `0xAARRGGBB` fill for a blank canvas.
    #[serde(default)]
    background: u32,
    #[serde(default)]
    context: ContextOpts,
    #[serde(default)]
    hints: RenderingHints,
    warps: Vec<JobWarp>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct JobWarp {
    src: PathBuf,
    quad: Quad,
    #[serde(default)]
    interpolation: Option<Interpolation>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Warp(args) => cmd_warp(args),
        Command::Job(args) => cmd_job(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_png(path: &Path) -> anyhow::Result<PixelBuffer> {
    let img = image::open(path)
        .with_context(|| format!("read image '{}'", path.display()))?
        .to_rgba8();
    Ok(PixelBuffer::from_rgba_image(&img))
}

fn write_png(path: &Path, buf: &PixelBuffer) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    buf.to_rgba_image()
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn quad_from_corners(c: &[f64]) -> anyhow::Result<Quad> {
    let [x0, y0, x1, y1, x2, y2, x3, y3] = c else {
        anyhow::bail!("--corners takes exactly 8 numbers, got {}", c.len());
    };
    Ok(Quad::new(
        Point::new(*x0, *y0),
        Point::new(*x1, *y1),
        Point::new(*x2, *y2),
        Point::new(*x3, *y3),
    ))
}

fn blank_canvas(width: u32, height: u32, fill: u32) -> anyhow::Result<PixelBuffer> {
    if width == 0 || height == 0 {
        anyhow::bail!("canvas width/height must be > 0");
    }
    Ok(PixelBuffer::filled(width, height, PixelFormat::Argb, fill))
}

fn report(stats: &WarpStats) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(stats).context("serialize warp stats")?);
    Ok(())
}

fn cmd_warp(args: WarpArgs) -> anyhow::Result<()> {
    let quad = quad_from_corners(&args.corners)?;
    let src = read_png(&args.src)?;
    let canvas = match (&args.canvas, args.width, args.height) {
        (Some(path), _, _) => read_png(path)?,
        (None, Some(w), Some(h)) => blank_canvas(w, h, 0)?,
        _ => anyhow::bail!("either --canvas or --width/--height is required"),
    };

    let mut opts = ContextOpts::default();
    if let Some(n) = args.workers {
        opts.workers = n;
    }
    let mut ctx = WarpContext::create(canvas, opts)?;
    ctx.set_interpolation_hint(args.interp.into())?;
    let stats = ctx.warp_quad(src.view(), &quad)?;
    let out = ctx.into_destination();

    write_png(&args.out, &out)?;
    report(&stats)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn read_job_json(path: &Path) -> anyhow::Result<Job> {
    let f = File::open(path).with_context(|| format!("open job '{}'", path.display()))?;
    let r = BufReader::new(f);
    let job: Job = serde_json::from_reader(r).with_context(|| "parse job JSON")?;
    Ok(job)
}

fn cmd_job(args: JobArgs) -> anyhow::Result<()> {
    let job = read_job_json(&args.in_path)?;
    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));

    let canvas = match (&job.canvas, job.width, job.height) {
        (Some(path), _, _) => read_png(&root.join(path))?,
        (None, Some(w), Some(h)) => blank_canvas(w, h, job.background)?,
        _ => anyhow::bail!("job needs either 'canvas' or 'width'/'height'"),
    };

    let mut ctx = WarpContext::create(canvas, job.context.clone())?;
    let mut total = WarpStats::default();
    for (i, w) in job.warps.iter().enumerate() {
        let src = read_png(&root.join(&w.src))?;
        let mut hints = job.hints;
        if w.interpolation.is_some() {
            hints.interpolation = w.interpolation;
        }
        ctx.set_rendering_hints(hints)?;
        let stats = ctx
            .warp_quad(src.view(), &w.quad)
            .with_context(|| format!("warp #{i} ('{}')", w.src.display()))?;
        total.tiles_total += stats.tiles_total;
        total.tiles_rendered += stats.tiles_rendered;
        total.pixels_visited += stats.pixels_visited;
        total.fixed_bounds_fallback |= stats.fixed_bounds_fallback;
    }

    let out = root.join(&job.out);
    write_png(&out, &ctx.into_destination())?;
    report(&total)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
