use std::time::{Duration, Instant};

use anyhow::Context as _;
use quadwarp::{
    ContextOpts, Interpolation, PixelBuffer, PixelFormat, Point, Quad, WarpContext, pack_argb,
};
use serde_json::json;
use sha2::Digest as _;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    src_size: u32,
    warmup: u32,
    repeats: u32,
    workers: Vec<usize>,
    tile_size: u32,
}

const MODES: [(&str, Interpolation); 4] = [
    ("nearest", Interpolation::NearestNeighbor),
    ("bilinear", Interpolation::Bilinear),
    ("bicubic", Interpolation::Bicubic),
    ("cubic", Interpolation::CubicConvolution),
];

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.width == 0 || args.height == 0 || args.src_size == 0 {
        anyhow::bail!("--width/--height/--src-size must be > 0");
    }
    if args.tile_size == 0 {
        anyhow::bail!("--tile-size must be >= 1");
    }
    if args.repeats == 0 {
        anyhow::bail!("--repeats must be >= 1");
    }

    let src = synthetic_source(args.src_size);
    let quad = bench_quad(args.width, args.height);

    eprintln!(
        "bench: {repeats} run(s) ({profile} build), canvas={w}x{h}, src={s}x{s}, tile={tile}, workers={workers:?}",
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        w = args.width,
        h = args.height,
        s = args.src_size,
        tile = args.tile_size,
        workers = args.workers,
    );

    let mut results = Vec::new();
    for (name, mode) in MODES {
        let mut reference: Option<String> = None;
        for &workers in &args.workers {
            let opts = ContextOpts {
                workers,
                tile_size: args.tile_size,
                ..ContextOpts::default()
            };
            for _ in 0..args.warmup {
                run_once(&args, &opts, mode, &src, &quad)?;
            }

            let mut runs = Vec::with_capacity(args.repeats as usize);
            let mut digest = String::new();
            let mut pixels = 0u64;
            for _ in 0..args.repeats {
                let (elapsed, out, visited) = run_once(&args, &opts, mode, &src, &quad)?;
                runs.push(elapsed);
                digest = sha256_hex(&out);
                pixels = visited;
            }
            runs.sort();

            let matches = match &reference {
                None => {
                    reference = Some(digest.clone());
                    true
                }
                Some(r) => *r == digest,
            };
            if !matches {
                eprintln!("warning: {name} with {workers} worker(s) differs from the first run");
            }

            results.push(json!({
                "mode": name,
                "workers": workers,
                "p50_ms": ms(percentile(&runs, 0.50)),
                "p90_ms": ms(percentile(&runs, 0.90)),
                "p99_ms": ms(percentile(&runs, 0.99)),
                "pixels_visited": pixels,
                "sha256": digest,
                "matches_reference": matches,
            }));
        }
    }

    let report = json!({
        "canvas": [args.width, args.height],
        "src_size": args.src_size,
        "tile_size": args.tile_size,
        "repeats": args.repeats,
        "results": results,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize bench report")?
    );
    Ok(())
}

fn run_once(
    args: &BenchArgs,
    opts: &ContextOpts,
    mode: Interpolation,
    src: &PixelBuffer,
    quad: &Quad,
) -> anyhow::Result<(Duration, Vec<u8>, u64)> {
    let canvas = PixelBuffer::filled(args.width, args.height, PixelFormat::Argb, 0xff20_2428);
    let mut ctx = WarpContext::create(canvas, opts.clone()).context("create warp context")?;
    ctx.set_interpolation_hint(mode)?;

    let t0 = Instant::now();
    let stats = ctx.warp_quad(src.view(), quad)?;
    let elapsed = t0.elapsed();

    let bytes = ctx
        .into_destination()
        .data()
        .iter()
        .flat_map(|px| px.to_be_bytes())
        .collect();
    Ok((elapsed, bytes, stats.pixels_visited))
}

// Checkerboard with a horizontal alpha ramp so every filter path has work to do.
fn synthetic_source(size: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(size, size, PixelFormat::Argb);
    for y in 0..size {
        for x in 0..size {
            let on = ((x / 8) + (y / 8)) % 2 == 0;
            let a = 128 + (127 * x / size.max(1));
            let (r, g, b) = if on { (230, 90, 40) } else { (30, 140, 210) };
            buf.set(x, y, pack_argb(a, r, g, b));
        }
    }
    buf
}

// A perspective-skewed quad that covers most of the canvas.
fn bench_quad(width: u32, height: u32) -> Quad {
    let (w, h) = (f64::from(width), f64::from(height));
    Quad::new(
        Point::new(w * 0.12, h * 0.08),
        Point::new(w * 0.90, h * 0.18),
        Point::new(w * 0.80, h * 0.94),
        Point::new(w * 0.05, h * 0.85),
    )
}

fn percentile(v: &[Duration], p: f64) -> Duration {
    if v.is_empty() {
        return Duration::ZERO;
    }
    let n = v.len();
    let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
    v[rank - 1]
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 1280,
        height: 720,
        src_size: 512,
        warmup: 1,
        repeats: 20,
        workers: vec![0, 1, 2, 6],
        tile_size: 100,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_u32(args.next(), "--width")?,
            "--height" => out.height = parse_u32(args.next(), "--height")?,
            "--src-size" => out.src_size = parse_u32(args.next(), "--src-size")?,
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--tile-size" => out.tile_size = parse_u32(args.next(), "--tile-size")?,
            "--workers" => {
                let v = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("missing value for --workers (e.g. 0,2,6)"))?;
                out.workers = v
                    .split(',')
                    .map(|s| {
                        s.trim()
                            .parse::<usize>()
                            .with_context(|| format!("parse --workers entry '{s}'"))
                    })
                    .collect::<anyhow::Result<_>>()?;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"quadwarp-bench

Warps a synthetic source onto a perspective quad for every interpolation mode and
worker count, and reports p50/p90/p99 plus a SHA-256 of the destination.

Usage:
  cargo run -q --release
  cargo run -q --release -- --workers 0,1,4,8 --repeats 50

Args:
  --width N        canvas width (default 1280)
  --height N       canvas height (default 720)
  --src-size N     source edge (default 512)
  --warmup N       (default 1)
  --repeats N      (default 20)
  --tile-size N    (default 100)
  --workers LIST   comma-separated worker counts (default 0,1,2,6)
"#
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}
