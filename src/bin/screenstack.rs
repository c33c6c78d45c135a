use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use screenstack::{Screen, ScreenStack, StackConfig, StepPlan};

#[derive(Parser, Debug)]
#[command(name = "screenstack", version)]
struct Cli {
    /// Log stack events to stderr (`RUST_LOG` overrides).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push demo screens one by one, pop back to the first, and dump sampled frames as PNGs.
    Frames(FramesArgs),
    /// Print the step plan of a slide as JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Optional stack config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 128)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 64)]
    height: u32,

    /// Number of demo screens.
    #[arg(long, default_value_t = 3)]
    screens: usize,

    /// Frame sampling rate while a transition runs.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Optional stack config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Slide distance in pixels.
    #[arg(long)]
    distance: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "screenstack=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<StackConfig> {
    match path {
        Some(p) => StackConfig::from_path(p).with_context(|| "load stack config"),
        None => Ok(StackConfig::default()),
    }
}

/// Demo page: flat background with a bar whose length encodes the page number.
struct DemoScreen {
    index: usize,
}

impl Screen<RgbaImage> for DemoScreen {
    fn render(&self, canvas: &RgbaImage) -> RgbaImage {
        const PALETTE: [[u8; 3]; 4] = [[28, 38, 64], [64, 28, 38], [38, 64, 28], [60, 52, 20]];
        let [r, g, b] = PALETTE[self.index % PALETTE.len()];
        let (w, h) = canvas.dimensions();
        let bar = (w / 8).saturating_mul(self.index as u32 + 1).min(w);
        RgbaImage::from_fn(w, h, |x, y| {
            if y >= h / 2 && y < h / 2 + 4 && x < bar {
                Rgba([230, 230, 230, 255])
            } else {
                Rgba([r, g, b, 255])
            }
        })
    }

    fn name(&self) -> &str {
        "demo"
    }
}

fn demo(index: usize) -> impl FnOnce() -> Box<dyn Screen<RgbaImage>> {
    move || -> Box<dyn Screen<RgbaImage>> { Box::new(DemoScreen { index }) }
}

struct FrameWriter {
    dir: PathBuf,
    canvas: RgbaImage,
    written: usize,
}

impl FrameWriter {
    fn write(&mut self, stack: &ScreenStack<RgbaImage>) -> anyhow::Result<()> {
        let frame = stack.render(self.canvas.clone());
        let path = self.dir.join(format!("frame_{:04}.png", self.written));
        frame
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        self.written += 1;
        Ok(())
    }

    /// Sample frames until the running transition settles, then write the settled frame.
    fn record(&mut self, stack: &ScreenStack<RgbaImage>, interval: Duration) -> anyhow::Result<()> {
        let deadline = Instant::now() + Duration::from_secs(30);
        while stack.is_transitioning() {
            anyhow::ensure!(Instant::now() < deadline, "transition did not settle");
            self.write(stack)?;
            std::thread::sleep(interval);
        }
        self.write(stack)
    }
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.screens >= 1, "--screens must be >= 1");
    anyhow::ensure!(args.fps >= 1, "--fps must be >= 1");
    anyhow::ensure!(args.width >= 1 && args.height >= 1, "canvas must be non-empty");

    let cfg = read_config(args.config.as_deref())?;
    let stack = ScreenStack::new(cfg)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let mut writer = FrameWriter {
        dir: args.out.clone(),
        canvas: RgbaImage::from_pixel(args.width, args.height, Rgba([0, 0, 0, 255])),
        written: 0,
    };
    let interval = Duration::from_secs(1) / args.fps;

    stack.push(demo(0), false);
    // fixes the slide width before the first animated push
    writer.write(&stack)?;

    for index in 1..args.screens {
        stack
            .push(demo(index), true)
            .context("push rejected while idle")?;
        writer.record(&stack, interval)?;
    }
    if args.screens > 1 {
        stack.pop(true, args.screens - 1);
        writer.record(&stack, interval)?;
    }

    stack.cleanup();
    eprintln!("wrote {} frames to {}", writer.written, args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let duration = cfg.transition_duration();
    let frames = screenstack::animation::steps::frame_count(args.distance, duration, cfg.max_fps);
    let steps: Vec<u32> = StepPlan::new(args.distance, frames, cfg.ease).collect();
    let interval_secs = if frames == 0 {
        0.0
    } else {
        duration.as_secs_f64() / f64::from(frames)
    };
    let out = serde_json::json!({
        "distance": args.distance,
        "duration_secs": duration.as_secs_f64(),
        "frames": frames,
        "interval_secs": interval_secs,
        "ease": cfg.ease,
        "steps": steps,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
