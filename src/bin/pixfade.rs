use std::{
    io::Write as _,
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pixfade", version, about = "Pixelated color-cycling gradient animations")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown after a given amount of animation time as a PNG.
    Frame(FrameArgs),
    /// Capture one full color cycle as an animated GIF.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    anim: AnimArgs,

    /// Animation time to advance before drawing, in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    at_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    anim: AnimArgs,

    /// Output GIF path (defaults to the sanitized caption).
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Config file plus per-field overrides.
#[derive(Args, Debug)]
struct AnimArgs {
    /// Animation config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Pixel size of the dithered gradient.
    #[arg(long)]
    scale: Option<u32>,

    /// Palette color as `#rrggbb`; repeat for each color. Replaces the config palette.
    #[arg(long = "color")]
    colors: Vec<pixfade::Rgb8>,

    /// Sweep direction: down, up, right or left.
    #[arg(long)]
    direction: Option<pixfade::Direction>,

    /// Caption drawn in the middle of every frame.
    #[arg(long)]
    text: Option<String>,

    /// Font file for the caption.
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    font_size: Option<f32>,

    /// Dither seed.
    #[arg(long)]
    seed: Option<u64>,
}

const DEFAULT_SIZE: u32 = 256;

impl AnimArgs {
    fn resolve(self) -> anyhow::Result<pixfade::AnimationConfig> {
        let mut cfg = match &self.config {
            Some(path) => pixfade::AnimationConfig::load(path)
                .with_context(|| format!("load config '{}'", path.display()))?,
            None => pixfade::AnimationConfig::new(DEFAULT_SIZE, DEFAULT_SIZE, Vec::new()),
        };

        if let Some(v) = self.width {
            cfg.width = v;
        }
        if let Some(v) = self.height {
            cfg.height = v;
        }
        if let Some(v) = self.scale {
            cfg.scale = v;
        }
        if !self.colors.is_empty() {
            cfg.colors = self.colors;
        }
        if let Some(v) = self.direction {
            cfg.direction = v;
        }
        if let Some(v) = self.text {
            cfg.text = v;
        }
        if let Some(v) = self.font {
            cfg.font = Some(v);
        }
        if let Some(v) = self.font_size {
            cfg.font_size = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !args.at_ms.is_finite() || args.at_ms < 0.0 {
        anyhow::bail!("--at-ms must be finite and >= 0");
    }
    let cfg = args.anim.resolve()?;
    let mut state = pixfade::AnimationState::from_config(&cfg)?;

    // The gradient accumulates across draws, so every step is drawn.
    let step = cfg.frame_delay_ms;
    let mut elapsed = 0.0;
    while elapsed + step <= args.at_ms {
        state.update(step);
        pixfade::draw(&mut state)?;
        elapsed += step;
    }
    let rest = args.at_ms - elapsed;
    if rest > 0.0 {
        state.update(rest);
    }
    pixfade::draw(&mut state)?;

    ensure_parent_dir(&args.out)?;
    let frame = state.surface();
    image::save_buffer_with_format(
        &args.out,
        frame.data(),
        frame.width(),
        frame.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = args.anim.resolve()?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(pixfade::default_gif_file_name(&cfg.text)));
    let mut state = pixfade::AnimationState::from_config(&cfg)?;

    eprintln!("Gathering frames...");
    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    let mut last_percent = None;
    let events = pixfade::EncodeEvents::new(
        move |fraction| {
            let percent = pixfade::export::progress_percent(fraction);
            if last_percent != Some(percent) {
                last_percent = Some(percent);
                eprint!("\rCombining frames: {percent}%");
                let _ = std::io::stderr().flush();
            }
        },
        move |bytes| {
            let _ = tx.send(bytes);
        },
    );

    let mut sink = pixfade::GifSink::new(pixfade::GifSinkOpts::default());
    let capture = pixfade::capture_cycle(&mut state, &mut sink, events)?;
    let frames = capture.wait().context("encode gif")?;
    eprintln!();

    let bytes = rx
        .recv()
        .context("gif encoder finished without producing output")?;
    ensure_parent_dir(&out)?;
    std::fs::write(&out, &bytes).with_context(|| format!("write gif '{}'", out.display()))?;

    eprintln!(
        "wrote {} ({frames} frames, {} MB)",
        out.display(),
        pixfade::format_size_mb(bytes.len() as u64)
    );
    Ok(())
}
