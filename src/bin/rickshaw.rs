use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rickshaw", version, about = "Render the foggy rickshaw scene")]
struct Cli {
    #[command(flatten)]
    scene: SceneArgs,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene config JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Layout seed.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Device pixel ratio.
    #[arg(long, global = true)]
    dpr: Option<f64>,

    /// Frames per second (integer).
    #[arg(long, global = true)]
    fps: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a range of frames as a PNG sequence.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// First frame (0-based).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Number of frames; defaults to the rest of the configured duration.
    #[arg(long)]
    count: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Override the configured duration.
    #[arg(long)]
    seconds: Option<f64>,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli.scene)?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(config, args),
        Command::Frames(args) => cmd_frames(config, args),
        Command::Render(args) => cmd_render(config, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &SceneArgs) -> anyhow::Result<rickshaw::SceneConfig> {
    let mut config = match &args.config {
        Some(path) => rickshaw::SceneConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => rickshaw::SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(dpr) = args.dpr {
        config.device_pixel_ratio = dpr;
    }
    if let Some(fps) = args.fps {
        config.fps = rickshaw::Fps::new(fps, 1)?;
    }
    Ok(config)
}

fn cmd_frame(config: rickshaw::SceneConfig, args: FrameArgs) -> anyhow::Result<()> {
    let sess = rickshaw::RenderSession::new(config)?;
    let frame = sess.render_frame(rickshaw::FrameIndex(args.frame))?;
    rickshaw::encode::png::write_png(&args.out, &frame)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(config: rickshaw::SceneConfig, args: FramesArgs) -> anyhow::Result<()> {
    let sess = rickshaw::RenderSession::new(config)?;
    let end = match args.count {
        Some(count) => args.start.saturating_add(count),
        None => sess.full_range().end.0.max(args.start),
    };
    let range =
        rickshaw::FrameRange::new(rickshaw::FrameIndex(args.start), rickshaw::FrameIndex(end))?;

    let mut sink = rickshaw::PngSequenceSink::new(&args.out_dir);
    let stats = sess.render_range(range, &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_render(mut config: rickshaw::SceneConfig, args: RenderArgs) -> anyhow::Result<()> {
    if let Some(seconds) = args.seconds {
        config.duration_secs = seconds;
    }
    let sess = rickshaw::RenderSession::new(config)?;

    let mut sink = rickshaw::FfmpegSink::new(rickshaw::FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
        bg_rgba: [0, 0, 0, 255],
    });
    let stats = sess.render_range(sess.full_range(), &mut sink)?;

    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.frames_rendered
    );
    Ok(())
}
