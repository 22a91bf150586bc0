use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "magicwish", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the date-echo magic square for a date.
    Square(SquareArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the whole clip as an animated GIF.
    Render(RenderArgs),
    /// Run the live loop for a while, refreshing a PNG preview.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct SquareArgs {
    /// Date as DD/MM/YYYY.
    date: String,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct WishArgs {
    /// Wish JSON (recipientName, message, date, ...).
    #[arg(long = "wish")]
    wish_path: PathBuf,

    /// Named timeline preset.
    #[arg(long, value_enum, default_value_t = PresetChoice::Standard)]
    preset: PresetChoice,

    /// Timeline configuration JSON; replaces the preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file used for every text role instead of system fonts.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Skip text entirely.
    #[arg(long)]
    no_text: bool,

    /// Finale backdrop: `procedural`, `none`, or an image path.
    #[arg(long, default_value = "procedural")]
    backdrop: String,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    wish: WishArgs,

    /// Frame index (0-based).
    #[arg(long, conflicts_with = "progress")]
    frame: Option<u64>,

    /// Normalized progress in [0, 1].
    #[arg(long)]
    progress: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    wish: WishArgs,

    /// Output GIF path, or a directory to receive `magic_wish_<name>.gif`.
    #[arg(long)]
    out: PathBuf,

    /// GIF quantizer speed, 1 (best) to 30 (fastest).
    #[arg(long, default_value_t = magicwish::DEFAULT_GIF_SPEED)]
    speed: i32,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    wish: WishArgs,

    /// PNG file refreshed while the loop runs.
    #[arg(long)]
    out: PathBuf,

    /// Wall-clock duration in seconds.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Override the configured live frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Write the PNG every N frames.
    #[arg(long, default_value_t = 15)]
    every: u64,

    /// Move a synthetic pointer in a circle to feed the aura trail.
    #[arg(long)]
    orbit: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    Standard,
    Cinematic,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Square(args) => cmd_square(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn cmd_square(args: SquareArgs) -> anyhow::Result<()> {
    let q = magicwish::parse_date(&args.date)?;
    let grid = magicwish::build_from_date(q);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    for row in grid.rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>4}")).collect();
        println!("{}  = {}", cells.join(" "), grid.magic_constant());
    }
    println!("magic constant: {}", grid.magic_constant());
    Ok(())
}

struct Session {
    timeline: magicwish::Timeline,
    painter: magicwish::Painter,
}

fn read_wish(path: &Path) -> anyhow::Result<magicwish::WishSpec> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read wish '{}'", path.display()))?;
    let wish = magicwish::WishSpec::from_json(&text)
        .with_context(|| format!("parse wish JSON '{}'", path.display()))?;
    Ok(wish)
}

fn read_config(args: &WishArgs) -> anyhow::Result<magicwish::TimelineConfig> {
    let Some(path) = &args.config else {
        return Ok(match args.preset {
            PresetChoice::Standard => magicwish::TimelineConfig::standard(),
            PresetChoice::Cinematic => magicwish::TimelineConfig::cinematic(),
        });
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let cfg = magicwish::TimelineConfig::from_json(&text)
        .with_context(|| format!("parse config JSON '{}'", path.display()))?;
    Ok(cfg)
}

fn load_fonts(args: &WishArgs) -> anyhow::Result<magicwish::FontSet> {
    if args.no_text {
        return Ok(magicwish::FontSet::empty());
    }
    match &args.font {
        Some(path) => Ok(magicwish::FontSet::from_file(path)?),
        None => Ok(magicwish::FontSet::system()),
    }
}

fn make_provider(choice: &str) -> Option<Arc<dyn magicwish::ImageProvider>> {
    match choice {
        "none" => None,
        "procedural" => Some(Arc::new(magicwish::ProceduralBackdrop)),
        path => Some(Arc::new(magicwish::FileBackdrop::new(path))),
    }
}

/// Build the timeline and wait for the backdrop, so offline output does not depend on timing.
fn open_session(args: &WishArgs) -> anyhow::Result<Session> {
    let wish = read_wish(&args.wish_path)?;
    let cfg = read_config(args)?;
    let canvas = cfg.canvas;
    let mut timeline = magicwish::Timeline::new(wish.clone(), cfg)?;

    if let Some(provider) = make_provider(&args.backdrop) {
        let (slot, handle) =
            magicwish::spawn_backdrop(provider, wish, canvas.width, canvas.height)?;
        if handle.join().is_err() {
            tracing::warn!("backdrop thread panicked; continuing without a backdrop");
        }
        timeline = timeline.with_backdrop(slot);
    }

    let painter = magicwish::Painter::new(&load_fonts(args)?);
    Ok(Session { timeline, painter })
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
    let mut s = open_session(&args.wish)?;
    let cfg = s.timeline.config().clone();
    let total = cfg.total_frames;

    let frame = match (args.frame, args.progress) {
        (Some(f), _) => f,
        (None, Some(p)) => {
            anyhow::ensure!((0.0..=1.0).contains(&p), "--progress must be within [0, 1]");
            (p * total as f64).round() as u64
        }
        (None, None) => 0,
    };
    anyhow::ensure!(frame <= total, "frame {frame} is past the clip end ({total})");

    let mut surface = magicwish::Surface::for_canvas(cfg.canvas)?;
    let mut particles = s.timeline.particles_at(magicwish::FrameIndex(frame), total);
    s.timeline.render(
        &mut s.painter,
        &mut surface,
        magicwish::FrameIndex(frame),
        total,
        &mut particles,
        None,
    )?;

    ensure_parent_dir(&args.out)?;
    surface.frame().write_png(&args.out)?;
    tracing::info!(frame, out = %args.out.display(), "wrote frame");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut s = open_session(&args.wish)?;

    let out = if args.out.is_dir() {
        args.out.join(s.timeline.wish().default_file_name())
    } else {
        args.out.clone()
    };
    ensure_parent_dir(&out)?;

    let mut sink = magicwish::GifSink::new(s.timeline.background()).with_speed(args.speed);
    let bytes = magicwish::encode_wish(&s.timeline, &mut s.painter, &mut sink)
        .context("encode GIF")?;

    std::fs::write(&out, &bytes).with_context(|| format!("write '{}'", out.display()))?;
    tracing::info!(bytes = bytes.len(), out = %out.display(), "wrote gif");
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds > 0.0,
        "--seconds must be > 0"
    );
    let mut s = open_session(&args.wish)?;
    let cfg = s.timeline.config().clone();
    let fps = args.fps.unwrap_or(cfg.live_fps);

    ensure_parent_dir(&args.out)?;
    let mut presenter = magicwish::PngPresenter::new(&args.out, args.every);
    let pointer = magicwish::SharedPointer::new();
    let stop = magicwish::StopHandle::new();

    let orbit = args.orbit.then(|| {
        let pointer = pointer.clone();
        let stop = stop.clone();
        let (w, h) = (f64::from(cfg.canvas.width), f64::from(cfg.canvas.height));
        std::thread::spawn(move || {
            let mut angle = 0.0f64;
            while !stop.is_stopped() {
                let r = 0.3 * w.min(h);
                pointer.set(Some(magicwish::Point::new(
                    w / 2.0 + r * angle.cos(),
                    h / 2.0 + r * angle.sin(),
                )));
                angle += 0.05;
                std::thread::sleep(Duration::from_millis(16));
            }
        })
    });

    let result = magicwish::run_live(
        &s.timeline,
        &mut s.painter,
        &mut presenter,
        &pointer,
        &stop,
        magicwish::LiveOptions {
            fps,
            max_frames: None,
            max_duration: Some(Duration::from_secs_f64(args.seconds)),
        },
    );
    stop.stop();
    if let Some(handle) = orbit {
        let _ = handle.join();
    }

    let report = result?;
    tracing::info!(
        frames = report.frames,
        loops = report.loops,
        written = presenter.written(),
        out = %args.out.display(),
        "preview finished"
    );
    Ok(())
}
