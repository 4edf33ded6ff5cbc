mod app;
mod braille;
mod capture;
mod config;
mod field;
mod particle;
mod pointer;
mod raster;
mod render;
mod scheduler;
mod simulation;
mod ui;
mod viewport;

use app::App;
use capture::CaptureOptions;
use clap::Parser;
use config::{LayerStyle, SimulationConfig};
use crossterm::{
    cursor::Show,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use viewport::{CellMetrics, ViewportMonitor};

/// Poll timeout while paused, so resizes and keys are still picked up
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "particle-field")]
#[command(about = "Ambient drifting particle field behind terminal content")]
struct Args {
    /// Fix the random seed for a repeatable particle layout
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second (1-240)
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    // === Headless capture ===
    /// Render without a terminal into this file (.gif = animation, anything else = PNG)
    #[arg(long)]
    capture: Option<PathBuf>,

    /// Capture width in pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Capture height in pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// Number of frames to simulate for a capture
    #[arg(long, default_value = "120")]
    frames: usize,

    /// Fixed pointer position for a capture, as X,Y in pixels
    #[arg(long, value_parser = parse_pointer)]
    pointer: Option<(f32, f32)>,

    // === Diagnostics ===
    /// Write logs here (default: <cache dir>/particle-field/particle-field.log)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Print the compiled-in simulation constants as JSON and exit
    #[arg(long = "print-config")]
    print_config: bool,
}

fn parse_pointer(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x = x
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("bad pointer x '{}': {}", x, e))?;
    let y = y
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("bad pointer y '{}': {}", y, e))?;
    Ok((x, y))
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("particle-field").join("particle-field.log"))
}

/// Send logs to a file; the terminal belongs to the UI. Logging stays off if the file can't be opened.
fn init_file_logging(path: Option<PathBuf>) -> Option<PathBuf> {
    let path = path.or_else(default_log_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Some(path)
}

/// Headless runs own no terminal, so logs can go to stderr
fn init_stderr_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Restores the terminal when dropped, on every exit path
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
        log::info!("terminal restored");
    }
}

/// Acquire the terminal as a drawing surface and start observing mouse and resize events
fn mount() -> io::Result<(TerminalGuard, Terminal<CrosstermBackend<Stdout>>)> {
    enable_raw_mode()?;
    let guard = TerminalGuard;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    Ok((guard, terminal))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        println!("{}", SimulationConfig::DEFAULT.to_json()?);
        return Ok(());
    }

    if let Some(path) = args.capture {
        match args.log_file {
            Some(log_file) => {
                init_file_logging(Some(log_file));
            }
            None => init_stderr_logging(),
        }
        let options = CaptureOptions {
            path,
            width: args.width,
            height: args.height,
            frames: args.frames,
            fps: args.fps,
            seed: args.seed,
            pointer: args.pointer,
        };
        let summary = capture::run_capture(&options, SimulationConfig::DEFAULT, LayerStyle::DEFAULT)?;
        println!(
            "Wrote {} frame(s) of {} particles to {}",
            summary.frames_written,
            summary.particles,
            options.path.display()
        );
        return Ok(());
    }

    init_file_logging(args.log_file);

    // Purely decorative: without a usable terminal, do nothing and exit quietly
    let (guard, mut terminal) = match mount() {
        Ok(mounted) => mounted,
        Err(err) => {
            log::warn!("no drawing surface available, skipping: {}", err);
            return Ok(());
        }
    };
    log::info!("mounted");

    let size = terminal.size()?;
    let viewport = ViewportMonitor::new(size.width, size.height, CellMetrics::detect());
    let mut app = App::new(viewport, args.fps, args.seed);
    log::info!(
        "frame loop at {:?} per frame, {} particles",
        app.scheduler.interval(),
        app.field.pool.len()
    );

    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    app.stop();
    drop(guard);
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    app.start(Instant::now());

    while !app.should_quit {
        // Sleep until the next frame is due, waking early for input
        let timeout = app
            .scheduler
            .time_until_next(Instant::now())
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            app.handle_event(event::read()?, Instant::now());
            if app.should_quit {
                break;
            }
        }

        if app.frame(Instant::now()) || app.needs_redraw {
            terminal.draw(|frame| ui::render(frame, app))?;
            app.needs_redraw = false;
        }
    }

    Ok(())
}
