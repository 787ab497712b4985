#![forbid(unsafe_code)]

mod app;
mod bar;
mod cli;
mod config;
mod constants;
mod event_handler;
mod geometry;
mod quality;
mod surface;
mod ticker;
mod tooltip;
mod x11_utils;

use anyhow::{Context, Result};
use std::sync::mpsc;
use std::thread;
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;
use x11rb::connection::Connection;

use app::App;
use bar::{BarWindow, Palette};
use cli::Command;
use config::Config;
use constants::{colors, env};
use event_handler::run_event_loop;
use geometry::BarGeometry;
use surface::X11Surface;
use ticker::spawn_ticker;
use x11_utils::{AppContext, CachedAtoms};

fn run_bar(config: Config) -> Result<()> {
    let (conn, screen_num) = x11rb::connect(None)
        .context("couldn't open display. Is DISPLAY set correctly?")?;
    let screen = &conn.setup().roots[screen_num];
    info!(
        screen = screen_num,
        width = screen.width_in_pixels,
        height = screen.height_in_pixels,
        "Connected to X11 server"
    );

    let atoms = CachedAtoms::new(&conn)
        .context("Failed to cache X11 atoms at startup")?;
    let ctx = AppContext {
        conn: &conn,
        screen,
        atoms: &atoms,
    };

    let palette = Palette::alloc(&ctx, colors::ON, colors::OFF)?;

    let geometry = BarGeometry::new(
        config.edge,
        config.bar_width,
        screen.width_in_pixels,
        screen.height_in_pixels,
    );
    let bar = BarWindow::new(&ctx, geometry, palette)?;
    let bar_window = bar.window;
    let poll_interval = config.poll_interval;
    let mut app = App::new(config, X11Surface::new(ctx, bar));

    thread::scope(|scope| {
        let (stop_tx, stop_rx) = mpsc::channel();
        let ticker_handle = spawn_ticker(scope, &conn, bar_window, atoms.tick, poll_interval, stop_rx);

        let signals = ticker::spawn_signal_forwarder(scope, &conn, bar_window, atoms.shutdown)?;

        let result = app.start().and_then(|()| run_event_loop(&conn, &atoms, &mut app));

        // Release the helper threads so the scope can join them
        drop(stop_tx);
        signals.close();
        let _ = ticker_handle.join();

        result
    })
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var(env::LOG_LEVEL)
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    match cli::parse_command(std::env::args()) {
        Command::PrintVersion => print!("{}", cli::version_banner()),
        Command::PrintHelp => print!("{}", cli::usage()),
        Command::Run(mut config) => {
            config.apply_env_overrides();
            info!(config = ?config, "Loaded configuration");
            run_bar(config)?;
        }
    }
    Ok(())
}
