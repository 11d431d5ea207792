//! mpu-blaster CLI
//!
//! Usage:
//!   mpu-blaster --port1 /dev/ttyUSB0 --port2 /dev/ttyUSB1   # two serial blasters
//!   mpu-blaster --replay1 p1.log                            # replay a recorded log
//!   mpu-blaster --config game.json --serve                  # with HTTP/WS API
//!   mpu-blaster --json                                      # JSON output
//!
//! Console commands are read from stdin, one per line:
//!   start | idle | calibrate [1|2] | add <1|2> <points> | area <w> <h> | status | quit

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mpu_blaster::config::{GameConfig, PlayerConfig};
use mpu_blaster::core::{
    run_server, ApiState, Command, ConsoleCommand, GameContext, LineSource, ReplayLineSource,
    SerialLineSource, SessionEvent,
};
use mpu_blaster::types::{PlayerId, SessionSnapshot};
use mpu_blaster::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "mpu-blaster",
    version = VERSION,
    about = "Two-player motion-controlled target gallery",
    long_about = "Reads pitch, yaw rate and trigger lines from two handheld\n\
                  MPU blasters, turns them into reticle positions and hits,\n\
                  and runs a timed two-player round.\n\n\
                  States:\n  \
                  IDLE      - Waiting for `start`\n  \
                  GAMEPLAY  - Round running, hits score\n  \
                  GAME_OVER - Winner shown until `idle`"
)]
struct Args {
    /// JSON config file (missing keys use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port of player 1
    #[arg(long)]
    port1: Option<String>,

    /// Serial port of player 2
    #[arg(long)]
    port2: Option<String>,

    /// Baud rate for both serial ports
    #[arg(long)]
    baud: Option<u32>,

    /// Recorded sensor log for player 1 (overrides --port1)
    #[arg(long)]
    replay1: Option<PathBuf>,

    /// Recorded sensor log for player 2 (overrides --port2)
    #[arg(long)]
    replay2: Option<PathBuf>,

    /// Round length in seconds
    #[arg(long)]
    session_duration: Option<f32>,

    /// Filter smoothing in [0, 1]
    #[arg(long)]
    smoothing: Option<f32>,

    /// Tick rate in Hz
    #[arg(long)]
    tick_hz: Option<u32>,

    /// Run the HTTP/WebSocket API alongside the console
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mpu_blaster=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = load_config(&args)?;
    let transports = [
        open_transport(PlayerId::One, config.player(PlayerId::One)),
        open_transport(PlayerId::Two, config.player(PlayerId::Two)),
    ];
    let game = GameContext::from_config(&config, transports);

    print_header(&args);
    run_loop(game, &config, &args).await;
    Ok(())
}

/// Config file, then CLI overrides, then validation
fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(port) = &args.port1 {
        config.player_mut(PlayerId::One).port = Some(port.clone());
    }
    if let Some(port) = &args.port2 {
        config.player_mut(PlayerId::Two).port = Some(port.clone());
    }
    if let Some(path) = &args.replay1 {
        config.player_mut(PlayerId::One).replay = Some(path.clone());
    }
    if let Some(path) = &args.replay2 {
        config.player_mut(PlayerId::Two).replay = Some(path.clone());
    }
    if let Some(baud) = args.baud {
        for player in PlayerId::ALL {
            config.player_mut(player).baud = baud;
        }
    }
    if let Some(duration) = args.session_duration {
        config.session_duration_secs = duration;
    }
    if let Some(smoothing) = args.smoothing {
        config.smoothing = smoothing;
    }
    if let Some(hz) = args.tick_hz {
        config.tick_hz = hz;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Replay wins over serial; any failure leaves the player degraded
fn open_transport(player: PlayerId, config: &PlayerConfig) -> Option<Box<dyn LineSource>> {
    let opened = match (&config.replay, &config.port) {
        (Some(path), _) => ReplayLineSource::open(path).map(boxed),
        (None, Some(port)) => SerialLineSource::open(port, config.baud).map(boxed),
        (None, None) => {
            warn!(%player, "no port or replay configured");
            return None;
        }
    };

    match opened {
        Ok(source) => Some(source),
        Err(e) => {
            error!(%player, error = %e, "transport unavailable");
            None
        }
    }
}

fn boxed<S: LineSource + 'static>(source: S) -> Box<dyn LineSource> {
    Box::new(source)
}

/// Tick loop: the only writer of game state
async fn run_loop(mut game: GameContext, config: &GameConfig, args: &Args) {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<Command>();
    let (snapshot_tx, snapshot_rx) = watch::channel(game.snapshot());
    let mut console_rx = spawn_console();

    if args.serve {
        let state = ApiState::new(snapshot_rx, command_tx.clone());
        let addr = args.addr.clone();
        tokio::spawn(async move {
            if let Err(e) = run_server(&addr, state).await {
                error!(%addr, error = %e, "API server stopped");
            }
        });
    }

    let period = Duration::from_secs_f64(1.0 / f64::from(config.tick_hz));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last = Instant::now();
    'ticks: loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }

        while let Ok(input) = console_rx.try_recv() {
            match input {
                ConsoleCommand::Game(command) => apply(&mut game, command, args),
                ConsoleCommand::Status => print_status(&game, args),
                ConsoleCommand::Quit => break 'ticks,
            }
        }
        while let Ok(command) = command_rx.try_recv() {
            apply(&mut game, command, args);
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let report = game.tick(dt);
        let snapshot = game.snapshot();
        for event in &report.events {
            print_event(event, &snapshot, args);
        }
        snapshot_tx.send_replace(snapshot);
    }

    println!("\nRounds played: {}", game.session().rounds());
}

fn apply(game: &mut GameContext, command: Command, args: &Args) {
    match game.apply(command) {
        Ok(Some(event)) => print_event(&event, &game.snapshot(), args),
        Ok(None) => {}
        Err(e) => {
            warn!(?command, error = %e, "command rejected");
            if !args.json {
                println!("{}", format!("⚠ {}", e).yellow());
            }
        }
    }
}

/// Reads stdin on a plain thread; the tick loop drains the channel
fn spawn_console() -> mpsc::UnboundedReceiver<ConsoleCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match ConsoleCommand::parse(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                None => println!("{}", ConsoleCommand::help().dimmed()),
            }
        }
    });
    rx
}

fn print_header(args: &Args) {
    if args.json {
        return;
    }
    println!("{}", format!("mpu-blaster v{}", VERSION).bold());
    println!("{}", ConsoleCommand::help());
    println!();
}

fn print_event(event: &SessionEvent, snapshot: &SessionSnapshot, args: &Args) {
    if args.json {
        print_json(snapshot);
        return;
    }

    match event {
        SessionEvent::Started => println!("{}", "▶ Round started".green().bold()),
        SessionEvent::ScoreChanged { player, score } => {
            println!("{}", format!("  {} hit → {}", player, score).cyan())
        }
        SessionEvent::GameOver { winner } => {
            println!("{}", format!("■ {}", winner.label()).magenta().bold())
        }
        SessionEvent::ReturnedToIdle => println!("{}", "○ Back to idle".dimmed()),
    }
    print_snapshot_line(snapshot, args);
}

fn print_status(game: &GameContext, args: &Args) {
    let snapshot = game.snapshot();
    if args.json {
        print_json(&snapshot);
        return;
    }

    print_snapshot_line(&snapshot, args);
    for player in PlayerId::ALL {
        let device = game.device(player);
        let reticle = device.reticle();
        let link = if device.is_connected() {
            "connected".green()
        } else {
            "degraded".red()
        };
        println!(
            "  {} {} reticle=({:.2}, {:.2}) frames={}",
            player,
            link,
            reticle.x,
            reticle.y,
            device.frames_total()
        );
    }
}

fn print_snapshot_line(snapshot: &SessionSnapshot, args: &Args) {
    if args.no_color {
        println!("{}", snapshot.to_parseable_string());
    } else {
        println!("{}", snapshot.to_terminal_string());
    }
}

fn print_json(snapshot: &SessionSnapshot) {
    match serde_json::to_string(snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "snapshot serialization failed"),
    }
}
