#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Maze Chase round.

mod config;

use std::{fmt, fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_chase_core::{LogicalKey, PressedKeys, RoundStatus, TileCoord};
use maze_chase_rendering::{
    poll_input, Color, FramePresenter, InputCollaborator, LoopControl, Presentation,
    RenderCollaborator, RenderingBackend,
};
use maze_chase_rendering_macroquad::MacroquadBackend;
use maze_chase_system_round::{FrameInput, Round};
use maze_chase_world::{query, MazeGrid};
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::config::{GameConfig, ReseedMode};

const BUNDLED_LEVEL: &str = include_str!("../../../levels/level0");
const HEADLESS_STEP: Duration = Duration::from_nanos(16_666_667);
const CLEAR_COLOR: Color = Color::new(0.02, 0.02, 0.05, 1.0);

/// Logical movement key named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HeldKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl From<HeldKey> for LogicalKey {
    fn from(key: HeldKey) -> Self {
        match key {
            HeldKey::Forward => LogicalKey::Forward,
            HeldKey::Backward => LogicalKey::Backward,
            HeldKey::Left => LogicalKey::StrafeLeft,
            HeldKey::Right => LogicalKey::StrafeRight,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "First-person maze chase: collect every pellet, avoid the wanderers.")]
struct Cli {
    /// Level file to load instead of the bundled maze.
    #[arg(value_name = "LEVEL")]
    level: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of adversaries to place.
    #[arg(long, value_name = "N")]
    adversaries: Option<usize>,

    /// Seed for adversary placement and, unless configured otherwise, the base of a
    /// per-frame seed counter.
    #[arg(long, value_name = "S")]
    seed: Option<u64>,

    /// Simulate without opening a window and print a summary.
    #[arg(long)]
    headless: bool,

    /// Frames simulated in headless mode.
    #[arg(long, value_name = "N", default_value_t = 600)]
    ticks: u64,

    /// Movement keys held for the whole headless run.
    #[arg(long, value_enum, num_args = 1.., value_name = "KEY")]
    hold: Vec<HeldKey>,
}

impl Cli {
    fn resolve_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(level) = &self.level {
            config.level = Some(level.clone());
        }
        if let Some(adversaries) = self.adversaries {
            config.adversaries = adversaries;
        }
        if let Some(seed) = self.seed {
            config.spawn_seed = seed;
            config.seed = seed;
            if config.reseed == ReseedMode::WallClock {
                config.reseed = ReseedMode::FrameCounter;
            }
        }
        Ok(config)
    }

    fn held_keys(&self) -> PressedKeys {
        self.hold.iter().copied().map(LogicalKey::from).collect()
    }
}

/// Outcome of a headless run.
#[derive(Clone, Copy, Debug, PartialEq)]
struct HeadlessSummary {
    frames: u64,
    status: RoundStatus,
    remaining: usize,
    player_tile: TileCoord,
}

impl fmt::Display for HeadlessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status={:?} frames={} pellets_remaining={} player_tile=({}, {})",
            self.status,
            self.frames,
            self.remaining,
            self.player_tile.column(),
            self.player_tile.row()
        )
    }
}

fn run_headless(round: &mut Round, pressed: PressedKeys, ticks: u64) -> HeadlessSummary {
    let input = FrameInput {
        pressed,
        dt: HEADLESS_STEP,
        ..FrameInput::default()
    };
    for _ in 0..ticks {
        if round.advance(&input).status.is_done() {
            break;
        }
    }
    HeadlessSummary {
        frames: round.frames(),
        status: round.status(),
        remaining: query::pellets(round.world()).remaining(),
        player_tile: query::player(round.world()).tile,
    }
}

fn load_grid(config: &GameConfig) -> Result<MazeGrid> {
    match &config.level {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read level at {}", path.display()))?;
            MazeGrid::parse(&source)
                .with_context(|| format!("failed to parse level at {}", path.display()))
        }
        None => MazeGrid::parse(BUNDLED_LEVEL).context("failed to parse the bundled level"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let grid = load_grid(&config)?;
    info!(
        width = grid.width(),
        height = grid.height(),
        adversaries = config.adversaries,
        "level_loaded"
    );

    let mut round = Round::new(grid, config.round_config());
    println!("{}", query::welcome_banner(round.world()));

    if cli.headless {
        let summary = run_headless(&mut round, cli.held_keys(), cli.ticks);
        println!("{summary}");
        return Ok(());
    }

    let window = &config.window;
    let presentation = Presentation::new(
        window.title.clone(),
        CLEAR_COLOR,
        window.width,
        window.height,
    );
    let mut presenter = FramePresenter::new();
    MacroquadBackend::new()
        .with_vsync(window.vsync)
        .with_show_fps(window.show_fps)
        .run(
            presentation,
            Box::new(
                move |dt: Duration,
                      input: &mut dyn InputCollaborator,
                      renderer: &mut dyn RenderCollaborator,
                      aspect: f32| {
                    let frame = poll_input(input, dt);
                    let _ = round.advance(&frame);
                    presenter.present(renderer, &round, aspect);
                    LoopControl::Continue
                },
            ),
        )
        .context("rendering backend failed")
}
