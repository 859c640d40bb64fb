#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame orchestration of a Maze Chase round.
//!
//! A [`Round`] owns the world and the pure systems and runs them in a fixed
//! order every frame:
//!
//! 1. the camera turns and reports the view heading,
//! 2. the player steers, moves, collects and checks for adversaries,
//! 3. every adversary draws a direction and moves,
//! 4. the round checks for a win or a loss.
//!
//! Once the round ends the world ignores further commands, so every entity
//! freezes where it stood.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use glam::Vec2;
use maze_chase_core::{Command, Event, PressedKeys, RoundStatus};
use maze_chase_system_camera::{CameraDirector, CameraSettings, FirstPersonCamera};
use maze_chase_system_steering::Steering;
use maze_chase_system_wandering::{Config as WanderingConfig, Wandering};
use maze_chase_world::{self as world, query, MazeGrid, Rules, World};
use tracing::info;

/// Number of adversaries placed when nothing else is configured.
pub const DEFAULT_ADVERSARY_COUNT: usize = 4;

/// Where the per-frame adversary seed comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reseed {
    /// Whole seconds since the Unix epoch; draws repeat within a second.
    WallClock,
    /// The same seed every frame.
    Fixed(u64),
    /// `base` plus the zero-based frame index.
    FrameCounter {
        /// Seed used on the first frame.
        base: u64,
    },
}

impl Reseed {
    /// Seed for the frame with the given index.
    #[must_use]
    pub fn seed_for(&self, frame: u64) -> u64 {
        match self {
            Reseed::WallClock => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default(),
            Reseed::Fixed(seed) => *seed,
            Reseed::FrameCounter { base } => base.wrapping_add(frame),
        }
    }
}

/// Everything needed to start a round on a parsed maze.
#[derive(Clone, Debug)]
pub struct RoundConfig {
    /// Rules the world resolves commands with.
    pub rules: Rules,
    /// Number of adversaries to place.
    pub adversaries: usize,
    /// Seed for adversary placement.
    pub spawn_seed: u64,
    /// Source of the per-frame adversary seed.
    pub reseed: Reseed,
    /// First-person camera tunables.
    pub camera: CameraSettings,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            adversaries: DEFAULT_ADVERSARY_COUNT,
            spawn_seed: 0,
            reseed: Reseed::WallClock,
            camera: CameraSettings::default(),
        }
    }
}

/// Input gathered by the host for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Logical movement keys held this frame.
    pub pressed: PressedKeys,
    /// Mouse motion since the previous frame, in screen pixels.
    pub mouse_delta: Vec2,
    /// Simulated time elapsed since the previous frame.
    pub dt: Duration,
}

/// Outcome of a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Events emitted by the world while resolving the frame, in order.
    pub events: Vec<Event>,
    /// Round status after the frame.
    pub status: RoundStatus,
}

/// A single round: the world plus the systems that drive it.
#[derive(Debug)]
pub struct Round {
    world: World,
    steering: Steering,
    wandering: Wandering,
    director: CameraDirector,
    reseed: Reseed,
    frame: u64,
}

impl Round {
    /// Builds the world for the maze and places the adversaries.
    #[must_use]
    pub fn new(grid: MazeGrid, config: RoundConfig) -> Self {
        let candidates: Vec<_> = grid.empty_tiles().collect();
        let mut world = World::new(grid, config.rules);
        let wandering = Wandering::new(WanderingConfig::new(config.spawn_seed));

        let mut commands = Vec::new();
        let mut events = Vec::new();
        wandering.spawn(config.adversaries, &candidates, &mut commands);
        flush(&mut world, &mut commands, &mut events);
        info!(
            adversaries = query::adversary_view(&world).len(),
            spawn_seed = config.spawn_seed,
            reseed = ?config.reseed,
            "round_ready"
        );

        Self {
            world,
            steering: Steering,
            wandering,
            director: CameraDirector::new(config.camera),
            reseed: config.reseed,
            frame: 0,
        }
    }

    /// Runs one frame and reports what happened.
    pub fn advance(&mut self, input: &FrameInput) -> FrameReport {
        let mut commands = Vec::new();
        let mut events = Vec::new();

        self.director.handle(input.mouse_delta, &mut commands);
        if self.status().is_done() {
            return FrameReport {
                events,
                status: self.status(),
            };
        }
        flush(&mut self.world, &mut commands, &mut events);

        let player = query::player(&self.world);
        let speed = query::rules(&self.world).speed;
        self.steering.handle(
            input.pressed,
            &player,
            speed,
            input.dt,
            |position, direction| query::wall_ahead(&self.world, position, Some(direction)),
            &mut commands,
        );
        commands.push(Command::AdvancePlayer { dt: input.dt });
        flush(&mut self.world, &mut commands, &mut events);

        let seed = self.reseed.seed_for(self.frame);
        self.wandering.handle(
            seed,
            &query::adversary_view(&self.world),
            input.dt,
            &mut commands,
        );
        commands.push(Command::EvaluateRound);
        flush(&mut self.world, &mut commands, &mut events);

        self.frame += 1;
        FrameReport {
            events,
            status: self.status(),
        }
    }

    /// Read-only access to the world for queries and presentation.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Camera that follows the player.
    #[must_use]
    pub fn camera(&self) -> &FirstPersonCamera {
        self.director.camera()
    }

    /// Current round status.
    #[must_use]
    pub fn status(&self) -> RoundStatus {
        query::round_status(&self.world)
    }

    /// Number of frames simulated while the round was running.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frame
    }
}

fn flush(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        world::apply(world, command, events);
    }
}
