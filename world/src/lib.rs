#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.
//!
//! The [`World`] owns the parsed maze, the pellet field, the player and the
//! adversaries. It only changes through [`apply`], which executes a single
//! [`Command`] and reports the outcome as [`Event`] values. Systems observe
//! the world through the read-only [`query`] module.

mod collision;
mod entity;
mod maze;
mod pellets;

use std::time::Duration;

use maze_chase_core::{
    AdversaryId, Command, Direction, Event, RoundStatus, SpriteId, TileCoord, WELCOME_BANNER,
};
use tracing::{debug, info, trace, warn};

pub use collision::{
    entity_collision, obstruction, probe_points, wall_ahead, Obstruction, PROBE_EPSILON,
    SPRITE_RADIUS,
};
pub use maze::{MazeGrid, ParseError, TileKind};
pub use pellets::PelletField;

use entity::{Adversary, Player};

/// Movement speed shared by every entity, in tiles per second.
pub const DEFAULT_SPEED: f32 = 5.0;

/// Ticks between two sprite frame steps.
pub const DEFAULT_ANIMATION_CADENCE: u32 = 30;

/// Tunable rules applied by the world while resolving commands.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    /// Movement speed of every entity, in tiles per second.
    pub speed: f32,
    /// Ticks between two sprite frame steps.
    pub animation_cadence: u32,
    /// Whether sharing a tile with an adversary ends the round.
    pub adversary_collision_ends_round: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            animation_cadence: DEFAULT_ANIMATION_CADENCE,
            adversary_collision_ends_round: true,
        }
    }
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: MazeGrid,
    pellets: PelletField,
    player: Player,
    adversaries: Vec<Adversary>,
    status: RoundStatus,
    rules: Rules,
}

impl World {
    /// Creates a world for the maze with the player resting on the spawn tile.
    #[must_use]
    pub fn new(grid: MazeGrid, rules: Rules) -> Self {
        let pellets = PelletField::from_grid(&grid);
        let player = Player::spawn(grid.tile_center(grid.spawn()), rules.animation_cadence);
        info!(
            width = grid.width(),
            height = grid.height(),
            pellets = pellets.remaining(),
            "round_started"
        );
        Self {
            banner: WELCOME_BANNER,
            grid,
            pellets,
            player,
            adversaries: Vec::new(),
            status: RoundStatus::Running,
            rules,
        }
    }

    fn spawn_adversary(&mut self, tile: TileCoord, out_events: &mut Vec<Event>) {
        if self.grid.get(tile) != Some(TileKind::Empty) {
            warn!(
                column = tile.column(),
                row = tile.row(),
                "adversary_spawn_rejected"
            );
            out_events.push(Event::AdversarySpawnRejected { tile });
            return;
        }

        let id = AdversaryId::new(self.adversaries.len() as u32);
        let position = self.grid.tile_center(tile);
        self.adversaries
            .push(Adversary::spawn(id, position, self.rules.animation_cadence));
        debug!(
            adversary = id.get(),
            column = tile.column(),
            row = tile.row(),
            "adversary_spawned"
        );
        out_events.push(Event::AdversarySpawned {
            adversary: id,
            tile,
        });
    }

    fn advance_player(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let body = &mut self.player.body;
        if !body.velocity.is_zero() {
            let from = body.position;
            let candidate = from.advanced(body.velocity, dt);
            match obstruction(&self.grid, candidate, body.facing) {
                None => {
                    body.position = candidate;
                    trace!(x = candidate.x(), y = candidate.y(), "player_moved");
                    out_events.push(Event::PlayerMoved {
                        from,
                        to: candidate,
                    });
                }
                Some(blocker) => {
                    trace!(?blocker, "player_blocked");
                    out_events.push(Event::PlayerBlocked {
                        facing: body.facing,
                    });
                }
            }
        }

        let tile = self.grid.tile_at(self.player.body.position);
        if self.pellets.collect(tile) {
            let remaining = self.pellets.remaining();
            debug!(
                column = tile.column(),
                row = tile.row(),
                remaining,
                "pellet_collected"
            );
            out_events.push(Event::PelletCollected { tile, remaining });
        }

        self.evaluate(out_events);

        if self.player.animation.tick() {
            out_events.push(Event::SpriteAnimated {
                sprite: SpriteId::Player,
                frame: self.player.frame(),
            });
        }
    }

    fn wander(
        &mut self,
        id: AdversaryId,
        direction: Direction,
        dt: Duration,
        out_events: &mut Vec<Event>,
    ) {
        let Some(adversary) = self.adversaries.iter_mut().find(|entry| entry.id == id) else {
            return;
        };

        adversary.body.steer(direction, self.rules.speed);
        let from = adversary.body.position;
        let candidate = from.advanced(adversary.body.velocity, dt);
        if wall_ahead(&self.grid, candidate, adversary.body.facing) {
            out_events.push(Event::AdversaryBlocked {
                adversary: id,
                direction,
            });
        } else {
            adversary.body.position = candidate;
            out_events.push(Event::AdversaryMoved {
                adversary: id,
                from,
                to: candidate,
            });
        }

        if adversary.animation.tick() {
            out_events.push(Event::SpriteAnimated {
                sprite: SpriteId::Adversary(id),
                frame: adversary.frame(),
            });
        }
    }

    fn evaluate(&mut self, out_events: &mut Vec<Event>) {
        if self.status.is_done() {
            return;
        }

        let player_tile = self.grid.tile_at(self.player.body.position);
        let caught = self.rules.adversary_collision_ends_round
            && self.adversaries.iter().any(|adversary| {
                entity_collision(self.grid.tile_at(adversary.body.position), player_tile)
            });

        if caught {
            self.finish(RoundStatus::Lost, out_events);
        } else if self.pellets.is_cleared() {
            self.finish(RoundStatus::Won, out_events);
        }
    }

    fn finish(&mut self, status: RoundStatus, out_events: &mut Vec<Event>) {
        self.status = status;
        info!(
            ?status,
            remaining = self.pellets.remaining(),
            "round_ended"
        );
        out_events.push(Event::RoundEnded { status });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the round has ended every command is ignored, which freezes all
/// entities in place.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.status.is_done() {
        return;
    }

    match command {
        Command::SpawnAdversary { tile } => world.spawn_adversary(tile, out_events),
        Command::SetViewFacing { view } => {
            if world.player.view_facing != Some(view) {
                world.player.view_facing = Some(view);
                debug!(?view, "view_facing_changed");
                out_events.push(Event::ViewFacingChanged { view });
            }
        }
        Command::SteerPlayer { direction } => {
            world.player.body.steer(direction, world.rules.speed);
            out_events.push(Event::PlayerSteered { direction });
        }
        Command::AdvancePlayer { dt } => world.advance_player(dt, out_events),
        Command::WanderAdversary {
            adversary,
            direction,
            dt,
        } => world.wander(adversary, direction, dt, out_events),
        Command::EvaluateRound => world.evaluate(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{
        AdversaryId, Direction, RoundStatus, SpriteFrame, TileCoord, Velocity, WorldPoint,
    };

    use super::{MazeGrid, PelletField, Rules, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the parsed maze.
    #[must_use]
    pub fn maze(world: &World) -> &MazeGrid {
        &world.grid
    }

    /// Provides read-only access to the pellet field.
    #[must_use]
    pub fn pellets(world: &World) -> &PelletField {
        &world.pellets
    }

    /// Current lifecycle status of the round.
    #[must_use]
    pub fn round_status(world: &World) -> RoundStatus {
        world.status
    }

    /// Rules the world resolves commands with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Reports whether an entity at `position` facing `facing` would be blocked.
    #[must_use]
    pub fn wall_ahead(world: &World, position: WorldPoint, facing: Option<Direction>) -> bool {
        super::wall_ahead(&world.grid, position, facing)
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.body.position,
            tile: world.grid.tile_at(player.body.position),
            facing: player.body.facing,
            velocity: player.body.velocity,
            view_facing: player.view_facing,
            movement_phase: player.animation.phase(),
            frame: player.frame(),
        }
    }

    /// Captures a read-only view of the adversaries, ordered by identifier.
    #[must_use]
    pub fn adversary_view(world: &World) -> AdversaryView {
        let mut snapshots: Vec<AdversarySnapshot> = world
            .adversaries
            .iter()
            .map(|adversary| AdversarySnapshot {
                id: adversary.id,
                position: adversary.body.position,
                tile: world.grid.tile_at(adversary.body.position),
                facing: adversary.body.facing,
                velocity: adversary.body.velocity,
                frame: adversary.frame(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        AdversaryView { snapshots }
    }

    /// Immutable representation of the player used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Continuous world position of the sprite centre.
        pub position: WorldPoint,
        /// Tile containing the sprite centre.
        pub tile: TileCoord,
        /// Facing committed by the most recent accepted input.
        pub facing: Option<Direction>,
        /// Persistent velocity integrated every tick.
        pub velocity: Velocity,
        /// Heading the camera looks toward, once known.
        pub view_facing: Option<Direction>,
        /// Ticks counted toward the next sprite frame step.
        pub movement_phase: u32,
        /// Sprite-sheet frame currently displayed.
        pub frame: SpriteFrame,
    }

    /// Read-only snapshot describing all adversaries within the maze.
    #[derive(Clone, Debug, Default)]
    pub struct AdversaryView {
        snapshots: Vec<AdversarySnapshot>,
    }

    impl AdversaryView {
        /// Iterator over the captured snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &AdversarySnapshot> {
            self.snapshots.iter()
        }

        /// Number of adversaries captured.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no adversary was captured.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<AdversarySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single adversary used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct AdversarySnapshot {
        /// Unique identifier assigned to the adversary.
        pub id: AdversaryId,
        /// Continuous world position of the sprite centre.
        pub position: WorldPoint,
        /// Tile containing the sprite centre.
        pub tile: TileCoord,
        /// Direction drawn on the most recent tick.
        pub facing: Option<Direction>,
        /// Velocity of the most recent tick.
        pub velocity: Velocity,
        /// Sprite-sheet frame currently displayed.
        pub frame: SpriteFrame,
    }
}
