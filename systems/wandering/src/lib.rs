#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded random walk for adversaries.
//!
//! Every adversary draws a fresh direction each tick from a generator seeded
//! with the tick's seed plus the adversary's identifier. The draw does not
//! depend on any earlier tick, so a run replays exactly from its seed
//! sequence and frame times.

use std::time::Duration;

use maze_chase_core::{Command, Direction, TileCoord};
use maze_chase_world::query::AdversaryView;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Configuration parameters required to construct the wandering system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_seed: u64,
}

impl Config {
    /// Creates a configuration that places adversaries from `spawn_seed`.
    #[must_use]
    pub const fn new(spawn_seed: u64) -> Self {
        Self { spawn_seed }
    }
}

/// Pure system that places adversaries and draws their directions.
#[derive(Debug)]
pub struct Wandering {
    spawn_seed: u64,
}

impl Wandering {
    /// Creates a new wandering system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_seed: config.spawn_seed,
        }
    }

    /// Emits one spawn command per adversary on uniformly sampled candidates.
    ///
    /// Adversary `i` samples with a generator seeded from `spawn_seed + i`.
    /// Nothing is emitted when there are no candidate tiles.
    pub fn spawn(&self, count: usize, candidates: &[TileCoord], out: &mut Vec<Command>) {
        if candidates.is_empty() {
            debug!(count, "no_adversary_spawn_tiles");
            return;
        }

        for index in 0..count {
            let mut rng = seeded(self.spawn_seed, index as u64);
            if let Some(tile) = candidates.choose(&mut rng) {
                out.push(Command::SpawnAdversary { tile: *tile });
            }
        }
    }

    /// Emits one wander command per adversary for the tick.
    pub fn handle(
        &mut self,
        seed: u64,
        adversaries: &AdversaryView,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        for adversary in adversaries.iter() {
            out.push(Command::WanderAdversary {
                adversary: adversary.id,
                direction: draw_direction(seed, u64::from(adversary.id.get())),
                dt,
            });
        }
    }
}

/// Direction drawn for the adversary at `index` on a tick seeded with `seed`.
#[must_use]
pub fn draw_direction(seed: u64, index: u64) -> Direction {
    let mut rng = seeded(seed, index);
    Direction::DRAW_ORDER[rng.gen_range(0..Direction::DRAW_ORDER.len())]
}

fn seeded(seed: u64, index: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(index))
}
