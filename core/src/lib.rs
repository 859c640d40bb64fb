#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable snapshots of
//! the world and answer with [`Command`] values; the world executes those
//! commands via its `apply` entry point and broadcasts [`Event`] values that
//! describe exactly what changed. Nothing in here owns state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places a new adversary at the centre of the provided tile.
    SpawnAdversary {
        /// Tile that must be empty floor for the spawn to succeed.
        tile: TileCoord,
    },
    /// Records the absolute heading the camera currently looks toward.
    SetViewFacing {
        /// Heading derived from the camera forward vector.
        view: Direction,
    },
    /// Commits a facing and matching velocity for the player.
    SteerPlayer {
        /// Absolute direction the player should travel in.
        direction: Direction,
    },
    /// Integrates the player's persistent velocity and resolves pellets and collisions.
    AdvancePlayer {
        /// Simulated time elapsed since the previous frame.
        dt: Duration,
    },
    /// Moves an adversary one tick in the drawn direction, unless a wall blocks it.
    WanderAdversary {
        /// Identifier of the adversary being moved.
        adversary: AdversaryId,
        /// Direction drawn for this tick.
        direction: Direction,
        /// Simulated time elapsed since the previous frame.
        dt: Duration,
    },
    /// Re-evaluates the win and loss conditions of the round.
    EvaluateRound,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that an adversary joined the maze.
    AdversarySpawned {
        /// Identifier assigned to the adversary.
        adversary: AdversaryId,
        /// Tile whose centre the adversary occupies.
        tile: TileCoord,
    },
    /// Reports that a spawn request targeted a tile that is not empty floor.
    AdversarySpawnRejected {
        /// Tile named by the rejected request.
        tile: TileCoord,
    },
    /// Announces that the player's view heading changed.
    ViewFacingChanged {
        /// Heading that became active.
        view: Direction,
    },
    /// Confirms that the player committed to a new facing.
    PlayerSteered {
        /// Facing now held by the player.
        direction: Direction,
    },
    /// Confirms that the player moved during the tick.
    PlayerMoved {
        /// Position before integration.
        from: WorldPoint,
        /// Position after integration.
        to: WorldPoint,
    },
    /// Reports that a wall or the board edge stopped the player this tick.
    PlayerBlocked {
        /// Facing held while blocked.
        facing: Option<Direction>,
    },
    /// Confirms that the player consumed a pellet.
    PelletCollected {
        /// Tile the pellet occupied.
        tile: TileCoord,
        /// Pellets still active after the collection.
        remaining: usize,
    },
    /// Confirms that an adversary moved during the tick.
    AdversaryMoved {
        /// Identifier of the adversary that moved.
        adversary: AdversaryId,
        /// Position before integration.
        from: WorldPoint,
        /// Position after integration.
        to: WorldPoint,
    },
    /// Reports that the drawn direction ran an adversary into a wall.
    AdversaryBlocked {
        /// Identifier of the blocked adversary.
        adversary: AdversaryId,
        /// Direction that was drawn for the tick.
        direction: Direction,
    },
    /// Announces that a sprite advanced to another sheet frame.
    SpriteAnimated {
        /// Sprite whose frame changed.
        sprite: SpriteId,
        /// Frame that should now be displayed.
        frame: SpriteFrame,
    },
    /// Announces that the round reached a terminal status.
    RoundEnded {
        /// Terminal status of the round.
        status: RoundStatus,
    },
}

/// Absolute movement directions on the maze plane.
///
/// `Up` travels toward increasing world Y, which is toward the top row of the
/// level file. `Right` travels toward increasing world X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing world Y.
    Up,
    /// Movement toward decreasing world Y.
    Down,
    /// Movement toward decreasing world X.
    Left,
    /// Movement toward increasing world X.
    Right,
}

impl Direction {
    /// Directions indexed by the value of a uniform draw in `0..4`.
    pub const DRAW_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    /// Unit vector of the direction in world space.
    #[must_use]
    pub const fn unit(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, 1.0),
            Direction::Down => (0.0, -1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Movement keys expressed relative to where the camera looks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalKey {
    /// Move toward the view heading.
    Forward,
    /// Move away from the view heading.
    Backward,
    /// Strafe to the right of the view heading.
    StrafeRight,
    /// Strafe to the left of the view heading.
    StrafeLeft,
}

impl LogicalKey {
    /// Order in which held keys are resolved each tick; later keys win.
    pub const PROCESSING_ORDER: [LogicalKey; 4] = [
        LogicalKey::Forward,
        LogicalKey::Backward,
        LogicalKey::StrafeRight,
        LogicalKey::StrafeLeft,
    ];
}

/// Set of logical keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PressedKeys {
    bits: u8,
}

impl PressedKeys {
    /// Creates an empty key set.
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    /// Returns a copy of the set with the provided key held.
    #[must_use]
    pub const fn with(self, key: LogicalKey) -> Self {
        Self {
            bits: self.bits | Self::mask(key),
        }
    }

    /// Marks the key as held or released.
    pub fn set(&mut self, key: LogicalKey, held: bool) {
        if held {
            self.bits |= Self::mask(key);
        } else {
            self.bits &= !Self::mask(key);
        }
    }

    /// Reports whether the key is held.
    #[must_use]
    pub const fn is_pressed(&self, key: LogicalKey) -> bool {
        self.bits & Self::mask(key) != 0
    }

    /// Reports whether no key is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Held keys in [`LogicalKey::PROCESSING_ORDER`].
    pub fn iter(&self) -> impl Iterator<Item = LogicalKey> + '_ {
        LogicalKey::PROCESSING_ORDER
            .into_iter()
            .filter(move |key| self.is_pressed(*key))
    }

    const fn mask(key: LogicalKey) -> u8 {
        match key {
            LogicalKey::Forward => 1,
            LogicalKey::Backward => 1 << 1,
            LogicalKey::StrafeRight => 1 << 2,
            LogicalKey::StrafeLeft => 1 << 3,
        }
    }
}

impl FromIterator<LogicalKey> for PressedKeys {
    fn from_iter<I: IntoIterator<Item = LogicalKey>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), PressedKeys::with)
    }
}

/// Location of a single maze tile expressed as column and row.
///
/// Row zero is the first row of the level file, which is the top of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Continuous position on the maze plane measured in tile units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Point reached by travelling along `velocity` for `dt`.
    #[must_use]
    pub fn advanced(self, velocity: Velocity, dt: Duration) -> Self {
        let seconds = dt.as_secs_f32();
        Self::new(
            self.x + velocity.dx() * seconds,
            self.y + velocity.dy() * seconds,
        )
    }
}

/// Velocity on the maze plane measured in tiles per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    dx: f32,
    dy: f32,
}

impl Velocity {
    /// Velocity of a stationary entity.
    pub const ZERO: Velocity = Velocity { dx: 0.0, dy: 0.0 };

    /// Velocity of the given magnitude along the direction.
    #[must_use]
    pub fn toward(direction: Direction, speed: f32) -> Self {
        let (x, y) = direction.unit();
        Self {
            dx: x * speed,
            dy: y * speed,
        }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }

    /// Reports whether the velocity is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Unique identifier assigned to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId(u32);

impl AdversaryId {
    /// Creates a new adversary identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifies which sprite an animation event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    /// The player sprite.
    Player,
    /// An adversary sprite.
    Adversary(AdversaryId),
}

/// Cell of the sprite sheet to display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteFrame {
    column: u32,
    row: u32,
}

impl SpriteFrame {
    /// Creates a sprite frame from sheet column and row.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Sheet column, counted from the left.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Sheet row, counted from the top.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Lifecycle of a single round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStatus {
    /// The round is still being played.
    #[default]
    Running,
    /// Every pellet was collected.
    Won,
    /// An adversary caught the player.
    Lost,
}

impl RoundStatus {
    /// Reports whether the round reached a terminal status.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        !matches!(self, RoundStatus::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AdversaryId, Direction, LogicalKey, PressedKeys, RoundStatus, SpriteFrame, TileCoord,
        Velocity, WorldPoint,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn draw_order_covers_every_direction_once() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let hits = Direction::DRAW_ORDER
                .iter()
                .filter(|candidate| **candidate == direction)
                .count();
            assert_eq!(hits, 1, "{direction:?} must appear exactly once");
        }
    }

    #[test]
    fn opposite_directions_cancel() {
        for direction in Direction::DRAW_ORDER {
            let (x, y) = direction.unit();
            let (ox, oy) = direction.opposite().unit();
            assert_eq!((x + ox, y + oy), (0.0, 0.0));
        }
    }

    #[test]
    fn pressed_keys_iterate_in_processing_order() {
        let keys: PressedKeys = [LogicalKey::StrafeLeft, LogicalKey::Forward]
            .into_iter()
            .collect();
        let order: Vec<LogicalKey> = keys.iter().collect();
        assert_eq!(order, vec![LogicalKey::Forward, LogicalKey::StrafeLeft]);
    }

    #[test]
    fn releasing_a_key_clears_it() {
        let mut keys = PressedKeys::none().with(LogicalKey::Backward);
        keys.set(LogicalKey::Backward, false);
        assert!(keys.is_empty());
    }

    #[test]
    fn points_advance_along_velocity() {
        let start = WorldPoint::new(1.5, 1.5);
        let velocity = Velocity::toward(Direction::Right, 5.0);
        let end = start.advanced(velocity, Duration::from_millis(100));
        assert!((end.x() - 2.0).abs() < 1e-6);
        assert_eq!(end.y(), 1.5);
    }

    #[test]
    fn only_running_is_live() {
        assert!(!RoundStatus::Running.is_done());
        assert!(RoundStatus::Won.is_done());
        assert!(RoundStatus::Lost.is_done());
    }

    #[test]
    fn value_types_round_trip_through_bincode() {
        assert_round_trip(&TileCoord::new(3, 7));
        assert_round_trip(&AdversaryId::new(2));
        assert_round_trip(&SpriteFrame::new(3, 1));
        assert_round_trip(&RoundStatus::Lost);
    }
}
