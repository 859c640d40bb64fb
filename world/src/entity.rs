//! Moving sprites and their animation counters.

use maze_chase_core::{AdversaryId, Direction, SpriteFrame, Velocity, WorldPoint};

/// Sheet column adversaries are drawn from.
pub(crate) const ADVERSARY_SHEET_COLUMN: u32 = 4;

const LAST_WALK_COLUMN: u32 = 3;

/// State shared by every sprite that moves through the maze.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MobileEntity {
    pub(crate) position: WorldPoint,
    pub(crate) facing: Option<Direction>,
    pub(crate) velocity: Velocity,
}

impl MobileEntity {
    pub(crate) fn at_rest(position: WorldPoint) -> Self {
        Self {
            position,
            facing: None,
            velocity: Velocity::ZERO,
        }
    }

    pub(crate) fn steer(&mut self, direction: Direction, speed: f32) {
        self.facing = Some(direction);
        self.velocity = Velocity::toward(direction, speed);
    }
}

/// Tick-gated sprite-sheet stepping.
///
/// The counter fires when it reaches the cadence, resets, then counts the
/// current tick, so the first step lands on tick `cadence + 1` and every
/// `cadence` ticks after that. The walk column ping-pongs over `0..=3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SpriteAnimation {
    ticks: u32,
    cadence: u32,
    column: u32,
    ascending: bool,
}

impl SpriteAnimation {
    pub(crate) fn new(cadence: u32) -> Self {
        Self {
            ticks: 0,
            cadence,
            column: 0,
            ascending: true,
        }
    }

    /// Counts one tick, returning `true` when the frame stepped.
    pub(crate) fn tick(&mut self) -> bool {
        let stepped = self.ticks >= self.cadence;
        if stepped {
            self.step();
            self.ticks = 0;
        }
        self.ticks += 1;
        stepped
    }

    pub(crate) fn phase(&self) -> u32 {
        self.ticks
    }

    pub(crate) fn column(&self) -> u32 {
        self.column
    }

    fn step(&mut self) {
        if self.ascending {
            self.column += 1;
        } else {
            self.column = self.column.saturating_sub(1);
        }
        if self.column >= LAST_WALK_COLUMN {
            self.ascending = false;
        } else if self.column == 0 {
            self.ascending = true;
        }
    }
}

/// Sheet row for a facing. Rows are ordered down, up, left, right.
pub(crate) fn sheet_row(facing: Option<Direction>) -> u32 {
    match facing {
        Some(Direction::Down) | None => 0,
        Some(Direction::Up) => 1,
        Some(Direction::Left) => 2,
        Some(Direction::Right) => 3,
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) body: MobileEntity,
    pub(crate) view_facing: Option<Direction>,
    pub(crate) animation: SpriteAnimation,
}

impl Player {
    pub(crate) fn spawn(position: WorldPoint, cadence: u32) -> Self {
        Self {
            body: MobileEntity::at_rest(position),
            view_facing: None,
            animation: SpriteAnimation::new(cadence),
        }
    }

    pub(crate) fn frame(&self) -> SpriteFrame {
        SpriteFrame::new(self.animation.column(), sheet_row(self.body.facing))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Adversary {
    pub(crate) id: AdversaryId,
    pub(crate) body: MobileEntity,
    pub(crate) animation: SpriteAnimation,
}

impl Adversary {
    pub(crate) fn spawn(id: AdversaryId, position: WorldPoint, cadence: u32) -> Self {
        Self {
            id,
            body: MobileEntity::at_rest(position),
            animation: SpriteAnimation::new(cadence),
        }
    }

    pub(crate) fn frame(&self) -> SpriteFrame {
        SpriteFrame::new(ADVERSARY_SHEET_COLUMN, sheet_row(self.body.facing))
    }
}
