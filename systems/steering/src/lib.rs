#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Camera-relative player steering.
//!
//! Held keys are expressed relative to where the camera looks. Each key is
//! remapped to an absolute direction through [`INPUT_REMAP`], probed one tick
//! ahead, and committed only when the way is clear. Keys resolve in
//! [`LogicalKey::PROCESSING_ORDER`], so the last unblocked key wins.

use std::time::Duration;

use maze_chase_core::{Command, Direction, LogicalKey, PressedKeys, Velocity, WorldPoint};
use maze_chase_world::query::PlayerSnapshot;
use tracing::trace;

/// Absolute direction for every view heading and logical key.
///
/// Rows are indexed by view heading (up, down, left, right) and columns by
/// key (forward, backward, strafe right, strafe left).
pub const INPUT_REMAP: [[Direction; 4]; 4] = [
    [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ],
    [
        Direction::Down,
        Direction::Up,
        Direction::Left,
        Direction::Right,
    ],
    [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ],
    [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ],
];

/// Absolute direction a key moves the player in while looking toward `view`.
#[must_use]
pub const fn remap(view: Direction, key: LogicalKey) -> Direction {
    let row = match view {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    };
    let column = match key {
        LogicalKey::Forward => 0,
        LogicalKey::Backward => 1,
        LogicalKey::StrafeRight => 2,
        LogicalKey::StrafeLeft => 3,
    };
    INPUT_REMAP[row][column]
}

/// Pure system that turns held keys into player steering commands.
#[derive(Debug, Default)]
pub struct Steering;

impl Steering {
    /// Emits one [`Command::SteerPlayer`] per held key whose direction is clear.
    ///
    /// `is_blocked` answers whether an entity at a position, facing a
    /// direction, would hit a wall or the board edge. Nothing is emitted
    /// before the camera has produced a view heading.
    pub fn handle<F>(
        &mut self,
        pressed: PressedKeys,
        player: &PlayerSnapshot,
        speed: f32,
        dt: Duration,
        is_blocked: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(WorldPoint, Direction) -> bool,
    {
        let Some(view) = player.view_facing else {
            return;
        };

        for key in pressed.iter() {
            let direction = remap(view, key);
            let candidate = player
                .position
                .advanced(Velocity::toward(direction, speed), dt);
            if is_blocked(candidate, direction) {
                trace!(?key, ?direction, "steering_blocked");
                continue;
            }
            out.push(Command::SteerPlayer { direction });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[test]
    fn forward_follows_the_view_and_backward_reverses_it() {
        for view in VIEWS {
            assert_eq!(remap(view, LogicalKey::Forward), view);
            assert_eq!(remap(view, LogicalKey::Backward), view.opposite());
        }
    }

    #[test]
    fn strafes_are_opposite_each_other() {
        for view in VIEWS {
            let right = remap(view, LogicalKey::StrafeRight);
            assert_eq!(remap(view, LogicalKey::StrafeLeft), right.opposite());
            assert_ne!(right, view);
            assert_ne!(right, view.opposite());
        }
    }

    #[test]
    fn each_view_row_is_a_permutation() {
        for row in INPUT_REMAP {
            for direction in VIEWS {
                assert_eq!(row.iter().filter(|entry| **entry == direction).count(), 1);
            }
        }
    }

    #[test]
    fn looking_down_mirrors_strafes() {
        assert_eq!(remap(Direction::Down, LogicalKey::StrafeRight), Direction::Left);
        assert_eq!(remap(Direction::Right, LogicalKey::StrafeRight), Direction::Down);
    }
}
