//! Wall and entity collision tests on the tile grid.

use maze_chase_core::{Direction, TileCoord, WorldPoint};

use crate::maze::MazeGrid;

/// Half the side of an entity's square footprint, in tiles.
pub const SPRITE_RADIUS: f32 = 0.5;

/// Inset applied to the lateral probe offset and the right board edge.
pub const PROBE_EPSILON: f32 = 0.1;

/// What stopped an entity from advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Obstruction {
    /// A probed corner landed on a wall tile.
    Wall(TileCoord),
    /// The position crossed an edge of the board.
    BoardEdge,
}

/// The two points on the leading edge of the footprint for `facing`.
///
/// Without a facing both probes sit on the centre.
#[must_use]
pub fn probe_points(position: WorldPoint, facing: Option<Direction>) -> [WorldPoint; 2] {
    let (x, y) = (position.x(), position.y());
    let lateral = SPRITE_RADIUS - PROBE_EPSILON;
    match facing {
        Some(Direction::Up) => [
            WorldPoint::new(x + lateral, y + SPRITE_RADIUS),
            WorldPoint::new(x - lateral, y + SPRITE_RADIUS),
        ],
        Some(Direction::Down) => [
            WorldPoint::new(x + lateral, y - SPRITE_RADIUS),
            WorldPoint::new(x - lateral, y - SPRITE_RADIUS),
        ],
        Some(Direction::Left) => [
            WorldPoint::new(x - SPRITE_RADIUS, y + lateral),
            WorldPoint::new(x - SPRITE_RADIUS, y - lateral),
        ],
        Some(Direction::Right) => [
            WorldPoint::new(x + SPRITE_RADIUS, y + lateral),
            WorldPoint::new(x + SPRITE_RADIUS, y - lateral),
        ],
        None => [position, position],
    }
}

/// Explains why an entity at `position` cannot be there, if anything does.
///
/// Wall tiles are checked before the board edge. The edge applies on both
/// axes, so levels with open border rows or columns still contain entities.
#[must_use]
pub fn obstruction(
    grid: &MazeGrid,
    position: WorldPoint,
    facing: Option<Direction>,
) -> Option<Obstruction> {
    for probe in probe_points(position, facing) {
        let tile = grid.tile_at(probe);
        if grid.is_wall(tile) {
            return Some(Obstruction::Wall(tile));
        }
    }

    let right_edge = grid.width() as f32 - SPRITE_RADIUS - PROBE_EPSILON;
    let top_edge = grid.height() as f32 - SPRITE_RADIUS - PROBE_EPSILON;
    let off_board = position.x() < SPRITE_RADIUS
        || position.x() > right_edge
        || position.y() < SPRITE_RADIUS
        || position.y() > top_edge;
    off_board.then_some(Obstruction::BoardEdge)
}

/// Reports whether a wall or the board edge blocks an entity at `position`.
#[must_use]
pub fn wall_ahead(grid: &MazeGrid, position: WorldPoint, facing: Option<Direction>) -> bool {
    obstruction(grid, position, facing).is_some()
}

/// Entities collide when they occupy the same tile.
#[must_use]
pub fn entity_collision(a: TileCoord, b: TileCoord) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    // Row 1 is an open corridor between two walls; the centre tile sits
    // under and over walls.
    const CROSS: &str = "5 3\n1 1 1 1 1\n0 0 2 0 0\n1 1 1 1 1";

    // Floor everywhere, so only the board edge can block.
    const OPEN: &str = "5 3\n0 0 0 0 0\n0 0 2 0 0\n0 0 0 0 0";

    fn grid() -> MazeGrid {
        MazeGrid::parse(CROSS).expect("grid parses")
    }

    #[test]
    fn every_facing_detects_the_wall_it_moves_into() {
        let grid = grid();
        let centre = grid.tile_center(grid.spawn());
        let nudge = 0.05;

        let up = WorldPoint::new(centre.x(), centre.y() + nudge);
        assert_eq!(
            obstruction(&grid, up, Some(Direction::Up)),
            Some(Obstruction::Wall(TileCoord::new(2, 0)))
        );
        let down = WorldPoint::new(centre.x(), centre.y() - nudge);
        assert_eq!(
            obstruction(&grid, down, Some(Direction::Down)),
            Some(Obstruction::Wall(TileCoord::new(2, 2)))
        );

        let walled = MazeGrid::parse("3 1\n1 2 1").expect("grid parses");
        let centre = walled.tile_center(walled.spawn());
        let left = WorldPoint::new(centre.x() - nudge, centre.y());
        assert!(wall_ahead(&walled, left, Some(Direction::Left)));
        let right = WorldPoint::new(centre.x() + nudge, centre.y());
        assert!(wall_ahead(&walled, right, Some(Direction::Right)));
    }

    #[test]
    fn open_corridor_is_clear_both_ways() {
        let grid = grid();
        let centre = grid.tile_center(grid.spawn());
        for direction in [Direction::Left, Direction::Right] {
            let (dx, _) = direction.unit();
            let position = WorldPoint::new(centre.x() + dx * 0.3, centre.y());
            assert!(
                !wall_ahead(&grid, position, Some(direction)),
                "{direction:?} should be open"
            );
        }
    }

    #[test]
    fn board_edge_blocks_horizontal_escape() {
        let grid = grid();
        let left = WorldPoint::new(SPRITE_RADIUS - PROBE_EPSILON, 1.5);
        assert_eq!(
            obstruction(&grid, left, Some(Direction::Left)),
            Some(Obstruction::BoardEdge)
        );
        let right = WorldPoint::new(5.0 - SPRITE_RADIUS - PROBE_EPSILON + 0.01, 1.5);
        assert_eq!(
            obstruction(&grid, right, Some(Direction::Right)),
            Some(Obstruction::BoardEdge)
        );
    }

    #[test]
    fn board_edge_ignores_facing() {
        let grid = grid();
        let beyond = WorldPoint::new(0.2, 1.5);
        for facing in [None, Some(Direction::Right)] {
            assert!(wall_ahead(&grid, beyond, facing));
        }
    }

    #[test]
    fn board_edge_blocks_every_facing_on_both_sides() {
        let grid = MazeGrid::parse(OPEN).expect("grid parses");
        let left = WorldPoint::new(SPRITE_RADIUS - 0.05, 1.5);
        let right = WorldPoint::new(5.0 - SPRITE_RADIUS - PROBE_EPSILON + 0.05, 1.5);
        let facings = [
            None,
            Some(Direction::Up),
            Some(Direction::Down),
            Some(Direction::Left),
            Some(Direction::Right),
        ];
        for position in [left, right] {
            for facing in facings {
                assert_eq!(
                    obstruction(&grid, position, facing),
                    Some(Obstruction::BoardEdge),
                    "{facing:?} at x = {}",
                    position.x()
                );
            }
        }
    }

    #[test]
    fn open_border_rows_still_contain_entities() {
        let grid = MazeGrid::parse(OPEN).expect("grid parses");
        let top = WorldPoint::new(2.5, 3.0 - SPRITE_RADIUS - PROBE_EPSILON + 0.05);
        let bottom = WorldPoint::new(2.5, SPRITE_RADIUS - 0.05);
        assert_eq!(
            obstruction(&grid, top, Some(Direction::Up)),
            Some(Obstruction::BoardEdge)
        );
        assert_eq!(
            obstruction(&grid, bottom, Some(Direction::Down)),
            Some(Obstruction::BoardEdge)
        );
        assert_eq!(obstruction(&grid, WorldPoint::new(2.5, 1.5), Some(Direction::Up)), None);
    }

    #[test]
    fn points_beyond_the_grid_hit_the_board_edge() {
        let grid = MazeGrid::parse(OPEN).expect("grid parses");
        let far_above = WorldPoint::new(2.5, 9.0);
        assert_eq!(
            obstruction(&grid, far_above, Some(Direction::Up)),
            Some(Obstruction::BoardEdge)
        );
    }

    #[test]
    fn lateral_probes_are_inset() {
        let probes = probe_points(WorldPoint::new(1.5, 1.5), Some(Direction::Up));
        assert!((probes[0].x() - 1.9).abs() < 1e-6);
        assert!((probes[1].x() - 1.1).abs() < 1e-6);
        assert_eq!(probes[0].y(), 2.0);
        assert_eq!(probe_points(WorldPoint::new(1.0, 1.0), None)[0], WorldPoint::new(1.0, 1.0));
    }

    #[test]
    fn entities_collide_on_shared_tiles_only() {
        assert!(entity_collision(TileCoord::new(2, 1), TileCoord::new(2, 1)));
        assert!(!entity_collision(TileCoord::new(2, 1), TileCoord::new(1, 2)));
    }
}
