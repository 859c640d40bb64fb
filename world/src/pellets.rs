//! Pellet lifecycle derived from the maze layout.

use maze_chase_core::TileCoord;

use crate::maze::{MazeGrid, TileKind};

/// One collectible pellet per empty floor tile.
///
/// `remaining` always equals the number of active pellets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PelletField {
    width: u32,
    height: u32,
    active: Vec<bool>,
    remaining: usize,
}

impl PelletField {
    /// Places a pellet on every empty tile of the grid.
    #[must_use]
    pub fn from_grid(grid: &MazeGrid) -> Self {
        let active: Vec<bool> = grid
            .iter()
            .map(|(_, kind)| kind == TileKind::Empty)
            .collect();
        let remaining = active.iter().filter(|active| **active).count();
        Self {
            width: grid.width(),
            height: grid.height(),
            active,
            remaining,
        }
    }

    /// Reports whether an uncollected pellet sits on the tile.
    ///
    /// Walls, the spawn tile and tiles outside the grid never hold a pellet.
    #[must_use]
    pub fn is_active(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .map(|index| self.active[index])
            .unwrap_or(false)
    }

    /// Collects the pellet on the tile, returning whether one was there.
    pub fn collect(&mut self, tile: TileCoord) -> bool {
        let Some(index) = self.index(tile) else {
            return false;
        };
        if !self.active[index] {
            return false;
        }
        self.active[index] = false;
        self.remaining -= 1;
        true
    }

    /// Number of pellets still active.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Reports whether every pellet has been collected.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.remaining == 0
    }

    /// Tiles that still hold a pellet, in row-major order.
    pub fn active_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let width = self.width;
        self.active
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .map(move |(index, _)| {
                let index = index as u32;
                TileCoord::new(index % width, index / width)
            })
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() >= self.width || tile.row() >= self.height {
            return None;
        }
        Some(tile.row() as usize * self.width as usize + tile.column() as usize)
    }
}
