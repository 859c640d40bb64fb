//! Immutable tile layout parsed from a level file.

use std::str::FromStr;

use maze_chase_core::{TileCoord, WorldPoint};
use thiserror::Error;

/// Classification of a single maze tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Walkable floor that carries a pellet at round start.
    Empty,
    /// Impassable wall.
    Wall,
    /// Walkable floor where the player starts. Carries no pellet.
    SpawnMarker,
}

impl TileKind {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(TileKind::Empty),
            "1" => Some(TileKind::Wall),
            "2" => Some(TileKind::SpawnMarker),
            _ => None,
        }
    }
}

/// Reasons a level file can be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The source contained no header line.
    #[error("level is missing its `width height` header")]
    MissingHeader,
    /// The header line could not be read as two positive integers.
    #[error("malformed level header `{line}`")]
    MalformedHeader {
        /// Offending header line.
        line: String,
    },
    /// Width or height was zero.
    #[error("level dimensions must be positive, got {width}x{height}")]
    EmptyDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// A row held a different number of cells than the header declared.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        /// Zero-based row index.
        row: u32,
        /// Declared width.
        expected: u32,
        /// Cells found on the row.
        found: usize,
    },
    /// The file held a different number of rows than the header declared.
    #[error("level has {found} rows, expected {expected}")]
    RowCount {
        /// Declared height.
        expected: u32,
        /// Rows found after the header.
        found: usize,
    },
    /// A cell held something other than 0, 1 or 2.
    #[error("invalid tile `{value}` at column {column}, row {row}")]
    InvalidTile {
        /// Zero-based column index.
        column: u32,
        /// Zero-based row index.
        row: u32,
        /// Raw cell text.
        value: String,
    },
    /// The level did not contain exactly one spawn marker.
    #[error("level must contain exactly one spawn marker, found {found}")]
    SpawnMarkerCount {
        /// Number of spawn markers found.
        found: usize,
    },
}

/// Rectangular tile grid with a single player spawn.
///
/// File rows run top to bottom while world Y runs bottom to top, so tile
/// `(column, row)` occupies the unit square whose lower-left corner is
/// `(column, height - 1 - row)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
    spawn: TileCoord,
}

impl MazeGrid {
    /// Parses a level description.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut lines = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());

        let header = lines.next().ok_or(ParseError::MissingHeader)?;
        let (width, height) = parse_header(header)?;

        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        let mut spawns = Vec::new();
        let mut rows_found = 0_usize;

        for (row_index, line) in lines.enumerate() {
            rows_found += 1;
            let Ok(row) = u32::try_from(row_index) else {
                continue;
            };
            if row >= height {
                continue;
            }

            let cells: Vec<&str> = line.split_whitespace().collect();
            if cells.len() != width as usize {
                return Err(ParseError::RowWidth {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }

            for (column, code) in (0..width).zip(cells) {
                let kind = TileKind::from_code(code).ok_or_else(|| ParseError::InvalidTile {
                    column,
                    row,
                    value: code.to_owned(),
                })?;
                if kind == TileKind::SpawnMarker {
                    spawns.push(TileCoord::new(column, row));
                }
                tiles.push(kind);
            }
        }

        if rows_found != height as usize {
            return Err(ParseError::RowCount {
                expected: height,
                found: rows_found,
            });
        }

        let spawn = match spawns.as_slice() {
            [spawn] => *spawn,
            _ => {
                return Err(ParseError::SpawnMarkerCount {
                    found: spawns.len(),
                })
            }
        };

        Ok(Self {
            width,
            height,
            tiles,
            spawn,
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Tile holding the unique spawn marker.
    #[must_use]
    pub const fn spawn(&self) -> TileCoord {
        self.spawn
    }

    /// Reads the tile classification.
    ///
    /// # Panics
    ///
    /// Panics when the tile lies outside the grid. Callers clamp first.
    #[must_use]
    pub fn tile_kind(&self, tile: TileCoord) -> TileKind {
        match self.get(tile) {
            Some(kind) => kind,
            None => panic!(
                "tile ({}, {}) outside {}x{} maze",
                tile.column(),
                tile.row(),
                self.width,
                self.height
            ),
        }
    }

    /// Reads the tile classification, yielding `None` outside the grid.
    #[must_use]
    pub fn get(&self, tile: TileCoord) -> Option<TileKind> {
        self.index(tile).map(|index| self.tiles[index])
    }

    /// Reports whether the tile is a wall.
    #[must_use]
    pub fn is_wall(&self, tile: TileCoord) -> bool {
        self.get(tile) == Some(TileKind::Wall)
    }

    /// Clamps signed tile indices into the grid.
    #[must_use]
    pub fn clamp(&self, column: i64, row: i64) -> TileCoord {
        let max_column = i64::from(self.width) - 1;
        let max_row = i64::from(self.height) - 1;
        TileCoord::new(
            column.clamp(0, max_column) as u32,
            row.clamp(0, max_row) as u32,
        )
    }

    /// World-space lower-left corner of the tile.
    #[must_use]
    pub fn to_world(&self, tile: TileCoord) -> WorldPoint {
        WorldPoint::new(
            tile.column() as f32,
            (self.height - 1 - tile.row()) as f32,
        )
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord) -> WorldPoint {
        let corner = self.to_world(tile);
        WorldPoint::new(corner.x() + 0.5, corner.y() + 0.5)
    }

    /// Signed tile indices containing the point, without clamping.
    ///
    /// A point on a tile boundary belongs to the tile with the greater world
    /// coordinate.
    #[must_use]
    pub fn world_to_tile(&self, point: WorldPoint) -> (i64, i64) {
        let column = point.x().floor() as i64;
        let row = i64::from(self.height) - 1 - point.y().floor() as i64;
        (column, row)
    }

    /// Tile containing the point, clamped into the grid.
    #[must_use]
    pub fn tile_at(&self, point: WorldPoint) -> TileCoord {
        let (column, row) = self.world_to_tile(point);
        self.clamp(column, row)
    }

    /// Every tile with its classification, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, TileKind)> + '_ {
        let width = self.width;
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (TileCoord::new(index % width, index / width), *kind)
        })
    }

    /// Empty floor tiles in row-major order.
    pub fn empty_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.iter()
            .filter(|(_, kind)| *kind == TileKind::Empty)
            .map(|(tile, _)| tile)
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() >= self.width || tile.row() >= self.height {
            return None;
        }
        Some(tile.row() as usize * self.width as usize + tile.column() as usize)
    }
}

impl FromStr for MazeGrid {
    type Err = ParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

fn parse_header(line: &str) -> Result<(u32, u32), ParseError> {
    let malformed = || ParseError::MalformedHeader {
        line: line.to_owned(),
    };
    let mut fields = line.split_whitespace();
    let width = fields
        .next()
        .and_then(|value| value.parse::<u32>().ok())
        .ok_or_else(malformed)?;
    let height = fields
        .next()
        .and_then(|value| value.parse::<u32>().ok())
        .ok_or_else(malformed)?;
    if fields.next().is_some() {
        return Err(malformed());
    }
    if width == 0 || height == 0 {
        return Err(ParseError::EmptyDimensions { width, height });
    }
    Ok((width, height))
}
