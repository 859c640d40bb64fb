//! Mesh builders for the maze, its pellets and the sprites.

use glam::{Vec2, Vec3};
use maze_chase_core::{SpriteFrame, TileCoord};
use maze_chase_world::{MazeGrid, PelletField, TileKind};

use crate::{Color, Mesh, Primitive, Vertex};

/// Height of the wall faces above the floor.
pub const WALL_HEIGHT: f32 = 2.5;

/// Height pellets float at above the floor.
pub const PELLET_HEIGHT: f32 = 0.5;

/// Columns on the sprite sheet.
pub const SHEET_COLUMNS: u32 = 6;

/// Rows on the sprite sheet.
pub const SHEET_ROWS: u32 = 4;

const WALL_COLOR: Color = Color::from_rgb_u8(0x21, 0x21, 0xde);
const PELLET_COLOR: Color = Color::from_rgb_u8(0xff, 0xe0, 0x5a);

/// Vertical faces of every wall tile that borders walkable floor.
///
/// Faces shared by two walls, or facing off the board, are never visible and
/// are skipped.
#[must_use]
pub fn wall_mesh(grid: &MazeGrid) -> Mesh {
    let mut mesh = Mesh {
        primitive: Primitive::Triangles,
        vertices: Vec::new(),
        indices: Vec::new(),
    };

    for (tile, _) in grid.iter().filter(|(tile, _)| grid.is_wall(*tile)) {
        let corner = grid.to_world(tile);
        let (x0, y0) = (corner.x(), corner.y());
        let (x1, y1) = (x0 + 1.0, y0 + 1.0);
        let column = i64::from(tile.column());
        let row = i64::from(tile.row());

        // Rows grow downward in the file, so the face at y1 looks at row - 1.
        let faces = [
            (column, row - 1, Vec2::new(x0, y1), Vec2::new(x1, y1)),
            (column, row + 1, Vec2::new(x1, y0), Vec2::new(x0, y0)),
            (column - 1, row, Vec2::new(x0, y0), Vec2::new(x0, y1)),
            (column + 1, row, Vec2::new(x1, y1), Vec2::new(x1, y0)),
        ];
        for (neighbour_column, neighbour_row, start, end) in faces {
            if opens_onto_floor(grid, neighbour_column, neighbour_row) {
                push_wall_face(&mut mesh, start, end);
            }
        }
    }
    mesh
}

/// One point per active pellet, floating over its tile centre.
#[must_use]
pub fn pellet_mesh(grid: &MazeGrid, pellets: &PelletField) -> Mesh {
    let vertices: Vec<Vertex> = pellets
        .active_tiles()
        .map(|tile| {
            let centre = grid.tile_center(tile);
            Vertex {
                position: Vec3::new(centre.x(), centre.y(), PELLET_HEIGHT),
                uv: Vec2::ZERO,
                color: PELLET_COLOR,
            }
        })
        .collect();
    let indices = (0..vertices.len() as u32).collect();
    Mesh {
        primitive: Primitive::Points,
        vertices,
        indices,
    }
}

/// Upright unit quad centred on the origin showing one sprite-sheet frame.
///
/// The quad spans X in `-0.5..0.5` and Z in `0..1`, facing -Y before any
/// rotation is applied.
#[must_use]
pub fn sprite_quad(frame: SpriteFrame, tint: Color) -> Mesh {
    let u0 = frame.column() as f32 / SHEET_COLUMNS as f32;
    let u1 = (frame.column() + 1) as f32 / SHEET_COLUMNS as f32;
    let v0 = frame.row() as f32 / SHEET_ROWS as f32;
    let v1 = (frame.row() + 1) as f32 / SHEET_ROWS as f32;

    let corner = |x: f32, z: f32, u: f32, v: f32| Vertex {
        position: Vec3::new(x, 0.0, z),
        uv: Vec2::new(u, v),
        color: tint,
    };
    Mesh {
        primitive: Primitive::Triangles,
        vertices: vec![
            corner(-0.5, 0.0, u0, v1),
            corner(0.5, 0.0, u1, v1),
            corner(0.5, 1.0, u1, v0),
            corner(-0.5, 1.0, u0, v0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

fn opens_onto_floor(grid: &MazeGrid, column: i64, row: i64) -> bool {
    let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
        return false;
    };
    matches!(
        grid.get(TileCoord::new(column, row)),
        Some(kind) if kind != TileKind::Wall
    )
}

fn push_wall_face(mesh: &mut Mesh, start: Vec2, end: Vec2) {
    let base = mesh.vertices.len() as u32;
    let corners = [
        (start, 0.0, Vec2::new(0.0, 1.0)),
        (end, 0.0, Vec2::new(1.0, 1.0)),
        (end, WALL_HEIGHT, Vec2::new(1.0, 0.0)),
        (start, WALL_HEIGHT, Vec2::new(0.0, 0.0)),
    ];
    for (point, height, uv) in corners {
        mesh.vertices.push(Vertex {
            position: point.extend(height),
            uv,
            color: WALL_COLOR,
        });
    }
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_faces_bordering_floor_are_built() {
        let grid = MazeGrid::parse("3 3\n1 1 1\n1 2 0\n1 1 1").expect("grid parses");
        let mesh = wall_mesh(&grid);
        // Spawn sees three walls, the pellet tile two.
        assert_eq!(mesh.vertices.len(), 5 * 4);
        assert_eq!(mesh.primitive_count(), 5 * 2);
        assert!(mesh
            .vertices
            .iter()
            .all(|vertex| vertex.position.z == 0.0 || vertex.position.z == WALL_HEIGHT));
    }

    #[test]
    fn pellets_float_over_tile_centres() {
        let grid = MazeGrid::parse("3 3\n1 1 1\n1 2 0\n1 1 1").expect("grid parses");
        let mut pellets = PelletField::from_grid(&grid);
        let mesh = pellet_mesh(&grid, &pellets);
        assert_eq!(mesh.primitive, Primitive::Points);
        assert_eq!(mesh.vertices.len(), 1);
        assert_eq!(mesh.vertices[0].position, Vec3::new(2.5, 1.5, PELLET_HEIGHT));

        let _ = pellets.collect(TileCoord::new(2, 1));
        assert!(pellet_mesh(&grid, &pellets).is_empty());
    }

    #[test]
    fn sprite_quad_samples_one_sheet_cell() {
        let mesh = sprite_quad(SpriteFrame::new(3, 1), Color::from_rgb_u8(255, 0, 0));
        let us: Vec<f32> = mesh.vertices.iter().map(|vertex| vertex.uv.x).collect();
        let vs: Vec<f32> = mesh.vertices.iter().map(|vertex| vertex.uv.y).collect();
        assert_eq!(us, vec![0.5, 4.0 / 6.0, 4.0 / 6.0, 0.5]);
        assert_eq!(vs, vec![0.5, 0.5, 0.25, 0.25]);
    }
}
