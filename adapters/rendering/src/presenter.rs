//! Per-frame hand-off of the round to a render collaborator.

use glam::Vec2;
use maze_chase_core::SpriteFrame;
use maze_chase_system_round::Round;
use maze_chase_world::query;
use tracing::warn;

use crate::{
    geometry::{pellet_mesh, sprite_quad, wall_mesh},
    Color, GeometryHandle, Mesh, RenderCollaborator,
};

const PLAYER_TINT: Color = Color::from_rgb_u8(0xff, 0xd7, 0x00);
const ADVERSARY_TINT: Color = Color::from_rgb_u8(0xe5, 0x39, 0x35);

/// Uploaded geometry keyed by the state it was built from.
#[derive(Debug)]
enum Slot<K> {
    Vacant,
    Ready {
        key: K,
        handle: GeometryHandle,
        primitives: usize,
    },
    Failed {
        key: K,
    },
}

impl<K> Default for Slot<K> {
    fn default() -> Self {
        Slot::Vacant
    }
}

impl<K: Copy + PartialEq + std::fmt::Debug> Slot<K> {
    /// Returns drawable geometry for `key`, rebuilding it when the key changed.
    fn refresh<F>(
        &mut self,
        renderer: &mut dyn RenderCollaborator,
        key: K,
        label: &'static str,
        build: F,
    ) -> Option<(GeometryHandle, usize)>
    where
        F: FnOnce() -> Mesh,
    {
        match self {
            Slot::Ready {
                key: current,
                handle,
                primitives,
            } if *current == key => return Some((*handle, *primitives)),
            Slot::Failed { key: current } if *current == key => return None,
            Slot::Ready { handle, .. } => renderer.release_geometry(*handle),
            Slot::Failed { .. } | Slot::Vacant => {}
        }

        let mesh = build();
        match renderer.upload_geometry(&mesh) {
            Ok(handle) => {
                let primitives = mesh.primitive_count();
                *self = Slot::Ready {
                    key,
                    handle,
                    primitives,
                };
                Some((handle, primitives))
            }
            Err(error) => {
                warn!(geometry = label, ?key, error = %error, "geometry_upload_failed");
                *self = Slot::Failed { key };
                None
            }
        }
    }
}

/// Draws a round through a render collaborator, one call set per entity.
///
/// Static walls are uploaded once. Pellets are rebuilt when the remaining
/// count changes and sprites when their animation frame changes. Upload or
/// draw failures are logged and the rest of the frame still renders.
#[derive(Debug, Default)]
pub struct FramePresenter {
    walls: Slot<()>,
    pellets: Slot<usize>,
    player: Slot<SpriteFrame>,
    adversaries: Vec<Slot<SpriteFrame>>,
}

impl FramePresenter {
    /// Creates a presenter that has not uploaded anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the round's current state to the collaborator.
    pub fn present(&mut self, renderer: &mut dyn RenderCollaborator, round: &Round, aspect: f32) {
        let world = round.world();
        let camera = round.camera();
        let player = query::player(world);

        renderer.set_camera_matrices(
            camera.view_matrix(player.position),
            camera.projection_matrix(aspect),
        );
        // Sprites are upright quads turned to face the camera.
        let facing_camera = (90.0 - camera.yaw_degrees()).to_radians();

        let grid = query::maze(world);
        let walls = self
            .walls
            .refresh(renderer, (), "walls", || wall_mesh(grid));
        draw(renderer, walls, Vec2::ZERO, 0.0);

        let pellets = query::pellets(world);
        let pellet_geometry = self.pellets.refresh(
            renderer,
            pellets.remaining(),
            "pellets",
            || pellet_mesh(grid, pellets),
        );
        draw(renderer, pellet_geometry, Vec2::ZERO, 0.0);

        let player_geometry = self.player.refresh(renderer, player.frame, "player", || {
            sprite_quad(player.frame, PLAYER_TINT)
        });
        draw(
            renderer,
            player_geometry,
            Vec2::new(player.position.x(), player.position.y()),
            facing_camera,
        );

        let adversaries = query::adversary_view(world);
        if self.adversaries.len() < adversaries.len() {
            self.adversaries
                .resize_with(adversaries.len(), Slot::default);
        }
        for (slot, adversary) in self.adversaries.iter_mut().zip(adversaries.iter()) {
            let geometry = slot.refresh(renderer, adversary.frame, "adversary", || {
                sprite_quad(adversary.frame, ADVERSARY_TINT)
            });
            draw(
                renderer,
                geometry,
                Vec2::new(adversary.position.x(), adversary.position.y()),
                facing_camera,
            );
        }
    }
}

fn draw(
    renderer: &mut dyn RenderCollaborator,
    geometry: Option<(GeometryHandle, usize)>,
    offset: Vec2,
    rotation: f32,
) {
    let Some((handle, primitives)) = geometry else {
        return;
    };
    renderer.set_entity_transform(handle, offset, rotation);
    if let Err(error) = renderer.bind_and_draw(handle, primitives) {
        warn!(handle = handle.get(), error = %error, "draw_failed");
    }
}
