//! Mesh storage and drawing on top of macroquad's immediate 3D API.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec2, Vec3};
use macroquad::{
    camera::{set_camera, Camera3D},
    math::{Vec2 as MacroquadVec2, Vec3 as MacroquadVec3},
    models::{self, Mesh as MacroquadMesh, Vertex as MacroquadVertex},
};
use maze_chase_rendering::{
    GeometryHandle, Mesh, Primitive, RenderCollaborator, RenderError, Vertex,
};
use tracing::debug;

use crate::to_macroquad_color;

/// Half the edge of the quad a point primitive expands into.
pub(crate) const POINT_HALF_EXTENT: f32 = 0.08;

/// Geometry converted to the layout macroquad draws.
#[derive(Clone, Debug, PartialEq)]
struct Prepared {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    indices_per_primitive: usize,
}

/// Bookkeeping half of the renderer; owns every uploaded mesh.
#[derive(Debug, Default)]
pub(crate) struct MeshStore {
    meshes: HashMap<GeometryHandle, Prepared>,
    transforms: HashMap<GeometryHandle, (Vec2, f32)>,
    next_handle: u32,
}

impl MeshStore {
    pub(crate) fn upload(&mut self, mesh: &Mesh) -> Result<GeometryHandle, RenderError> {
        let prepared = prepare(mesh)?;
        let handle = GeometryHandle::new(self.next_handle);
        self.next_handle = self
            .next_handle
            .checked_add(1)
            .ok_or_else(|| RenderError::UploadFailed {
                reason: "geometry handles exhausted".to_string(),
            })?;
        let _ = self.meshes.insert(handle, prepared);
        Ok(handle)
    }

    pub(crate) fn set_transform(&mut self, handle: GeometryHandle, offset: Vec2, rotation: f32) {
        let _ = self.transforms.insert(handle, (offset, rotation));
    }

    pub(crate) fn release(&mut self, handle: GeometryHandle) {
        let _ = self.meshes.remove(&handle);
        let _ = self.transforms.remove(&handle);
    }

    /// Builds the placed mesh for `handle`, limited to `primitive_count`.
    pub(crate) fn placed(
        &self,
        handle: GeometryHandle,
        primitive_count: usize,
    ) -> Result<MacroquadMesh, RenderError> {
        let prepared = self
            .meshes
            .get(&handle)
            .ok_or(RenderError::UnknownHandle { handle })?;
        let (offset, rotation) = self
            .transforms
            .get(&handle)
            .copied()
            .unwrap_or((Vec2::ZERO, 0.0));
        let placement = Mat4::from_rotation_translation(
            Quat::from_rotation_z(rotation),
            offset.extend(0.0),
        );

        let limit = primitive_count
            .saturating_mul(prepared.indices_per_primitive)
            .min(prepared.indices.len());
        Ok(MacroquadMesh {
            vertices: prepared
                .vertices
                .iter()
                .map(|vertex| {
                    let position = placement.transform_point3(vertex.position);
                    MacroquadVertex {
                        position: MacroquadVec3::new(position.x, position.y, position.z),
                        uv: MacroquadVec2::new(vertex.uv.x, vertex.uv.y),
                        color: to_macroquad_color(vertex.color),
                    }
                })
                .collect(),
            indices: prepared.indices[..limit].to_vec(),
            texture: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.meshes.len()
    }
}

fn prepare(mesh: &Mesh) -> Result<Prepared, RenderError> {
    let (vertices, indices, indices_per_primitive) = match mesh.primitive {
        Primitive::Triangles => (mesh.vertices.clone(), mesh.indices.clone(), 3),
        Primitive::Points => expand_points(mesh),
    };
    let overflow = || RenderError::IndexOverflow {
        vertices: vertices.len(),
    };
    if vertices.len() > usize::from(u16::MAX) + 1 {
        return Err(overflow());
    }
    let indices = indices
        .into_iter()
        .map(|index| u16::try_from(index).map_err(|_| overflow()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Prepared {
        vertices,
        indices,
        indices_per_primitive,
    })
}

/// Points become small upright squares so they stay visible without a point pipeline.
fn expand_points(mesh: &Mesh) -> (Vec<Vertex>, Vec<u32>, usize) {
    let mut vertices = Vec::with_capacity(mesh.indices.len() * 4);
    let mut indices = Vec::with_capacity(mesh.indices.len() * 6);
    for point in mesh
        .indices
        .iter()
        .filter_map(|index| mesh.vertices.get(*index as usize))
    {
        let base = vertices.len() as u32;
        for (dx, dz) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            vertices.push(Vertex {
                position: point.position
                    + Vec3::new(dx * POINT_HALF_EXTENT, 0.0, dz * POINT_HALF_EXTENT),
                ..*point
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices, 6)
}

/// Camera parameters recovered from a view and a GL perspective matrix.
pub(crate) fn camera_from_matrices(view: Mat4, projection: Mat4) -> Camera3D {
    let world_from_view = view.inverse();
    let position = world_from_view.transform_point3(Vec3::ZERO);
    let forward = world_from_view.transform_vector3(Vec3::NEG_Z);
    let up = world_from_view.transform_vector3(Vec3::Y);
    let target = position + forward;

    let focal = projection.y_axis.y;
    let fovy = 2.0 * (1.0 / focal).atan();
    let aspect = focal / projection.x_axis.x;

    Camera3D {
        position: MacroquadVec3::new(position.x, position.y, position.z),
        target: MacroquadVec3::new(target.x, target.y, target.z),
        up: MacroquadVec3::new(up.x, up.y, up.z),
        fovy,
        aspect: Some(aspect),
        ..Camera3D::default()
    }
}

/// Render collaborator that draws through macroquad. Needs a live window.
#[derive(Debug, Default)]
pub(crate) struct MacroquadRenderer {
    store: MeshStore,
}

impl RenderCollaborator for MacroquadRenderer {
    fn upload_geometry(&mut self, mesh: &Mesh) -> Result<GeometryHandle, RenderError> {
        let handle = self.store.upload(mesh)?;
        debug!(
            handle = handle.get(),
            vertices = mesh.vertices.len(),
            "geometry_uploaded"
        );
        Ok(handle)
    }

    fn bind_and_draw(
        &mut self,
        handle: GeometryHandle,
        primitive_count: usize,
    ) -> Result<(), RenderError> {
        let mesh = self.store.placed(handle, primitive_count)?;
        if !mesh.indices.is_empty() {
            models::draw_mesh(&mesh);
        }
        Ok(())
    }

    fn set_entity_transform(&mut self, handle: GeometryHandle, offset: Vec2, rotation: f32) {
        self.store.set_transform(handle, offset, rotation);
    }

    fn set_camera_matrices(&mut self, view: Mat4, projection: Mat4) {
        set_camera(&camera_from_matrices(view, projection));
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        self.store.release(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_rendering::{sprite_quad, Color};
    use std::f32::consts::FRAC_PI_2;

    fn point_cloud(count: u32) -> Mesh {
        Mesh {
            primitive: Primitive::Points,
            vertices: (0..count)
                .map(|index| Vertex {
                    position: Vec3::new(index as f32, 0.0, 0.5),
                    uv: Vec2::ZERO,
                    color: Color::from_rgb_u8(255, 255, 255),
                })
                .collect(),
            indices: (0..count).collect(),
        }
    }

    #[test]
    fn points_expand_into_quads() {
        let mut store = MeshStore::default();
        let handle = store.upload(&point_cloud(3)).expect("uploads");
        let placed = store.placed(handle, 3).expect("placed");
        assert_eq!(placed.vertices.len(), 12);
        assert_eq!(placed.indices.len(), 18);

        let partial = store.placed(handle, 1).expect("placed");
        assert_eq!(partial.indices.len(), 6);
    }

    #[test]
    fn oversized_meshes_are_rejected() {
        let mut store = MeshStore::default();
        let error = store
            .upload(&point_cloud(20_000))
            .expect_err("80k vertices overflow u16 indices");
        assert_eq!(error, RenderError::IndexOverflow { vertices: 80_000 });
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn transforms_rotate_then_translate() {
        let mut store = MeshStore::default();
        let handle = store
            .upload(&sprite_quad(
                maze_chase_core::SpriteFrame::new(0, 0),
                Color::from_rgb_u8(255, 0, 0),
            ))
            .expect("uploads");
        store.set_transform(handle, Vec2::new(3.0, 4.0), FRAC_PI_2);
        let placed = store.placed(handle, 2).expect("placed");

        // (0.5, 0, 0) turns a quarter toward +Y before the offset applies.
        let corner = placed.vertices[1].position;
        assert!((corner.x - 3.0).abs() < 1e-5);
        assert!((corner.y - 4.5).abs() < 1e-5);
        assert_eq!(placed.indices.len(), 6);
    }

    #[test]
    fn released_handles_are_unknown() {
        let mut store = MeshStore::default();
        let handle = store.upload(&point_cloud(1)).expect("uploads");
        store.release(handle);
        assert!(matches!(
            store.placed(handle, 1),
            Err(RenderError::UnknownHandle { handle: released }) if released == handle
        ));
    }

    #[test]
    fn camera_recovers_eye_and_field_of_view() {
        let eye = Vec3::new(2.0, 3.0, 1.0);
        let view = Mat4::look_at_rh(eye, eye + Vec3::Y, Vec3::Z);
        let projection = Mat4::perspective_rh_gl(45f32.to_radians(), 2.0, 0.1, 100.0);
        let camera = camera_from_matrices(view, projection);

        assert!((camera.position.x - 2.0).abs() < 1e-4);
        assert!((camera.position.y - 3.0).abs() < 1e-4);
        assert!((camera.target.y - 4.0).abs() < 1e-4);
        assert!((camera.up.z - 1.0).abs() < 1e-4);
        assert!((camera.fovy - 45f32.to_radians()).abs() < 1e-4);
        assert_eq!(camera.aspect.map(|aspect| (aspect * 100.0).round()), Some(200.0));
    }
}
