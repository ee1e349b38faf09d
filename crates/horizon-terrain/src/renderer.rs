//! Renderer collaborator seam.
//!
//! The terrain core hands meshes to a [`Renderer`] and gets back opaque
//! handles; it never inspects what a backend allocates. A GPU backend
//! lives outside this crate; the [`RecordingRenderer`] here is a headless
//! implementation for tests and dry runs.

use thiserror::Error;

use crate::mesh::TerrainMesh;

/// Error reported by a renderer backend.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Handle to renderer-owned resources for one uploaded mesh.
///
/// Opaque to the terrain core; only the issuing renderer interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Renderer-side operations the terrain core depends on.
pub trait Renderer {
    /// Uploads a mesh, returning a handle to its renderer-side resources.
    fn load(&mut self, mesh: &TerrainMesh) -> Result<MeshHandle, RenderError>;

    /// Draws a previously loaded mesh translated by an (x, z) world offset.
    fn draw(&mut self, handle: MeshHandle, offset: (f32, f32));

    /// Releases the resources behind a handle.
    fn release(&mut self, handle: MeshHandle) -> Result<(), RenderError>;
}

/// Headless renderer that records every call.
///
/// Backs tests and dry runs: loads hand out sequential handles, draws are
/// logged with their offsets, releases are counted per handle.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: u64,
    /// Handles currently live (loaded, not yet released)
    live: Vec<MeshHandle>,
    /// Every draw call in order: handle plus offset
    draws: Vec<(MeshHandle, (f32, f32))>,
    /// Every release call in order
    releases: Vec<MeshHandle>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total loads issued so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.next_handle as usize
    }

    /// Handles loaded but not yet released.
    #[must_use]
    pub fn live_handles(&self) -> &[MeshHandle] {
        &self.live
    }

    /// Recorded draw calls in order.
    #[must_use]
    pub fn draws(&self) -> &[(MeshHandle, (f32, f32))] {
        &self.draws
    }

    /// Recorded release calls in order.
    #[must_use]
    pub fn releases(&self) -> &[MeshHandle] {
        &self.releases
    }

    /// Times a specific handle has been released.
    #[must_use]
    pub fn release_count(&self, handle: MeshHandle) -> usize {
        self.releases.iter().filter(|&&h| h == handle).count()
    }
}

impl Renderer for RecordingRenderer {
    fn load(&mut self, _mesh: &TerrainMesh) -> Result<MeshHandle, RenderError> {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.live.push(handle);
        Ok(handle)
    }

    fn draw(&mut self, handle: MeshHandle, offset: (f32, f32)) {
        self.draws.push((handle, offset));
    }

    fn release(&mut self, handle: MeshHandle) -> Result<(), RenderError> {
        self.releases.push(handle);
        match self.live.iter().position(|&h| h == handle) {
            Some(i) => {
                self.live.swap_remove(i);
                Ok(())
            }
            None => Err(RenderError(format!("release of unknown handle {handle:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn empty_mesh() -> TerrainMesh {
        TerrainMesh::new(vec![Vec3::ZERO], vec![Vec3::Y], vec![0xff88_8888], vec![])
    }

    #[test]
    fn test_load_draw_release_cycle() {
        let mut renderer = RecordingRenderer::new();
        let mesh = empty_mesh();

        let handle = renderer.load(&mesh).expect("load");
        renderer.draw(handle, (8.0, -8.0));
        renderer.release(handle).expect("release");

        assert_eq!(renderer.load_count(), 1);
        assert_eq!(renderer.draws(), &[(handle, (8.0, -8.0))]);
        assert!(renderer.live_handles().is_empty());
    }

    #[test]
    fn test_double_release_reports_error() {
        let mut renderer = RecordingRenderer::new();
        let handle = renderer.load(&empty_mesh()).expect("load");

        renderer.release(handle).expect("release");
        assert!(renderer.release(handle).is_err());
        assert_eq!(renderer.release_count(handle), 2);
    }
}
