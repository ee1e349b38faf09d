//! Terrain chunk resource lifecycle.

use horizon_common::ChunkCoord;

use crate::mesh::TerrainMesh;
use crate::renderer::{MeshHandle, RenderError, Renderer};

/// Acquisition state of a chunk's renderer-side resources.
///
/// The handle only exists while it is valid: there is no "loaded" flag to
/// fall out of sync with a dead handle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// No renderer resources acquired yet
    Unloaded,
    /// Resources acquired; the handle is valid
    Loaded(MeshHandle),
    /// Resources released; terminal
    Released,
}

/// One cached terrain chunk: a generated mesh, a world-space draw offset,
/// and lazily acquired renderer resources.
///
/// Resources are acquired at most once, on the first [`TerrainChunk::draw`],
/// and released at most once, by [`TerrainChunk::dispose`].
#[derive(Debug)]
pub struct TerrainChunk {
    coord: ChunkCoord,
    mesh: TerrainMesh,
    offset: (f32, f32),
    state: ResourceState,
}

impl TerrainChunk {
    /// Creates an unloaded chunk from a generated mesh.
    #[must_use]
    pub fn new(coord: ChunkCoord, mesh: TerrainMesh, offset: (f32, f32)) -> Self {
        Self {
            coord,
            mesh,
            offset,
            state: ResourceState::Unloaded,
        }
    }

    /// The chunk's grid coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The generated mesh.
    #[must_use]
    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    /// World-space (x, z) offset the mesh is drawn at.
    #[must_use]
    pub const fn offset(&self) -> (f32, f32) {
        self.offset
    }

    /// Current resource state.
    #[must_use]
    pub const fn state(&self) -> ResourceState {
        self.state
    }

    /// Whether renderer resources are currently held.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, ResourceState::Loaded(_))
    }

    /// Draws the chunk, acquiring renderer resources on first use.
    ///
    /// The load happens at most once per chunk regardless of how many
    /// times this is called afterwards. Drawing a disposed chunk is a
    /// caller bug and reports an error rather than re-acquiring.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        let handle = match self.state {
            ResourceState::Unloaded => {
                let handle = renderer.load(&self.mesh)?;
                self.state = ResourceState::Loaded(handle);
                handle
            }
            ResourceState::Loaded(handle) => handle,
            ResourceState::Released => {
                return Err(RenderError("draw on a disposed chunk".into()));
            }
        };

        renderer.draw(handle, self.offset);
        Ok(())
    }

    /// Releases renderer resources, if any were ever acquired.
    ///
    /// Idempotent: the state moves to `Released` before the renderer is
    /// called, so a second dispose (or a dispose after a failed release)
    /// never reaches the renderer again.
    pub fn dispose(&mut self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        match self.state {
            ResourceState::Loaded(handle) => {
                self.state = ResourceState::Released;
                renderer.release(handle)
            }
            // Nothing was ever acquired, or it is already gone.
            ResourceState::Unloaded | ResourceState::Released => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingRenderer;
    use glam::Vec3;

    fn test_chunk() -> TerrainChunk {
        let mesh = TerrainMesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            vec![Vec3::Y; 3],
            vec![0xff88_8888; 3],
            vec![0, 1, 2],
        );
        TerrainChunk::new(ChunkCoord::new(1, 1), mesh, (32.0, 32.0))
    }

    #[test]
    fn test_lazy_load_happens_once() {
        let mut chunk = test_chunk();
        let mut renderer = RecordingRenderer::new();

        assert_eq!(chunk.state(), ResourceState::Unloaded);

        chunk.draw(&mut renderer).expect("draw");
        chunk.draw(&mut renderer).expect("draw");
        chunk.draw(&mut renderer).expect("draw");

        assert_eq!(renderer.load_count(), 1);
        assert_eq!(renderer.draws().len(), 3);
        assert!(chunk.is_loaded());
    }

    #[test]
    fn test_draw_passes_offset() {
        let mut chunk = test_chunk();
        let mut renderer = RecordingRenderer::new();

        chunk.draw(&mut renderer).expect("draw");

        assert_eq!(renderer.draws()[0].1, (32.0, 32.0));
    }

    #[test]
    fn test_dispose_idempotent() {
        let mut chunk = test_chunk();
        let mut renderer = RecordingRenderer::new();

        chunk.draw(&mut renderer).expect("draw");
        let handle = match chunk.state() {
            ResourceState::Loaded(h) => h,
            other => panic!("expected loaded, got {other:?}"),
        };

        chunk.dispose(&mut renderer).expect("dispose");
        chunk.dispose(&mut renderer).expect("dispose");

        assert_eq!(renderer.release_count(handle), 1);
        assert_eq!(chunk.state(), ResourceState::Released);
    }

    #[test]
    fn test_dispose_without_load_is_noop() {
        let mut chunk = test_chunk();
        let mut renderer = RecordingRenderer::new();

        chunk.dispose(&mut renderer).expect("dispose");

        assert!(renderer.releases().is_empty());
        assert_eq!(chunk.state(), ResourceState::Released);
    }

    #[test]
    fn test_draw_after_dispose_is_error() {
        let mut chunk = test_chunk();
        let mut renderer = RecordingRenderer::new();

        chunk.draw(&mut renderer).expect("draw");
        chunk.dispose(&mut renderer).expect("dispose");

        assert!(chunk.draw(&mut renderer).is_err());
        assert_eq!(renderer.load_count(), 1);
    }
}
