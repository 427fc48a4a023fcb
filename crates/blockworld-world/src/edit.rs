//! Edit controller: turns hit-test results into grid mutations.
//!
//! The controller owns the [`WorldGrid`] and the handle of every visual it
//! asked the renderer to create, so the grid stays the single source of
//! truth and the renderer never has to be asked what a visual represents.

use std::collections::HashMap;
use std::path::Path;

use blockworld_common::{BlockPos, BlockType, FaceNormal, PersistenceError};
use tracing::debug;

use crate::grid::{Block, WorldGrid};
use crate::persistence::{self, LoadReport};
use crate::registry::{BlockRegistry, RenderAttributes};

/// Opaque handle to a visual object owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(u64);

impl VisualHandle {
    /// Creates a handle from a raw renderer id.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw renderer id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Scene registration capability provided by the renderer.
pub trait SceneHook {
    /// Creates a visual cube at `pos` and returns its handle.
    fn add_visual(&mut self, pos: BlockPos, attributes: &RenderAttributes) -> VisualHandle;

    /// Destroys a visual previously returned by [`SceneHook::add_visual`].
    fn remove_visual(&mut self, handle: VisualHandle);
}

/// Hit-test capability provided by the renderer.
pub trait Raycast {
    /// First block under the pointer and the face that was struck.
    fn hit_test(&self) -> Option<RaycastHit>;
}

/// A block struck by a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RaycastHit {
    /// Position of the struck block
    pub block: BlockPos,
    /// Outward normal of the struck face
    pub normal: FaceNormal,
}

impl RaycastHit {
    /// Creates a new hit.
    #[must_use]
    pub const fn new(block: BlockPos, normal: FaceNormal) -> Self {
        Self { block, normal }
    }

    /// Position adjacent to the struck face, if it is on the lattice.
    #[must_use]
    pub fn place_pos(&self) -> Option<BlockPos> {
        self.block.offset(self.normal)
    }
}

/// Result of an edit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// A block was placed
    Placed {
        /// The new block
        block: Block,
        /// Block it overwrote, if the position was occupied
        replaced: Option<Block>,
    },
    /// A block was removed
    Removed {
        /// Position that was cleared
        pos: BlockPos,
    },
    /// Nothing was targeted; the grid is unchanged
    NoOp,
}

impl EditOutcome {
    /// Whether the grid changed.
    #[must_use]
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

/// Applies place/remove intents to the world and keeps the scene in sync.
#[derive(Debug)]
pub struct EditController {
    grid: WorldGrid,
    registry: BlockRegistry,
    visuals: HashMap<BlockPos, VisualHandle>,
}

impl EditController {
    /// Creates a controller over `grid`.
    ///
    /// No visuals exist yet; call [`EditController::spawn_all`] once the
    /// scene is ready.
    #[must_use]
    pub fn new(grid: WorldGrid, registry: BlockRegistry) -> Self {
        Self {
            grid,
            registry,
            visuals: HashMap::new(),
        }
    }

    /// Read access to the grid.
    #[must_use]
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// The registry used to build visuals.
    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Handle of the visual shown for `pos`.
    #[must_use]
    pub fn visual(&self, pos: BlockPos) -> Option<VisualHandle> {
        self.visuals.get(&pos).copied()
    }

    /// Number of visuals currently registered with the scene.
    #[must_use]
    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    /// Places `selected` against the struck face.
    ///
    /// An occupied target position is overwritten (last write wins). A
    /// missing hit, a hit on something that is not a block in the grid, or a
    /// face on the edge of the lattice is a no-op.
    pub fn place<S: SceneHook + ?Sized>(
        &mut self,
        hit: Option<RaycastHit>,
        selected: &BlockType,
        scene: &mut S,
    ) -> EditOutcome {
        let Some(hit) = hit else {
            return EditOutcome::NoOp;
        };
        if !self.grid.contains(hit.block) {
            debug!("Place ignored, no block at {}", hit.block);
            return EditOutcome::NoOp;
        }

        let Some(pos) = hit.place_pos() else {
            debug!("Place ignored, {} has no neighbour past {:?}", hit.block, hit.normal);
            return EditOutcome::NoOp;
        };
        let replaced = self.grid.insert(pos, selected.clone());
        if replaced.is_some() {
            self.despawn(pos, scene);
        }
        self.spawn(pos, selected, scene);
        debug!("Placed '{}' at {}", selected, pos);

        EditOutcome::Placed {
            block: Block::new(pos, selected.clone()),
            replaced,
        }
    }

    /// Removes the targeted block. No target is a no-op.
    pub fn remove_at<S: SceneHook + ?Sized>(
        &mut self,
        target: Option<BlockPos>,
        scene: &mut S,
    ) -> EditOutcome {
        let Some(pos) = target else {
            return EditOutcome::NoOp;
        };
        if !self.grid.remove(pos) {
            debug!("Remove ignored, no block at {}", pos);
            return EditOutcome::NoOp;
        }
        self.despawn(pos, scene);
        debug!("Removed block at {}", pos);
        EditOutcome::Removed { pos }
    }

    /// Registers a visual for every block that does not have one yet.
    pub fn spawn_all<S: SceneHook + ?Sized>(&mut self, scene: &mut S) {
        for block in self.grid.all() {
            if !self.visuals.contains_key(&block.pos) {
                self.spawn(block.pos, &block.block_type, scene);
            }
        }
    }

    /// Removes every block and its visual.
    pub fn clear_world<S: SceneHook + ?Sized>(&mut self, scene: &mut S) {
        for (_, handle) in self.visuals.drain() {
            scene.remove_visual(handle);
        }
        self.grid.clear();
    }

    /// Replaces the world with the records in `text`.
    pub fn load_world<S: SceneHook + ?Sized>(&mut self, text: &str, scene: &mut S) -> LoadReport {
        self.clear_world(scene);
        let report = persistence::load(text, &mut self.grid);
        self.spawn_all(scene);
        report
    }

    /// Replaces the world with the save at `path`.
    ///
    /// The world is cleared even when there is no save to read.
    pub fn load_world_from<S: SceneHook + ?Sized>(
        &mut self,
        path: impl AsRef<Path>,
        scene: &mut S,
    ) -> Result<LoadReport, PersistenceError> {
        self.clear_world(scene);
        let report = persistence::load_from_path(path, &mut self.grid)?;
        self.spawn_all(scene);
        Ok(report)
    }

    fn spawn<S: SceneHook + ?Sized>(&mut self, pos: BlockPos, ty: &BlockType, scene: &mut S) {
        let attributes = self.registry.resolve(ty);
        let handle = scene.add_visual(pos, &attributes);
        self.visuals.insert(pos, handle);
    }

    fn despawn<S: SceneHook + ?Sized>(&mut self, pos: BlockPos, scene: &mut S) {
        if let Some(handle) = self.visuals.remove(&pos) {
            scene.remove_visual(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Scene that records live visuals.
    #[derive(Default)]
    struct RecordingScene {
        next: u64,
        live: HashMap<VisualHandle, (BlockPos, RenderAttributes)>,
        removed: Vec<VisualHandle>,
    }

    impl SceneHook for RecordingScene {
        fn add_visual(&mut self, pos: BlockPos, attributes: &RenderAttributes) -> VisualHandle {
            self.next += 1;
            let handle = VisualHandle::from_raw(self.next);
            self.live.insert(handle, (pos, attributes.clone()));
            handle
        }

        fn remove_visual(&mut self, handle: VisualHandle) {
            assert!(self.live.remove(&handle).is_some(), "unknown handle");
            self.removed.push(handle);
        }
    }

    fn controller_with_floor() -> (EditController, RecordingScene) {
        let mut grid = WorldGrid::new();
        grid.insert(BlockPos::new(0, 0, 0), "grass");
        grid.insert(BlockPos::new(1, 0, 0), "grass");
        let mut controller = EditController::new(grid, BlockRegistry::placeholder_only());
        let mut scene = RecordingScene::default();
        controller.spawn_all(&mut scene);
        (controller, scene)
    }

    #[test]
    fn test_spawn_all_creates_one_visual_per_block() {
        let (controller, scene) = controller_with_floor();
        assert_eq!(scene.live.len(), 2);
        assert_eq!(controller.visual_count(), 2);
        assert!(controller.visual(BlockPos::new(1, 0, 0)).is_some());
    }

    #[test]
    fn test_place_on_top_face() {
        let (mut controller, mut scene) = controller_with_floor();
        let hit = RaycastHit::new(BlockPos::new(0, 0, 0), FaceNormal::UP);

        let outcome = controller.place(Some(hit), &BlockType::new("stone"), &mut scene);

        assert_eq!(
            outcome,
            EditOutcome::Placed {
                block: Block::new(BlockPos::new(0, 1, 0), "stone"),
                replaced: None,
            }
        );
        assert_eq!(
            controller.grid().get(BlockPos::new(0, 1, 0)),
            Some(&BlockType::new("stone"))
        );
        assert_eq!(scene.live.len(), 3);
    }

    #[test]
    fn test_place_into_occupied_position_overwrites() {
        let (mut controller, mut scene) = controller_with_floor();
        // East face of (0,0,0) is (1,0,0), which already holds grass
        let hit = RaycastHit::new(BlockPos::new(0, 0, 0), FaceNormal::EAST);
        let old_handle = controller.visual(BlockPos::new(1, 0, 0));

        let outcome = controller.place(Some(hit), &BlockType::new("tnt"), &mut scene);

        assert_eq!(
            outcome,
            EditOutcome::Placed {
                block: Block::new(BlockPos::new(1, 0, 0), "tnt"),
                replaced: Some(Block::new(BlockPos::new(1, 0, 0), "grass")),
            }
        );
        assert_eq!(controller.grid().len(), 2);
        assert_eq!(scene.live.len(), 2);
        assert_eq!(scene.removed, vec![old_handle.expect("visual exists")]);
        assert_ne!(controller.visual(BlockPos::new(1, 0, 0)), old_handle);
    }

    #[test]
    fn test_place_without_hit_is_noop() {
        let (mut controller, mut scene) = controller_with_floor();
        let before = controller.grid().clone();

        let outcome = controller.place(None, &BlockType::new("stone"), &mut scene);

        assert_eq!(outcome, EditOutcome::NoOp);
        assert_eq!(controller.grid(), &before);
        assert_eq!(scene.live.len(), 2);
    }

    #[test]
    fn test_place_against_non_block_is_noop() {
        let (mut controller, mut scene) = controller_with_floor();
        let hit = RaycastHit::new(BlockPos::new(5, 5, 5), FaceNormal::UP);

        let outcome = controller.place(Some(hit), &BlockType::new("stone"), &mut scene);

        assert!(!outcome.is_change());
        assert!(controller.grid().get(BlockPos::new(5, 6, 5)).is_none());
    }

    #[test]
    fn test_place_past_lattice_edge_is_noop() {
        let mut grid = WorldGrid::new();
        let edge = BlockPos::new(i32::MAX, 0, 0);
        grid.insert(edge, "grass");
        let mut controller = EditController::new(grid, BlockRegistry::placeholder_only());
        let mut scene = RecordingScene::default();
        controller.spawn_all(&mut scene);

        let outcome = controller.place(
            Some(RaycastHit::new(edge, FaceNormal::EAST)),
            &BlockType::new("stone"),
            &mut scene,
        );

        assert_eq!(outcome, EditOutcome::NoOp);
        assert!(controller.grid().get(BlockPos::new(i32::MIN, 0, 0)).is_none());
        assert_eq!(controller.grid().len(), 1);
        assert_eq!(scene.live.len(), 1);

        // The opposite face is still usable
        let outcome = controller.place(
            Some(RaycastHit::new(edge, FaceNormal::WEST)),
            &BlockType::new("stone"),
            &mut scene,
        );
        assert!(outcome.is_change());
        assert_eq!(
            controller.grid().get(BlockPos::new(i32::MAX - 1, 0, 0)),
            Some(&BlockType::new("stone"))
        );
    }

    #[test]
    fn test_remove_at() {
        let (mut controller, mut scene) = controller_with_floor();
        let handle = controller.visual(BlockPos::new(0, 0, 0)).expect("visual exists");

        let outcome = controller.remove_at(Some(BlockPos::new(0, 0, 0)), &mut scene);

        assert_eq!(outcome, EditOutcome::Removed { pos: BlockPos::new(0, 0, 0) });
        assert!(controller.grid().get(BlockPos::new(0, 0, 0)).is_none());
        assert_eq!(scene.removed, vec![handle]);
        assert_eq!(controller.visual_count(), 1);
    }

    #[test]
    fn test_remove_without_hit_is_noop() {
        let (mut controller, mut scene) = controller_with_floor();
        let before = controller.grid().clone();

        assert_eq!(controller.remove_at(None, &mut scene), EditOutcome::NoOp);
        assert_eq!(
            controller.remove_at(Some(BlockPos::new(9, 9, 9)), &mut scene),
            EditOutcome::NoOp
        );
        assert_eq!(controller.grid(), &before);
        assert!(scene.removed.is_empty());
    }

    #[test]
    fn test_load_world_replaces_blocks_and_visuals() {
        let (mut controller, mut scene) = controller_with_floor();

        let report = controller.load_world("5,5,5,brick\nbad line\n", &mut scene);

        assert_eq!(report.loaded, 1);
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(controller.grid().len(), 1);
        assert_eq!(scene.live.len(), 1);
        assert_eq!(scene.removed.len(), 2);
        let (pos, _) = scene.live.values().next().expect("one visual");
        assert_eq!(*pos, BlockPos::new(5, 5, 5));
    }

    #[test]
    fn test_load_missing_save_leaves_world_empty() {
        let (mut controller, mut scene) = controller_with_floor();
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");

        let result = controller.load_world_from(dir.path().join("world.txt"), &mut scene);

        assert!(matches!(result, Err(PersistenceError::SourceNotFound { .. })));
        assert!(controller.grid().is_empty());
        assert!(scene.live.is_empty());
    }
}
