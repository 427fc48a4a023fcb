//! Application session.
//!
//! Wires input events to the world core. The host has no window, so the
//! scene and the hit test are stand-ins: [`HeadlessScene`] records the
//! visuals it is asked to create and [`Pointer`] reports whatever the last
//! `hover` event pointed at.

use std::collections::HashMap;
use std::io::BufRead;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use blockworld_common::{BlockPos, PersistenceError};
use blockworld_world::persistence::{self, LoadReport, SavedWorld};
use blockworld_world::{
    AssetDirTextures, BlockRegistry, EditController, Raycast, RaycastHit, RenderAttributes,
    SceneHook, SelectionChanged, SelectionState, VisualHandle, WorldGenerator,
};

use crate::config::EngineConfig;
use crate::input::InputEvent;

/// Scene stand-in that tracks live visuals.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    next_handle: u64,
    visuals: HashMap<VisualHandle, (BlockPos, RenderAttributes)>,
}

impl HeadlessScene {
    /// Number of live visuals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    /// Whether no visuals are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Attributes of the visual shown at `pos`, if any.
    #[cfg(test)]
    #[must_use]
    pub fn visual_at(&self, pos: BlockPos) -> Option<&RenderAttributes> {
        self.visuals
            .values()
            .find(|(p, _)| *p == pos)
            .map(|(_, attrs)| attrs)
    }
}

impl SceneHook for HeadlessScene {
    fn add_visual(&mut self, pos: BlockPos, attributes: &RenderAttributes) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle::from_raw(self.next_handle);
        self.visuals.insert(handle, (pos, attributes.clone()));
        handle
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_none() {
            warn!("Removing unknown visual {}", handle.raw());
        }
    }
}

/// Hit-test stand-in driven by `hover` events.
#[derive(Debug, Default)]
pub struct Pointer {
    hit: Option<RaycastHit>,
}

impl Raycast for Pointer {
    fn hit_test(&self) -> Option<RaycastHit> {
        self.hit
    }
}

/// Whether the session keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading events
    Continue,
    /// Stop the session
    Quit,
}

/// One user's world, selection and scene.
pub struct Session {
    config: EngineConfig,
    controller: EditController,
    selection: SelectionState,
    scene: HeadlessScene,
    pointer: Pointer,
    /// Attributes shown in the selected-block preview
    preview: RenderAttributes,
}

impl Session {
    /// Builds the registry, generates the starting platform and shows it.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let textures = AssetDirTextures::new(&config.asset_dir);
        let registry = BlockRegistry::load(&config.palette, &config.fallback_type, &textures);

        let grid = WorldGenerator::new(config.generator_config()).generate();
        let mut controller = EditController::new(grid, registry);
        let mut scene = HeadlessScene::default();
        controller.spawn_all(&mut scene);

        let mut selection = SelectionState::new(config.palette.clone());
        selection.select_by_index(config.initial_selection);
        let preview = controller.registry().resolve(selection.current());

        info!(
            "World ready: {} blocks, selected '{}'",
            controller.grid().len(),
            selection.current()
        );

        Self {
            config,
            controller,
            selection,
            scene,
            pointer: Pointer::default(),
            preview,
        }
    }

    /// Applies one input event.
    pub fn handle(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::SelectSlot(index) => {
                let changed = self.selection.select_by_index(index);
                self.refresh_preview(changed);
            },
            InputEvent::Scroll(delta) => {
                let changed = self.selection.step(delta);
                self.refresh_preview(changed);
            },
            InputEvent::Place => {
                let hit = self.pointer.hit_test();
                let selected = self.selection.current().clone();
                self.controller.place(hit, &selected, &mut self.scene);
            },
            InputEvent::Remove => {
                let target = self.pointer.hit_test().map(|hit| hit.block);
                self.controller.remove_at(target, &mut self.scene);
            },
            InputEvent::Save => {
                if let Err(e) = self.save() {
                    error!("Critical error saving world: {e}");
                }
            },
            InputEvent::Reload => match self.reload() {
                Ok(_) => {},
                Err(PersistenceError::SourceNotFound { path }) => {
                    warn!(
                        "{} not found. Please save a world first (F5).",
                        path.display()
                    );
                },
                Err(e) => error!("Failed to load world: {e}"),
            },
            InputEvent::Hover(hit) => self.pointer.hit = hit,
            InputEvent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Reads events line by line until EOF or a quit event.
    ///
    /// Blank lines and `#` comments are ignored; unknown lines are logged.
    pub fn run_script<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match trimmed.parse::<InputEvent>() {
                Ok(event) => {
                    if self.handle(event) == Flow::Quit {
                        break;
                    }
                },
                Err(e) => warn!("Line {}: {}", index + 1, e),
            }
        }
        Ok(())
    }

    /// The edit controller, for inspection.
    #[must_use]
    pub fn controller(&self) -> &EditController {
        &self.controller
    }

    /// The selection state.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The scene stand-in.
    #[must_use]
    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }

    /// Attributes currently shown in the preview.
    #[must_use]
    pub fn preview(&self) -> &RenderAttributes {
        &self.preview
    }

    fn refresh_preview(&mut self, changed: Option<SelectionChanged>) {
        if let Some(changed) = changed {
            self.preview = self.controller.registry().resolve(&changed.block_type);
            debug!("Selected '{}' (slot {})", changed.block_type, changed.current);
        }
    }

    /// Saves the world to the configured save path.
    ///
    /// A failed save leaves the in-memory world untouched.
    pub fn save(&self) -> Result<SavedWorld, PersistenceError> {
        persistence::save_to_path(self.controller.grid(), &self.config.save_path)
    }

    /// Clears the world and loads it from the configured save path.
    pub fn reload(&mut self) -> Result<LoadReport, PersistenceError> {
        self.controller
            .load_world_from(&self.config.save_path, &mut self.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockworld_common::BlockType;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir) -> Session {
        let config = EngineConfig {
            save_path: dir.path().join("world.txt"),
            asset_dir: dir.path().join("assets"),
            platform_size: 4,
            platform_depth: 1,
            ..EngineConfig::default()
        };
        Session::new(config)
    }

    #[test]
    fn test_session_starts_with_platform() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let session = session_in(&dir);

        assert_eq!(session.controller().grid().len(), 16);
        assert_eq!(session.scene().len(), 16);
        assert_eq!(session.selection().current(), &BlockType::new("grass"));
        assert!(session.preview().is_placeholder());
    }

    #[test]
    fn test_place_and_remove_through_pointer() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session_in(&dir);

        let script = "2\nhover 1 0 1 0 1 0\nleft mouse down\nhover 0 0 0 0 1 0\nright mouse down\n";
        session.run_script(Cursor::new(script)).expect("script failed");

        let grid = session.controller().grid();
        assert_eq!(grid.get(BlockPos::new(1, 1, 1)), Some(&BlockType::new("stone")));
        assert!(grid.get(BlockPos::new(0, 0, 0)).is_none());
        assert_eq!(grid.len(), 16);
        assert_eq!(session.scene().len(), 16);
        assert!(session.scene().visual_at(BlockPos::new(1, 1, 1)).is_some());
    }

    #[test]
    fn test_triggers_without_hover_are_noops() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session_in(&dir);
        let before = session.controller().grid().clone();

        session
            .run_script(Cursor::new("left mouse down\nright mouse down\n"))
            .expect("script failed");

        assert_eq!(session.controller().grid(), &before);
    }

    #[test]
    fn test_scroll_and_digit_selection() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session_in(&dir);

        session.handle(InputEvent::Scroll(-1));
        assert_eq!(session.selection().current(), &BlockType::new("furnace"));
        session.handle(InputEvent::SelectSlot(5));
        assert_eq!(session.selection().current(), &BlockType::new("DiamondBlock"));
        session.handle(InputEvent::Scroll(1));
        assert_eq!(session.selection().current(), &BlockType::new("PumpkinHead"));
    }

    #[test]
    fn test_digit_beyond_short_palette_is_ignored() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = EngineConfig {
            save_path: dir.path().join("world.txt"),
            asset_dir: dir.path().join("assets"),
            palette: blockworld_world::Palette::new(["grass", "stone"]).expect("valid palette"),
            ..EngineConfig::default()
        };
        let mut session = Session::new(config);

        session.handle(InputEvent::SelectSlot(1));
        session.handle(InputEvent::SelectSlot(9));
        assert_eq!(session.selection().index(), 1);
    }

    #[test]
    fn test_save_then_reload_restores_world() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session_in(&dir);

        let script = "hover 2 0 2 0 1 0\n5\nleft mouse down\nf5\nhover 2 1 2 0 1 0\nleft mouse down\nf6\n";
        session.run_script(Cursor::new(script)).expect("script failed");

        let grid = session.controller().grid();
        assert_eq!(grid.len(), 17);
        assert_eq!(grid.get(BlockPos::new(2, 1, 2)), Some(&BlockType::new("tnt")));
        assert!(grid.get(BlockPos::new(2, 2, 2)).is_none());
        assert_eq!(session.scene().len(), 17);
    }

    #[test]
    fn test_failed_save_is_reported_and_keeps_world() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = EngineConfig {
            save_path: dir.path().join("world.txt"),
            asset_dir: dir.path().join("assets"),
            platform_size: 4,
            platform_depth: 1,
            ..EngineConfig::default()
        };
        // A non-empty directory at the save path makes the write fail
        std::fs::create_dir_all(config.save_path.join("occupied")).expect("create dir failed");
        let mut session = Session::new(config);

        assert!(matches!(session.save(), Err(PersistenceError::Io(_))));
        assert_eq!(session.handle(InputEvent::Save), Flow::Continue);
        assert_eq!(session.controller().grid().len(), 16);
        assert_eq!(session.scene().len(), 16);
    }

    #[test]
    fn test_reload_reports_missing_save() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session_in(&dir);

        assert!(matches!(
            session.reload(),
            Err(PersistenceError::SourceNotFound { .. })
        ));
        assert!(session.controller().grid().is_empty());
    }

    #[test]
    fn test_save_then_reload_reports_block_count() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session_in(&dir);

        let saved = session.save().expect("save failed");
        assert_eq!(saved.written, 16);
        let report = session.reload().expect("reload failed");
        assert_eq!(report.loaded, 16);
        assert_eq!(session.scene().len(), 16);
    }

    #[test]
    fn test_reload_without_save_empties_world() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session_in(&dir);

        assert_eq!(session.handle(InputEvent::Reload), Flow::Continue);

        assert!(session.controller().grid().is_empty());
        assert!(session.scene().is_empty());
    }

    #[test]
    fn test_quit_stops_script() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = session_in(&dir);

        session
            .run_script(Cursor::new("quit\nf6\n"))
            .expect("script failed");

        assert_eq!(session.controller().grid().len(), 16);
    }
}
