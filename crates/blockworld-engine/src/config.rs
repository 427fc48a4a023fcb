//! Engine configuration.
//!
//! Provides world, block and save settings. Configuration can be loaded from
//! and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use blockworld_common::BlockType;
use blockworld_world::{
    GeneratorConfig, Palette, DEFAULT_FALLBACK_TYPE, DEFAULT_SAVE_FILE,
};

/// Configuration file name.
const CONFIG_FILE: &str = "blockworld.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Save Settings ===
    /// File the world is saved to and loaded from
    pub save_path: PathBuf,

    // === World Settings ===
    /// Width and length of the starting platform
    pub platform_size: u32,
    /// Layers of the starting platform
    pub platform_depth: u32,
    /// Block type of the starting platform
    pub ground_type: BlockType,

    // === Block Settings ===
    /// Directory holding `<type>.png` textures
    pub asset_dir: PathBuf,
    /// Selectable block types in hotkey order
    pub palette: Palette,
    /// Type whose texture replaces missing ones
    pub fallback_type: BlockType,
    /// Palette index selected at startup
    pub initial_selection: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_FILE),

            platform_size: 20,
            platform_depth: 2,
            ground_type: BlockType::new("grass"),

            asset_dir: PathBuf::from("assets"),
            palette: Palette::default(),
            fallback_type: BlockType::new(DEFAULT_FALLBACK_TYPE),
            initial_selection: 0,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("blockworld").join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.platform_size = self.platform_size.clamp(1, 256);
        self.platform_depth = self.platform_depth.clamp(1, 16);

        if self.initial_selection >= self.palette.len() {
            warn!(
                "initial_selection {} is outside the palette, using 0",
                self.initial_selection
            );
            self.initial_selection = 0;
        }
    }

    /// Settings for the starting platform.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            size: self.platform_size,
            depth: self.platform_depth,
            ground_type: self.ground_type.clone(),
        }
    }
}
