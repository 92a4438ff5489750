use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use twistypuzzle_library::{InteractionParams, LibraryParams};

const SETTINGS_FILE_FORMAT: config::FileFormat = config::FileFormat::Yaml;
const DEFAULT_SETTINGS_STR: &str = include_str!("default.yaml");

/// Prefix for environment variables that override settings. Nested keys are
/// separated by `__`, as in `TWISTY_INTERACTION__DRAG_THRESHOLD`.
const ENV_PREFIX: &str = "TWISTY";

/// All user-tunable settings.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Puzzle geometry.
    pub library: LibraryParams,
    /// Pointer interaction and animation timing.
    pub interaction: InteractionParams,
}

impl Settings {
    /// Loads settings from the embedded defaults, then `user_file` if there is
    /// one, then the environment.
    pub fn load(user_file: Option<&Path>) -> Result<Self> {
        let mut config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_SETTINGS_STR, SETTINGS_FILE_FORMAT));

        if let Some(path) = user_file {
            log::debug!("loading settings from {}", path.display());
            config = config.add_source(config::File::from(path).required(true));
        }

        config = config.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        config
            .build()
            .context("error loading settings")?
            .try_deserialize()
            .context("error deserializing settings")
    }
}
