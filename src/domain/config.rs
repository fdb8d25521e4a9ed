use std::{num::NonZeroUsize, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

/// How far a toggle refreshes statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cascade {
    /// Refresh the toggled course and its direct dependents.
    #[default]
    SingleHop,
    /// Refresh the whole working set after every toggle.
    Full,
}

/// Configuration for building course trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The course database to load when none is given on the command line,
    /// as written in the configuration file.
    ///
    /// Use [`Config::database_path`] to resolve a relative path.
    pub database: Option<PathBuf>,

    /// Whether seed codes are normalised before lookup.
    ///
    /// When `true` (default), `cpsc110a` is read as `CPSC 110`. When `false`,
    /// codes are only trimmed and must match the database exactly.
    pub normalize_codes: bool,

    /// The maximum number of layout passes.
    ///
    /// If unset, the cap is one more than the number of courses being laid
    /// out.
    max_layout_passes: Option<NonZeroUsize>,

    /// How far toggling a course refreshes statuses.
    pub cascade: Cascade,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            normalize_codes: default_normalize_codes(),
            max_layout_passes: None,
            cascade: Cascade::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration if the file exists, and the defaults
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The configured database, with a relative path resolved against the
    /// directory holding the configuration file at `config_path`.
    #[must_use]
    pub fn database_path(&self, config_path: &Path) -> Option<PathBuf> {
        let database = self.database.as_deref()?;
        match config_path.parent() {
            Some(parent) if database.is_relative() => Some(parent.join(database)),
            _ => Some(database.to_path_buf()),
        }
    }

    /// Returns the layout pass cap, if configured.
    #[must_use]
    pub const fn max_layout_passes(&self) -> Option<NonZeroUsize> {
        self.max_layout_passes
    }

    /// Sets the layout pass cap.
    pub const fn set_max_layout_passes(&mut self, passes: Option<NonZeroUsize>) {
        self.max_layout_passes = passes;
    }
}

const fn default_normalize_codes() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<PathBuf>,

        #[serde(default = "default_normalize_codes")]
        normalize_codes: bool,

        /// Zero is read as "no cap".
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_layout_passes: Option<usize>,

        #[serde(default)]
        cascade: Cascade,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                database,
                normalize_codes,
                max_layout_passes,
                cascade,
            } => Self {
                database,
                normalize_codes,
                max_layout_passes: max_layout_passes.and_then(NonZeroUsize::new),
                cascade,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            database: config.database,
            normalize_codes: config.normalize_codes,
            max_layout_passes: config.max_layout_passes.map(NonZeroUsize::get),
            cascade: config.cascade,
        }
    }
}
