//! Theme preference persistence.
//!
//! The only state this application persists is which theme the user last
//! picked, stored as a small JSON file in the Porchlight config directory.
//! Reads are forgiving: a missing or unreadable file means defaults, never an
//! error on screen. Writes happen when the user toggles the theme and are the
//! only moment the file is touched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Name of the preference file inside the config directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Errors from writing the preference file.
///
/// Reading never errors; see [`Preferences::load`].
#[derive(Error, Debug)]
pub enum PrefsError {
    /// The config directory or file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The preferences could not be serialized.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which theme palette to render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// The standard colored palette.
    Standard,
    /// High-contrast monochrome for limited terminals.
    Monochrome,
}

impl Default for ThemeChoice {
    fn default() -> Self {
        Self::Standard
    }
}

impl ThemeChoice {
    /// Returns the other choice; bound to the theme toggle key.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Standard => Self::Monochrome,
            Self::Monochrome => Self::Standard,
        }
    }
}

/// The persisted preference set: currently just the theme flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Selected theme palette.
    #[serde(default)]
    pub theme: ThemeChoice,
}

impl Preferences {
    /// Loads preferences from `dir`, falling back to defaults.
    ///
    /// A missing file is the normal first-run case; an unreadable or
    /// malformed file is logged at debug and treated the same way. The
    /// verification flow must never be blocked by a cosmetic setting.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let path = Self::path(dir);
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(prefs) => prefs,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Ignoring malformed preference file");
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Ignoring unreadable preference file");
                Self::default()
            }
        }
    }

    /// Saves preferences to `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError`] if the directory cannot be created, the file
    /// cannot be written, or serialization fails.
    pub fn save(&self, dir: &Path) -> Result<(), PrefsError> {
        fs::create_dir_all(dir)?;
        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');
        fs::write(Self::path(dir), contents)?;
        Ok(())
    }

    /// Returns the preference file path inside `dir`.
    #[must_use]
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(PREFERENCES_FILE)
    }
}
