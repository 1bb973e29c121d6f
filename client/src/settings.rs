//! Persisted user settings.
//!
//! One JSON blob with last-write-wins semantics, the local stand-in for
//! the web front-end's single localStorage key.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use tubelink_shared::errors::TubelinkResult;
use tubelink_shared::models::Quality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub quality: Quality,
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Ignoring malformed settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist settings. Whole-file overwrite: the last write wins.
    pub fn save(&self, path: &Path) -> TubelinkResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!("Settings saved to {}", path.display());
        Ok(())
    }
}
