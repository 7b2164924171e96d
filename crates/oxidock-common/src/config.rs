//! Docking job settings.
//!
//! Everything here is explicit: the engine data directory is a setting, not
//! an environment variable, so two processes with different settings never
//! share hidden state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings shared by the CLI and the pose-generation library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockSettings {
    /// Directory the docking engine is installed under. Falls back to the
    /// platform data directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Search effort passed to the engine. `None` leaves the engine default
    /// in place (the key is omitted from the generated config).
    #[serde(default = "default_exhaustiveness")]
    pub exhaustiveness: Option<u32>,

    /// Detect a binding pocket when no explicit search region is given.
    #[serde(default = "default_true")]
    pub detect_pockets: bool,

    /// Hard limit on a single engine invocation. `None` means no timeout,
    /// matching the engine's own behavior.
    #[serde(default)]
    pub engine_timeout_secs: Option<u64>,
}

fn default_exhaustiveness() -> Option<u32> {
    Some(10)
}

fn default_true() -> bool {
    true
}

impl Default for DockSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            exhaustiveness: default_exhaustiveness(),
            detect_pockets: default_true(),
            engine_timeout_secs: None,
        }
    }
}

impl DockSettings {
    /// Load from a YAML file.
    pub fn from_yaml(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Load from a JSON file.
    pub fn from_json(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save to a YAML file.
    pub fn to_yaml(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The directory the engine lives under, resolving the platform
    /// fallback when no explicit directory was configured.
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("oxidock"),
        }
    }
}
