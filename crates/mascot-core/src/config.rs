use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables for the presentation engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-axis acceleration delta (m/s²) that counts as a shake.
    pub shake_threshold: f32,
    /// Minimum spacing between orientation classification passes.
    pub orientation_interval_ms: u64,
    /// Play a menu animation after this long without activity.
    pub idle_animation_interval_ms: Option<u64>,
    pub initial_theme: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shake_threshold: 10.0,
            orientation_interval_ms: 100,
            idle_animation_interval_ms: None,
            initial_theme: None,
        }
    }
}

impl EngineConfig {
    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
