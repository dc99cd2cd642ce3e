//! Engine configuration with JSON/JSON5 file loading.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub layout: LayoutConfig,
    pub screen: ScreenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Initial tree font size in points; zoom moves this up and down.
    pub font_size: i32,
    pub font_family: String,
    /// Thickness of the frame around each person box.
    pub box_border_width: i32,
    /// Hard cap on tree depth per side, so cyclic data cannot recurse
    /// forever.
    pub max_generations: u32,
    /// When false, text is sized from a fixed per-character heuristic
    /// instead of querying system fonts. Deterministic, so useful for
    /// tests and headless runs.
    pub use_system_fonts: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: 9,
            font_family: "Helvetica, sans-serif".to_string(),
            box_border_width: 2,
            max_generations: 64,
            use_system_fonts: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Loads a config file (JSON or JSON5); no path means defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = json5::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}
