use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::preview::DEFAULT_PREVIEW_LIMIT;
use crate::map::{DEFAULT_CLUSTER_ZOOM_OFFSET, DEFAULT_ZOOM};

/// Catalogue loaded at startup, looked up next to the executable.
pub const DATA_FILE_NAME: &str = "phivolcs_earthquake_data_clean.csv";

/// Optional display settings, also next to the executable.
pub const CONFIG_FILE_NAME: &str = "quakemap.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Display settings. Every field falls back to its default when absent.
///
/// ```json
/// { "preview_limit": 250, "initial_zoom": 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows shown in the data preview table.
    pub preview_limit: usize,
    /// Zoom level the map opens at.
    pub initial_zoom: u8,
    /// How much finer than the display zoom markers are clustered.
    pub cluster_zoom_offset: u8,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            initial_zoom: DEFAULT_ZOOM,
            cluster_zoom_offset: DEFAULT_CLUSTER_ZOOM_OFFSET,
            window_width: 1280.0,
            window_height: 860.0,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load `path` if it exists. A missing file is silent; a broken one is
    /// logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Using settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }
}

/// Directory holding the running executable; the data file lives here.
pub fn app_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locating the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("executable has no parent directory")
}
