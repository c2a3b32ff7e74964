//! Editor settings persisted as JSON.
//!
//! Missing fields take their defaults, so older files keep loading. Writes go
//! through a temp file in the same directory and are renamed into place.

use crate::constants::{
    DRAG_THRESHOLD, FEET_TO_PIXELS, FIT_PADDING, GRID_SIZE, LABEL_MAX_CHARS, MAJOR_GRID_INTERVAL,
    MAX_SCALE, MIN_SCALE,
};
use crate::render::RenderStyle;
use crate::units::LengthUnit;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const APP_DIR: &str = "lotplanner";
const SETTINGS_FILE: &str = "settings.json";

/// `<config dir>/lotplanner/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Canvas pixels per foot for footprint geometry
    pub pixels_per_foot: f64,
    /// Pointer travel that turns a press into a drag
    pub drag_threshold: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub grid_size: f64,
    pub major_grid_interval: u32,
    pub show_grid: bool,
    /// Round drop positions to the grid
    pub snap_to_grid: bool,
    pub fit_padding: f64,
    pub show_clearance: bool,
    pub measurement_unit: LengthUnit,
    pub label_max_chars: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            pixels_per_foot: FEET_TO_PIXELS,
            drag_threshold: DRAG_THRESHOLD,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            grid_size: GRID_SIZE,
            major_grid_interval: MAJOR_GRID_INTERVAL,
            show_grid: true,
            snap_to_grid: false,
            fit_padding: FIT_PADDING,
            show_clearance: true,
            measurement_unit: LengthUnit::Feet,
            label_max_chars: LABEL_MAX_CHARS,
        }
    }
}

impl EditorSettings {
    /// Load from the default path, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = default_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        settings.validate()?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let path = default_settings_path().context("No config directory on this platform")?;
        self.save_to(&path)
    }

    /// Write atomically: temp file in the target directory, then rename.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create settings directory {}", dir.display()))?;

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write settings")?;
        tmp.persist(path)
            .with_context(|| format!("Failed to save settings to {}", path.display()))?;
        debug!(path = %path.display(), "Saved settings");
        Ok(())
    }

    /// Reject values the editor cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.pixels_per_foot) {
            bail!("pixels_per_foot must be positive, got {}", self.pixels_per_foot);
        }
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            bail!("drag_threshold must be non-negative, got {}", self.drag_threshold);
        }
        if !positive(self.min_scale) || !positive(self.max_scale) || self.min_scale > self.max_scale {
            bail!("invalid scale bounds [{}, {}]", self.min_scale, self.max_scale);
        }
        if !positive(self.grid_size) {
            bail!("grid_size must be positive, got {}", self.grid_size);
        }
        if !self.fit_padding.is_finite() || self.fit_padding < 0.0 {
            bail!("fit_padding must be non-negative, got {}", self.fit_padding);
        }
        Ok(())
    }

    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            show_grid: self.show_grid,
            grid_size: self.grid_size,
            major_grid_interval: self.major_grid_interval,
            show_clearance: self.show_clearance,
            label_max_chars: self.label_max_chars,
        }
    }
}
