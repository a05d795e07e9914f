use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::motion::fab::FabTuning;
use crate::motion::proximity::MagnetTuning;

use super::folder::DEFAULT_PERMANENT;

/// Configuration from config.toml. Every section is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub magnet: MagnetConfig,
    #[serde(default)]
    pub swipe: SwipeConfig,
    #[serde(default)]
    pub cells: CellMetrics,
    /// Folder ids that cannot be swiped away or deleted
    #[serde(default = "default_permanent")]
    pub permanent_folders: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            ui: UiConfig::default(),
            magnet: MagnetConfig::default(),
            swipe: SwipeConfig::default(),
            cells: CellMetrics::default(),
            permanent_folders: default_permanent(),
        }
    }
}

impl AppConfig {
    pub fn is_permanent(&self, folder_id: &str) -> bool {
        self.permanent_folders.iter().any(|p| p == folder_id)
    }
}

fn default_permanent() -> Vec<String> {
    DEFAULT_PERMANENT.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Sidebar width in cells
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u16,
    #[serde(default = "default_min_sidebar_width")]
    pub min_sidebar_width: u16,
    #[serde(default = "default_max_sidebar_width")]
    pub max_sidebar_width: u16,
    /// Color overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            sidebar_width: default_sidebar_width(),
            min_sidebar_width: default_min_sidebar_width(),
            max_sidebar_width: default_max_sidebar_width(),
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sidebar_width() -> u16 {
    26
}

fn default_min_sidebar_width() -> u16 {
    18
}

fn default_max_sidebar_width() -> u16 {
    48
}

/// Pixel size of one terminal cell. Pointer coordinates and every distance
/// constant are expressed in these logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    #[serde(default = "default_cell_width")]
    pub cell_width: f64,
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        CellMetrics {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
        }
    }
}

fn default_cell_width() -> f64 {
    8.0
}

fn default_cell_height() -> f64 {
    16.0
}

impl CellMetrics {
    /// Pointer position of the center of a cell.
    pub fn cell_center(&self, column: u16, row: u16) -> (f64, f64) {
        (
            (f64::from(column) + 0.5) * self.cell_width,
            (f64::from(row) + 0.5) * self.cell_height,
        )
    }

    pub fn columns_to_px(&self, columns: u16) -> f64 {
        f64::from(columns) * self.cell_width
    }

    pub fn px_to_columns(&self, px: f64) -> i32 {
        (px / self.cell_width).round() as i32
    }

    pub fn px_to_rows(&self, px: f64) -> i32 {
        (px / self.cell_height).round() as i32
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// Distance a row travels to fully reveal its delete panel (px)
    #[serde(default = "default_reveal_width")]
    pub reveal_width: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        SwipeConfig {
            reveal_width: default_reveal_width(),
        }
    }
}

fn default_reveal_width() -> f64 {
    75.0
}

pub const FOLDER_TUNING: MagnetTuning = MagnetTuning::new(60.0, 4.0, 0.08, 15.0);
pub const SEARCH_TUNING: MagnetTuning = MagnetTuning::new(80.0, 6.0, 0.10, 10.0);
pub const FAB_TUNING: MagnetTuning = MagnetTuning::new(100.0, 12.0, 0.15, 8.0);
pub const FAB_ACTION_TUNING: MagnetTuning = MagnetTuning::new(70.0, 8.0, 0.12, 10.0);
pub const FAB_TOGGLE_TUNING: MagnetTuning = MagnetTuning::new(50.0, 5.0, 0.10, 12.0);

/// `[magnet.<category>]` tables. Any subset of the four numbers may be set;
/// the rest come from the category's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagnetConfig {
    #[serde(default)]
    pub folder: TuningOverride,
    #[serde(default)]
    pub search: TuningOverride,
    #[serde(default)]
    pub fab: TuningOverride,
    #[serde(default)]
    pub fab_action: TuningOverride,
    #[serde(default)]
    pub fab_toggle: TuningOverride,
}

impl MagnetConfig {
    pub fn folder(&self) -> MagnetTuning {
        self.folder.over(FOLDER_TUNING)
    }

    pub fn search(&self) -> MagnetTuning {
        self.search.over(SEARCH_TUNING)
    }

    pub fn fab(&self) -> FabTuning {
        FabTuning {
            container: self.fab.over(FAB_TUNING),
            action: self.fab_action.over(FAB_ACTION_TUNING),
            toggle: self.fab_toggle.over(FAB_TOGGLE_TUNING),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TuningOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_multiplier: Option<f64>,
}

impl TuningOverride {
    pub fn over(&self, base: MagnetTuning) -> MagnetTuning {
        MagnetTuning {
            radius: self.radius.unwrap_or(base.radius),
            max_offset: self.max_offset.unwrap_or(base.max_offset),
            pull_factor: self.pull_factor.unwrap_or(base.pull_factor),
            intensity_multiplier: self
                .intensity_multiplier
                .unwrap_or(base.intensity_multiplier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.ui.sidebar_width, 26);
        assert_eq!(config.swipe.reveal_width, 75.0);
        assert_eq!(config.magnet.folder(), FOLDER_TUNING);
        assert!(config.is_permanent("inbox"));
        assert!(!config.is_permanent("work"));
    }

    #[test]
    fn partial_magnet_override() {
        let config: AppConfig = toml::from_str(
            r#"
[magnet.folder]
radius = 90.0

[magnet.fab_toggle]
max_offset = 2.0
"#,
        )
        .unwrap();
        let folder = config.magnet.folder();
        assert_eq!(folder.radius, 90.0);
        assert_eq!(folder.max_offset, FOLDER_TUNING.max_offset);
        assert_eq!(config.magnet.fab().toggle.max_offset, 2.0);
        assert_eq!(config.magnet.fab().container, FAB_TUNING);
    }

    #[test]
    fn permanent_set_is_configurable() {
        let config: AppConfig = toml::from_str(r#"permanent_folders = ["inbox", "work"]"#).unwrap();
        assert!(config.is_permanent("work"));
        assert!(!config.is_permanent("today"));
    }

    #[test]
    fn cell_conversion() {
        let cells = CellMetrics::default();
        assert_eq!(cells.cell_center(2, 1), (20.0, 24.0));
        assert_eq!(cells.px_to_columns(-75.0), -9);
        assert_eq!(cells.px_to_rows(4.0), 0);
        assert_eq!(cells.columns_to_px(26), 208.0);
    }
}
