//! Renderer configuration.

use std::path::PathBuf;

use perfplot_core::DisplayLabels;

pub const DEFAULT_OUTPUT_DIR: &str = "plots";
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Output location, image size and axis labels for rendered charts.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Directory that receives every artifact.
    pub output_dir: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Key to tick label lookup.
    pub labels: DisplayLabels,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            labels: DisplayLabels::fire_datasets(),
        }
    }
}

impl PlotConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the image size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Replace the tick label table.
    pub fn with_labels(mut self, labels: DisplayLabels) -> Self {
        self.labels = labels;
        self
    }
}
