//! Runtime configuration.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! initial-layout = "bottom-rectangle"
//!
//! [grid]
//! cell_edge = 120
//! spacing = 20
//!
//! [export]
//! background = "#106596"
//! scale = 4
//! direction = "left"
//!
//! [picker]
//! limited-batch-size = 3
//! ```

use crate::color::CanvasColor;
use crate::constraint::{FillMode, Size};
use crate::engine::GridMetrics;
use crate::model::LayoutId;
use crate::orientation::SwipeDirection;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case", deny_unknown_fields))]
pub struct Config {
    /// Layout shown before the user picks one.
    pub initial_layout: LayoutId,
    pub grid: GridMetrics,
    pub export: ExportConfig,
    pub picker: PickerConfig,
}

/// How the shared image is produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case", deny_unknown_fields))]
pub struct ExportConfig {
    pub background: CanvasColor,
    /// Integer multiple of the grid canvas used for the exported image.
    pub scale: u32,
    pub fill: FillMode,
    /// Export direction until the device reports an orientation.
    pub direction: SwipeDirection,
    /// Empty every slot once the share sheet closes.
    pub clear_after_share: bool,
    /// Size of the on-screen view the export transform slides away.
    pub viewport: Size,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: CanvasColor::BRAND,
            scale: 1,
            fill: FillMode::FitCrop,
            direction: SwipeDirection::Up,
            clear_after_share: false,
            viewport: Size::new(390, 844),
        }
    }
}

/// Limited-access picking.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case", deny_unknown_fields))]
pub struct PickerConfig {
    /// Photos fetched per limited-access batch.
    pub limited_batch_size: usize,
    /// Remove a chosen photo from the batch instead of offering it again.
    pub consume_batch_selection: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            limited_batch_size: 3,
            consume_batch_selection: false,
        }
    }
}

/// Largest exported image, in pixels (16384 × 16384).
pub const MAX_EXPORT_PIXELS: u64 = 1 << 28;

/// A config value that loads fine but cannot be used.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidConfig {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("grid and export scale give a canvas over {max_pixels} pixels")]
    CanvasTooLarge { max_pixels: u64 },
}

impl Config {
    /// Reject values that would produce an empty or unallocatable canvas, or
    /// an empty batch.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.grid.cell_edge == 0 {
            return Err(InvalidConfig::Zero("grid.cell_edge"));
        }
        if self.export.scale == 0 {
            return Err(InvalidConfig::Zero("export.scale"));
        }
        if self.picker.limited_batch_size == 0 {
            return Err(InvalidConfig::Zero("picker.limited-batch-size"));
        }
        let canvas = self
            .grid
            .checked_canvas()
            .and_then(|c| c.checked_scaled(self.export.scale));
        match canvas {
            Some(c) if c.area() <= MAX_EXPORT_PIXELS => Ok(()),
            _ => Err(InvalidConfig::CanvasTooLarge {
                max_pixels: MAX_EXPORT_PIXELS,
            }),
        }
    }

    /// Canvas size of the exported image.
    pub fn export_canvas(&self) -> Size {
        self.grid.canvas().scaled(self.export.scale)
    }
}

/// Config loading error.
#[cfg(feature = "config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] InvalidConfig),
}

#[cfg(feature = "config")]
impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
