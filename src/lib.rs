//! Photo-grid layouts: fixed templates, slot management, scale-to-fill
//! composition, and the interaction flow that fills and shares a grid.
//!
//! The geometry core is `no_std`; pixels, async coordination, and config
//! files sit behind features.
//!
//! # Modules
//!
//! - [`model`] — Built-in layouts and their cells on the 2×2 template
//! - [`constraint`] — Sizes, rects, and scale-to-fill crop computation
//! - [`orientation`] — EXIF orientation, device orientation, export swipe direction
//! - [`engine`] — Realizes a layout into slot frames and owns slot contents (`alloc`)
//! - [`compose`] — Renders an arrangement of photos to one image (`compose`)
//! - [`coordinator`] — Tap, pick, and share flows over async collaborators (`coordinator`)
//! - [`config`] — Grid metrics, export, and picker settings (`std`; TOML with `config`)
//! - [`svg`] — SVG previews of arrangements and the layout picker (`svg`)
//!
//! # Example
//!
//! ```
//! use zengrid::{GridMetrics, LayoutEngine, LayoutId, Rect};
//!
//! let mut engine = LayoutEngine::<&str>::new(GridMetrics::default());
//! let arrangement = engine.select_layout(LayoutId::BottomRectangle);
//! assert_eq!(arrangement.len(), 3);
//! assert_eq!(arrangement.slots()[2].frame(), Rect::new(0, 120, 240, 120));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod color;
pub mod constraint;
pub mod error;
pub mod model;
pub mod orientation;

#[cfg(feature = "alloc")]
pub mod engine;

#[cfg(feature = "std")]
pub mod config;

#[cfg(feature = "compose")]
pub mod compose;
#[cfg(feature = "compose")]
pub mod photo;

#[cfg(feature = "coordinator")]
pub mod coordinator;

#[cfg(feature = "svg")]
pub mod svg;

pub use color::{CanvasColor, ColorParseError};
pub use constraint::{CellFit, Constraint, FillMode, FitError, Gravity, Rect, Size};
pub use error::GridError;
pub use model::{
    CellShape, CellSpec, LayoutId, Row, TEMPLATE, TilingError, cell_specs, check_tiling,
    list_layouts,
};
pub use orientation::{DeviceOrientation, Orientation, SwipeDirection};

#[cfg(feature = "alloc")]
pub use engine::{Arrangement, GridMetrics, LayoutEngine, Slot};

#[cfg(feature = "std")]
pub use config::{Config, ExportConfig, InvalidConfig, MAX_EXPORT_PIXELS, PickerConfig};
#[cfg(feature = "config")]
pub use config::ConfigError;

#[cfg(feature = "compose")]
pub use compose::Compositor;
#[cfg(feature = "compose")]
pub use photo::Photo;

#[cfg(feature = "coordinator")]
pub use coordinator::{Coordinator, ExportOutcome, Ports, TapOutcome, ViewState};
