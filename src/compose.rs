//! Flattens an arrangement and its photos into one image.
//!
//! Each photo is fit to its cell with a [`Constraint`]: the crop is computed
//! in display space, mapped back to stored pixel order, and only the cropped
//! region is oriented and resampled.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::color::CanvasColor;
use crate::constraint::{Constraint, FillMode, FitError, Gravity, Size};
use crate::engine::Arrangement;
use crate::photo::Photo;

/// Renders arrangements of [`Photo`]s.
#[derive(Clone, Debug)]
pub struct Compositor {
    fill: FillMode,
    gravity: Gravity,
    filter: FilterType,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            fill: FillMode::FitCrop,
            gravity: Gravity::Center,
            filter: FilterType::CatmullRom,
        }
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_mode(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Resampling filter. `Nearest` keeps source pixels intact, which tests rely on.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Draw every filled slot over `background` on a `canvas`-sized image.
    ///
    /// Slot frames are scaled from the arrangement canvas to `canvas`. Empty
    /// slots are left as background; callers export only complete
    /// arrangements, so an empty slot here is logged.
    pub fn render(
        &self,
        arrangement: &Arrangement<Photo>,
        canvas: Size,
        background: CanvasColor,
    ) -> RgbaImage {
        let _span = tracing::debug_span!(
            "render",
            layout = %arrangement.layout(),
            revision = arrangement.revision(),
            width = canvas.width,
            height = canvas.height,
        )
        .entered();

        let mut out = RgbaImage::from_pixel(canvas.width, canvas.height, Rgba(background.to_rgba()));
        for (index, slot) in arrangement.slots().iter().enumerate() {
            let Some(photo) = slot.image() else {
                tracing::warn!(index, "rendering an empty slot");
                continue;
            };
            let frame = slot.frame().rescale(arrangement.canvas(), canvas);
            match self.render_cell(photo, frame.size()) {
                Ok(tile) => imageops::overlay(&mut out, &tile, frame.x.into(), frame.y.into()),
                Err(err) => tracing::warn!(index, %err, "skipping slot"),
            }
        }
        out
    }

    /// Fit one photo to a `cell`-sized tile.
    pub fn render_cell(&self, photo: &Photo, cell: Size) -> Result<RgbaImage, FitError> {
        let display = photo.display_size();
        let fit = Constraint::new(self.fill, cell.width, cell.height)
            .gravity(self.gravity)
            .compute(display.width, display.height)?;

        let orientation = photo.orientation();
        let oriented = match fit.source_crop {
            Some(crop) => {
                let stored = photo.stored_size();
                let s = orientation.transform_rect_to_source(crop, stored.width, stored.height);
                let region = imageops::crop_imm(photo.pixels(), s.x, s.y, s.width, s.height);
                orientation.apply(&region.to_image())
            }
            None => orientation.apply(photo.pixels()),
        };

        if !fit.needs_resize() {
            return Ok(oriented);
        }
        Ok(imageops::resize(
            &oriented,
            fit.resize_to.width,
            fit.resize_to.height,
            self.filter,
        ))
    }
}
