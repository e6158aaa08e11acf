//! Cell geometry and photo-to-cell fitting.
//!
//! Computes which region of a photo to read and what size to resample it to
//! so it covers a cell rectangle. Pure geometry, no pixel operations, no
//! allocations, `no_std` compatible.
//!
//! # Example
//!
//! ```
//! use zengrid::{Constraint, FillMode, Size};
//!
//! let fit = Constraint::new(FillMode::FitCrop, 240, 120)
//!     .compute(1000, 1000)
//!     .unwrap();
//!
//! // Square photo cropped to 2:1, then resized to cover the wide cell.
//! assert_eq!(fit.resize_to, Size::new(240, 120));
//! assert_eq!(fit.source_crop.unwrap().height, 500);
//! ```

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// How a photo is mapped onto a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FillMode {
    /// Scale to cover the cell, crop the overflow. Preserves aspect ratio.
    #[default]
    FitCrop,
    /// Stretch to the exact cell dimensions, distorting aspect ratio.
    Distort,
}

/// Where to anchor the crop window when a photo overflows its cell.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Gravity {
    /// Center on both axes.
    #[default]
    Center,
    /// Position by percentage. `(0.0, 0.0)` = top-left, `(1.0, 1.0)` = bottom-right.
    Percentage(f32, f32),
}

/// Width × height in grid units (pixels once rendered).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Area as a `u64`, never overflows.
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether either axis is zero.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Multiply both axes by `factor`, saturating.
    pub const fn scaled(self, factor: u32) -> Self {
        Self::new(
            self.width.saturating_mul(factor),
            self.height.saturating_mul(factor),
        )
    }

    /// Multiply both axes by `factor`, or `None` on overflow.
    pub fn checked_scaled(self, factor: u32) -> Option<Self> {
        Some(Self::new(
            self.width.checked_mul(factor)?,
            self.height.checked_mul(factor)?,
        ))
    }
}

/// Axis-aligned rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Size of the rect.
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Area as a `u64`.
    pub const fn area(&self) -> u64 {
        self.size().area()
    }

    /// Whether the two rects share any interior point. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rect.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether this rect covers the full source (no actual crop).
    pub fn is_full(&self, source_w: u32, source_h: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == source_w && self.height == source_h
    }

    /// Map this rect from a canvas of size `from` onto a canvas of size `to`.
    ///
    /// Both edges are scaled and floored independently, so rects that share
    /// an edge before scaling still share it afterwards.
    pub fn rescale(self, from: Size, to: Size) -> Self {
        if from == to || from.is_empty() {
            return self;
        }
        let sx = |v: u32| (v as u64 * to.width as u64 / from.width as u64) as u32;
        let sy = |v: u32| (v as u64 * to.height as u64 / from.height as u64) as u32;
        let x0 = sx(self.x);
        let y0 = sy(self.y);
        Self {
            x: x0,
            y: y0,
            width: sx(self.right()) - x0,
            height: sy(self.bottom()) - y0,
        }
    }
}

/// Fit specification for a single cell.
///
/// # Example
///
/// ```
/// use zengrid::{Constraint, FillMode, Gravity, Size};
///
/// let fit = Constraint::new(FillMode::FitCrop, 120, 120)
///     .gravity(Gravity::Percentage(0.0, 0.0))
///     .compute(400, 300)
///     .unwrap();
///
/// let crop = fit.source_crop.unwrap();
/// assert_eq!((crop.x, crop.width, crop.height), (0, 300, 300));
/// assert_eq!(fit.resize_to, Size::new(120, 120));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub mode: FillMode,
    pub width: u32,
    pub height: u32,
    pub gravity: Gravity,
}

impl Constraint {
    /// Create a constraint targeting a `width` × `height` cell.
    pub fn new(mode: FillMode, width: u32, height: u32) -> Self {
        Self {
            mode,
            width,
            height,
            gravity: Gravity::Center,
        }
    }

    /// Scale-to-fill constraint for the given cell size.
    pub fn fill(cell: Size) -> Self {
        Self::new(FillMode::FitCrop, cell.width, cell.height)
    }

    /// Set gravity for crop positioning.
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Compute the fit for a photo of the given (display) dimensions.
    pub fn compute(&self, source_w: u32, source_h: u32) -> Result<CellFit, FitError> {
        if source_w == 0 || source_h == 0 {
            return Err(FitError::ZeroSourceDimension);
        }
        if self.width == 0 || self.height == 0 {
            return Err(FitError::ZeroTargetDimension);
        }

        let source_crop = match self.mode {
            FillMode::Distort => None,
            FillMode::FitCrop => Some(crop_to_aspect(
                source_w,
                source_h,
                self.width,
                self.height,
                &self.gravity,
            )),
        };

        Ok(CellFit {
            source: Size::new(source_w, source_h),
            source_crop,
            resize_to: Size::new(self.width, self.height),
        }
        .normalize())
    }
}

/// Result of applying a [`Constraint`] to a photo.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellFit {
    /// Photo dimensions.
    pub source: Size,
    /// Region of the photo to read. `None` = whole photo.
    pub source_crop: Option<Rect>,
    /// Dimensions to resample the (cropped) photo to. Always the cell size.
    pub resize_to: Size,
}

impl CellFit {
    /// Whether resampling is needed.
    pub fn needs_resize(&self) -> bool {
        self.resize_to != self.effective_source()
    }

    /// Whether a crop is applied (excludes full-source no-ops).
    pub fn needs_crop(&self) -> bool {
        self.source_crop.is_some()
    }

    /// Effective photo dimensions after crop.
    pub fn effective_source(&self) -> Size {
        match &self.source_crop {
            Some(r) => r.size(),
            None => self.source,
        }
    }

    fn normalize(mut self) -> Self {
        if let Some(r) = &self.source_crop
            && r.is_full(self.source.width, self.source.height)
        {
            self.source_crop = None;
        }
        self
    }
}

/// Fit computation error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FitError {
    /// Photo has zero width or height.
    #[error("photo has a zero dimension")]
    ZeroSourceDimension,
    /// Cell width or height is zero.
    #[error("cell has a zero dimension")]
    ZeroTargetDimension,
}

// ============================================================================
// Internal geometry
// ============================================================================

/// Crop source to match target aspect ratio.
fn crop_to_aspect(sw: u32, sh: u32, tw: u32, th: u32, gravity: &Gravity) -> Rect {
    // Cross-multiplication keeps exact matches out of floating point.
    let cross_s = sw as u64 * th as u64;
    let cross_t = sh as u64 * tw as u64;
    if cross_s == cross_t {
        return Rect::new(0, 0, sw, sh);
    }

    if cross_s > cross_t {
        // Source is wider: keep full height, new_w = sh * tw / th.
        let new_w = proportional(tw, th, sh, false, sw, sh);
        if new_w >= sw {
            return Rect::new(0, 0, sw, sh);
        }
        let x = gravity_offset_1d(sw - new_w, gravity, true);
        Rect::new(x, 0, new_w, sh)
    } else {
        // Source is taller: keep full width, new_h = sw * th / tw.
        let new_h = proportional(tw, th, sw, true, sw, sh);
        if new_h >= sh {
            return Rect::new(0, 0, sw, sh);
        }
        let y = gravity_offset_1d(sh - new_h, gravity, false);
        Rect::new(0, y, sw, new_h)
    }
}

fn gravity_offset_1d(space: u32, gravity: &Gravity, horizontal: bool) -> u32 {
    if space == 0 {
        return 0;
    }
    match gravity {
        Gravity::Center => space / 2,
        Gravity::Percentage(x, y) => {
            let pct = if horizontal { *x } else { *y };
            (space as f64 * pct.clamp(0.0, 1.0) as f64).round() as u32
        }
    }
}

/// Compute the free dimension proportionally, snapping to whichever
/// candidate (source or target dimension) loses less to rounding.
///
/// Without the snap, a 1200×400 photo into a 100×33 cell picks 99 where
/// 100 is intended.
fn proportional(
    ratio_w: u32,
    ratio_h: u32,
    basis: u32,
    basis_is_width: bool,
    target_w: u32,
    target_h: u32,
) -> u32 {
    let ratio = ratio_w as f64 / ratio_h as f64;

    let snap_amount = if basis_is_width {
        rounding_loss_height(ratio_w, ratio_h, target_h)
    } else {
        rounding_loss_width(ratio_w, ratio_h, target_w)
    };

    let snap_a = if basis_is_width { ratio_h } else { ratio_w };
    let snap_b = if basis_is_width { target_h } else { target_w };

    let float = if basis_is_width {
        basis as f64 / ratio
    } else {
        ratio * basis as f64
    };

    let delta_a = (float - snap_a as f64).abs();
    let delta_b = (float - snap_b as f64).abs();

    let v = if delta_a <= snap_amount && delta_a <= delta_b {
        snap_a
    } else if delta_b <= snap_amount {
        snap_b
    } else {
        float.round() as u32
    };

    v.max(1)
}

fn rounding_loss_width(ratio_w: u32, ratio_h: u32, target_width: u32) -> f64 {
    let ratio = ratio_w as f64 / ratio_h as f64;
    let recreate_y = ratio_h as f64 * (target_width as f64 / ratio_w as f64);
    (target_width as f64 - recreate_y.round() * ratio).abs()
}

fn rounding_loss_height(ratio_w: u32, ratio_h: u32, target_height: u32) -> f64 {
    let ratio = ratio_w as f64 / ratio_h as f64;
    let recreate_x = ratio_w as f64 * (target_height as f64 / ratio_h as f64);
    (target_height as f64 - recreate_x.round() / ratio).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── crop_to_aspect ──────────────────────────────────────────────────

    #[test]
    fn crop_wide_photo_into_square_cell() {
        let r = crop_to_aspect(1000, 500, 120, 120, &Gravity::Center);
        assert_eq!(r, Rect::new(250, 0, 500, 500));
    }

    #[test]
    fn crop_tall_photo_into_wide_cell() {
        // 500×1000 into 2:1 → keep width, height 250, centered.
        let r = crop_to_aspect(500, 1000, 240, 120, &Gravity::Center);
        assert_eq!(r, Rect::new(0, 375, 500, 250));
    }

    #[test]
    fn crop_same_ratio_is_full() {
        let r = crop_to_aspect(800, 400, 240, 120, &Gravity::Center);
        assert!(r.is_full(800, 400));
    }

    #[test]
    fn crop_gravity_corners() {
        let tl = crop_to_aspect(1000, 500, 120, 120, &Gravity::Percentage(0.0, 0.0));
        assert_eq!(tl.x, 0);
        let br = crop_to_aspect(1000, 500, 120, 120, &Gravity::Percentage(1.0, 1.0));
        assert_eq!(br.x, 1000 - br.width);
        assert_eq!(br.y, 0);
    }

    #[test]
    fn gravity_percentage_is_clamped() {
        let r = crop_to_aspect(1000, 500, 120, 120, &Gravity::Percentage(-3.0, 7.0));
        assert_eq!(r.x, 0);
    }

    #[test]
    fn crop_for_slightly_wider_cell() {
        // 3:1 photo into a 100×33 cell (3.03:1): full width, 396 rows centered.
        let r = crop_to_aspect(1200, 400, 100, 33, &Gravity::Center);
        assert_eq!(r, Rect::new(0, 2, 1200, 396));
    }

    // ── Constraint ──────────────────────────────────────────────────────

    #[test]
    fn fit_crop_covers_cell() {
        let fit = Constraint::new(FillMode::FitCrop, 120, 120)
            .compute(1000, 500)
            .unwrap();
        assert_eq!(fit.resize_to, Size::new(120, 120));
        assert_eq!(fit.effective_source(), Size::new(500, 500));
        assert!(fit.needs_crop());
        assert!(fit.needs_resize());
    }

    #[test]
    fn fit_crop_matching_aspect_has_no_crop() {
        let fit = Constraint::fill(Size::new(240, 120)).compute(480, 240).unwrap();
        assert!(!fit.needs_crop());
        assert_eq!(fit.effective_source(), Size::new(480, 240));
    }

    #[test]
    fn distort_never_crops() {
        let fit = Constraint::new(FillMode::Distort, 240, 120)
            .compute(300, 900)
            .unwrap();
        assert!(fit.source_crop.is_none());
        assert_eq!(fit.resize_to, Size::new(240, 120));
    }

    #[test]
    fn identity_fit_needs_nothing() {
        let fit = Constraint::fill(Size::new(120, 120)).compute(120, 120).unwrap();
        assert!(!fit.needs_crop());
        assert!(!fit.needs_resize());
    }

    #[test]
    fn zero_dimensions_error() {
        let c = Constraint::fill(Size::new(120, 120));
        assert_eq!(c.compute(0, 10), Err(FitError::ZeroSourceDimension));
        let c = Constraint::fill(Size::new(0, 120));
        assert_eq!(c.compute(10, 10), Err(FitError::ZeroTargetDimension));
    }

    // ── Rect ────────────────────────────────────────────────────────────

    #[test]
    fn rect_overlap_excludes_shared_edges() {
        let a = Rect::new(0, 0, 120, 120);
        let b = Rect::new(120, 0, 120, 120);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(119, 119, 5, 5)));
    }

    #[test]
    fn rect_contains() {
        let canvas = Rect::new(0, 0, 240, 240);
        assert!(canvas.contains(&Rect::new(120, 120, 120, 120)));
        assert!(!canvas.contains(&Rect::new(121, 120, 120, 120)));
    }

    #[test]
    fn rescale_keeps_shared_edges() {
        let from = Size::new(240, 240);
        let to = Size::new(1001, 1001);
        let left = Rect::new(0, 0, 120, 120).rescale(from, to);
        let right = Rect::new(120, 0, 120, 120).rescale(from, to);
        assert_eq!(left.right(), right.x);
        assert_eq!(right.right(), 1001);
    }

    #[test]
    fn rescale_identity() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.rescale(Size::new(5, 5), Size::new(5, 5)), r);
    }
}
