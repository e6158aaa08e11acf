//! Layout engine: realizes a layout into slot geometry and owns the slots.
//!
//! The engine is generic over the image reference a slot holds, so it stays
//! free of pixel types. The compositor and coordinator use
//! [`Photo`](crate::Photo); tests use whatever is convenient.
//!
//! # Example
//!
//! ```
//! use zengrid::{GridMetrics, LayoutEngine, LayoutId, Rect};
//!
//! let mut engine = LayoutEngine::<&str>::new(GridMetrics::default());
//! let arrangement = engine.select_layout(LayoutId::TopRectangle);
//! assert_eq!(arrangement.slots()[0].frame(), Rect::new(0, 0, 240, 120));
//!
//! engine.place_image(0, "beach.jpg").unwrap();
//! engine.place_image(1, "dog.jpg").unwrap();
//! assert!(!engine.is_complete());
//! engine.place_image(2, "cake.jpg").unwrap();
//! assert!(engine.is_complete());
//! ```

use alloc::vec::Vec;

use crate::constraint::{Rect, Size};
use crate::error::GridError;
use crate::model::{CellShape, LayoutId, cell_specs};

/// Pixel metrics used to realize template cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GridMetrics {
    /// Edge length of a square cell.
    pub cell_edge: u32,
    /// Gutter between neighbouring cells. A wide cell absorbs the gutter it spans.
    pub spacing: u32,
    /// Border between the outer cells and the canvas edge.
    pub margin: u32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            cell_edge: 120,
            spacing: 0,
            margin: 0,
        }
    }
}

impl GridMetrics {
    /// Canvas size for these metrics. Every layout shares it.
    ///
    /// Saturates at `u32::MAX` per side; [`checked_canvas`](Self::checked_canvas)
    /// reports the overflow instead.
    pub fn canvas(&self) -> Size {
        self.checked_canvas()
            .unwrap_or(Size::new(u32::MAX, u32::MAX))
    }

    /// Canvas size, or `None` if a side does not fit in `u32`.
    pub fn checked_canvas(&self) -> Option<Size> {
        let side = self
            .cell_edge
            .checked_mul(2)?
            .checked_add(self.spacing)?
            .checked_add(self.margin.checked_mul(2)?)?;
        Some(Size::new(side, side))
    }

    fn frame(&self, template: Rect) -> Rect {
        let pitch = self.cell_edge.saturating_add(self.spacing);
        let extent = |cells: u32| {
            cells
                .saturating_mul(self.cell_edge)
                .saturating_add(cells.saturating_sub(1).saturating_mul(self.spacing))
        };
        Rect::new(
            self.margin.saturating_add(template.x.saturating_mul(pitch)),
            self.margin.saturating_add(template.y.saturating_mul(pitch)),
            extent(template.width),
            extent(template.height),
        )
    }
}

/// One realized cell and the image placed in it, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot<I> {
    shape: CellShape,
    frame: Rect,
    image: Option<I>,
}

impl<I> Slot<I> {
    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// Cell rectangle on the arrangement canvas.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Placed image; `None` shows the placeholder.
    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    pub fn is_filled(&self) -> bool {
        self.image.is_some()
    }
}

/// Realized geometry of the active layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrangement<I> {
    layout: LayoutId,
    canvas: Size,
    slots: Vec<Slot<I>>,
    revision: u64,
}

impl<I> Arrangement<I> {
    fn realize(layout: LayoutId, metrics: &GridMetrics, revision: u64) -> Self {
        let slots = cell_specs(layout)
            .iter()
            .map(|cell| Slot {
                shape: cell.shape,
                frame: metrics.frame(cell.template_rect()),
                image: None,
            })
            .collect();
        Self {
            layout,
            canvas: metrics.canvas(),
            slots,
            revision,
        }
    }

    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Slots in row-major order.
    pub fn slots(&self) -> &[Slot<I>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot<I>> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True iff every slot holds an image.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Slot::is_filled)
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_filled()).count()
    }

    /// Indices of slots still showing the placeholder.
    pub fn empty_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_filled())
            .map(|(i, _)| i)
    }

    /// Bumped on every change; renders of an older revision are stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Holds the active layout and its slots.
#[derive(Clone, Debug)]
pub struct LayoutEngine<I> {
    metrics: GridMetrics,
    arrangement: Arrangement<I>,
    epoch: u64,
}

impl<I> LayoutEngine<I> {
    /// Engine showing [`LayoutId::FourSquares`].
    pub fn new(metrics: GridMetrics) -> Self {
        Self::with_layout(metrics, LayoutId::default())
    }

    pub fn with_layout(metrics: GridMetrics, layout: LayoutId) -> Self {
        Self {
            metrics,
            arrangement: Arrangement::realize(layout, &metrics, 0),
            epoch: 0,
        }
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn layout(&self) -> LayoutId {
        self.arrangement.layout
    }

    pub fn arrangement(&self) -> &Arrangement<I> {
        &self.arrangement
    }

    /// Number of layout selections so far. Work started under an older
    /// epoch targets slots that no longer exist.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Switch layouts. Always rebuilds the slots, so every slot is empty
    /// afterwards, even when `id` is the current layout.
    pub fn select_layout(&mut self, id: LayoutId) -> &Arrangement<I> {
        let revision = self.arrangement.revision + 1;
        self.arrangement = Arrangement::realize(id, &self.metrics, revision);
        self.epoch += 1;
        &self.arrangement
    }

    /// [`select_layout`](Self::select_layout) by picker index.
    pub fn select_layout_index(&mut self, index: usize) -> Result<&Arrangement<I>, GridError> {
        let id = LayoutId::from_index(index)?;
        Ok(self.select_layout(id))
    }

    /// Put `image` into slot `index`, replacing whatever was there.
    pub fn place_image(&mut self, index: usize, image: I) -> Result<(), GridError> {
        let slot = self.slot_mut(index)?;
        slot.image = Some(image);
        self.arrangement.revision += 1;
        Ok(())
    }

    /// Empty one slot, returning its image.
    pub fn clear_slot(&mut self, index: usize) -> Result<Option<I>, GridError> {
        let taken = self.slot_mut(index)?.image.take();
        if taken.is_some() {
            self.arrangement.revision += 1;
        }
        Ok(taken)
    }

    pub fn is_complete(&self) -> bool {
        self.arrangement.is_complete()
    }

    /// Empty every slot, keeping the layout.
    pub fn reset(&mut self) {
        for slot in &mut self.arrangement.slots {
            slot.image = None;
        }
        self.arrangement.revision += 1;
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Slot<I>, GridError> {
        let len = self.arrangement.slots.len();
        self.arrangement
            .slots
            .get_mut(index)
            .ok_or(GridError::SlotIndexOutOfRange { index, len })
    }
}
