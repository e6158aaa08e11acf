//! Interaction state the coordinator publishes to the UI.

use crate::constraint::Size;
use crate::engine::Arrangement;
use crate::model::LayoutId;
use crate::orientation::SwipeDirection;
use crate::photo::Photo;

/// Where a photo pick stands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PickPhase {
    #[default]
    Idle,
    /// Waiting for the library to report access.
    AwaitingAuthorization,
    /// Waiting on a picker or on photo loads.
    AwaitingPhotoSource,
}

/// Whether a pick asks for one photo or a limited-access batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PickMode {
    Single,
    Batch,
}

/// The one pick allowed in flight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PendingSelection {
    /// Slot the photo goes to.
    pub slot: usize,
    pub mode: PickMode,
    /// Layout epoch the pick started under.
    pub epoch: u64,
}

/// Translation applied to the grid while it is being shared.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ExportTransform {
    pub dx: i64,
    pub dy: i64,
}

impl ExportTransform {
    pub const IDENTITY: Self = Self { dx: 0, dy: 0 };

    /// Slide a `viewport`-sized view fully off-screen towards `direction`.
    pub fn off_screen(direction: SwipeDirection, viewport: Size) -> Self {
        let (dx, dy) = direction.off_screen_offset(viewport);
        Self { dx, dy }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Snapshot published on every state change. The UI renders this and
/// nothing else.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub arrangement: Arrangement<Photo>,
    /// Drives the selected-layout indicator.
    pub layout: LayoutId,
    /// Drives whether export is offered.
    pub complete: bool,
    pub phase: PickPhase,
    pub pending: Option<PendingSelection>,
    pub export_direction: SwipeDirection,
    pub transform: ExportTransform,
    pub exporting: bool,
}
