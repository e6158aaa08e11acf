//! Grid operation errors.

/// Errors raised by the layout engine and the selection coordinator.
///
/// `InvalidLayout` and `SlotIndexOutOfRange` mean the host shell passed
/// something it should never have; the rest are user-facing and come with an
/// alert.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum GridError {
    /// No built-in layout matches the requested id, name or index.
    #[error("no such layout")]
    InvalidLayout,

    /// Slot index past the end of the active arrangement.
    #[error("slot {index} out of range for an arrangement of {len} slots")]
    SlotIndexOutOfRange { index: usize, len: usize },

    /// Export requested while some slots still show the placeholder.
    #[error("layout has empty slots")]
    IncompleteLayout,

    /// The user denied photo library access.
    #[error("photo library access denied")]
    AccessDenied,

    /// Photo library access is restricted by policy.
    #[error("photo library access restricted")]
    AccessRestricted,
}

impl GridError {
    /// Whether the error should be shown to the user rather than treated as a defect.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::IncompleteLayout | Self::AccessDenied | Self::AccessRestricted
        )
    }
}
