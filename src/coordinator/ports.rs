//! Collaborators the coordinator talks to. The host shell implements these.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;

use crate::color::CanvasColor;
use crate::compose::Compositor;
use crate::constraint::Size;
use crate::engine::Arrangement;
use crate::error::GridError;
use crate::photo::Photo;

/// Photo library authorization state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Authorization {
    /// Full library access.
    Authorized,
    /// Access limited to a user-curated subset.
    Limited,
    /// The user said no. They can change it in settings.
    Denied,
    /// Blocked by parental controls or device management.
    Restricted,
}

/// Opaque reference to a library item returned by the picker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub String);

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetHandle {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Why a picked item could not be turned into a [`Photo`].
#[derive(Debug, thiserror::Error)]
pub enum PhotoLoadError {
    #[error("could not decode photo: {0}")]
    Decode(#[from] image::ImageError),
    #[error("could not read photo: {0}")]
    Io(#[from] std::io::Error),
    #[error("photo {0} is unavailable")]
    Unavailable(AssetHandle),
}

/// The photo library.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Ask for (or report) library access.
    async fn request_authorization(&self) -> Authorization;

    /// Show the library picker. Resolves with at most `max` items; empty
    /// when the user cancels.
    async fn pick_images(&self, max: usize) -> Vec<AssetHandle>;

    /// Load one picked item.
    async fn load_image(&self, asset: &AssetHandle) -> Result<Photo, PhotoLoadError>;
}

/// Secondary picker shown in limited-access mode.
#[async_trait]
pub trait BatchChooser: Send + Sync {
    /// Let the user choose one photo from `batch`. `None` on dismissal.
    async fn choose(&self, batch: &[Photo]) -> Option<usize>;
}

/// The platform share sheet.
#[async_trait]
pub trait SharingFacility: Send + Sync {
    /// Resolves once the share sheet is dismissed.
    async fn share(&self, image: Arc<RgbaImage>);
}

/// Presents alerts to the user.
pub trait AlertPresenter: Send + Sync {
    fn present_alert(&self, alert: Alert);
}

/// Produces the exported image.
pub trait Renderer: Send + Sync {
    fn render(
        &self,
        arrangement: &Arrangement<Photo>,
        canvas: Size,
        background: CanvasColor,
    ) -> RgbaImage;
}

impl Renderer for Compositor {
    fn render(
        &self,
        arrangement: &Arrangement<Photo>,
        canvas: Size,
        background: CanvasColor,
    ) -> RgbaImage {
        Compositor::render(self, arrangement, canvas, background)
    }
}

/// An alert button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AlertAction {
    /// Acknowledge and close.
    Ok,
    /// Close without doing anything.
    Cancel,
    /// Open the platform settings for this app.
    OpenSettings,
}

impl AlertAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Cancel => "Cancel",
            Self::OpenSettings => "Go to settings",
        }
    }
}

/// A user-facing alert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    /// The error being reported.
    pub error: GridError,
    pub title: &'static str,
    pub message: &'static str,
    pub actions: Vec<AlertAction>,
}

impl Alert {
    /// The alert for a user-facing error. `None` for programmer errors.
    pub fn for_error(error: GridError) -> Option<Self> {
        let (title, message, actions) = match error {
            GridError::IncompleteLayout => (
                "Sharing not possible!",
                "You can't share your layout yet because some frames are still empty. \
                 Fill all the frames to continue.",
                vec![AlertAction::Ok],
            ),
            GridError::AccessDenied => (
                "Access Denied!",
                "Access to photos denied! Please update your Settings if you want to add a photo.",
                vec![AlertAction::OpenSettings, AlertAction::Cancel],
            ),
            GridError::AccessRestricted => (
                "Photo Library Access Restricted",
                "You cannot access your photo library.",
                vec![AlertAction::Ok],
            ),
            GridError::InvalidLayout | GridError::SlotIndexOutOfRange { .. } => return None,
        };
        Some(Self {
            error,
            title,
            message,
            actions,
        })
    }

    /// Whether the user can fix the cause from this alert.
    pub fn is_recoverable(&self) -> bool {
        self.actions.contains(&AlertAction::OpenSettings)
    }
}

/// Everything the coordinator needs from the host.
#[derive(Clone)]
pub struct Ports {
    pub photos: Arc<dyn PhotoSource>,
    pub chooser: Arc<dyn BatchChooser>,
    pub sharing: Arc<dyn SharingFacility>,
    pub alerts: Arc<dyn AlertPresenter>,
    /// `None` renders with a [`Compositor`] built from the export config.
    pub renderer: Option<Arc<dyn Renderer>>,
}

impl Ports {
    pub fn new(
        photos: Arc<dyn PhotoSource>,
        chooser: Arc<dyn BatchChooser>,
        sharing: Arc<dyn SharingFacility>,
        alerts: Arc<dyn AlertPresenter>,
    ) -> Self {
        Self {
            photos,
            chooser,
            sharing,
            alerts,
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }
}
