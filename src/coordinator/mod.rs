//! Selection coordinator: turns user gestures into engine calls and drives
//! the asynchronous photo pick and share flows.
//!
//! All session state sits behind one lock that is never held across an
//! `.await`. Each change is published as a [`ViewState`] snapshot on a
//! `watch` channel; the UI observes that and nothing else.
//!
//! At most one pick is in flight. A tap while one is pending is ignored, and
//! a pick that resolves after the layout changed is discarded since its slot
//! no longer exists.

mod ports;
mod state;

pub use ports::{
    Alert, AlertAction, AlertPresenter, AssetHandle, Authorization, BatchChooser, PhotoLoadError,
    PhotoSource, Ports, Renderer, SharingFacility,
};
pub use state::{ExportTransform, PendingSelection, PickMode, PickPhase, ViewState};

use std::sync::Arc;

use futures::future::join_all;
use image::RgbaImage;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::compose::Compositor;
use crate::config::Config;
use crate::engine::{Arrangement, LayoutEngine};
use crate::error::GridError;
use crate::model::LayoutId;
use crate::orientation::{DeviceOrientation, SwipeDirection};
use crate::photo::Photo;

/// How a cell tap resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TapOutcome {
    /// A photo now fills the slot.
    Placed { slot: usize },
    /// The user backed out of a picker. Nothing changed.
    Cancelled,
    /// Another pick was already in flight.
    Ignored,
    /// The layout changed while picking; the photo was dropped.
    Discarded,
}

/// How an export gesture resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportOutcome {
    /// The image went to the share sheet and the sheet has closed.
    Shared(Arc<RgbaImage>),
    /// Wrong direction, or an export was already running.
    Ignored,
}

struct Session {
    engine: LayoutEngine<Photo>,
    phase: PickPhase,
    pending: Option<PendingSelection>,
    /// Limited-access batch, reused across taps until exhausted.
    batch: Option<Vec<Photo>>,
    export_direction: SwipeDirection,
    transform: ExportTransform,
    exporting: bool,
    /// Last export keyed by arrangement revision.
    last_render: Option<(u64, Arc<RgbaImage>)>,
}

impl Session {
    fn snapshot(&self) -> ViewState {
        ViewState {
            arrangement: self.engine.arrangement().clone(),
            layout: self.engine.layout(),
            complete: self.engine.is_complete(),
            phase: self.phase,
            pending: self.pending,
            export_direction: self.export_direction,
            transform: self.transform,
            exporting: self.exporting,
        }
    }

    fn cached_render(&self) -> Option<Arc<RgbaImage>> {
        let revision = self.engine.arrangement().revision();
        match &self.last_render {
            Some((rendered, image)) if *rendered == revision => Some(Arc::clone(image)),
            _ => None,
        }
    }
}

/// Mediates between the UI, the [`LayoutEngine`], and the host's
/// collaborators.
pub struct Coordinator {
    config: Config,
    photos: Arc<dyn PhotoSource>,
    chooser: Arc<dyn BatchChooser>,
    sharing: Arc<dyn SharingFacility>,
    alerts: Arc<dyn AlertPresenter>,
    renderer: Arc<dyn Renderer>,
    session: Mutex<Session>,
    view: watch::Sender<ViewState>,
}

impl Coordinator {
    pub fn new(config: Config, ports: Ports) -> Self {
        let renderer = ports.renderer.unwrap_or_else(|| {
            Arc::new(Compositor::new().with_fill_mode(config.export.fill)) as Arc<dyn Renderer>
        });
        let session = Session {
            engine: LayoutEngine::with_layout(config.grid, config.initial_layout),
            phase: PickPhase::Idle,
            pending: None,
            batch: None,
            export_direction: config.export.direction,
            transform: ExportTransform::IDENTITY,
            exporting: false,
            last_render: None,
        };
        let (view, _) = watch::channel(session.snapshot());
        Self {
            config,
            photos: ports.photos,
            chooser: ports.chooser,
            sharing: ports.sharing,
            alerts: ports.alerts,
            renderer,
            session: Mutex::new(session),
            view,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    /// The latest published state.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Photos left in the limited-access batch, if one has been fetched.
    pub fn batch_len(&self) -> Option<usize> {
        self.session.lock().batch.as_ref().map(Vec::len)
    }

    /// Switch layouts. Every slot is empty afterwards and any pick in
    /// flight will be discarded.
    pub fn on_layout_chosen(&self, id: LayoutId) -> Arrangement<Photo> {
        let mut session = self.session.lock();
        let arrangement = session.engine.select_layout(id).clone();
        tracing::debug!(layout = %id, epoch = session.engine.epoch(), "layout selected");
        self.publish(&session);
        arrangement
    }

    /// [`on_layout_chosen`](Self::on_layout_chosen) by picker index.
    pub fn on_layout_index_chosen(&self, index: usize) -> Result<Arrangement<Photo>, GridError> {
        match LayoutId::from_index(index) {
            Ok(id) => Ok(self.on_layout_chosen(id)),
            Err(err) => {
                tracing::error!(index, %err, "layout picker out of range");
                Err(err)
            }
        }
    }

    /// Track the device orientation to pick the export direction.
    pub fn on_orientation_changed(&self, device: DeviceOrientation) {
        let Some(direction) = SwipeDirection::for_device(device) else {
            return;
        };
        let mut session = self.session.lock();
        if session.export_direction != direction {
            tracing::debug!(?device, ?direction, "export direction changed");
            session.export_direction = direction;
            self.publish(&session);
        }
    }

    /// Empty one slot. Not reachable from a gesture in the stock UI.
    pub fn clear_slot(&self, slot: usize) -> Result<Option<Photo>, GridError> {
        let mut session = self.session.lock();
        let taken = session.engine.clear_slot(slot)?;
        self.publish(&session);
        Ok(taken)
    }

    /// Fill `slot` with a photo from the library.
    ///
    /// Resolves once the photo is placed or the user backed out. Denied and
    /// restricted access raise an alert and return the error.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn on_cell_tapped(&self, slot: usize) -> Result<TapOutcome, GridError> {
        {
            let mut session = self.session.lock();
            let len = session.engine.arrangement().len();
            if slot >= len {
                let err = GridError::SlotIndexOutOfRange { index: slot, len };
                tracing::error!(%err, "tap outside the arrangement");
                return Err(err);
            }
            if session.phase != PickPhase::Idle {
                tracing::debug!(phase = ?session.phase, "pick in flight, ignoring tap");
                return Ok(TapOutcome::Ignored);
            }
            session.phase = PickPhase::AwaitingAuthorization;
            session.pending = Some(PendingSelection {
                slot,
                mode: PickMode::Single,
                epoch: session.engine.epoch(),
            });
            self.publish(&session);
        }
        let pick = PickGuard(self);

        let authorization = self.photos.request_authorization().await;
        tracing::debug!(?authorization, "authorization resolved");
        let result = match authorization {
            Authorization::Authorized => self.pick_single().await,
            Authorization::Limited => self.pick_from_batch().await,
            Authorization::Denied => Err(GridError::AccessDenied),
            Authorization::Restricted => Err(GridError::AccessRestricted),
        };

        drop(pick);
        if let Err(err) = result {
            self.alert(err);
        }
        result
    }

    /// Render the arrangement and hand it to the share sheet.
    ///
    /// Gestures in the wrong direction are ignored. An incomplete arrangement
    /// raises an alert and renders nothing. The grid slides off-screen while
    /// the share sheet is up and returns once it closes.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn on_export_gesture(
        &self,
        direction: SwipeDirection,
    ) -> Result<ExportOutcome, GridError> {
        let (arrangement, cached) = {
            let mut session = self.session.lock();
            if direction != session.export_direction {
                tracing::debug!(expected = ?session.export_direction, "ignoring swipe");
                return Ok(ExportOutcome::Ignored);
            }
            if session.exporting {
                tracing::debug!("export already running");
                return Ok(ExportOutcome::Ignored);
            }
            if !session.engine.is_complete() {
                drop(session);
                tracing::info!("export refused, layout has empty slots");
                self.alert(GridError::IncompleteLayout);
                return Err(GridError::IncompleteLayout);
            }
            session.exporting = true;
            session.transform = ExportTransform::off_screen(direction, self.config.export.viewport);
            self.publish(&session);
            (session.engine.arrangement().clone(), session.cached_render())
        };
        let export = ExportGuard(self);

        let image = match cached {
            Some(image) => image,
            None => {
                let canvas = arrangement.canvas().scaled(self.config.export.scale);
                let image = Arc::new(self.renderer.render(
                    &arrangement,
                    canvas,
                    self.config.export.background,
                ));
                self.session.lock().last_render = Some((arrangement.revision(), Arc::clone(&image)));
                image
            }
        };
        tracing::debug!(width = image.width(), height = image.height(), "sharing");
        self.sharing.share(Arc::clone(&image)).await;

        drop(export);
        Ok(ExportOutcome::Shared(image))
    }

    async fn pick_single(&self) -> Result<TapOutcome, GridError> {
        self.enter_photo_source(PickMode::Single);
        let assets = self.photos.pick_images(1).await;
        if assets.is_empty() {
            tracing::debug!("picker cancelled");
            return Ok(TapOutcome::Cancelled);
        }
        match self.load_all(&assets).await.into_iter().next() {
            Some(photo) => self.place(photo),
            None => Ok(TapOutcome::Cancelled),
        }
    }

    async fn pick_from_batch(&self) -> Result<TapOutcome, GridError> {
        self.enter_photo_source(PickMode::Batch);
        let stored = self
            .session
            .lock()
            .batch
            .clone()
            .filter(|batch| !batch.is_empty());
        let batch = match stored {
            Some(batch) => {
                tracing::debug!(len = batch.len(), "reusing limited batch");
                batch
            }
            None => {
                let assets = self
                    .photos
                    .pick_images(self.config.picker.limited_batch_size)
                    .await;
                if assets.is_empty() {
                    tracing::debug!("picker cancelled");
                    return Ok(TapOutcome::Cancelled);
                }
                let batch = self.load_all(&assets).await;
                tracing::debug!(picked = assets.len(), loaded = batch.len(), "limited batch fetched");
                self.session.lock().batch = Some(batch.clone());
                batch
            }
        };

        let Some(choice) = self.chooser.choose(&batch).await else {
            tracing::debug!("batch chooser dismissed");
            return Ok(TapOutcome::Cancelled);
        };
        let Some(photo) = batch.get(choice).cloned() else {
            tracing::warn!(choice, len = batch.len(), "chooser returned an index outside the batch");
            return Ok(TapOutcome::Cancelled);
        };
        if self.config.picker.consume_batch_selection
            && let Some(stored) = self.session.lock().batch.as_mut()
        {
            stored.retain(|p| *p != photo);
        }
        self.place(photo)
    }

    /// Load every asset concurrently, dropping the ones that fail.
    async fn load_all(&self, assets: &[AssetHandle]) -> Vec<Photo> {
        let loads = assets.iter().map(|asset| self.photos.load_image(asset));
        join_all(loads)
            .await
            .into_iter()
            .zip(assets)
            .filter_map(|(loaded, asset)| match loaded {
                Ok(photo) => Some(photo),
                Err(err) => {
                    tracing::warn!(%asset, %err, "dropping photo that failed to load");
                    None
                }
            })
            .collect()
    }

    fn place(&self, photo: Photo) -> Result<TapOutcome, GridError> {
        let mut session = self.session.lock();
        let Some(pending) = session.pending else {
            return Ok(TapOutcome::Cancelled);
        };
        if pending.epoch != session.engine.epoch() {
            tracing::warn!(slot = pending.slot, "layout changed while picking, discarding photo");
            return Ok(TapOutcome::Discarded);
        }
        session.engine.place_image(pending.slot, photo)?;
        tracing::debug!(
            slot = pending.slot,
            filled = session.engine.arrangement().filled_count(),
            "photo placed"
        );
        self.publish(&session);
        Ok(TapOutcome::Placed { slot: pending.slot })
    }

    fn enter_photo_source(&self, mode: PickMode) {
        let mut session = self.session.lock();
        session.phase = PickPhase::AwaitingPhotoSource;
        if let Some(pending) = session.pending.as_mut() {
            pending.mode = mode;
        }
        self.publish(&session);
    }

    fn alert(&self, err: GridError) {
        match Alert::for_error(err) {
            Some(alert) => {
                tracing::info!(%err, "alerting user");
                self.alerts.present_alert(alert);
            }
            None => tracing::error!(%err, "no alert for error"),
        }
    }

    fn publish(&self, session: &Session) {
        self.view.send_replace(session.snapshot());
    }
}

/// Returns the coordinator to idle when a pick ends, including when the
/// caller drops the future.
struct PickGuard<'a>(&'a Coordinator);

impl Drop for PickGuard<'_> {
    fn drop(&mut self) {
        let mut session = self.0.session.lock();
        session.phase = PickPhase::Idle;
        session.pending = None;
        self.0.publish(&session);
    }
}

/// Undoes the export transform once the share sheet closes.
struct ExportGuard<'a>(&'a Coordinator);

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        let mut session = self.0.session.lock();
        session.transform = ExportTransform::IDENTITY;
        session.exporting = false;
        if self.0.config.export.clear_after_share {
            session.engine.reset();
        }
        self.0.publish(&session);
    }
}
