//! Headless grid builder.
//!
//! Fills every slot of a layout from image files, in order, and writes the
//! exported grid as a PNG.
//!
//! Usage:
//!   zengrid --out grid.png a.jpg b.jpg c.jpg d.jpg
//!   zengrid --layout bottom-rectangle --out grid.png a.jpg b.jpg c.jpg
//!   zengrid --layout 2 --config zengrid.toml --preview grid.svg --out grid.png a.jpg b.jpg c.jpg
//!
//! `--limited` simulates limited library access: photos are fetched in
//! batches, and each tap takes the first photo left in the batch.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::Parser;
use image::RgbaImage;
use parking_lot::Mutex;
use tracing_subscriber::{EnvFilter, fmt};

use zengrid::coordinator::{
    Alert, AlertPresenter, AssetHandle, Authorization, BatchChooser, PhotoLoadError, PhotoSource,
    SharingFacility,
};
use zengrid::svg::render_arrangement_svg;
use zengrid::{
    Config, Coordinator, ExportOutcome, GridError, LayoutId, Photo, Ports, TapOutcome,
};

/// Build a photo grid from image files.
#[derive(Parser, Debug)]
#[command(name = "zengrid")]
#[command(about = "Fill a photo-grid layout from image files and export it as PNG")]
struct Args {
    /// Layout name (four-squares, bottom-rectangle, top-rectangle) or picker index
    #[arg(short, long)]
    layout: Option<LayoutId>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export scale, overriding the config
    #[arg(long)]
    scale: Option<u32>,

    /// Fetch photos in limited-access batches
    #[arg(long)]
    limited: bool,

    /// Also write an SVG preview of the filled arrangement
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    out: PathBuf,

    /// Photos, in slot order
    #[arg(required = true)]
    photos: Vec<PathBuf>,
}

/// Serves files from the command line in order.
struct FilePhotoSource {
    queue: Mutex<VecDeque<PathBuf>>,
    authorization: Authorization,
}

impl FilePhotoSource {
    fn new(paths: Vec<PathBuf>, limited: bool) -> Self {
        Self {
            queue: Mutex::new(paths.into()),
            authorization: if limited {
                Authorization::Limited
            } else {
                Authorization::Authorized
            },
        }
    }
}

#[async_trait]
impl PhotoSource for FilePhotoSource {
    async fn request_authorization(&self) -> Authorization {
        self.authorization
    }

    async fn pick_images(&self, max: usize) -> Vec<AssetHandle> {
        let mut queue = self.queue.lock();
        let n = max.min(queue.len());
        queue
            .drain(..n)
            .map(|path| AssetHandle(path.display().to_string()))
            .collect()
    }

    async fn load_image(&self, asset: &AssetHandle) -> Result<Photo, PhotoLoadError> {
        let bytes = tokio::fs::read(&asset.0).await?;
        Ok(Photo::decode(&bytes)?)
    }
}

struct FirstChoice;

#[async_trait]
impl BatchChooser for FirstChoice {
    async fn choose(&self, batch: &[Photo]) -> Option<usize> {
        (!batch.is_empty()).then_some(0)
    }
}

/// Writes the shared image to disk.
struct PngSink {
    path: PathBuf,
    saved: Mutex<Option<image::ImageResult<()>>>,
}

impl PngSink {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            saved: Mutex::new(None),
        }
    }

    fn finish(&self) -> Result<&Path> {
        match self.saved.lock().take() {
            Some(Ok(())) => Ok(&self.path),
            Some(Err(err)) => {
                Err(err).with_context(|| format!("writing {}", self.path.display()))
            }
            None => bail!("nothing was shared"),
        }
    }
}

#[async_trait]
impl SharingFacility for PngSink {
    async fn share(&self, image: Arc<RgbaImage>) {
        let result = image.save_with_format(&self.path, image::ImageFormat::Png);
        if let Err(err) = &result {
            tracing::error!(path = %self.path.display(), %err, "could not save grid");
        }
        *self.saved.lock() = Some(result);
    }
}

struct LogAlerts;

impl AlertPresenter for LogAlerts {
    fn present_alert(&self, alert: Alert) {
        tracing::warn!(title = alert.title, "{}", alert.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(layout) = args.layout {
        config.initial_layout = layout;
    }
    if let Some(scale) = args.scale {
        config.export.scale = scale;
    }
    if args.limited {
        config.picker.consume_batch_selection = true;
    }
    config.validate()?;

    let photo_count = args.photos.len();
    let sink = Arc::new(PngSink::new(args.out.clone()));
    let ports = Ports::new(
        Arc::new(FilePhotoSource::new(args.photos, args.limited)),
        Arc::new(FirstChoice),
        sink.clone(),
        Arc::new(LogAlerts),
    );
    let coordinator = Coordinator::new(config, ports);

    let slots = coordinator.view().arrangement.len();
    tracing::info!(layout = %coordinator.view().layout, slots, photos = photo_count, "filling grid");
    if photo_count > slots {
        tracing::warn!(unused = photo_count - slots, "more photos than slots");
    }
    for slot in 0..slots {
        match coordinator.on_cell_tapped(slot).await? {
            TapOutcome::Placed { .. } => {}
            outcome => tracing::warn!(slot, ?outcome, "slot left empty"),
        }
    }

    if let Some(preview) = &args.preview {
        let view = coordinator.view();
        let svg = render_arrangement_svg(&view.arrangement, coordinator.config().export.background);
        tokio::fs::write(preview, svg)
            .await
            .with_context(|| format!("writing {}", preview.display()))?;
    }

    let direction = coordinator.view().export_direction;
    match coordinator.on_export_gesture(direction).await {
        Ok(ExportOutcome::Shared(image)) => {
            let path = sink.finish()?;
            tracing::info!(
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                "grid exported"
            );
            Ok(())
        }
        Ok(ExportOutcome::Ignored) => bail!("export was not started"),
        Err(GridError::IncompleteLayout) => {
            let filled = coordinator.view().arrangement.filled_count();
            bail!("only {filled} of {slots} slots could be filled")
        }
        Err(err) => Err(err.into()),
    }
}
