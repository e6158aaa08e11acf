//! Decoded photos as placed into slots.

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageDecoder, ImageReader, ImageResult, RgbaImage};

use crate::constraint::Size;
use crate::orientation::Orientation;

/// A decoded photo in stored pixel order, plus the orientation needed to
/// display it upright.
///
/// Cloning is cheap; pixels are shared.
#[derive(Clone, Debug)]
pub struct Photo {
    pixels: Arc<RgbaImage>,
    orientation: Orientation,
}

impl Photo {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
            orientation: Orientation::IDENTITY,
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.into_rgba8())
    }

    /// Decode any format the `image` features enable. Pixels stay in stored
    /// order; the EXIF orientation, if any, is kept alongside.
    pub fn decode(bytes: &[u8]) -> ImageResult<Self> {
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_decoder()?;
        let exif = decoder.orientation()?.to_exif();
        let image = DynamicImage::from_decoder(decoder)?;
        let orientation = Orientation::from_exif(exif).unwrap_or(Orientation::IDENTITY);
        Ok(Self::from_dynamic(image).with_orientation(orientation))
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Pixels in stored order.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn stored_size(&self) -> Size {
        let (w, h) = self.pixels.dimensions();
        Size::new(w, h)
    }

    /// Size once oriented upright.
    pub fn display_size(&self) -> Size {
        let (w, h) = self.pixels.dimensions();
        self.orientation.transform_dimensions(w, h)
    }
}

/// Same pixel buffer, same orientation.
impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels) && self.orientation == other.orientation
    }
}
