//! Photo orientation (D4 dihedral group, EXIF mapping), device orientation,
//! and the export swipe that follows it.

use crate::constraint::{Rect, Size};

/// Photo orientation as an element of the D4 dihedral group.
///
/// A rotation (0, 90, 180, 270 degrees clockwise) optionally followed by a
/// horizontal flip. All 8 EXIF orientations map to this. Photos arrive from
/// the library in stored (sensor) order; the compositor crops in stored
/// order and orients only the cropped region.
///
/// ```text
///     1: Identity    2: FlipH       3: Rotate180   4: FlipV
///     5: Transpose   6: Rotate90    7: Transverse  8: Rotate270
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Orientation {
    /// Rotation in 90-degree increments (0-3). 0=0°, 1=90°, 2=180°, 3=270°.
    pub rotation: u8,
    /// Horizontal flip applied after rotation.
    pub flip: bool,
}

impl Orientation {
    /// Identity. EXIF 1.
    pub const IDENTITY: Self = Self {
        rotation: 0,
        flip: false,
    };
    /// Horizontal flip. EXIF 2.
    pub const FLIP_H: Self = Self {
        rotation: 0,
        flip: true,
    };
    /// 180° rotation. EXIF 3.
    pub const ROTATE_180: Self = Self {
        rotation: 2,
        flip: false,
    };
    /// Vertical flip. EXIF 4.
    pub const FLIP_V: Self = Self {
        rotation: 2,
        flip: true,
    };
    /// Reflect over the main diagonal. EXIF 5.
    pub const TRANSPOSE: Self = Self {
        rotation: 1,
        flip: true,
    };
    /// 90° clockwise. EXIF 6.
    pub const ROTATE_90: Self = Self {
        rotation: 1,
        flip: false,
    };
    /// Reflect over the anti-diagonal. EXIF 7.
    pub const TRANSVERSE: Self = Self {
        rotation: 3,
        flip: true,
    };
    /// 270° clockwise. EXIF 8.
    pub const ROTATE_270: Self = Self {
        rotation: 3,
        flip: false,
    };

    /// Indexed by EXIF value - 1.
    const EXIF: [Self; 8] = [
        Self::IDENTITY,
        Self::FLIP_H,
        Self::ROTATE_180,
        Self::FLIP_V,
        Self::TRANSPOSE,
        Self::ROTATE_90,
        Self::TRANSVERSE,
        Self::ROTATE_270,
    ];

    /// From an EXIF orientation tag (1-8). `None` for anything else.
    pub fn from_exif(value: u8) -> Option<Self> {
        (1..=8)
            .contains(&value)
            .then(|| Self::EXIF[(value - 1) as usize])
    }

    /// EXIF orientation tag (1-8).
    pub fn to_exif(self) -> u8 {
        Self::EXIF
            .iter()
            .position(|&o| o.rotation == self.rotation & 3 && o.flip == self.flip)
            .map_or(1, |i| i as u8 + 1)
    }

    pub fn is_identity(self) -> bool {
        self.rotation & 3 == 0 && !self.flip
    }

    /// Whether this orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self.rotation % 2 == 1
    }

    /// Stored dimensions → display dimensions.
    pub fn transform_dimensions(self, w: u32, h: u32) -> Size {
        if self.swaps_axes() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }

    /// Map a rect in display coordinates back to stored coordinates.
    ///
    /// `source_w`/`source_h` are the stored dimensions.
    pub fn transform_rect_to_source(self, rect: Rect, source_w: u32, source_h: u32) -> Rect {
        let (rx, ry, rw, rh) = (rect.x, rect.y, rect.width, rect.height);
        let (sw, sh) = (source_w, source_h);

        match (self.rotation & 3, self.flip) {
            (0, false) => Rect::new(rx, ry, rw, rh),
            (0, true) => Rect::new(sw - rx - rw, ry, rw, rh),
            (1, false) => Rect::new(ry, sh - rx - rw, rh, rw),
            (1, true) => Rect::new(ry, rx, rh, rw),
            (2, false) => Rect::new(sw - rx - rw, sh - ry - rh, rw, rh),
            (2, true) => Rect::new(rx, sh - ry - rh, rw, rh),
            (3, false) => Rect::new(sw - ry - rh, rx, rh, rw),
            (3, true) => Rect::new(sw - ry - rh, sh - rx - rw, rh, rw),
            _ => unreachable!(),
        }
    }

    /// Apply to pixels: rotate clockwise, then flip horizontally if set.
    #[cfg(feature = "compose")]
    pub fn apply(self, image: &image::RgbaImage) -> image::RgbaImage {
        use image::imageops;

        let mut out = match self.rotation & 3 {
            1 => imageops::rotate90(image),
            2 => imageops::rotate180(image),
            3 => imageops::rotate270(image),
            _ => image.clone(),
        };
        if self.flip {
            imageops::flip_horizontal_in_place(&mut out);
        }
        out
    }
}

/// Physical orientation of the host device, as forwarded by the shell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// Direction of the export swipe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SwipeDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// The export swipe for a device orientation. `None` keeps the current one
    /// (flat and upside-down positions do not change it).
    pub fn for_device(device: DeviceOrientation) -> Option<Self> {
        match device {
            DeviceOrientation::Portrait => Some(Self::Up),
            DeviceOrientation::LandscapeLeft | DeviceOrientation::LandscapeRight => {
                Some(Self::Left)
            }
            _ => None,
        }
    }

    /// Translation that slides a view of size `viewport` fully off-screen in
    /// this direction.
    pub fn off_screen_offset(self, viewport: Size) -> (i64, i64) {
        let (w, h) = (viewport.width as i64, viewport.height as i64);
        match self {
            Self::Up => (0, -h),
            Self::Down => (0, h),
            Self::Left => (-w, 0),
            Self::Right => (w, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Orientation; 8] = Orientation::EXIF;

    #[test]
    fn exif_round_trip() {
        for v in 1..=8u8 {
            let o = Orientation::from_exif(v).unwrap();
            assert_eq!(o.to_exif(), v, "round-trip failed for EXIF {v}");
        }
    }

    #[test]
    fn exif_out_of_range() {
        assert_eq!(Orientation::from_exif(0), None);
        assert_eq!(Orientation::from_exif(9), None);
    }

    #[test]
    fn dimensions_swap_for_quarter_turns() {
        assert_eq!(Orientation::ROTATE_90.transform_dimensions(4, 3), Size::new(3, 4));
        assert_eq!(Orientation::FLIP_V.transform_dimensions(4, 3), Size::new(4, 3));
        assert_eq!(Orientation::TRANSVERSE.transform_dimensions(4, 3), Size::new(3, 4));
    }

    #[test]
    fn full_rect_maps_to_full_source() {
        for o in ALL {
            let display = o.transform_dimensions(40, 30);
            let r = o.transform_rect_to_source(
                Rect::new(0, 0, display.width, display.height),
                40,
                30,
            );
            assert!(r.is_full(40, 30), "{o:?} → {r:?}");
        }
    }

    #[test]
    fn swipe_follows_device() {
        assert_eq!(
            SwipeDirection::for_device(DeviceOrientation::Portrait),
            Some(SwipeDirection::Up)
        );
        assert_eq!(
            SwipeDirection::for_device(DeviceOrientation::LandscapeRight),
            Some(SwipeDirection::Left)
        );
        assert_eq!(SwipeDirection::for_device(DeviceOrientation::FaceUp), None);
    }

    #[test]
    fn off_screen_offsets() {
        let vp = Size::new(390, 844);
        assert_eq!(SwipeDirection::Up.off_screen_offset(vp), (0, -844));
        assert_eq!(SwipeDirection::Left.off_screen_offset(vp), (-390, 0));
    }

    #[cfg(feature = "compose")]
    mod pixels {
        use super::*;
        use image::{Rgba, RgbaImage, imageops};

        /// Every pixel stores its own stored-order coordinates.
        fn coords(w: u32, h: u32) -> RgbaImage {
            RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]))
        }

        #[test]
        fn apply_matches_dimension_transform() {
            let src = coords(5, 3);
            for o in ALL {
                let out = o.apply(&src);
                let d = o.transform_dimensions(5, 3);
                assert_eq!(out.dimensions(), (d.width, d.height), "{o:?}");
            }
        }

        #[test]
        fn crop_then_orient_equals_orient_then_crop() {
            let src = coords(7, 5);
            for o in ALL {
                let oriented = o.apply(&src);
                let display = Rect::new(1, 2, 3, 2);
                let expected =
                    imageops::crop_imm(&oriented, display.x, display.y, 3, 2).to_image();

                let s = o.transform_rect_to_source(display, 7, 5);
                let cropped = imageops::crop_imm(&src, s.x, s.y, s.width, s.height).to_image();
                assert_eq!(o.apply(&cropped), expected, "{o:?}");
            }
        }
    }
}
