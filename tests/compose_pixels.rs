//! Pixel-exact composition checks.
//!
//! Every source pixel stores its own (x, y) in its red and green channels and
//! a per-photo tag in blue, so any wrong crop, orientation, or placement shows
//! up as a mismatched coordinate in the output.

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use zengrid::*;

/// Photo whose pixel (x, y) is `[x, y, tag, 255]`. Both edges must be <= 256.
fn encoded(w: u32, h: u32, tag: u8) -> Photo {
    Photo::new(RgbaImage::from_fn(w, h, |x, y| {
        Rgba([x as u8, y as u8, tag, 255])
    }))
}

fn nearest() -> Compositor {
    Compositor::new().with_filter(FilterType::Nearest)
}

fn filled(layout: LayoutId, photos: Vec<Photo>) -> LayoutEngine<Photo> {
    let mut engine = LayoutEngine::with_layout(GridMetrics::default(), layout);
    for (slot, photo) in photos.into_iter().enumerate() {
        engine.place_image(slot, photo).unwrap();
    }
    engine
}

fn close(actual: u8, expected: u32) -> bool {
    (actual as i64 - expected as i64).abs() <= 1
}

#[test]
fn wide_photo_keeps_center_columns() {
    let engine = filled(
        LayoutId::FourSquares,
        vec![
            encoded(240, 120, 0),
            encoded(120, 120, 1),
            encoded(120, 120, 2),
            encoded(120, 120, 3),
        ],
    );
    let out = nearest().render(engine.arrangement(), Size::new(240, 240), CanvasColor::BRAND);
    for j in 0..120 {
        for i in 0..120 {
            assert_eq!(
                out.get_pixel(i, j).0,
                [(60 + i) as u8, j as u8, 0, 255],
                "({i},{j})"
            );
        }
    }
}

#[test]
fn tall_photo_keeps_center_rows() {
    let engine = filled(
        LayoutId::FourSquares,
        vec![
            encoded(120, 120, 0),
            encoded(120, 120, 1),
            encoded(120, 120, 2),
            encoded(120, 240, 3),
        ],
    );
    let out = nearest().render(engine.arrangement(), Size::new(240, 240), CanvasColor::BRAND);
    for j in 0..120 {
        for i in 0..120 {
            assert_eq!(
                out.get_pixel(120 + i, 120 + j).0,
                [i as u8, (60 + j) as u8, 3, 255],
                "({i},{j})"
            );
        }
    }
}

#[test]
fn crop_is_taken_upright() {
    // Stored 120×240, displayed 240×120 after a clockwise quarter turn.
    let rotated = encoded(120, 240, 1).with_orientation(Orientation::ROTATE_90);
    let engine = filled(
        LayoutId::FourSquares,
        vec![
            encoded(120, 120, 0),
            rotated,
            encoded(120, 120, 2),
            encoded(120, 120, 3),
        ],
    );
    let out = nearest().render(engine.arrangement(), Size::new(240, 240), CanvasColor::BRAND);
    for j in 0..120 {
        for i in 0..120 {
            assert_eq!(
                out.get_pixel(120 + i, j).0,
                [j as u8, (179 - i) as u8, 1, 255],
                "({i},{j})"
            );
        }
    }
}

#[test]
fn wide_cell_takes_matching_photo_unchanged() {
    let engine = filled(
        LayoutId::BottomRectangle,
        vec![
            encoded(120, 120, 0),
            encoded(120, 120, 1),
            encoded(240, 120, 2),
        ],
    );
    let out = nearest().render(engine.arrangement(), Size::new(240, 240), CanvasColor::BRAND);
    for j in 0..120 {
        for i in 0..240 {
            assert_eq!(out.get_pixel(i, 120 + j).0, [i as u8, j as u8, 2, 255]);
        }
    }
}

#[test]
fn every_pixel_comes_from_its_slot() {
    for layout in list_layouts() {
        let n = cell_specs(*layout).len();
        let photos = (0..n).map(|i| encoded(97 + 31 * i as u32, 143, i as u8)).collect();
        let engine = filled(*layout, photos);
        let out = nearest().render(engine.arrangement(), Size::new(240, 240), CanvasColor::BRAND);
        for (index, slot) in engine.arrangement().slots().iter().enumerate() {
            let f = slot.frame();
            for y in f.y..f.bottom() {
                for x in f.x..f.right() {
                    let px = out.get_pixel(x, y).0;
                    assert_eq!(px[2], index as u8, "{layout} slot {index} at ({x},{y})");
                    assert_eq!(px[3], 255);
                }
            }
        }
    }
}

#[test]
fn export_canvas_scales_frames() {
    let engine = filled(
        LayoutId::TopRectangle,
        vec![
            encoded(240, 120, 0),
            encoded(120, 120, 1),
            encoded(120, 120, 2),
        ],
    );
    let out = nearest().render(engine.arrangement(), Size::new(480, 480), CanvasColor::BRAND);
    assert_eq!(out.dimensions(), (480, 480));
    // Wide cell now 480×240, sampled at half rate.
    for (x, y) in [(0, 0), (100, 50), (479, 239), (250, 200)] {
        let [r, g, tag, _] = out.get_pixel(x, y).0;
        assert_eq!(tag, 0);
        assert!(close(r, x / 2) && close(g, y / 2), "({x},{y}) -> ({r},{g})");
    }
    assert_eq!(out.get_pixel(100, 300).0[2], 1);
    assert_eq!(out.get_pixel(400, 300).0[2], 2);
}

#[test]
fn distort_squeezes_instead_of_cropping() {
    let engine = filled(
        LayoutId::FourSquares,
        vec![
            encoded(240, 120, 0),
            encoded(120, 120, 1),
            encoded(120, 120, 2),
            encoded(120, 120, 3),
        ],
    );
    let out = nearest()
        .with_fill_mode(FillMode::Distort)
        .render(engine.arrangement(), Size::new(240, 240), CanvasColor::BRAND);
    for (x, y) in [(0, 0), (60, 60), (119, 119)] {
        let [r, g, _, _] = out.get_pixel(x, y).0;
        assert!(close(r, 2 * x) || close(r, 2 * x + 1), "({x},{y}) -> {r}");
        assert!(close(g, y));
    }
}

#[test]
fn gutters_and_margins_show_background() {
    let metrics = GridMetrics {
        cell_edge: 120,
        spacing: 20,
        margin: 10,
    };
    let mut engine = LayoutEngine::with_layout(metrics, LayoutId::BottomRectangle);
    for slot in 0..3 {
        engine.place_image(slot, encoded(50, 50, slot as u8)).unwrap();
    }
    let canvas = engine.arrangement().canvas();
    assert_eq!(canvas, Size::new(280, 280));
    let out = nearest().render(engine.arrangement(), canvas, CanvasColor::white());
    let white = [255, 255, 255, 255];
    assert_eq!(out.get_pixel(0, 0).0, white);
    assert_eq!(out.get_pixel(139, 60).0, white);
    assert_eq!(out.get_pixel(60, 139).0, white);
    assert_eq!(out.get_pixel(279, 279).0, white);
    // The wide cell bridges the column gutter.
    assert_eq!(out.get_pixel(140, 200).0[2], 2);
}
