//! SVG previews of arrangements and the layout picker.
//!
//! # Example
//!
//! ```
//! use zengrid::{CanvasColor, GridMetrics, LayoutEngine, LayoutId};
//! use zengrid::svg::{render_arrangement_svg, render_layout_picker_svg};
//!
//! let mut engine = LayoutEngine::<u32>::new(GridMetrics::default());
//! engine.select_layout(LayoutId::BottomRectangle);
//! engine.place_image(2, 7).unwrap();
//!
//! let svg = render_arrangement_svg(engine.arrangement(), CanvasColor::BRAND);
//! assert!(svg.contains("#106596"));
//!
//! let picker = render_layout_picker_svg(engine.layout());
//! assert!(picker.contains("bottom-rectangle"));
//! ```

#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::color::CanvasColor;
use crate::constraint::Rect;
use crate::engine::{Arrangement, GridMetrics, LayoutEngine};
use crate::model::{LayoutId, list_layouts};

/// Thumbnail cell edge in the picker strip.
const THUMB_CELL: u32 = 24;
/// Gutter inside a thumbnail.
const THUMB_SPACING: u32 = 4;
/// Gap between thumbnails.
const THUMB_GAP: u32 = 20;
/// Outer margin of the picker strip.
const MARGIN: u32 = 16;
/// Height of the caption under each thumbnail.
const LABEL_H: u32 = 18;

const STYLE: &str = r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 11px; fill: #333; }
  .empty { fill: #ffffff; stroke: #999; stroke-width: 1; }
  .filled { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  .plus { font-size: 28px; fill: #106596; }
  .selected { fill: none; stroke: #f5a623; stroke-width: 3; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .empty { fill: #2d2d2d; stroke: #555; }
    .filled { fill: #3a72a4; stroke: #5a9fd4; }
  }
</style>
"##;

/// Render the arrangement at its own canvas size. Filled slots are shaded
/// and labelled with their index; empty slots show the `+` placeholder.
pub fn render_arrangement_svg<I>(arrangement: &Arrangement<I>, background: CanvasColor) -> String {
    let canvas = arrangement.canvas();
    let mut svg = header(canvas.width, canvas.height);
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        canvas.width,
        canvas.height,
        fill_attr(background)
    ));
    svg.push('\n');

    for (index, slot) in arrangement.slots().iter().enumerate() {
        let frame = slot.frame();
        if slot.is_filled() {
            push_rect(&mut svg, frame, "filled");
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" class="label" text-anchor="middle">slot {}</text>"#,
                frame.x + frame.width / 2,
                frame.y + frame.height / 2 + 4,
                index
            ));
        } else {
            push_rect(&mut svg, frame, "empty");
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" class="plus" text-anchor="middle">+</text>"#,
                frame.x + frame.width / 2,
                frame.y + frame.height / 2 + 10
            ));
        }
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render the layout picker: one empty thumbnail per built-in layout in
/// picker order, with `selected` outlined.
pub fn render_layout_picker_svg(selected: LayoutId) -> String {
    let metrics = GridMetrics {
        cell_edge: THUMB_CELL,
        spacing: THUMB_SPACING,
        margin: 0,
    };
    let thumb = metrics.canvas();
    let layouts = list_layouts();
    let count = layouts.len() as u32;
    let width = 2 * MARGIN + count * thumb.width + count.saturating_sub(1) * THUMB_GAP;
    let height = 2 * MARGIN + thumb.height + LABEL_H;

    let mut svg = header(width, height);
    for (i, &id) in layouts.iter().enumerate() {
        let x0 = MARGIN + i as u32 * (thumb.width + THUMB_GAP);
        let y0 = MARGIN;
        let engine = LayoutEngine::<()>::with_layout(metrics, id);
        for slot in engine.arrangement().slots() {
            let f = slot.frame();
            push_rect(
                &mut svg,
                Rect::new(x0 + f.x, y0 + f.y, f.width, f.height),
                "empty",
            );
            svg.push('\n');
        }
        if id == selected {
            svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" class="selected" rx="3"/>"#,
                x0 as i64 - 3,
                y0 as i64 - 3,
                thumb.width + 6,
                thumb.height + 6
            ));
            svg.push('\n');
        }
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
            x0 + thumb.width / 2,
            y0 + thumb.height + LABEL_H - 4,
            id
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

fn header(width: u32, height: u32) -> String {
    let mut svg = String::with_capacity(2048);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ));
    svg.push('\n');
    svg.push_str(STYLE);
    svg
}

fn push_rect(svg: &mut String, r: Rect, class: &str) {
    svg.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" class="{}"/>"#,
        r.x, r.y, r.width, r.height, class
    ));
}

/// SVG has no 8-digit hex in every renderer, so alpha goes in `fill-opacity`.
fn fill_attr(color: CanvasColor) -> String {
    let [r, g, b, a] = color.to_rgba();
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!(
            "#{r:02x}{g:02x}{b:02x}\" fill-opacity=\"{:.3}",
            a as f32 / 255.0
        )
    }
}
