//! Visualisation of a single bin: SVG document and raster image.
//!
//! Used rectangles are drawn with a dashed red outline (windowed ones also show
//! their inner border), free rectangles with a blue outline over a faint grey
//! fill, and labels are centred and word-wrapped inside their rectangle.

use crate::bin::Bin;
use crate::error::{RectPackerError, Result};
use crate::model::Rect;
use image::RgbaImage;
use resvg::usvg::{self, fontdb};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use svg::Document;
use svg::node::element::{Group, Rectangle as SvgRect, Text};
use tracing::{debug, warn};

/// Average glyph advance as a fraction of the font size, used for wrapping.
const GLYPH_ADVANCE: f32 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT: f32 = 1.2;

/// Recognized visualisation options (`font`, `fontSize`, `fontColour`, `labelMargin`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualisationOptions {
    /// Font file used for labels. System fonts are used when unset.
    pub font: Option<PathBuf>,
    pub font_size: u32,
    pub font_colour: String,
    /// Horizontal space kept free on each side of a label.
    pub label_margin: u32,
    /// Blank space around the bin in the output image.
    pub margin: u32,
}

impl Default for VisualisationOptions {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 12,
            font_colour: "black".into(),
            label_margin: 5,
            margin: 10,
        }
    }
}

/// Greedy word wrap of `label` into lines no wider than `max_width` pixels.
/// A single word longer than a line keeps a line of its own.
pub fn wrap_label(label: &str, max_width: u32, font_size: u32) -> Vec<String> {
    let advance = (font_size as f32 * GLYPH_ADVANCE).max(1.0);
    let max_chars = ((max_width as f32 / advance).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut line = String::new();
    for word in label.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.chars().count() + 1 + word.chars().count() <= max_chars {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Flips a bin rectangle (origin bottom-left) into image space (origin top-left).
fn to_canvas(bin: &Bin, r: &Rect, margin: u32) -> (u32, u32, u32, u32) {
    let x = margin + r.x;
    let y = margin + bin.height() - r.y - r.h;
    (x, y, r.w, r.h)
}

fn outline(bin: &Bin, r: &Rect, margin: u32) -> SvgRect {
    let (x, y, w, h) = to_canvas(bin, r, margin);
    SvgRect::new()
        .set("x", x)
        .set("y", y)
        .set("width", w)
        .set("height", h)
}

/// Family name of the first face loaded after index `first_face`.
fn loaded_family(db: &fontdb::Database, first_face: usize) -> Option<String> {
    db.faces()
        .nth(first_face)
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone())
}

fn build_svg(bin: &Bin, opts: &VisualisationOptions, family: &str) -> Document {
    let m = opts.margin;
    let (cw, ch) = (bin.width() + 2 * m, bin.height() + 2 * m);

    let mut used_group = Group::new()
        .set("id", "used")
        .set("fill", "white")
        .set("stroke", "red")
        .set("stroke-width", 1)
        .set("stroke-dasharray", 5)
        .set("stroke-dashoffset", 5);
    let mut label_group = Group::new()
        .set("id", "labels")
        .set("font-family", family)
        .set("font-size", opts.font_size)
        .set("fill", opts.font_colour.as_str())
        .set("text-anchor", "middle");

    for r in bin.used() {
        let rect = r.rect();
        used_group = used_group.add(outline(bin, &rect, m));
        if let Some(w) = r.as_windowed() {
            used_group = used_group.add(outline(bin, &w.inner_rect(), m));
        }

        if let Some(label) = r.label() {
            let avail = rect.w.saturating_sub(2 * opts.label_margin);
            let lines = wrap_label(label, avail, opts.font_size);
            let line_h = opts.font_size as f32 * LINE_HEIGHT;
            let (x, y, w, h) = to_canvas(bin, &rect, m);
            let cx = x as f32 + w as f32 / 2.0;
            // baseline of the first line so the block is vertically centred
            let first = y as f32 + h as f32 / 2.0 - line_h * (lines.len() as f32 - 1.0) / 2.0
                + opts.font_size as f32 * 0.35;
            for (i, line) in lines.into_iter().enumerate() {
                label_group = label_group.add(
                    Text::new(line)
                        .set("x", cx)
                        .set("y", first + i as f32 * line_h),
                );
            }
        }
    }

    let mut free_group = Group::new()
        .set("id", "free")
        .set("fill", "gray")
        .set("fill-opacity", 0.1)
        .set("stroke", "blue")
        .set("stroke-width", 1);
    for fr in bin.free() {
        free_group = free_group.add(outline(bin, fr, m));
    }

    Document::new()
        .set("width", cw)
        .set("height", ch)
        .set("viewBox", (0, 0, cw, ch))
        .add(
            SvgRect::new()
                .set("width", cw)
                .set("height", ch)
                .set("fill", "white"),
        )
        .add(used_group)
        .add(free_group)
        .add(label_group)
}

/// SVG drawing of `bin`, with labels set in the default sans-serif family
/// (or the configured font's family name when rasterized via `render_bin`).
pub fn bin_to_svg(bin: &Bin, opts: &VisualisationOptions) -> Document {
    build_svg(bin, opts, "sans-serif")
}

/// Rasterizes `bin` over a white background.
pub fn render_bin(bin: &Bin, opts: &VisualisationOptions) -> Result<RgbaImage> {
    let mut db = fontdb::Database::new();
    let mut family = None;
    if bin.used().iter().any(|r| r.label().is_some()) {
        db.load_system_fonts();
        if let Some(font) = &opts.font {
            let before = db.len();
            match db.load_font_file(font) {
                Ok(()) => family = loaded_family(&db, before),
                Err(e) => {
                    warn!(font = %font.display(), error = %e, "could not load font, using system fonts")
                }
            }
        }
    }
    let family = family.unwrap_or_else(|| "sans-serif".to_string());
    let document = build_svg(bin, opts, &family);

    let usvg_opts = usvg::Options {
        fontdb: Arc::new(db),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&document.to_string(), &usvg_opts)
        .map_err(|e| RectPackerError::Render(format!("svg parse failed: {e}")))?;
    let size = tree.size();
    let (width, height) = (size.width().ceil() as u32, size.height().ceil() as u32);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RectPackerError::Render(format!("invalid canvas {width}x{height}")))?;
    pixmap.fill(resvg::tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );
    debug!(width, height, "bin rendered");

    // Opaque background, so premultiplied and straight alpha coincide.
    RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| RectPackerError::Render("pixel buffer size mismatch".into()))
}
