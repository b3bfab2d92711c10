use crate::bin::Bin;
use crate::error::{RectPackerError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Clearance kept between a frame's border and its usable window, on every side.
pub const INNER_CLEARANCE: u32 = 15;

/// Axis-aligned rectangle. `x,y` is the bottom-left corner; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`), saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }
    /// Exclusive top edge (`y + h`), saturating at `u32::MAX`.
    pub fn top(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// Returns true if `self` lies entirely inside `other` (edges may touch).
    pub fn is_contained_in(&self, other: &Rect) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.top() <= other.top()
    }
    /// Returns true if the two rectangles share a region of positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x >= other.right()
            || other.x >= self.right()
            || self.y >= other.top()
            || other.y >= self.top())
    }
    /// Area of the overlap between the two rectangles.
    pub fn intersection_area(&self, other: &Rect) -> u64 {
        let w = self.right().min(other.right()).saturating_sub(self.x.max(other.x));
        let h = self.top().min(other.top()).saturating_sub(self.y.max(other.y));
        w as u64 * h as u64
    }
}

/// Per-rectangle rotation policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlipPolicy {
    /// Never rotated.
    NoFlip,
    /// Rotated when the bin allows it and the heuristic prefers it.
    #[default]
    AllowFlip,
    /// Always rotated, even in a bin that disallows flipping.
    ForceFlip,
}

impl FromStr for FlipPolicy {
    type Err = RectPackerError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "noflip" | "no_flip" | "no" => Ok(Self::NoFlip),
            "allowflip" | "allow_flip" | "allow" => Ok(Self::AllowFlip),
            "forceflip" | "force_flip" | "force" => Ok(Self::ForceFlip),
            other => Err(RectPackerError::InvalidConfig(format!(
                "unknown flip policy: {other}"
            ))),
        }
    }
}

/// Border widths of a windowed rectangle, in its current orientation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Borders {
    pub bottom: u32,
    pub left: u32,
    pub top: u32,
    pub right: u32,
}

impl Borders {
    /// Bottom/left borders; top mirrors bottom and right mirrors left.
    pub fn new(bottom: u32, left: u32) -> Self {
        Self {
            bottom,
            left,
            top: bottom,
            right: left,
        }
    }
    pub fn uniform(width: u32) -> Self {
        Self::new(width, width)
    }
    pub fn with_top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }
    pub fn with_right(mut self, right: u32) -> Self {
        self.right = right;
        self
    }
    fn rotated(self) -> Self {
        Self {
            left: self.bottom,
            top: self.left,
            right: self.top,
            bottom: self.right,
        }
    }
    fn unrotated(self) -> Self {
        Self {
            bottom: self.left,
            left: self.top,
            top: self.right,
            right: self.bottom,
        }
    }
}

/// Fields shared by every rectangle variant.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RectCore {
    pub(crate) rect: Rect,
    pub(crate) label: Option<String>,
    pub(crate) data: Option<serde_json::Value>,
    pub(crate) flip: FlipPolicy,
    pub(crate) rotated: bool,
}

/// A hollow frame: outer rectangle, borders and the aperture they leave.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WindowedData {
    pub(crate) core: RectCore,
    pub(crate) borders: Borders,
    pub(crate) hollow: bool,
    pub(crate) window: (u32, u32),
}

impl WindowedData {
    pub fn borders(&self) -> Borders {
        self.borders
    }
    pub fn is_hollow(&self) -> bool {
        self.hollow
    }
    /// Window size in the current orientation.
    pub fn window_size(&self) -> (u32, u32) {
        self.window
    }
    /// Window rectangle in bin coordinates, inset by border plus clearance.
    pub fn window_rect(&self) -> Rect {
        let r = self.core.rect;
        Rect::new(
            r.x + self.borders.left + INNER_CLEARANCE,
            r.y + self.borders.bottom + INNER_CLEARANCE,
            self.window.0,
            self.window.1,
        )
    }
    /// Rectangle bounded by the inner edge of the borders (window plus clearance).
    pub fn inner_rect(&self) -> Rect {
        let r = self.core.rect;
        Rect::new(
            r.x + self.borders.left,
            r.y + self.borders.bottom,
            r.w - self.borders.left - self.borders.right,
            r.h - self.borders.bottom - self.borders.top,
        )
    }
}

/// The placeable unit: a plain rectangle or a windowed frame.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rectangle {
    Plain(RectCore),
    Windowed(WindowedData),
}

impl Rectangle {
    /// Plain rectangle request. Both sides must be positive.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self::Plain(RectCore::sized(width, height)?))
    }

    /// Windowed (hollow by default) rectangle request.
    pub fn windowed(width: u32, height: u32, borders: Borders) -> Result<Self> {
        let core = RectCore::sized(width, height)?;
        let ww = width as i64
            - borders.left as i64
            - borders.right as i64
            - 2 * INNER_CLEARANCE as i64;
        let wh = height as i64
            - borders.bottom as i64
            - borders.top as i64
            - 2 * INNER_CLEARANCE as i64;
        if ww <= 0 || wh <= 0 {
            return Err(RectPackerError::InvalidWindow {
                width,
                height,
                window_width: ww,
                window_height: wh,
            });
        }
        Ok(Self::Windowed(WindowedData {
            core,
            borders,
            hollow: true,
            window: (ww as u32, wh as u32),
        }))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.core_mut().label = Some(label.into());
        self
    }
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.core_mut().data = Some(data);
        self
    }
    pub fn with_flip(mut self, flip: FlipPolicy) -> Self {
        self.core_mut().flip = flip;
        self
    }
    /// Marks a windowed rectangle's aperture as usable space. No effect on plain rectangles.
    pub fn with_hollow(mut self, hollow: bool) -> Self {
        if let Self::Windowed(w) = &mut self {
            w.hollow = hollow;
        }
        self
    }

    fn core(&self) -> &RectCore {
        match self {
            Self::Plain(c) => c,
            Self::Windowed(w) => &w.core,
        }
    }
    fn core_mut(&mut self) -> &mut RectCore {
        match self {
            Self::Plain(c) => c,
            Self::Windowed(w) => &mut w.core,
        }
    }

    pub fn rect(&self) -> Rect {
        self.core().rect
    }
    pub fn x(&self) -> u32 {
        self.core().rect.x
    }
    pub fn y(&self) -> u32 {
        self.core().rect.y
    }
    pub fn width(&self) -> u32 {
        self.core().rect.w
    }
    pub fn height(&self) -> u32 {
        self.core().rect.h
    }
    pub fn area(&self) -> u64 {
        self.core().rect.area()
    }
    pub fn label(&self) -> Option<&str> {
        self.core().label.as_deref()
    }
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.core().data.as_ref()
    }
    pub fn flip_policy(&self) -> FlipPolicy {
        self.core().flip
    }
    pub fn is_rotated(&self) -> bool {
        self.core().rotated
    }
    pub fn as_windowed(&self) -> Option<&WindowedData> {
        match self {
            Self::Windowed(w) => Some(w),
            Self::Plain(_) => None,
        }
    }
    /// The aperture that becomes free space once this rectangle is placed.
    pub fn hollow_window(&self) -> Option<Rect> {
        self.as_windowed()
            .filter(|w| w.hollow)
            .map(WindowedData::window_rect)
    }
    /// Area actually covered: a hollow frame does not cover its window.
    pub fn covered_area(&self) -> u64 {
        let aperture = self
            .as_windowed()
            .filter(|w| w.hollow)
            .map_or(0, |w| w.window.0 as u64 * w.window.1 as u64);
        self.area() - aperture
    }

    /// Copy of this rectangle (same variant, label, data) positioned at `x,y`.
    pub fn placed_at(&self, x: u32, y: u32) -> Self {
        let mut placed = self.clone();
        let core = placed.core_mut();
        core.rect.x = x;
        core.rect.y = y;
        placed
    }

    /// Turns the rectangle by 90°. A second call restores the original orientation.
    pub fn rotate(&mut self) {
        let turning_back = self.is_rotated();
        if let Self::Windowed(w) = self {
            w.window = (w.window.1, w.window.0);
            w.borders = if turning_back {
                w.borders.unrotated()
            } else {
                w.borders.rotated()
            };
        }
        let core = self.core_mut();
        std::mem::swap(&mut core.rect.w, &mut core.rect.h);
        core.rotated = !turning_back;
    }
}

impl RectCore {
    fn sized(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RectPackerError::InvalidGeometry { width, height });
        }
        Ok(Self {
            rect: Rect::new(0, 0, width, height),
            label: None,
            data: None,
            flip: FlipPolicy::default(),
            rotated: false,
        })
    }
}

/// Statistics about packing efficiency across a set of bins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackStats {
    pub num_bins: usize,
    pub num_placed: usize,
    pub num_rotated: usize,
    pub num_windowed: usize,
    /// Sum of `width * height` over all bins.
    pub total_bin_area: u64,
    /// Area covered by placed rectangles (hollow apertures excluded).
    pub used_area: u64,
    /// used_area / total_bin_area (0.0 to 1.0).
    pub occupancy: f64,
    /// `Bin::usage` of each bin, in order.
    pub bin_usage: Vec<f64>,
}

impl PackStats {
    pub fn from_bins(bins: &[Bin]) -> Self {
        let mut num_placed = 0;
        let mut num_rotated = 0;
        let mut num_windowed = 0;
        let mut total_bin_area = 0u64;
        let mut used_area = 0u64;
        let mut bin_usage = Vec::with_capacity(bins.len());

        for bin in bins {
            total_bin_area += bin.width() as u64 * bin.height() as u64;
            used_area += bin.used_area();
            bin_usage.push(bin.usage());
            for r in bin.used() {
                num_placed += 1;
                if r.is_rotated() {
                    num_rotated += 1;
                }
                if r.as_windowed().is_some() {
                    num_windowed += 1;
                }
            }
        }

        let occupancy = if total_bin_area > 0 {
            used_area as f64 / total_bin_area as f64
        } else {
            0.0
        };

        Self {
            num_bins: bins.len(),
            num_placed,
            num_rotated,
            num_windowed,
            total_bin_area,
            used_area,
            occupancy,
            bin_usage,
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Bins: {}, Placed: {}, Occupancy: {:.2}%, Total Area: {}, Used Area: {}, Rotated: {}, Windowed: {}",
            self.num_bins,
            self.num_placed,
            self.occupancy * 100.0,
            self.total_bin_area,
            self.used_area,
            self.num_rotated,
            self.num_windowed,
        )
    }

    pub fn wasted_area(&self) -> u64 {
        self.total_bin_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_bin_area > 0 {
            (self.wasted_area() as f64 / self.total_bin_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
