use crate::config::{FlipTrigger, Heuristic, PackerConfig, validate_bin};
use crate::error::Result;
use crate::free_space::{prune_free_list, split_free_node};
use crate::heuristic::{Candidate, PlacementHeuristic};
use crate::model::{Rect, Rectangle};
use tracing::{debug, trace};

/// Packing state of one container.
///
/// The free list starts as the whole bin minus its borders and only changes
/// through `insert`/`insert_many`. A failed insert leaves the bin untouched.
#[derive(Debug, Clone)]
pub struct Bin {
    width: u32,
    height: u32,
    allow_flip: bool,
    left_border: u32,
    bottom_border: u32,
    flip_trigger: FlipTrigger,
    used: Vec<Rectangle>,
    free: Vec<Rect>,
    cant_pack: Vec<Rectangle>,
}

impl Bin {
    pub fn new(width: u32, height: u32, allow_flip: bool) -> Result<Self> {
        validate_bin(width, height, 0, 0)?;
        Ok(Self {
            width,
            height,
            allow_flip,
            left_border: 0,
            bottom_border: 0,
            flip_trigger: FlipTrigger::default(),
            used: Vec::new(),
            free: vec![Rect::new(0, 0, width, height)],
            cant_pack: Vec::new(),
        })
    }

    pub fn from_config(cfg: &PackerConfig) -> Result<Self> {
        Self::new(cfg.bin_width, cfg.bin_height, cfg.allow_flip)?
            .with_borders(cfg.left_border, cfg.bottom_border)
            .map(|bin| bin.with_flip_trigger(cfg.flip_trigger))
    }

    /// Reserves unusable margins along the left and bottom edges.
    /// Resets the bin to empty.
    pub fn with_borders(mut self, left: u32, bottom: u32) -> Result<Self> {
        validate_bin(self.width, self.height, left, bottom)?;
        self.left_border = left;
        self.bottom_border = bottom;
        self.used.clear();
        self.cant_pack.clear();
        self.free = vec![Rect::new(left, bottom, self.width - left, self.height - bottom)];
        Ok(self)
    }

    pub fn with_flip_trigger(mut self, trigger: FlipTrigger) -> Self {
        self.flip_trigger = trigger;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn allow_flip(&self) -> bool {
        self.allow_flip
    }
    pub fn left_border(&self) -> u32 {
        self.left_border
    }
    pub fn bottom_border(&self) -> u32 {
        self.bottom_border
    }
    pub fn flip_trigger(&self) -> FlipTrigger {
        self.flip_trigger
    }
    /// Placed rectangles, in placement order.
    pub fn used(&self) -> &[Rectangle] {
        &self.used
    }
    /// Maximal free rectangles, unordered; entries may overlap.
    pub fn free(&self) -> &[Rect] {
        &self.free
    }
    /// Leftovers of the most recent `insert_many`.
    pub fn cant_pack(&self) -> &[Rectangle] {
        &self.cant_pack
    }

    /// Best placement for `rect` under `heuristic`, without placing it.
    pub fn score_rect(&self, rect: &Rectangle, heuristic: Heuristic) -> Option<Candidate> {
        heuristic.find_placement(self, rect)
    }

    /// Places a single rectangle. Returns the placed copy, or `None` if it fits nowhere.
    pub fn insert(&mut self, rect: &Rectangle, heuristic: Heuristic) -> Option<Rectangle> {
        let Some(candidate) = self.score_rect(rect, heuristic) else {
            debug!(
                w = rect.width(),
                h = rect.height(),
                %heuristic,
                "no free rectangle fits"
            );
            return None;
        };
        self.place_rect(candidate.placed.clone());
        Some(candidate.placed)
    }

    /// Like `insert`, with the heuristic given by name (e.g. `RectBestAreaFit`, `baf`).
    /// Unknown names fail before the bin is touched.
    pub fn insert_named(&mut self, rect: &Rectangle, method: &str) -> Result<Option<Rectangle>> {
        let heuristic: Heuristic = method.parse()?;
        Ok(self.insert(rect, heuristic))
    }

    /// Places as many `items` as possible, best-scoring item first.
    ///
    /// Every round re-scores all pending items against the current free list
    /// and places the single best one; on equal scores the earlier item wins.
    /// Whatever fits nowhere ends up in `cant_pack`, in input order.
    pub fn insert_many(&mut self, items: Vec<Rectangle>, heuristic: Heuristic) -> Vec<Rectangle> {
        let mut pending = items;
        let mut packed = Vec::with_capacity(pending.len());
        self.cant_pack.clear();

        while !pending.is_empty() {
            let mut best: Option<(usize, Candidate)> = None;
            for (idx, item) in pending.iter().enumerate() {
                if let Some(c) = heuristic.find_placement(self, item) {
                    if best.as_ref().is_none_or(|(_, b)| c.score < b.score) {
                        best = Some((idx, c));
                    }
                }
            }

            match best {
                Some((idx, c)) => {
                    pending.remove(idx);
                    self.place_rect(c.placed.clone());
                    packed.push(c.placed);
                }
                None => {
                    debug!(left = pending.len(), "remaining rectangles do not fit");
                    self.cant_pack = pending;
                    break;
                }
            }
        }
        packed
    }

    fn place_rect(&mut self, node: Rectangle) {
        let used = node.rect();
        let mut residuals = Vec::new();
        self.free
            .retain(|fr| !split_free_node(fr, &used, &mut residuals));
        if let Some(window) = node.hollow_window() {
            residuals.push(window);
        }
        self.free.extend(residuals);
        prune_free_list(&mut self.free);

        trace!(
            x = used.x,
            y = used.y,
            w = used.w,
            h = used.h,
            rotated = node.is_rotated(),
            free = self.free.len(),
            "placed"
        );
        self.used.push(node);
    }

    /// Area covered by placed rectangles; hollow apertures do not count.
    pub fn used_area(&self) -> u64 {
        self.used.iter().map(Rectangle::covered_area).sum()
    }

    /// Fraction of the bin area in use (0.0 to 1.0).
    pub fn usage(&self) -> f64 {
        self.used_area() as f64 / (self.width as f64 * self.height as f64)
    }
}
