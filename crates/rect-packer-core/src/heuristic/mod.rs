use crate::bin::Bin;
use crate::config::{FlipTrigger, Heuristic};
use crate::model::{FlipPolicy, Rect, Rectangle};

pub mod area_fit;
pub mod bottom_left;
pub mod linear;
pub mod side_fit;

pub use area_fit::BestAreaFit;
pub use bottom_left::BottomLeft;
pub use linear::Linear;
pub use side_fit::{BestLongSideFit, BestShortSideFit};

/// Primary/tie-break score pair. Lower is better; ordering is lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(pub i64, pub i64);

impl Score {
    /// Sentinel for "no candidate found".
    pub const NO_FIT: Score = Score(i64::MAX, i64::MAX);
}

/// A legal placement: a positioned (and possibly rotated) copy of the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub placed: Rectangle,
    pub score: Score,
}

/// A placement strategy.
///
/// Implementations only read the bin. `None` means the rectangle fits no free
/// rectangle in any orientation its flip policy allows.
pub trait PlacementHeuristic {
    fn find_placement(&self, bin: &Bin, rect: &Rectangle) -> Option<Candidate>;
}

impl PlacementHeuristic for Heuristic {
    fn find_placement(&self, bin: &Bin, rect: &Rectangle) -> Option<Candidate> {
        match self {
            Heuristic::BottomLeft => BottomLeft.find_placement(bin, rect),
            Heuristic::BestAreaFit => BestAreaFit.find_placement(bin, rect),
            Heuristic::BestLongSideFit => BestLongSideFit.find_placement(bin, rect),
            Heuristic::BestShortSideFit => BestShortSideFit.find_placement(bin, rect),
            Heuristic::Linear => Linear.find_placement(bin, rect),
        }
    }
}

/// Orientations to try, as `(upright, rotated)`.
pub fn orientations(allow_flip: bool, trigger: FlipTrigger, rect: &Rectangle) -> (bool, bool) {
    match rect.flip_policy() {
        FlipPolicy::NoFlip => (true, false),
        FlipPolicy::ForceFlip => (false, true),
        FlipPolicy::AllowFlip => {
            let rotated = allow_flip
                && match trigger {
                    FlipTrigger::WiderThanTall => rect.width() > rect.height(),
                    FlipTrigger::Always => true,
                };
            (true, rotated)
        }
    }
}

/// Scores every free rectangle each allowed orientation fits into and keeps
/// the strictly best one. `score(free, w, h)` receives the oriented size.
pub(crate) fn best_fit<F>(bin: &Bin, rect: &Rectangle, score: F) -> Option<Candidate>
where
    F: Fn(&Rect, u32, u32) -> Score,
{
    let (upright, rotated) = orientations(bin.allow_flip(), bin.flip_trigger(), rect);
    let (w, h) = (rect.width(), rect.height());
    let mut best: Option<Candidate> = None;

    for fr in bin.free() {
        if upright && fr.w >= w && fr.h >= h {
            let s = score(fr, w, h);
            if best.as_ref().is_none_or(|b| s < b.score) {
                best = Some(Candidate {
                    placed: rect.placed_at(fr.x, fr.y),
                    score: s,
                });
            }
        }
        if rotated && fr.w >= h && fr.h >= w {
            let s = score(fr, h, w);
            if best.as_ref().is_none_or(|b| s < b.score) {
                let mut placed = rect.placed_at(fr.x, fr.y);
                placed.rotate();
                best = Some(Candidate { placed, score: s });
            }
        }
    }
    best
}

/// Leftover edge lengths `(short, long)` of a `w x h` placement inside `fr`.
pub(crate) fn leftovers(fr: &Rect, w: u32, h: u32) -> (i64, i64) {
    let horiz = (fr.w as i64 - w as i64).abs();
    let vert = (fr.h as i64 - h as i64).abs();
    (horiz.min(vert), horiz.max(vert))
}
