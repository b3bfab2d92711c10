use super::{Candidate, PlacementHeuristic, Score, best_fit, leftovers};
use crate::bin::Bin;
use crate::model::Rectangle;

/// Minimizes the longer leftover side, then the shorter one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestLongSideFit;

/// Minimizes the shorter leftover side, then the longer one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestShortSideFit;

impl PlacementHeuristic for BestLongSideFit {
    fn find_placement(&self, bin: &Bin, rect: &Rectangle) -> Option<Candidate> {
        best_fit(bin, rect, |fr, w, h| {
            let (short, long) = leftovers(fr, w, h);
            Score(long, short)
        })
    }
}

impl PlacementHeuristic for BestShortSideFit {
    fn find_placement(&self, bin: &Bin, rect: &Rectangle) -> Option<Candidate> {
        best_fit(bin, rect, |fr, w, h| {
            let (short, long) = leftovers(fr, w, h);
            Score(short, long)
        })
    }
}
