use super::{Candidate, PlacementHeuristic, Score, best_fit, leftovers};
use crate::bin::Bin;
use crate::model::Rectangle;

/// Smallest leftover area, ties broken by the shorter leftover side.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestAreaFit;

impl PlacementHeuristic for BestAreaFit {
    fn find_placement(&self, bin: &Bin, rect: &Rectangle) -> Option<Candidate> {
        let area = rect.area() as i64;
        best_fit(bin, rect, |fr, w, h| {
            let (short, _) = leftovers(fr, w, h);
            Score(fr.area() as i64 - area, short)
        })
    }
}
