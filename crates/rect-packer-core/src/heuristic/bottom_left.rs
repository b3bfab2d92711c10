use super::{Candidate, PlacementHeuristic, Score, best_fit};
use crate::bin::Bin;
use crate::model::Rectangle;

/// Lowest resulting top edge (`free.y + h`), ties broken by lowest x.
#[derive(Debug, Clone, Copy, Default)]
pub struct BottomLeft;

impl PlacementHeuristic for BottomLeft {
    fn find_placement(&self, bin: &Bin, rect: &Rectangle) -> Option<Candidate> {
        best_fit(bin, rect, |fr, _w, h| {
            Score(fr.y as i64 + h as i64, fr.x as i64)
        })
    }
}
