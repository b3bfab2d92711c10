use super::{Candidate, PlacementHeuristic, Score};
use crate::bin::Bin;
use crate::model::{FlipPolicy, Rectangle};

/// Shelf-style placement along the bin's bottom edge.
///
/// The orientation is decided up front: `ForceFlip` rectangles, and
/// `AllowFlip` rectangles wider than tall in a bin that allows flipping, are
/// turned upright. The first bottom-aligned free rectangle that holds the
/// result wins, so the outcome depends on free-list order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl PlacementHeuristic for Linear {
    fn find_placement(&self, bin: &Bin, rect: &Rectangle) -> Option<Candidate> {
        let turn = match rect.flip_policy() {
            FlipPolicy::ForceFlip => true,
            FlipPolicy::AllowFlip => bin.allow_flip() && rect.width() > rect.height(),
            FlipPolicy::NoFlip => false,
        };
        let mut node = rect.placed_at(0, 0);
        if turn {
            node.rotate();
        }
        let (w, h) = (node.width(), node.height());

        let fr = bin
            .free()
            .iter()
            .find(|fr| fr.y == bin.bottom_border() && fr.w >= w && fr.h >= h)?;

        // Tallest items leave the least height behind.
        let score = Score(fr.h as i64 - h as i64, fr.w as i64 - w as i64);
        Some(Candidate {
            placed: node.placed_at(fr.x, fr.y),
            score,
        })
    }
}
