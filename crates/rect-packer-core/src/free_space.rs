//! Maintenance of the maximal free-rectangle list.

use crate::model::Rect;

/// Splits `free` around the newly placed `used` rectangle.
///
/// Returns `false` (and pushes nothing) when the two do not overlap. Otherwise
/// pushes the residual strips of `free` lying below, above, left and right of
/// `used` into `out`, each only when its area is positive, and returns `true`:
/// the caller must drop `free` from its list.
pub fn split_free_node(free: &Rect, used: &Rect, out: &mut Vec<Rect>) -> bool {
    if !free.intersects(used) {
        return false;
    }

    // Horizontal overlap is implied by the intersection test.
    if used.y > free.y && used.y < free.top() {
        out.push(Rect::new(free.x, free.y, free.w, used.y - free.y));
    }
    if used.top() < free.top() {
        out.push(Rect::new(free.x, used.top(), free.w, free.top() - used.top()));
    }

    if used.x > free.x && used.x < free.right() {
        out.push(Rect::new(free.x, free.y, used.x - free.x, free.h));
    }
    if used.right() < free.right() {
        out.push(Rect::new(
            used.right(),
            free.y,
            free.right() - used.right(),
            free.h,
        ));
    }

    true
}

/// Removes every free rectangle contained in another one.
pub fn prune_free_list(free: &mut Vec<Rect>) {
    let mut i = 0;
    while i < free.len() {
        let mut j = i + 1;
        let mut remove_i = false;
        while j < free.len() {
            if free[i].is_contained_in(&free[j]) {
                remove_i = true;
                break;
            }
            if free[j].is_contained_in(&free[i]) {
                free.remove(j);
                continue;
            }
            j += 1;
        }
        if remove_i {
            free.remove(i);
        } else {
            i += 1;
        }
    }
}
