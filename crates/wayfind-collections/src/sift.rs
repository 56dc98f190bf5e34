//! Sift primitives shared by both heap flavours.
//!
//! `outranks(a, b)` is true when `a` belongs closer to the root than `b`.
//! `moved(item, slot)` is called for every item that lands in a new slot.

#[inline]
pub(crate) fn parent(slot: usize) -> usize {
    (slot - 1) / 2
}

#[inline]
fn swap<T>(items: &mut [T], a: usize, b: usize, moved: &mut impl FnMut(&T, usize)) {
    items.swap(a, b);
    moved(&items[a], a);
    moved(&items[b], b);
}

/// Move the item at `slot` towards the root while it outranks its parent.
/// Returns the slot it settles in.
pub(crate) fn sift_up<T>(
    items: &mut [T],
    mut slot: usize,
    outranks: impl Fn(&T, &T) -> bool,
    mut moved: impl FnMut(&T, usize),
) -> usize {
    while slot > 0 {
        let up = parent(slot);
        if !outranks(&items[slot], &items[up]) {
            break;
        }
        swap(items, slot, up, &mut moved);
        slot = up;
    }
    slot
}

/// Move the item at `slot` away from the root while its better child
/// outranks it. Returns the slot it settles in.
pub(crate) fn sift_down<T>(
    items: &mut [T],
    mut slot: usize,
    outranks: impl Fn(&T, &T) -> bool,
    mut moved: impl FnMut(&T, usize),
) -> usize {
    let len = items.len();
    loop {
        let left = slot * 2 + 1;
        if left >= len {
            return slot;
        }
        let right = left + 1;
        let child = if right < len && outranks(&items[right], &items[left]) {
            right
        } else {
            left
        };
        if !outranks(&items[child], &items[slot]) {
            return slot;
        }
        swap(items, slot, child, &mut moved);
        slot = child;
    }
}
