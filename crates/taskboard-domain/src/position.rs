//! Ordering helpers shared by lists (within a board) and cards (within a list).
//!
//! Positions are dense 1-based ranks. Reorders splice the moved item out and
//! back in, then renumber the whole collection so gaps or duplicates coming
//! from the remote store never survive a reorder.

pub trait Positioned {
    fn position(&self) -> i32;
    fn set_position(&mut self, position: i32);
}

/// Rewrite every position to `index + 1` in the current order.
pub fn renumber<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index as i32 + 1);
    }
}

/// Move the item at `from` so that it ends up at index `to`.
///
/// `to` is clamped to the last valid index. Items between the two indices
/// shift by exactly one slot; everything else keeps its index. Returns
/// `false` if `from` is out of range.
pub fn reinsert<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}

/// Stable sort by stored position.
pub fn sort_by_position<T: Positioned>(items: &mut [T]) {
    items.sort_by_key(|item| item.position());
}

/// Position a newly created sibling should take: one past the current maximum.
pub fn next_position<'a, T: Positioned + 'a>(items: impl IntoIterator<Item = &'a T>) -> i32 {
    items
        .into_iter()
        .map(Positioned::position)
        .max()
        .unwrap_or(0)
        + 1
}

/// True when the sorted positions are exactly `1..=n`.
pub fn is_dense<T: Positioned>(items: &[T]) -> bool {
    let mut positions: Vec<i32> = items.iter().map(Positioned::position).collect();
    positions.sort_unstable();
    positions
        .iter()
        .enumerate()
        .all(|(index, position)| *position == index as i32 + 1)
}
