//! In-place ordering of stanza references before validation.

use std::cmp::Ordering;

/// Shell sort with a gap sequence halved each round.
///
/// Not stable. Used to order stanzas by id before the cross-reference passes.
pub fn shell_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut gap = items.len() / 2;
    while gap > 0 {
        for start in gap..items.len() {
            let mut index = start;
            while index >= gap && compare(&items[index - gap], &items[index]) == Ordering::Greater {
                items.swap(index - gap, index);
                index -= gap;
            }
        }
        gap /= 2;
    }
}
