//! Order-preserving partition with a stateful predicate.

use std::collections::VecDeque;

/// Split `items` into the elements the predicate accepts and the elements it
/// rejects, preserving relative order on both sides.
///
/// The predicate runs exactly once per element, front to back, and may carry
/// mutable state between calls. That makes the pass suitable for admission
/// scans where accepting one element changes what later elements are allowed
/// to do: an element early in the queue is always offered a resource before
/// any element behind it.
///
/// ```
/// use std::collections::VecDeque;
/// use locking_queue::util::partition_in_order;
///
/// let items: VecDeque<u32> = VecDeque::from(vec![3, 1, 4, 1, 5]);
/// let mut budget = 5;
/// let (taken, rest) = partition_in_order(items, |n| {
///     if *n <= budget {
///         budget -= *n;
///         true
///     } else {
///         false
///     }
/// });
/// assert_eq!(taken, vec![3, 1, 1]);
/// assert_eq!(rest, VecDeque::from(vec![4, 5]));
/// ```
pub fn partition_in_order<T, F>(items: VecDeque<T>, mut accept: F) -> (Vec<T>, VecDeque<T>)
where
    F: FnMut(&T) -> bool,
{
    let mut taken = Vec::new();
    let mut rest = VecDeque::new();
    for item in items {
        if accept(&item) {
            taken.push(item);
        } else {
            rest.push_back(item);
        }
    }
    (taken, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_relative_order_on_both_sides() {
        let items: VecDeque<i32> = (0..10).collect();
        let (even, odd) = partition_in_order(items, |n| n % 2 == 0);
        assert_eq!(even, vec![0, 2, 4, 6, 8]);
        assert_eq!(odd, VecDeque::from(vec![1, 3, 5, 7, 9]));
    }

    #[test]
    fn earlier_elements_are_offered_first() {
        // Two elements compete for the same slot; the earlier one wins.
        let items = VecDeque::from(vec!["first", "second"]);
        let mut slot_free = true;
        let (taken, rest) = partition_in_order(items, |_| {
            let won = slot_free;
            slot_free = false;
            won
        });
        assert_eq!(taken, vec!["first"]);
        assert_eq!(rest, VecDeque::from(vec!["second"]));
    }

    #[test]
    fn empty_input_yields_empty_outputs() {
        let (taken, rest) = partition_in_order(VecDeque::<u8>::new(), |_| true);
        assert!(taken.is_empty());
        assert!(rest.is_empty());
    }
}
