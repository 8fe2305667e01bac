//! Algorithms that pick the element belonging at a position and move it
//! there directly.

use crate::{ArrayAccessor, Result};

pub(super) fn selection(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();

    for i in 0..len {
        let mut min = i;
        acc.mark_current(min)?;

        for j in i + 1..len {
            if acc.compare(min, j)? {
                acc.unmark(min)?;
                min = j;
                acc.mark_current(min)?;
            }
        }

        if min != i {
            acc.swap(min, i)?;
        }
        acc.unmark(min)?;
        acc.mark_sorted(i)?;
    }
    Ok(())
}

pub(super) fn heap(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();

    for root in (0..len / 2).rev() {
        sift_down(acc, len, root)?;
    }

    for end in (1..len).rev() {
        acc.swap(0, end)?;
        acc.mark_sorted(end)?;
        sift_down(acc, end, 0)?;
    }

    if len > 0 {
        acc.mark_sorted(0)?;
    }
    Ok(())
}

/// Restores the max-heap property for the subtree at `root` within the
/// first `size` positions.
fn sift_down(acc: &mut ArrayAccessor<'_, '_>, size: usize, mut root: usize) -> Result<()> {
    loop {
        let left = 2 * root + 1;
        let right = left + 1;
        let mut largest = root;

        if left < size && acc.compare(left, largest)? {
            largest = left;
        }
        if right < size && acc.compare(right, largest)? {
            largest = right;
        }
        if largest == root {
            return Ok(());
        }

        acc.swap(root, largest)?;
        root = largest;
    }
}

/// Cycle sort keeping the element in hand at `start`: each swap sends it to
/// its final position and picks up the displaced element.
pub(super) fn cycle(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();

    for start in 0..len.saturating_sub(1) {
        let mut item = acc.value(start);
        let mut pos = rank(acc, start, item)?;
        if pos == start {
            continue;
        }

        while pos != start {
            pos = skip_duplicates(acc, pos, item);
            acc.swap(start, pos)?;
            item = acc.value(start);
            pos = rank(acc, start, item)?;
        }
    }
    acc.mark_all_sorted()
}

/// Final position of `item` among positions `start..`: `start` plus the
/// number of later elements smaller than it.
fn rank(acc: &mut ArrayAccessor<'_, '_>, start: usize, item: u32) -> Result<usize> {
    let mut pos = start;
    for i in start + 1..acc.len() {
        let value = acc.value(i);
        if acc.compare_held(start, item, i, value)? {
            pos += 1;
        }
    }
    Ok(pos)
}

fn skip_duplicates(acc: &mut ArrayAccessor<'_, '_>, mut pos: usize, item: u32) -> usize {
    while pos < acc.len() && acc.value(pos) == item {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use crate::{NullObserver, RunContext, Unpaced};

    use super::*;

    fn run(sort: fn(&mut ArrayAccessor<'_, '_>) -> Result<()>, input: &[u32]) -> (Vec<u32>, u64) {
        let mut values = input.to_vec();
        let mut pacer = Unpaced;
        let mut observer = NullObserver;
        let mut ctx = RunContext::new(values.len(), &mut pacer, &mut observer);
        sort(&mut ArrayAccessor::new(&mut values, &mut ctx)).unwrap();
        let swaps = ctx.metrics().swaps;
        drop(ctx);
        (values, swaps)
    }

    #[test]
    fn heap_handles_duplicates() {
        let (values, _) = run(heap, &[5, 5, 1, 9, 1, 5]);
        assert_eq!(values, vec![1, 1, 5, 5, 5, 9]);
    }

    #[test]
    fn cycle_skips_placed_duplicates() {
        let (values, swaps) = run(cycle, &[2, 1, 2, 1, 2]);
        assert_eq!(values, vec![1, 1, 2, 2, 2]);
        assert!(swaps <= 4);
    }

    #[test]
    fn selection_leaves_sorted_input_alone() {
        let (values, swaps) = run(selection, &[1, 1, 2, 3]);
        assert_eq!(values, vec![1, 1, 2, 3]);
        assert_eq!(swaps, 0);
    }
}
