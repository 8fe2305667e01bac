//! Divide-and-conquer algorithms.

use crate::{ArrayAccessor, Result};

pub(super) fn merge(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();
    if len > 0 {
        merge_sort_range(acc, 0, len - 1)?;
    }
    acc.mark_all_sorted()
}

fn merge_sort_range(acc: &mut ArrayAccessor<'_, '_>, start: usize, end: usize) -> Result<()> {
    if start < end {
        let mid = (start + end) / 2;
        merge_sort_range(acc, start, mid)?;
        merge_sort_range(acc, mid + 1, end)?;
        merge_halves(acc, start, mid, end)?;
    }
    Ok(())
}

/// Merges the sorted runs `start..=mid` and `mid+1..=end`. Ties take the
/// left element first.
fn merge_halves(
    acc: &mut ArrayAccessor<'_, '_>,
    start: usize,
    mid: usize,
    end: usize,
) -> Result<()> {
    let left: Vec<u32> = (start..=mid).map(|index| acc.value(index)).collect();
    let right: Vec<u32> = (mid + 1..=end).map(|index| acc.value(index)).collect();

    let (mut i, mut j, mut k) = (0, 0, start);
    while i < left.len() && j < right.len() {
        if acc.compare_held(start + i, left[i], mid + 1 + j, right[j])? {
            acc.set_value(k, right[j])?;
            j += 1;
        } else {
            acc.set_value(k, left[i])?;
            i += 1;
        }
        k += 1;
    }

    for &value in left[i..].iter().chain(&right[j..]) {
        acc.set_value(k, value)?;
        k += 1;
    }
    Ok(())
}

pub(super) fn quick(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();
    if len > 1 {
        quick_sort_range(acc, 0, len - 1)?;
    }
    acc.mark_all_sorted()
}

fn quick_sort_range(acc: &mut ArrayAccessor<'_, '_>, start: usize, end: usize) -> Result<()> {
    if start >= end {
        return Ok(());
    }
    let pivot = lomuto_partition(acc, start, end)?;
    if pivot > start {
        quick_sort_range(acc, start, pivot - 1)?;
    }
    quick_sort_range(acc, pivot + 1, end)
}

/// Partitions `start..=end` around the value at `end` and returns the
/// pivot's final index.
fn lomuto_partition(acc: &mut ArrayAccessor<'_, '_>, start: usize, end: usize) -> Result<usize> {
    acc.mark_pivot(end)?;

    let mut store = start;
    for j in start..end {
        // pivot > value(j)
        if acc.compare(end, j)? {
            if store != j {
                acc.swap(store, j)?;
            }
            store += 1;
        }
    }
    if store != end {
        acc.swap(store, end)?;
    }

    acc.unmark(end)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use crate::{NullObserver, RunContext, RunMetrics, Unpaced};

    use super::*;

    fn run(input: &[u32], sort: fn(&mut ArrayAccessor<'_, '_>) -> Result<()>) -> (Vec<u32>, RunMetrics) {
        let mut values = input.to_vec();
        let mut pacer = Unpaced;
        let mut observer = NullObserver;
        let mut ctx = RunContext::new(values.len(), &mut pacer, &mut observer);
        sort(&mut ArrayAccessor::new(&mut values, &mut ctx)).unwrap();
        let metrics = ctx.metrics();
        drop(ctx);
        (values, metrics)
    }

    #[test]
    fn merge_writes_every_position_per_level() {
        let (values, metrics) = run(&[4, 3, 2, 1], merge);
        assert_eq!(values, vec![1, 2, 3, 4]);
        // two levels of four writes each
        assert_eq!(metrics.writes, 8);
        assert_eq!(metrics.swaps, 0);
    }

    #[test]
    fn quick_on_sorted_input_only_compares() {
        let (values, metrics) = run(&[1, 2, 3, 4, 5], quick);
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(metrics.swaps, 0);
        assert_eq!(metrics.comparisons, 4 + 3 + 2 + 1);
    }

    #[test]
    fn quick_partitions_around_last_element() {
        let (values, _) = run(&[3, 7, 1, 9, 4], quick);
        assert_eq!(values, vec![1, 3, 4, 7, 9]);
    }
}
