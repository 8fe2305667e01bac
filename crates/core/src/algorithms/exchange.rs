//! Algorithms built from adjacent or gapped compare-and-swap steps.

use crate::{ArrayAccessor, Result};

pub(super) fn bubble(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();

    for pass in 0..len.saturating_sub(1) {
        for j in 0..len - pass - 1 {
            if acc.compare(j, j + 1)? {
                acc.swap(j, j + 1)?;
            }
        }
        acc.mark_sorted(len - pass - 1)?;
    }

    if len > 0 {
        acc.mark_sorted(0)?;
    }
    Ok(())
}

pub(super) fn cocktail(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();
    if len > 1 {
        let mut start = 0;
        let mut end = len - 1;

        loop {
            let mut swapped = false;
            for i in start..end {
                if acc.compare(i, i + 1)? {
                    acc.swap(i, i + 1)?;
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
            end -= 1;

            swapped = false;
            for i in (start..end).rev() {
                if acc.compare(i, i + 1)? {
                    acc.swap(i, i + 1)?;
                    swapped = true;
                }
            }
            start += 1;
            if !swapped {
                break;
            }
        }
    }
    acc.mark_all_sorted()
}

pub(super) fn gnome(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();
    let mut index = 0;

    while index < len {
        if index == 0 {
            index += 1;
        } else if acc.compare(index - 1, index)? {
            acc.swap(index, index - 1)?;
            index -= 1;
        } else {
            index += 1;
        }
    }
    acc.mark_all_sorted()
}

pub(super) fn comb(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();
    let mut gap = len;
    let mut sorted = false;

    while !sorted {
        // floor(gap / 1.3)
        gap = gap * 10 / 13;
        if gap <= 1 {
            gap = 1;
            sorted = true;
        }

        let mut i = 0;
        while i + gap < len {
            if acc.compare(i, i + gap)? {
                acc.swap(i, i + gap)?;
                sorted = false;
            }
            i += 1;
        }
    }
    acc.mark_all_sorted()
}

#[cfg(test)]
mod tests {
    use crate::{NullObserver, RunContext, RunMetrics, Unpaced};

    use super::*;

    fn metrics_for(
        sort: fn(&mut ArrayAccessor<'_, '_>) -> Result<()>,
        input: &[u32],
    ) -> (Vec<u32>, RunMetrics) {
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
    fn cocktail_stops_after_a_clean_pass() {
        let (values, metrics) = metrics_for(cocktail, &[1, 2, 3, 4]);
        assert_eq!(values, vec![1, 2, 3, 4]);
        assert_eq!(metrics.comparisons, 3);
        assert_eq!(metrics.swaps, 0);
    }

    #[test]
    fn gnome_backtracks_after_each_swap() {
        let (values, metrics) = metrics_for(gnome, &[3, 2, 1]);
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(metrics.swaps, 3);
    }

    #[test]
    fn comb_finishes_with_adjacent_pass() {
        let (values, metrics) = metrics_for(comb, &[8, 4, 1, 7, 3]);
        assert_eq!(values, vec![1, 3, 4, 7, 8]);
        // gaps 3, 2, 1 and one clean pass at gap 1
        assert!(metrics.comparisons >= 2 + 3 + 4 + 4);
    }
}
