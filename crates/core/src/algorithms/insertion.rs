use crate::{ArrayAccessor, Result};

/// Shifts each element left by adjacent swaps while its left neighbour is
/// strictly greater, so equal keys never move past each other.
pub(super) fn insertion(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();

    for i in 1..len {
        acc.mark_current(i)?;
        let mut j = i;
        while j > 0 && acc.compare(j - 1, j)? {
            acc.swap(j - 1, j)?;
            j -= 1;
        }
        acc.unmark(i)?;
    }
    acc.mark_all_sorted()
}

/// Gapped insertion sort over the Knuth sequence 1, 4, 13, 40, ... taken in
/// decreasing order. Elements are shifted with writes rather than swaps.
pub(super) fn shell(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();

    for gap in knuth_gaps(len).into_iter().rev() {
        for i in gap..len {
            let held = acc.value(i);
            acc.mark_current(i)?;

            let mut j = i;
            while j >= gap {
                let previous = acc.value(j - gap);
                if !acc.compare_held(j - gap, previous, j, held)? {
                    break;
                }
                acc.set_value(j, previous)?;
                j -= gap;
            }
            if j != i {
                acc.set_value(j, held)?;
            }
            acc.unmark(i)?;
        }
    }
    acc.mark_all_sorted()
}

/// Gaps below `len`, ascending.
fn knuth_gaps(len: usize) -> Vec<usize> {
    let mut gaps = Vec::new();
    let mut gap = 1;
    while gap < len {
        gaps.push(gap);
        gap = gap * 3 + 1;
    }
    gaps
}
