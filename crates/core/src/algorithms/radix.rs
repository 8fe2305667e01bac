use crate::{ArrayAccessor, Result};

/// LSD radix sort in base 10. Values are expected to be positive; the digit
/// count comes from the maximum.
pub(super) fn radix(acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
    let len = acc.len();
    let max = (0..len).map(|index| acc.value(index)).max().unwrap_or(0);

    let mut place = 1u64;
    for _ in 0..digit_count(max) {
        counting_pass(acc, place)?;
        place *= 10;
    }
    acc.mark_all_sorted()
}

/// `floor(log10(max)) + 1`, with 0 treated as a single digit.
fn digit_count(max: u32) -> u32 {
    max.checked_ilog10().map_or(1, |digits| digits + 1)
}

/// Stable counting sort on the digit at `place`, written back in order.
fn counting_pass(acc: &mut ArrayAccessor<'_, '_>, place: u64) -> Result<()> {
    let values: Vec<u32> = (0..acc.len()).map(|index| acc.value(index)).collect();
    let digit = |value: u32| ((u64::from(value) / place) % 10) as usize;

    let mut count = [0usize; 10];
    for &value in &values {
        count[digit(value)] += 1;
    }
    for d in 1..count.len() {
        count[d] += count[d - 1];
    }

    let mut output = vec![0; values.len()];
    for &value in values.iter().rev() {
        let d = digit(value);
        count[d] -= 1;
        output[count[d]] = value;
    }

    for (index, value) in output.into_iter().enumerate() {
        acc.set_value(index, value)?;
    }
    Ok(())
}
