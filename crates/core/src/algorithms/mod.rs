//! Sorting procedures written purely against [`ArrayAccessor`]. None of them
//! touch the sequence directly, so every comparison and move is paced,
//! counted and visible to observers.

mod exchange;
mod insertion;
mod partition;
mod radix;
mod selection;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ArrayAccessor, Result, SortifyError};

/// Every algorithm the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
    Radix,
    Shell,
    Cocktail,
    Gnome,
    Comb,
    Cycle,
}

/// Descriptive text shown alongside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
}

impl Algorithm {
    pub const ALL: [Algorithm; 12] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
        Algorithm::Heap,
        Algorithm::Radix,
        Algorithm::Shell,
        Algorithm::Cocktail,
        Algorithm::Gnome,
        Algorithm::Comb,
        Algorithm::Cycle,
    ];

    /// Selector used on the command line and in exports.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
            Algorithm::Heap => "heap",
            Algorithm::Radix => "radix",
            Algorithm::Shell => "shell",
            Algorithm::Cocktail => "cocktail",
            Algorithm::Gnome => "gnome",
            Algorithm::Comb => "comb",
            Algorithm::Cycle => "cycle",
        }
    }

    pub fn info(self) -> AlgorithmInfo {
        let (name, description, time_complexity, space_complexity) = match self {
            Algorithm::Bubble => (
                "Bubble Sort",
                "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
                "O(n²)",
                "O(1)",
            ),
            Algorithm::Selection => (
                "Selection Sort",
                "Divides the list into a sorted and an unsorted part and repeatedly moves the smallest unsorted element to the end of the sorted part.",
                "O(n²)",
                "O(1)",
            ),
            Algorithm::Insertion => (
                "Insertion Sort",
                "Builds the sorted list one item at a time by shifting each new element left past every larger neighbour.",
                "O(n²)",
                "O(1)",
            ),
            Algorithm::Merge => (
                "Merge Sort",
                "Recursively splits the list in halves, sorts each half and merges the sorted halves back together.",
                "O(n log n)",
                "O(n)",
            ),
            Algorithm::Quick => (
                "Quick Sort",
                "Partitions the list around the last element as pivot and recursively sorts both partitions.",
                "O(n log n)",
                "O(log n)",
            ),
            Algorithm::Heap => (
                "Heap Sort",
                "Builds a max-heap and repeatedly moves the root to the end of the shrinking heap.",
                "O(n log n)",
                "O(1)",
            ),
            Algorithm::Radix => (
                "Radix Sort",
                "Non-comparative sort that groups values by each decimal digit, least significant first.",
                "O(nk)",
                "O(n+k)",
            ),
            Algorithm::Shell => (
                "Shell Sort",
                "Insertion sort over shrinking gaps, letting far apart elements move early.",
                "O(n log n)",
                "O(1)",
            ),
            Algorithm::Cocktail => (
                "Cocktail Sort",
                "Bubble sort that alternates forward and backward passes, shrinking the range from both ends.",
                "O(n²)",
                "O(1)",
            ),
            Algorithm::Gnome => (
                "Gnome Sort",
                "Walks forward while neighbours are ordered and steps back after each swap.",
                "O(n²)",
                "O(1)",
            ),
            Algorithm::Comb => (
                "Comb Sort",
                "Bubble sort over a gap that shrinks by a factor of 1.3 until adjacent elements are compared.",
                "O(n²/2^p)",
                "O(1)",
            ),
            Algorithm::Cycle => (
                "Cycle Sort",
                "Rotates each cycle of the permutation into place, writing every element at most once.",
                "O(n²)",
                "O(1)",
            ),
        };
        AlgorithmInfo {
            name,
            description,
            time_complexity,
            space_complexity,
        }
    }

    /// Sorts the accessor's sequence into non-decreasing order and marks
    /// every position sorted.
    pub fn run(self, acc: &mut ArrayAccessor<'_, '_>) -> Result<()> {
        match self {
            Algorithm::Bubble => exchange::bubble(acc),
            Algorithm::Selection => selection::selection(acc),
            Algorithm::Insertion => insertion::insertion(acc),
            Algorithm::Merge => partition::merge(acc),
            Algorithm::Quick => partition::quick(acc),
            Algorithm::Heap => selection::heap(acc),
            Algorithm::Radix => radix::radix(acc),
            Algorithm::Shell => insertion::shell(acc),
            Algorithm::Cocktail => exchange::cocktail(acc),
            Algorithm::Gnome => exchange::gnome(acc),
            Algorithm::Comb => exchange::comb(acc),
            Algorithm::Cycle => selection::cycle(acc),
        }
    }
}

impl FromStr for Algorithm {
    type Err = SortifyError;

    fn from_str(selector: &str) -> Result<Self> {
        let wanted = selector.trim();
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SortifyError::InvalidAlgorithm(selector.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{Highlight, NullObserver, RunContext, RunMetrics, Unpaced, VisualState};

    struct Sorted {
        values: Vec<u32>,
        metrics: RunMetrics,
        visual: Vec<VisualState>,
        out_of_range: u64,
    }

    fn sort_with(algorithm: Algorithm, input: &[u32]) -> Sorted {
        let mut values = input.to_vec();
        let mut pacer = Unpaced;
        let mut observer = NullObserver;
        let mut ctx = RunContext::new(values.len(), &mut pacer, &mut observer);
        {
            let mut acc = ArrayAccessor::new(&mut values, &mut ctx);
            algorithm.run(&mut acc).expect("unpaced runs cannot fail");
        }
        let metrics = ctx.metrics();
        let visual = ctx.visual_states().to_vec();
        let out_of_range = ctx.out_of_range_accesses();
        drop(ctx);
        Sorted {
            values,
            metrics,
            visual,
            out_of_range,
        }
    }

    fn sorted_copy(input: &[u32]) -> Vec<u32> {
        let mut expected = input.to_vec();
        expected.sort_unstable();
        expected
    }

    const CASES: &[&[u32]] = &[
        &[],
        &[42],
        &[2, 1],
        &[5, 3, 8, 1, 9, 2],
        &[1, 2, 3, 4, 5, 6, 7, 8],
        &[9, 8, 7, 6, 5, 4, 3, 2, 1],
        &[4, 4, 4],
        &[3, 1, 3, 1, 3, 1, 2, 2],
        &[100, 1, 55, 10, 1000, 7, 99, 100, 3],
    ];

    #[test]
    fn every_algorithm_sorts_fixed_cases() {
        for algorithm in Algorithm::ALL {
            for case in CASES {
                let sorted = sort_with(algorithm, case);
                assert_eq!(sorted.values, sorted_copy(case), "{algorithm} on {case:?}");
                assert_eq!(sorted.out_of_range, 0, "{algorithm} on {case:?}");
            }
        }
    }

    #[test]
    fn every_algorithm_marks_all_positions_sorted() {
        for algorithm in Algorithm::ALL {
            let sorted = sort_with(algorithm, &[6, 2, 9, 2, 5, 1, 8]);
            assert!(
                sorted
                    .visual
                    .iter()
                    .all(|state| state.contains(Highlight::Sorted) && !state.has_transient()),
                "{algorithm} left {:?}",
                sorted.visual
            );
        }
    }

    #[test]
    fn singleton_sorts_without_comparisons_or_swaps() {
        for algorithm in Algorithm::ALL {
            let sorted = sort_with(algorithm, &[17]);
            assert_eq!(sorted.values, vec![17]);
            assert_eq!(sorted.metrics.comparisons, 0, "{algorithm}");
            assert_eq!(sorted.metrics.swaps, 0, "{algorithm}");
        }
    }

    #[test]
    fn metrics_are_deterministic() {
        let input = [31, 7, 64, 7, 12, 99, 1, 45, 23, 8];
        for algorithm in Algorithm::ALL {
            let first = sort_with(algorithm, &input);
            let second = sort_with(algorithm, &input);
            assert_eq!(first.metrics, second.metrics, "{algorithm}");
        }
    }

    #[test]
    fn bubble_trace_matches_reference() {
        let sorted = sort_with(Algorithm::Bubble, &[5, 3, 8, 1, 9, 2]);
        assert_eq!(sorted.values, vec![1, 2, 3, 5, 8, 9]);
        assert_eq!(sorted.metrics.comparisons, 15);
        // one swap per inverted pair met by the exhaustive passes
        assert_eq!(sorted.metrics.swaps, 8);
    }

    #[test]
    fn insertion_never_moves_equal_keys() {
        let sorted = sort_with(Algorithm::Insertion, &[4, 4, 4]);
        assert_eq!(sorted.metrics.swaps, 0);
        assert_eq!(sorted.metrics.comparisons, 2);
    }

    #[test]
    fn write_based_algorithms_never_swap() {
        let input = [12, 5, 301, 44, 5, 9, 70];
        for algorithm in [Algorithm::Merge, Algorithm::Radix, Algorithm::Shell] {
            let sorted = sort_with(algorithm, &input);
            assert_eq!(sorted.metrics.swaps, 0, "{algorithm}");
            assert!(sorted.metrics.writes > 0, "{algorithm}");
        }
    }

    #[test]
    fn radix_does_not_compare() {
        let sorted = sort_with(Algorithm::Radix, &[170, 45, 75, 90, 802, 24, 2, 66]);
        assert_eq!(sorted.values, vec![2, 24, 45, 66, 75, 90, 170, 802]);
        assert_eq!(sorted.metrics.comparisons, 0);
        // three digits, one write per position per pass
        assert_eq!(sorted.metrics.writes, 24);
    }

    #[test]
    fn selection_swaps_at_most_once_per_pass() {
        let sorted = sort_with(Algorithm::Selection, &[5, 1, 4, 2, 3]);
        assert!(sorted.metrics.swaps <= 4);
        assert_eq!(sorted.metrics.comparisons, 10);
        assert_eq!(sort_with(Algorithm::Selection, &[1, 2, 3]).metrics.swaps, 0);
    }

    #[test]
    fn cycle_writes_each_element_at_most_once() {
        let sorted = sort_with(Algorithm::Cycle, &[3, 1, 2]);
        assert_eq!(sorted.values, vec![1, 2, 3]);
        assert_eq!(sorted.metrics.swaps, 2);
    }

    #[test]
    fn parses_selectors() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.id().parse::<Algorithm>().unwrap(), algorithm);
            assert!(!algorithm.info().name.is_empty());
        }
        assert_eq!(" Quick ".parse::<Algorithm>().unwrap(), Algorithm::Quick);
        let err = "bogo".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, SortifyError::InvalidAlgorithm(ref name) if name == "bogo"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn every_algorithm_yields_sorted_permutation(
            input in prop::collection::vec(1u32..=1000, 0..200)
        ) {
            let expected = sorted_copy(&input);
            for algorithm in Algorithm::ALL {
                let sorted = sort_with(algorithm, &input);
                prop_assert_eq!(&sorted.values, &expected, "{}", algorithm);
                prop_assert_eq!(sorted.out_of_range, 0);
            }
        }
    }
}
