use std::fmt;

use serde::{Deserialize, Serialize};

/// Highlight tags a renderer can draw on a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Comparing,
    Swapping,
    Current,
    Pivot,
    Sorted,
}

impl Highlight {
    pub const ALL: [Highlight; 5] = [
        Highlight::Comparing,
        Highlight::Swapping,
        Highlight::Current,
        Highlight::Pivot,
        Highlight::Sorted,
    ];

    const fn bit(self) -> u8 {
        match self {
            Highlight::Comparing => 1,
            Highlight::Swapping => 1 << 1,
            Highlight::Current => 1 << 2,
            Highlight::Pivot => 1 << 3,
            Highlight::Sorted => 1 << 4,
        }
    }

    /// Transient tags are cleared by `unmark`; `Sorted` is not.
    pub const fn is_transient(self) -> bool {
        !matches!(self, Highlight::Sorted)
    }
}

const TRANSIENT: u8 = Highlight::Comparing.bit()
    | Highlight::Swapping.bit()
    | Highlight::Current.bit()
    | Highlight::Pivot.bit();

/// Set of highlight tags attached to one position. The empty set is the
/// default appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VisualState(u8);

impl VisualState {
    pub const DEFAULT: VisualState = VisualState(0);

    pub fn contains(self, highlight: Highlight) -> bool {
        self.0 & highlight.bit() != 0
    }

    pub fn insert(&mut self, highlight: Highlight) {
        self.0 |= highlight.bit();
    }

    pub fn remove(&mut self, highlight: Highlight) {
        self.0 &= !highlight.bit();
    }

    pub fn clear_transient(&mut self) {
        self.0 &= !TRANSIENT;
    }

    pub fn has_transient(self) -> bool {
        self.0 & TRANSIENT != 0
    }

    pub fn is_default(self) -> bool {
        self.0 == 0
    }

    pub fn highlights(self) -> impl Iterator<Item = Highlight> {
        Highlight::ALL
            .into_iter()
            .filter(move |highlight| self.contains(*highlight))
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            return f.write_str("default");
        }
        let mut first = true;
        for highlight in self.highlights() {
            if !first {
                f.write_str("+")?;
            }
            first = false;
            write!(f, "{highlight:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_overlap_and_clear_independently() {
        let mut state = VisualState::DEFAULT;
        state.insert(Highlight::Sorted);
        state.insert(Highlight::Comparing);
        state.insert(Highlight::Pivot);

        assert!(state.has_transient());
        state.clear_transient();

        assert!(!state.has_transient());
        assert!(state.contains(Highlight::Sorted));
        assert_eq!(state.highlights().collect::<Vec<_>>(), vec![Highlight::Sorted]);
    }

    #[test]
    fn displays_joined_tags() {
        let mut state = VisualState::default();
        assert_eq!(state.to_string(), "default");
        state.insert(Highlight::Swapping);
        state.insert(Highlight::Current);
        assert_eq!(state.to_string(), "Swapping+Current");
    }
}
