use serde::Serialize;

use crate::{Algorithm, Highlight, RunOutcome, VisualState};

/// Structured step emitted by the instrumented accessor. Counters carry the
/// running total after the step so sinks can display live metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StepEvent {
    Highlighted { index: usize, highlight: Highlight },
    Cleared { index: usize },
    Compared {
        left: usize,
        right: usize,
        left_value: u32,
        right_value: u32,
        comparisons: u64,
    },
    Swapped { left: usize, right: usize, swaps: u64 },
    ValueSet { index: usize, value: u32 },
}

/// Subscriber for everything a run emits. Rendering sinks typically care
/// about `on_visual`, audio and metric sinks about `on_step`; every method
/// defaults to a no-op so the engine runs headless without any observer.
pub trait RunObserver {
    fn on_run_started(&mut self, _algorithm: Algorithm, _values: &[u32]) {}

    fn on_visual(&mut self, _index: usize, _state: VisualState) {}

    fn on_step(&mut self, _event: &StepEvent) {}

    fn on_run_finished(&mut self, _outcome: &RunOutcome) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Fans every callback out to the registered observers in subscription
/// order.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn RunObserver + Send>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Box<dyn RunObserver + Send>) {
        self.observers.push(observer);
    }

    /// Moves every observer of `other` to the end of this set.
    pub fn append(&mut self, mut other: ObserverSet) {
        self.observers.append(&mut other.observers);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl RunObserver for ObserverSet {
    fn on_run_started(&mut self, algorithm: Algorithm, values: &[u32]) {
        for observer in &mut self.observers {
            observer.on_run_started(algorithm, values);
        }
    }

    fn on_visual(&mut self, index: usize, state: VisualState) {
        for observer in &mut self.observers {
            observer.on_visual(index, state);
        }
    }

    fn on_step(&mut self, event: &StepEvent) {
        for observer in &mut self.observers {
            observer.on_step(event);
        }
    }

    fn on_run_finished(&mut self, outcome: &RunOutcome) {
        for observer in &mut self.observers {
            observer.on_run_finished(outcome);
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Frequency of the audio cue that accompanies a step, if any. Comparing and
/// sorted cues rise with the index so a pass is audible as a sweep.
pub fn tone_hz(event: &StepEvent) -> Option<f32> {
    match *event {
        StepEvent::Highlighted { index, highlight } => Some(match highlight {
            Highlight::Comparing => 523.25 + index as f32 * 10.0,
            Highlight::Swapping => 659.25,
            Highlight::Current => 493.88,
            Highlight::Pivot => 554.37,
            Highlight::Sorted => 440.0 + index as f32 * 5.0,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct Counting(Arc<Mutex<usize>>);

    impl RunObserver for Counting {
        fn on_step(&mut self, _event: &StepEvent) {
            *self.0.lock().unwrap() += 1;
        }
    }

    #[test]
    fn observer_set_fans_out() {
        let hits = Arc::new(Mutex::new(0));
        let mut set = ObserverSet::new();
        set.push(Box::new(Counting(hits.clone())));
        set.push(Box::new(Counting(hits.clone())));
        set.push(Box::new(NullObserver));

        set.on_step(&StepEvent::Cleared { index: 0 });

        assert_eq!(*hits.lock().unwrap(), 2);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn tones_follow_highlight_kind() {
        let compare = StepEvent::Highlighted {
            index: 2,
            highlight: Highlight::Comparing,
        };
        let sorted = StepEvent::Highlighted {
            index: 4,
            highlight: Highlight::Sorted,
        };
        assert_eq!(tone_hz(&compare), Some(543.25));
        assert_eq!(tone_hz(&sorted), Some(460.0));
        assert_eq!(tone_hz(&StepEvent::ValueSet { index: 0, value: 1 }), None);
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_value(StepEvent::Swapped {
            left: 0,
            right: 1,
            swaps: 3,
        })
        .unwrap();
        assert_eq!(json["kind"], "swapped");
        assert_eq!(json["swaps"], 3);
    }
}
