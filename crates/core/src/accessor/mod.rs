use serde::{Deserialize, Serialize};

use crate::{Highlight, Pacer, Result, RunObserver, StepEvent, VisualState};

// Checkpoint scales relative to the base step delay.
const FULL: f64 = 1.0;
const HALF: f64 = 0.5;
const QUARTER: f64 = 0.25;

/// Counters accumulated by the accessor during one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub comparisons: u64,
    pub swaps: u64,
    /// `set_value` calls. Moves are never counted as swaps.
    pub writes: u64,
    pub checkpoints: u64,
}

/// Per-run state threaded through every algorithm call: metrics, visual
/// tags, the pacer that owns timing and the observer that receives events.
pub struct RunContext<'a> {
    metrics: RunMetrics,
    visual: Vec<VisualState>,
    out_of_range: u64,
    pacer: &'a mut dyn Pacer,
    observer: &'a mut dyn RunObserver,
}

impl<'a> RunContext<'a> {
    pub fn new(len: usize, pacer: &'a mut dyn Pacer, observer: &'a mut dyn RunObserver) -> Self {
        Self {
            metrics: RunMetrics::default(),
            visual: vec![VisualState::DEFAULT; len],
            out_of_range: 0,
            pacer,
            observer,
        }
    }

    pub fn metrics(&self) -> RunMetrics {
        self.metrics
    }

    pub fn visual_states(&self) -> &[VisualState] {
        &self.visual
    }

    /// Out-of-range requests that were ignored. Algorithms are expected to
    /// keep this at zero.
    pub fn out_of_range_accesses(&self) -> u64 {
        self.out_of_range
    }

    /// Drops every comparing/swapping/current/pivot tag without suspending.
    pub fn clear_transient(&mut self) {
        for (index, state) in self.visual.iter_mut().enumerate() {
            if state.has_transient() {
                state.clear_transient();
                self.observer.on_visual(index, *state);
            }
        }
    }

    /// Marks every position sorted without suspending. Used once a run has
    /// completed.
    pub fn settle_sorted(&mut self) {
        for (index, state) in self.visual.iter_mut().enumerate() {
            let before = *state;
            state.clear_transient();
            state.insert(Highlight::Sorted);
            if *state != before {
                self.observer.on_visual(index, *state);
            }
        }
    }
}

impl std::fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("metrics", &self.metrics)
            .field("len", &self.visual.len())
            .field("out_of_range", &self.out_of_range)
            .finish()
    }
}

/// The only gateway between an algorithm and the sequence. Every operation
/// updates visual state, reports events and passes through the pacer; every
/// mutation goes through [`swap`](Self::swap) or
/// [`set_value`](Self::set_value).
pub struct ArrayAccessor<'s, 'c> {
    values: &'s mut [u32],
    ctx: &'s mut RunContext<'c>,
}

impl<'s, 'c> ArrayAccessor<'s, 'c> {
    pub fn new(values: &'s mut [u32], ctx: &'s mut RunContext<'c>) -> Self {
        debug_assert_eq!(values.len(), ctx.visual.len());
        Self { values, ctx }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn metrics(&self) -> RunMetrics {
        self.ctx.metrics
    }

    /// Reads a value without highlighting or suspending. Out of range reads
    /// yield 0.
    pub fn value(&mut self, index: usize) -> u32 {
        if !self.in_bounds("value", index) {
            return 0;
        }
        self.values[index]
    }

    /// Highlights both positions, counts one comparison and returns
    /// `value(left) > value(right)`.
    pub fn compare(&mut self, left: usize, right: usize) -> Result<bool> {
        if !self.in_bounds("compare", left) || !self.in_bounds("compare", right) {
            return Ok(false);
        }
        self.compare_cadence(left, right, |values| (values[left], values[right]))
    }

    /// Comparison against values held outside the sequence (merge buffers,
    /// a key lifted out for shifting). Highlights `left` and `right` as the
    /// positions involved and returns `left_value > right_value`.
    pub fn compare_held(
        &mut self,
        left: usize,
        left_value: u32,
        right: usize,
        right_value: u32,
    ) -> Result<bool> {
        if !self.in_bounds("compare_held", left) || !self.in_bounds("compare_held", right) {
            return Ok(false);
        }
        self.compare_cadence(left, right, |_| (left_value, right_value))
    }

    fn compare_cadence(
        &mut self,
        left: usize,
        right: usize,
        read: impl FnOnce(&[u32]) -> (u32, u32),
    ) -> Result<bool> {
        self.tag(left, Highlight::Comparing);
        self.pace(FULL)?;
        self.tag(right, Highlight::Comparing);
        self.pace(FULL)?;

        let (left_value, right_value) = read(&*self.values);
        self.ctx.metrics.comparisons += 1;
        let event = StepEvent::Compared {
            left,
            right,
            left_value,
            right_value,
            comparisons: self.ctx.metrics.comparisons,
        };
        self.ctx.observer.on_step(&event);
        self.pace(FULL)?;

        self.release(left, Highlight::Comparing);
        self.pace(QUARTER)?;
        self.release(right, Highlight::Comparing);
        self.pace(QUARTER)?;

        Ok(left_value > right_value)
    }

    /// Exchanges two positions and counts one swap. `left == right` leaves
    /// the sequence unchanged but still counts.
    pub fn swap(&mut self, left: usize, right: usize) -> Result<()> {
        if !self.in_bounds("swap", left) || !self.in_bounds("swap", right) {
            return Ok(());
        }
        self.tag(left, Highlight::Swapping);
        self.pace(FULL)?;
        self.tag(right, Highlight::Swapping);
        self.pace(FULL)?;

        self.values.swap(left, right);
        self.ctx.metrics.swaps += 1;
        let event = StepEvent::Swapped {
            left,
            right,
            swaps: self.ctx.metrics.swaps,
        };
        self.ctx.observer.on_step(&event);
        self.pace(FULL)?;

        self.release(left, Highlight::Swapping);
        self.pace(QUARTER)?;
        self.release(right, Highlight::Swapping);
        self.pace(QUARTER)
    }

    /// Overwrites one position. Counted as a write, never as a swap.
    pub fn set_value(&mut self, index: usize, value: u32) -> Result<()> {
        if !self.in_bounds("set_value", index) {
            return Ok(());
        }
        self.ctx.pacer.hold()?;
        self.values[index] = value;
        self.ctx.metrics.writes += 1;
        self.ctx
            .observer
            .on_step(&StepEvent::ValueSet { index, value });
        self.pace(HALF)
    }

    pub fn mark_comparing(&mut self, index: usize) -> Result<()> {
        self.mark(index, Highlight::Comparing, FULL)
    }

    pub fn mark_swapping(&mut self, index: usize) -> Result<()> {
        self.mark(index, Highlight::Swapping, FULL)
    }

    pub fn mark_current(&mut self, index: usize) -> Result<()> {
        self.mark(index, Highlight::Current, FULL)
    }

    pub fn mark_pivot(&mut self, index: usize) -> Result<()> {
        self.mark(index, Highlight::Pivot, FULL)
    }

    pub fn mark_sorted(&mut self, index: usize) -> Result<()> {
        self.mark(index, Highlight::Sorted, HALF)
    }

    /// Marks positions `0..len` sorted in order.
    pub fn mark_all_sorted(&mut self) -> Result<()> {
        for index in 0..self.len() {
            self.mark_sorted(index)?;
        }
        Ok(())
    }

    /// Clears the transient tags of one position.
    pub fn unmark(&mut self, index: usize) -> Result<()> {
        if !self.in_bounds("unmark", index) {
            return Ok(());
        }
        self.untag(index);
        self.pace(QUARTER)
    }

    fn mark(&mut self, index: usize, highlight: Highlight, scale: f64) -> Result<()> {
        if !self.in_bounds("mark", index) {
            return Ok(());
        }
        self.tag(index, highlight);
        self.pace(scale)
    }

    fn tag(&mut self, index: usize, highlight: Highlight) {
        let state = &mut self.ctx.visual[index];
        state.insert(highlight);
        let state = *state;
        self.ctx.observer.on_visual(index, state);
        self.ctx
            .observer
            .on_step(&StepEvent::Highlighted { index, highlight });
    }

    fn untag(&mut self, index: usize) {
        let state = &mut self.ctx.visual[index];
        state.clear_transient();
        let state = *state;
        self.ctx.observer.on_visual(index, state);
        self.ctx.observer.on_step(&StepEvent::Cleared { index });
    }

    /// Drops the tag an operation set itself; pivot and current survive.
    fn release(&mut self, index: usize, highlight: Highlight) {
        let state = &mut self.ctx.visual[index];
        state.remove(highlight);
        let state = *state;
        self.ctx.observer.on_visual(index, state);
        self.ctx.observer.on_step(&StepEvent::Cleared { index });
    }

    fn pace(&mut self, scale: f64) -> Result<()> {
        self.ctx.metrics.checkpoints += 1;
        self.ctx.pacer.suspend(scale)
    }

    fn in_bounds(&mut self, operation: &'static str, index: usize) -> bool {
        if index < self.values.len() {
            return true;
        }
        self.ctx.out_of_range += 1;
        tracing::warn!(operation, index, len = self.values.len(), "ignoring out-of-range access");
        false
    }
}
