use rand::Rng;

use crate::{GenerationConfig, Result, SortifyError};

/// Holds the working sequence together with the snapshot it was generated
/// from. The snapshot only changes on `generate` or `load`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceStore {
    values: Vec<u32>,
    original: Vec<u32>,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the store with `size` random values drawn from the configured
    /// range and snapshots them.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        size: usize,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> Result<&[u32]> {
        if size == 0 {
            return Err(SortifyError::InvalidSize(size));
        }
        let low = config.min_value.max(1);
        let high = config.max_value.max(low);
        let values: Vec<u32> = (0..size).map(|_| rng.gen_range(low..=high)).collect();
        self.install(values);
        Ok(&self.values)
    }

    /// Installs an explicit sequence as both the working values and the
    /// snapshot. Empty and single-value sequences are accepted; every
    /// algorithm treats them as already sorted.
    pub fn load(&mut self, values: Vec<u32>) {
        self.install(values);
    }

    fn install(&mut self, values: Vec<u32>) {
        self.original = values.clone();
        self.values = values;
    }

    /// Out-of-range reads yield 0.
    pub fn get(&self, index: usize) -> u32 {
        self.values.get(index).copied().unwrap_or_default()
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, value: u32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Exchanges two positions; ignored when either is out of range.
    pub fn swap(&mut self, left: usize, right: usize) {
        if left < self.values.len() && right < self.values.len() {
            self.values.swap(left, right);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn original(&self) -> &[u32] {
        &self.original
    }

    /// Replaces the working values with the result of a finished run. The
    /// length must not change.
    pub fn commit(&mut self, values: Vec<u32>) {
        debug_assert_eq!(values.len(), self.values.len());
        self.values = values;
    }

    /// Restores the working values from the snapshot.
    pub fn reset(&mut self) -> &[u32] {
        self.values.clone_from(&self.original);
        &self.values
    }
}
