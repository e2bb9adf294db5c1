//! Difference sinks

use parking_lot::Mutex;
use tracing::debug;

use crate::diff::Difference;
use crate::error::Result;

/// Receives the differences produced by collation.
///
/// Implementations must tolerate concurrent calls; parallel sub-collations
/// add to the same store.
pub trait DifferenceStore: Send + Sync {
    /// Accept one difference
    fn add(&self, difference: Difference) -> Result<()>;

    /// Flush everything accepted so far
    fn save(&self) -> Result<()>;
}

#[derive(Debug, Default)]
struct StoreState {
    pending: Vec<Difference>,
    saved: Vec<Difference>,
    saves: usize,
}

impl StoreState {
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        debug!(count = self.pending.len(), "flushing differences");
        self.saved.append(&mut self.pending);
    }
}

/// Store keeping differences in memory.
///
/// Added differences stay pending until `save`, or until `batch_size` of
/// them have accumulated.
#[derive(Debug, Default)]
pub struct MemoryDifferenceStore {
    state: Mutex<StoreState>,
    batch_size: Option<usize>,
}

impl MemoryDifferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flush automatically once `batch_size` differences are pending
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size.max(1));
        self
    }

    /// Saved differences, in the order they were flushed
    pub fn differences(&self) -> Vec<Difference> {
        self.state.lock().saved.clone()
    }

    /// Differences added but not yet saved
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Number of explicit `save` calls
    pub fn save_count(&self) -> usize {
        self.state.lock().saves
    }

    /// Take all saved differences, leaving the store empty
    pub fn drain(&self) -> Vec<Difference> {
        std::mem::take(&mut self.state.lock().saved)
    }
}

impl DifferenceStore for MemoryDifferenceStore {
    fn add(&self, difference: Difference) -> Result<()> {
        let mut state = self.state.lock();
        state.pending.push(difference);
        if self.batch_size.is_some_and(|size| state.pending.len() >= size) {
            state.flush();
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.flush();
        state.saves += 1;
        Ok(())
    }
}
