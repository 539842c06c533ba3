use crate::metric::Reading;
use std::collections::VecDeque;

/// Default number of readings kept per metric.
pub const DEFAULT_CAPACITY: usize = 50;

/// Rolling history of readings for one metric, the data behind a graph.
///
/// Index 0 is the oldest retained reading, the last index the newest.
/// Pushing into a full buffer evicts exactly the oldest entry.
///
/// The buffer does no locking of its own; the owner serialises the single
/// writer against concurrent readers.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples:  VecDeque<Reading>,
    capacity: usize,
}

impl SampleBuffer {
    /// Create an empty buffer.  A `capacity` of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    ///
    /// `value` is clamped into `[0, 100]` first, so the buffer never holds
    /// an out-of-range reading whatever the source reports.
    pub fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Reading::new(value));
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.samples.iter().copied().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<Reading> {
        self.samples.back().copied()
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
