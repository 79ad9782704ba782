//! Fixed-capacity FPS history for the sparkline.

/// Number of samples kept in the history.
pub const HISTORY_LEN: usize = 60;

/// Ring buffer of past FPS values, always exactly [`HISTORY_LEN`] long.
///
/// Starts full of zeros. Every push overwrites the oldest slot, so the
/// buffer never grows and never shrinks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FpsHistory {
    samples: [u32; HISTORY_LEN],
    /// Index of the oldest sample.
    head: usize,
}

impl Default for FpsHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsHistory {
    pub fn new() -> Self {
        Self {
            samples: [0; HISTORY_LEN],
            head: 0,
        }
    }

    /// Evict the oldest sample and append `fps` as the newest.
    pub fn push(&mut self, fps: u32) {
        self.samples[self.head] = fps;
        self.head = (self.head + 1) % HISTORY_LEN;
    }

    pub fn len(&self) -> usize {
        HISTORY_LEN
    }

    /// Samples oldest-first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        (0..HISTORY_LEN).map(move |i| self.samples[(self.head + i) % HISTORY_LEN])
    }

    #[cfg(test)]
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}
