//! Bearing Table
//!
//! One distance bucket per `interval` degrees of true bearing. A bucket holds
//! the last sample written to it, or zero if it has not been written since the
//! last clear. The table also remembers the lowest and highest index written
//! so a batch pass only has to reset what the sweep actually touched.

use crate::DistanceSample;

#[derive(Debug, Clone)]
pub struct BearingTable {
    samples: Vec<DistanceSample>,
    interval: u16,
    observed: Option<(usize, usize)>,
}

impl BearingTable {
    /// Create a zeroed table with `360 / interval` buckets
    pub fn new(interval: u16) -> Self {
        let interval = interval.max(1);
        BearingTable {
            samples: vec![0; 360 / interval as usize],
            interval,
            observed: None,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn interval(&self) -> u16 {
        self.interval
    }

    /// Bucket index for a true bearing in `[0, 360)`
    pub fn index_of(&self, bearing: u16) -> usize {
        (bearing / self.interval) as usize % self.samples.len()
    }

    /// Bearing of the start of bucket `index`
    pub fn bearing_of(&self, index: usize) -> u16 {
        index as u16 * self.interval
    }

    /// Store a sample at a bearing, last write wins
    pub fn write(&mut self, bearing: u16, distance: DistanceSample) -> usize {
        let index = self.index_of(bearing);
        self.samples[index] = distance;
        self.observed = Some(match self.observed {
            Some((lo, hi)) => (lo.min(index), hi.max(index)),
            None => (index, index),
        });
        index
    }

    pub fn get(&self, index: usize) -> Option<DistanceSample> {
        self.samples.get(index).copied()
    }

    pub fn as_slice(&self) -> &[DistanceSample] {
        &self.samples
    }

    /// Inclusive index range written since the last clear
    pub fn observed(&self) -> Option<(usize, usize)> {
        self.observed
    }

    /// First (`0`) or second (`1`) half of the table
    pub fn half(&self, which: usize) -> &[DistanceSample] {
        let mid = self.samples.len() / 2;
        match which {
            0 => &self.samples[..mid],
            _ => &self.samples[mid..],
        }
    }

    /// Zero the buckets written since the last clear
    pub fn clear_observed(&mut self) {
        if let Some((lo, hi)) = self.observed.take() {
            self.samples[lo..=hi].fill(0);
        }
    }

    pub fn clear(&mut self) {
        self.samples.fill(0);
        self.observed = None;
    }
}
