//! Obstacle Queue
//!
//! Fixed-capacity FIFO between the segmenter and the host protocol. It never
//! blocks and never grows: a push into a full queue drops the oldest entry.

use serde::Serialize;

use crate::DistanceSample;

/// A detected obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Obstacle {
    /// True bearing in degrees
    pub bearing: u16,
    /// Distance in sensor units
    pub distance: DistanceSample,
}

impl Obstacle {
    pub fn new(bearing: u16, distance: DistanceSample) -> Self {
        Obstacle { bearing, distance }
    }

    /// Wire form: bearing then distance, both big-endian
    pub fn to_be_bytes(&self) -> [u8; 4] {
        let b = self.bearing.to_be_bytes();
        let d = self.distance.to_be_bytes();
        [b[0], b[1], d[0], d[1]]
    }
}

/// Circular buffer of obstacles with drop-oldest overflow
#[derive(Debug, Clone)]
pub struct ObstacleQueue {
    slots: Vec<Obstacle>,
    tail: usize, // oldest entry
    len: usize,
    dropped: u32,
}

impl ObstacleQueue {
    /// Create an empty queue holding at most `capacity` obstacles
    pub fn new(capacity: usize) -> Self {
        ObstacleQueue {
            slots: vec![Obstacle::default(); capacity.max(1)],
            tail: 0,
            len: 0,
            dropped: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Number of obstacles evicted by overflow since creation or the last clear
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Append an obstacle, evicting the oldest one if the queue is full
    pub fn push(&mut self, obstacle: Obstacle) {
        if self.is_full() {
            self.evict_oldest();
        }
        let head = (self.tail + self.len) % self.capacity();
        self.slots[head] = obstacle;
        self.len += 1;
    }

    /// Remove and return the oldest obstacle
    pub fn pop(&mut self) -> Option<Obstacle> {
        if self.is_empty() {
            return None;
        }
        let obstacle = self.slots[self.tail];
        self.tail = (self.tail + 1) % self.capacity();
        self.len -= 1;
        Some(obstacle)
    }

    /// Oldest obstacle without removing it
    pub fn peek(&self) -> Option<&Obstacle> {
        if self.is_empty() {
            None
        } else {
            Some(&self.slots[self.tail])
        }
    }

    /// Remove every obstacle, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = Obstacle> + '_ {
        std::iter::from_fn(move || self.pop())
    }

    pub fn clear(&mut self) {
        self.tail = 0;
        self.len = 0;
        self.dropped = 0;
    }

    fn evict_oldest(&mut self) {
        if let Some(old) = self.pop() {
            self.dropped = self.dropped.wrapping_add(1);
            log::trace!("obstacle queue full, dropped {:?}", old);
        }
    }
}
