//! Segmenter
//!
//! Finds obstacles in the bearing table by first-difference edge detection.
//! A drop in distance of at least `threshold` between neighbouring buckets
//! opens an obstacle, a rise of at least `threshold` closes it, and the
//! obstacle is reported at the middle bucket of the opened span. Both edges
//! are tested at every bucket, so with a zero threshold a flat pair opens
//! and closes in place.

use crate::queue::{Obstacle, ObstacleQueue};
use crate::table::BearingTable;
use crate::DistanceSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    threshold: u16,
}

impl Segmenter {
    pub fn new(threshold: u16) -> Self {
        Segmenter { threshold }
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: u16) {
        if threshold != self.threshold {
            log::debug!("segment threshold {} -> {}", self.threshold, threshold);
            self.threshold = threshold;
        }
    }

    /// Run one pass over the table, returning the number of obstacles pushed
    pub fn segment(&self, table: &BearingTable, queue: &mut ObstacleQueue) -> usize {
        self.segment_samples(table.as_slice(), table.interval(), queue)
    }

    /// Run one pass over raw samples spaced `interval` degrees apart
    ///
    /// An opening edge that is still unmatched when the samples run out emits
    /// nothing.
    pub fn segment_samples(
        &self,
        samples: &[DistanceSample],
        interval: u16,
        queue: &mut ObstacleQueue,
    ) -> usize {
        let threshold = self.threshold as i32;
        let mut in_obstacle = false;
        let mut start = 0usize;
        let mut emitted = 0;

        for i in 1..samples.len() {
            let diff = samples[i - 1] as i32 - samples[i] as i32;

            if diff >= threshold {
                in_obstacle = true;
                start = i;
            }
            if -diff >= threshold && in_obstacle {
                let mid = start + (i - start) / 2;
                let obstacle = Obstacle::new(mid as u16 * interval, samples[mid]);
                log::trace!("obstacle {:?} spanning {}..{}", obstacle, start, i);
                queue.push(obstacle);
                in_obstacle = false;
                emitted += 1;
            }
        }

        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(samples: &[DistanceSample], threshold: u16, interval: u16) -> Vec<Obstacle> {
        let mut queue = ObstacleQueue::new(16);
        Segmenter::new(threshold).segment_samples(samples, interval, &mut queue);
        queue.drain().collect()
    }

    #[test]
    fn test_single_dip() {
        let found = run(&[100, 100, 40, 100, 100], 40, 2);
        assert_eq!(found, vec![Obstacle::new(4, 40)]);

        let found = run(&[100, 100, 40, 100, 100], 40, 5);
        assert_eq!(found, vec![Obstacle::new(10, 40)]);
    }

    #[test]
    fn test_wide_obstacle_reports_middle() {
        // Opens at 2, closes at 6, middle bucket 4
        let samples = [700, 700, 300, 310, 290, 305, 700, 700];
        let found = run(&samples, 100, 2);
        assert_eq!(found, vec![Obstacle::new(8, 290)]);
    }

    #[test]
    fn test_even_span_rounds_toward_start() {
        // Opens at 1, closes at 4: mid = 1 + 3/2 = 2
        let samples = [500, 100, 110, 120, 500];
        let found = run(&samples, 200, 1);
        assert_eq!(found, vec![Obstacle::new(2, 110)]);
    }

    #[test]
    fn test_edges_below_threshold_are_ignored() {
        let found = run(&[100, 100, 61, 100, 100], 40, 2);
        assert!(found.is_empty());
    }

    #[test]
    fn test_unclosed_edge_emits_nothing() {
        let found = run(&[700, 700, 200, 200, 200], 50, 2);
        assert!(found.is_empty());
    }

    #[test]
    fn test_closing_edge_without_opening_is_ignored() {
        let found = run(&[200, 200, 700, 700], 50, 2);
        assert!(found.is_empty());
    }

    #[test]
    fn test_reopening_moves_start() {
        // Second drop while inside an obstacle restarts it at index 3
        let samples = [700, 400, 400, 100, 100, 700];
        let found = run(&samples, 200, 2);
        assert_eq!(found, vec![Obstacle::new(8, 100)]);
    }

    #[test]
    fn test_two_obstacles_in_order() {
        let samples = [700, 200, 700, 700, 150, 150, 700];
        let found = run(&samples, 100, 2);
        assert_eq!(found, vec![Obstacle::new(2, 200), Obstacle::new(10, 150)]);
    }

    #[test]
    fn test_table_pass_uses_interval() {
        let mut table = BearingTable::new(2);
        table.write(0, 700);
        table.write(2, 700);
        table.write(4, 100);
        table.write(6, 700);

        let mut queue = ObstacleQueue::new(4);
        let segmenter = Segmenter::new(20);
        // Trailing zeros after index 3 are a drop, never closed
        assert_eq!(segmenter.segment(&table, &mut queue), 1);
        assert_eq!(queue.pop(), Some(Obstacle::new(4, 100)));
    }

    #[test]
    fn test_zero_threshold_flat_run() {
        // Every flat pair opens and closes at the same bucket
        let found = run(&[100, 100, 100], 0, 2);
        assert_eq!(found, vec![Obstacle::new(2, 100), Obstacle::new(4, 100)]);

        let mut queue = ObstacleQueue::new(4);
        let emitted = Segmenter::new(0).segment_samples(&[100, 100, 100], 2, &mut queue);
        assert_eq!(emitted, 2);
    }

    #[test]
    fn test_short_inputs() {
        assert!(run(&[], 10, 2).is_empty());
        assert!(run(&[100], 10, 2).is_empty());
    }

    #[test]
    fn test_set_threshold() {
        let mut segmenter = Segmenter::new(20);
        segmenter.set_threshold(55);
        assert_eq!(segmenter.threshold(), 55);
    }
}
