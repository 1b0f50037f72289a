//! Scan Configuration
//!
//! Board-level constants for the sweep, the bearing table and the obstacle
//! queue. Defaults match the sensor board as fitted: a 180° arc sampled every
//! 2°, LIDAR-Lite range capped at 7 m.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::DistanceSample;

/// Largest value the single LEN byte of a response frame can carry
const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// How the scan behaves when it reaches the upper sweep bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SweepMode {
    /// Reverse direction at both ends of the arc
    #[default]
    Bounce,
    /// Jump back to the lower bound and sweep upward again
    OneWay,
}

/// Sweep, table and queue configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    /// Degrees between two samples (must divide 360)
    pub interval: u16,

    /// Half-width of the sweep arc in degrees
    pub range: u16,

    /// Maximum sensor range, also the "no object detected" sentinel
    pub max_distance: DistanceSample,

    /// Number of obstacles kept before the oldest is dropped
    pub queue_capacity: usize,

    /// Initial edge threshold for the segmenter
    pub threshold: u16,

    /// Behaviour at the upper sweep bound
    pub sweep_mode: SweepMode,

    /// Only step after the host has pulled the second table half
    pub lockstep: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            interval: 2,
            range: 90,
            max_distance: 700,
            queue_capacity: 20,
            threshold: 20,
            sweep_mode: SweepMode::Bounce,
            lockstep: false,
        }
    }
}

impl ScanConfig {
    /// Number of buckets in the bearing table
    pub fn table_len(&self) -> usize {
        if self.interval == 0 {
            return 0;
        }
        360 / self.interval as usize
    }

    /// Check that every derived size fits the board and the wire format
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 || 360 % self.interval != 0 {
            return Err(ConfigError::Interval(self.interval));
        }
        if self.range == 0 || self.range > 180 {
            return Err(ConfigError::Range(self.range));
        }
        if self.max_distance == 0 {
            return Err(ConfigError::MaxDistance);
        }
        if self.table_len() > MAX_PAYLOAD_LEN {
            return Err(ConfigError::TableTooLarge(self.table_len()));
        }
        if self.queue_capacity == 0 || self.queue_capacity * 4 > MAX_PAYLOAD_LEN {
            return Err(ConfigError::QueueCapacity(self.queue_capacity));
        }
        Ok(())
    }

    /// Map a raw sensor reading onto the stored sample domain
    ///
    /// The LIDAR-Lite reports 0 when nothing is in range; that and anything
    /// beyond `max_distance` become the sentinel.
    pub fn normalize(&self, raw: DistanceSample) -> DistanceSample {
        if raw == 0 || raw > self.max_distance {
            self.max_distance
        } else {
            raw
        }
    }
}
