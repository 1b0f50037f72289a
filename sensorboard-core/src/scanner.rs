//! Scanner
//!
//! The context object owning all main-loop state: sweep position, bearing
//! table, obstacle queue and segmenter. The receive context only ever sees
//! the [`SharedLink`].
//!
//! Call [`Scanner::tick`] and then [`Scanner::service_host`] once per
//! scheduler tick. `tick` runs the batch segmentation pass whenever the sweep
//! reaches one of its bounds, before the bound sample is taken, then clears
//! the part of the table the sweep wrote.

use std::sync::Arc;

use serde::Serialize;

use crate::config::ScanConfig;
use crate::error::{ConfigError, ProtocolError};
use crate::io::{Actuator, RangeSensor, Transport};
use crate::protocol::{respond, Command, SharedLink};
use crate::queue::ObstacleQueue;
use crate::scan::{ScanController, ScanState, StepReport};
use crate::segment::Segmenter;
use crate::table::BearingTable;
use crate::DistanceSample;

/// Point-in-time view of the scanner for logging and diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerStatus {
    pub angle: u16,
    pub direction: i8,
    pub heading: u16,
    pub threshold: u16,
    pub queued: usize,
    pub dropped: u32,
    pub last_distance: DistanceSample,
    pub sweeps: u32,
    pub observed: Option<(usize, usize)>,
}

pub struct Scanner {
    config: ScanConfig,
    link: Arc<SharedLink>,
    scan: ScanController,
    table: BearingTable,
    queue: ObstacleQueue,
    segmenter: Segmenter,
    last_distance: DistanceSample,
    /// Lockstep gate: second table half sent since the last step
    half2_sent: bool,
    sweeps: u32,
}

impl Scanner {
    /// Create a scanner at the starboard bound with an empty table and queue
    pub fn new(config: ScanConfig, link: Arc<SharedLink>) -> Result<Self, ConfigError> {
        config.validate()?;

        let scanner = Scanner {
            scan: ScanController::new(&config),
            table: BearingTable::new(config.interval),
            queue: ObstacleQueue::new(config.queue_capacity),
            segmenter: Segmenter::new(link.threshold()),
            last_distance: 0,
            half2_sent: true,
            sweeps: 0,
            config,
            link,
        };
        log::debug!(
            "scanner ready: {} buckets, queue {}, threshold {}",
            scanner.table.len(),
            scanner.queue.capacity(),
            scanner.segmenter.threshold()
        );
        Ok(scanner)
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn link(&self) -> &Arc<SharedLink> {
        &self.link
    }

    pub fn scan_state(&self) -> ScanState {
        self.scan.state()
    }

    pub fn table(&self) -> &BearingTable {
        &self.table
    }

    pub fn queue(&self) -> &ObstacleQueue {
        &self.queue
    }

    pub fn last_distance(&self) -> DistanceSample {
        self.last_distance
    }

    /// Number of completed segmentation passes
    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }

    /// Advance the scan by one step
    ///
    /// Returns `None` when lockstep is enabled and the host has not yet
    /// pulled the second table half since the previous step.
    pub fn tick<S: RangeSensor, A: Actuator>(
        &mut self,
        sensor: &mut S,
        actuator: &mut A,
    ) -> Option<StepReport> {
        if self.config.lockstep && !self.half2_sent {
            return None;
        }

        if self.scan.at_sweep_end() && self.table.observed().is_some() {
            self.finish_sweep();
        }

        let heading = self.link.heading();
        let report = self.scan.step(sensor, actuator, heading, &mut self.table);
        self.last_distance = report.distance;
        self.half2_sent = false;

        Some(report)
    }

    /// Send the response to the pending host command, if any
    ///
    /// Returns the command that was handled. An unknown command code is
    /// consumed and reported as an error without sending anything.
    pub fn service_host<T: Transport>(
        &mut self,
        transport: &mut T,
    ) -> Result<Option<Command>, ProtocolError> {
        let Some(cmd) = self.link.take_pending() else {
            return Ok(None);
        };

        let command = match Command::try_from(cmd) {
            Ok(command) => command,
            Err(e) => {
                log::debug!("host: {}", e);
                return Err(e);
            }
        };

        match command {
            Command::Reset => self.reset(),
            Command::SetThreshold => self.segmenter.set_threshold(self.link.threshold()),
            _ => {}
        }

        if let Some(frame) = respond(cmd, &mut self.queue, &self.table, self.last_distance)? {
            log::trace!("sent {:02X?}", frame);
            transport.send(&frame);
            transport.flush();
            if command == Command::DistMatrixHalf2 {
                self.half2_sent = true;
            }
        }

        Ok(Some(command))
    }

    /// Return to the starboard bound and forget everything measured
    pub fn reset(&mut self) {
        self.scan.reset();
        self.queue.clear();
        self.table.clear();
        self.last_distance = 0;
        self.half2_sent = true;
        log::debug!("scanner reset");
    }

    pub fn status(&self) -> ScannerStatus {
        let state = self.scan.state();
        ScannerStatus {
            angle: state.angle,
            direction: state.direction,
            heading: self.link.heading(),
            threshold: self.segmenter.threshold(),
            queued: self.queue.len(),
            dropped: self.queue.dropped(),
            last_distance: self.last_distance,
            sweeps: self.sweeps,
            observed: self.table.observed(),
        }
    }

    fn finish_sweep(&mut self) {
        self.segmenter.set_threshold(self.link.threshold());
        let found = self.segmenter.segment(&self.table, &mut self.queue);
        self.table.clear_observed();
        self.sweeps = self.sweeps.wrapping_add(1);
        log::debug!(
            "sweep {} complete: {} obstacles found, {} queued",
            self.sweeps,
            found,
            self.queue.len()
        );
    }
}
