//! Main loop subsystem
//!
//! Drives the [`Scanner`] at a fixed tick against the simulated board, the
//! way the board firmware's cooperative loop does: one scan step, then one
//! pass over the host mailbox.

use std::time::Duration;

use sensorboard_core::{Actuator, RangeSensor, Scanner, Transport};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_graceful_shutdown::SubsystemHandle;

use crate::error::ServerError;

/// Ticks between two status lines at info level
const STATUS_EVERY: u64 = 500;

/// Collects a response frame and hands it to the host link on flush
pub struct ChannelTransport {
    pending: Vec<u8>,
    tx: mpsc::Sender<Vec<u8>>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::Sender<Vec<u8>>) -> Self {
        ChannelTransport {
            pending: Vec::new(),
            tx,
        }
    }
}

impl Transport for ChannelTransport {
    fn send_byte(&mut self, byte: u8) {
        self.pending.push(byte);
    }

    fn send(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let frame = std::mem::take(&mut self.pending);
        if let Err(e) = self.tx.try_send(frame) {
            log::warn!("Host link not keeping up, frame dropped: {}", e);
        }
    }
}

pub struct ScannerRunner<S, A> {
    scanner: Scanner,
    sensor: S,
    actuator: A,
    transport: ChannelTransport,
    tick: Duration,
    ticks: u64,
}

impl<S: RangeSensor, A: Actuator> ScannerRunner<S, A> {
    pub fn new(
        scanner: Scanner,
        sensor: S,
        actuator: A,
        tx: mpsc::Sender<Vec<u8>>,
        tick: Duration,
    ) -> Self {
        ScannerRunner {
            scanner,
            sensor,
            actuator,
            transport: ChannelTransport::new(tx),
            tick,
            ticks: 0,
        }
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// One pass of the main loop
    pub fn run_once(&mut self) {
        self.scanner.tick(&mut self.sensor, &mut self.actuator);

        match self.scanner.service_host(&mut self.transport) {
            Ok(Some(command)) => log::debug!("Host command {:?} handled", command),
            Ok(None) => {}
            Err(e) => log::warn!("Host command rejected: {}", e),
        }

        self.ticks += 1;
        if self.ticks % STATUS_EVERY == 0 {
            match serde_json::to_string(&self.scanner.status()) {
                Ok(status) => log::info!("Scanner status {}", status),
                Err(e) => log::error!("Cannot serialize status: {}", e),
            }
        }
    }

    pub async fn run(mut self, subsys: SubsystemHandle) -> Result<(), ServerError> {
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!("Scanner running, tick {:?}", self.tick);

        loop {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    log::debug!("scanner: shutdown after {} ticks", self.ticks);
                    return Ok(());
                }
                _ = ticker.tick() => {
                    self.run_once();
                }
            }
        }
    }
}
