//! Sensor Board Server
//!
//! Runs the sensor board core on a host: a simulated LIDAR-Lite and servo
//! stand in for the board hardware, and a TCP socket stands in for the serial
//! line to the autopilot.
//!
//! Two subsystems under tokio-graceful-shutdown:
//!
//! - `scanner`: the cooperative main loop ([`runner::ScannerRunner`])
//! - `link`: the host connection ([`link::HostLink`]), which also plays the
//!   receive interrupt

use std::sync::Arc;

use sensorboard_core::{Scanner, SharedLink};
use tokio::sync::mpsc;
use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle};

pub mod config;
pub mod error;
pub mod link;
pub mod runner;
pub mod sim;

pub use config::ServerConfig;
pub use error::ServerError;

use link::HostLink;
use runner::ScannerRunner;

/// Frames buffered between the main loop and the host link
const OUTBOUND_FRAMES: usize = 16;

/// Assembled board, ready to be started under a [`tokio_graceful_shutdown::Toplevel`]
pub struct Server {
    runner: ScannerRunner<sim::SimulatedSensor, sim::SimulatedActuator>,
    host: HostLink,
}

impl Server {
    /// Validate the configuration and wire the simulated board together
    pub fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let link = Arc::new(SharedLink::new(config.scan.threshold));
        let scanner = Scanner::new(config.scan.clone(), link.clone())?;
        let (mut sensor, actuator) = sim::board(&config.world, config.scan.range, link.clone());
        if let Err(e) = sensor.init() {
            log::warn!("LIDAR init failed: {}", e);
        }

        let (tx, rx) = mpsc::channel(OUTBOUND_FRAMES);
        Ok(Server {
            runner: ScannerRunner::new(scanner, sensor, actuator, tx, config.tick()),
            host: HostLink::new(config.listen_addr()?, link, rx),
        })
    }

    pub fn start(self, subsys: &SubsystemHandle) {
        let Server { runner, host } = self;
        subsys.start(SubsystemBuilder::new("scanner", |s| runner.run(s)));
        subsys.start(SubsystemBuilder::new("link", |s| host.run(s)));
    }
}
