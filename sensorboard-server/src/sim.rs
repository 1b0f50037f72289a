//! Simulated board hardware
//!
//! A servo and a LIDAR-Lite on a fake register bus, looking at a fixed set of
//! targets. The servo and the bus share the commanded angle, and the bus reads
//! the heading from the [`SharedLink`], so the simulated range depends on
//! exactly the same inputs the real sensor's would.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use sensorboard_core::lidar::{LidarLite, RegisterBus, AUTO_INCREMENT, REG_DISTANCE};
use sensorboard_core::{to_true_bearing, Actuator, SharedLink};
use thiserror::Error;

use crate::config::{Target, WorldConfig};

/// The simulated sensor as the scanner sees it
pub type SimulatedSensor = LidarLite<SimulatedBus>;

/// Smallest angle between two bearings, in degrees
fn bearing_gap(a: u16, b: u16) -> u16 {
    let d = (a as i32 - b as i32).rem_euclid(360);
    d.min(360 - d) as u16
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedWorld {
    targets: Vec<Target>,
}

impl SimulatedWorld {
    pub fn new(targets: Vec<Target>) -> Self {
        SimulatedWorld { targets }
    }

    /// Distance to the nearest target covering `bearing`, 0 if none
    pub fn range_at(&self, bearing: u16) -> u16 {
        self.targets
            .iter()
            .filter(|t| bearing_gap(t.bearing, bearing) * 2 <= t.width)
            .map(|t| t.distance)
            .min()
            .unwrap_or(0)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("no acknowledge from slave 0x{0:02X}")]
    Nack(u8),
    #[error("unsupported register 0x{0:02X}")]
    Register(u8),
}

/// Register bus with a LIDAR-Lite behind it
#[derive(Debug)]
pub struct SimulatedBus {
    world: SimulatedWorld,
    angle: Arc<AtomicU16>,
    link: Arc<SharedLink>,
    range: u16,
    drop_every: Option<u32>,
    reads: u32,
}

impl SimulatedBus {
    pub fn reads(&self) -> u32 {
        self.reads
    }

    fn current_bearing(&self) -> u16 {
        to_true_bearing(
            self.angle.load(Ordering::Relaxed),
            self.link.heading(),
            self.range,
        )
    }
}

impl RegisterBus for SimulatedBus {
    type Error = BusError;

    fn write_register(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), Self::Error> {
        log::trace!("bus write 0x{:02X}[0x{:02X}] = 0x{:02X}", addr, reg, value);
        Ok(())
    }

    fn read_registers(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        if reg != AUTO_INCREMENT | REG_DISTANCE || buf.len() != 2 {
            return Err(BusError::Register(reg));
        }

        self.reads = self.reads.wrapping_add(1);
        if let Some(n) = self.drop_every.filter(|&n| n > 0) {
            if self.reads % n == 0 {
                return Err(BusError::Nack(addr));
            }
        }

        let distance = self.world.range_at(self.current_bearing());
        buf.copy_from_slice(&distance.to_be_bytes());
        Ok(())
    }
}

/// Servo that only remembers where it was told to go
#[derive(Debug, Clone)]
pub struct SimulatedActuator {
    angle: Arc<AtomicU16>,
}

impl SimulatedActuator {
    pub fn angle(&self) -> u16 {
        self.angle.load(Ordering::Relaxed)
    }
}

impl Actuator for SimulatedActuator {
    fn set_angle(&mut self, angle: u16) {
        self.angle.store(angle, Ordering::Relaxed);
    }
}

/// Build a connected sensor and actuator pair
///
/// # Arguments
/// * `world` - Targets and read failure rate
/// * `range` - Half-width of the sweep arc, as configured for the scan
/// * `link` - Shared link carrying the host heading
pub fn board(
    world: &WorldConfig,
    range: u16,
    link: Arc<SharedLink>,
) -> (SimulatedSensor, SimulatedActuator) {
    let angle = Arc::new(AtomicU16::new(0));
    let bus = SimulatedBus {
        world: SimulatedWorld::new(world.targets.clone()),
        angle: angle.clone(),
        link,
        range,
        drop_every: world.drop_every,
        reads: 0,
    };
    (LidarLite::new(bus), SimulatedActuator { angle })
}
