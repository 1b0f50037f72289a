//! LIDAR-Lite v1 driver
//!
//! Register-level access to the PulsedLight LIDAR-Lite over a two-wire bus.
//! The bus itself is supplied by the caller through [`RegisterBus`], so the
//! driver works the same on the board's I2C master and in a simulator.
//!
//! | Register | Address | Use |
//! |----------|---------|-----|
//! | Command | 0x00 | write 0x00 to reset to measurement defaults |
//! | Distance | 0x0F | 16-bit distance in cm, high byte first |
//!
//! Setting bit 7 of a register address reads two consecutive registers in
//! one transfer, so the distance is read from `0x8F`.

use crate::io::RangeSensor;
use crate::DistanceSample;

/// 7-bit slave address
pub const SLAVE_ADDR: u8 = 0x62;

pub const REG_COMMAND: u8 = 0x00;
pub const REG_DISTANCE: u8 = 0x0F;

/// Address flag for a two-register read
pub const AUTO_INCREMENT: u8 = 0x80;

/// Value written to [`REG_COMMAND`] to reset the sensor
pub const CMD_RESET_DEFAULTS: u8 = 0x00;

/// Register read/write access to a device at a fixed slave address
pub trait RegisterBus {
    type Error: std::fmt::Debug;

    fn write_register(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), Self::Error>;

    /// Read `buf.len()` bytes starting at `reg`
    fn read_registers(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Combine the two distance registers, high byte first
pub fn decode_distance(bytes: [u8; 2]) -> DistanceSample {
    u16::from_be_bytes(bytes)
}

/// LIDAR-Lite attached to a register bus
#[derive(Debug)]
pub struct LidarLite<B: RegisterBus> {
    bus: B,
    failures: u32,
}

impl<B: RegisterBus> LidarLite<B> {
    pub fn new(bus: B) -> Self {
        LidarLite { bus, failures: 0 }
    }

    /// Reset the sensor to its measurement defaults
    pub fn init(&mut self) -> Result<(), B::Error> {
        self.bus
            .write_register(SLAVE_ADDR, REG_COMMAND, CMD_RESET_DEFAULTS)
    }

    /// Number of failed distance reads since creation
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B: RegisterBus> RangeSensor for LidarLite<B> {
    fn measure(&mut self) -> Option<DistanceSample> {
        let mut buf = [0u8; 2];
        match self
            .bus
            .read_registers(SLAVE_ADDR, AUTO_INCREMENT | REG_DISTANCE, &mut buf)
        {
            Ok(()) => Some(decode_distance(buf)),
            Err(e) => {
                self.failures = self.failures.wrapping_add(1);
                log::trace!("lidar read failed: {:?}", e);
                None
            }
        }
    }
}
