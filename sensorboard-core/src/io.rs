//! Collaborator traits
//!
//! The core never touches hardware. Whoever runs it (board firmware, host
//! simulator, tests) supplies these three collaborators.
//!
//! | Trait | Board implementation | Blocking |
//! |-------|----------------------|----------|
//! | [`RangeSensor`] | LIDAR-Lite over I2C | bounded settling delay |
//! | [`Actuator`] | hobby servo on a PWM timer | no |
//! | [`Transport`] | USART transmit register | no |

use crate::DistanceSample;

/// Source of single range readings
pub trait RangeSensor {
    /// Take one reading, `None` if the sensor did not answer
    ///
    /// May block for the sensor's settling time. Only ever called from the
    /// main loop.
    fn measure(&mut self) -> Option<DistanceSample>;
}

/// Drives the scan head to a body-relative angle
pub trait Actuator {
    /// Fire-and-forget move to `angle` degrees, 0 being the starboard bound
    fn set_angle(&mut self, angle: u16);
}

/// Outbound half of the host serial link
pub trait Transport {
    /// Queue one byte for transmission
    fn send_byte(&mut self, byte: u8);

    /// Queue a complete frame
    fn send(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.send_byte(b);
        }
    }

    /// Hint that a frame is complete and may be pushed out
    fn flush(&mut self) {}
}

impl Transport for Vec<u8> {
    fn send_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    fn send(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}
