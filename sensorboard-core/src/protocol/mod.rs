//! Host Protocol
//!
//! Byte-oriented command/response protocol between the sensor board and the
//! autopilot host over a serial line.
//!
//! # Wire format
//!
//! ```text
//! Command:  02 02 CMD P0 P1 03            (fixed 6 bytes)
//! Response: 02 02 CMD LEN payload... 03
//! ```
//!
//! `P0 P1` is a big-endian 16-bit value. For [`Command::SetThreshold`] it is
//! the new segmenter threshold, for every other command it is the vessel
//! heading in degrees.
//!
//! # Commands
//!
//! | Code | Command | Response payload |
//! |------|---------|------------------|
//! | 0x48 | `OBSTACLES` | 4 bytes per queued obstacle, drains the queue |
//! | 0x49 | `NUM_OBSTACLES` | queue length, 1 byte |
//! | 0x4A | `LAST_DISTANCE` | last sample, 2 bytes |
//! | 0x4B | `DIST_MATRIX_HALF1` | first half of the bearing table |
//! | 0x4C | `DIST_MATRIX_HALF2` | second half of the bearing table |
//! | 0x52 | `RESET` | none |
//! | 0x54 | `SET_THRESHOLD` | none |
//!
//! Parsing happens in the receive context ([`ProtocolReceiver`]), responses
//! are built and sent from the main loop. The two meet only in [`SharedLink`].

mod receiver;
mod response;

use std::sync::atomic::{AtomicU16, Ordering};

pub use receiver::{ProtocolReceiver, ReceiverState};
pub(crate) use response::respond;

use crate::error::ProtocolError;

/// Frame start marker, sent twice
pub const START: u8 = 0x02;

/// Frame end marker
pub const END: u8 = 0x03;

/// Host command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    Obstacles = 0x48,
    NumObstacles = 0x49,
    LastDistance = 0x4A,
    DistMatrixHalf1 = 0x4B,
    DistMatrixHalf2 = 0x4C,
    Reset = 0x52,
    SetThreshold = 0x54,
}

impl Command {
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x48 => Ok(Command::Obstacles),
            0x49 => Ok(Command::NumObstacles),
            0x4A => Ok(Command::LastDistance),
            0x4B => Ok(Command::DistMatrixHalf1),
            0x4C => Ok(Command::DistMatrixHalf2),
            0x52 => Ok(Command::Reset),
            0x54 => Ok(Command::SetThreshold),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }
}

/// Mailbox bit marking a command as waiting for the main loop
const PENDING: u16 = 0x0100;

/// State written by the receive context and read by the main loop
///
/// Every field is a single 16-bit atomic, so a heading can never be read
/// half-updated. The pending command is a one-slot mailbox: a frame that
/// completes before the main loop polls replaces the earlier one.
#[derive(Debug)]
pub struct SharedLink {
    heading: AtomicU16,
    threshold: AtomicU16,
    pending: AtomicU16,
}

impl SharedLink {
    pub fn new(threshold: u16) -> Self {
        SharedLink {
            heading: AtomicU16::new(0),
            threshold: AtomicU16::new(threshold),
            pending: AtomicU16::new(0),
        }
    }

    /// Last heading sent by the host, as received
    pub fn heading(&self) -> u16 {
        self.heading.load(Ordering::Acquire)
    }

    pub fn set_heading(&self, heading: u16) {
        self.heading.store(heading, Ordering::Release);
    }

    pub fn threshold(&self) -> u16 {
        self.threshold.load(Ordering::Acquire)
    }

    pub fn set_threshold(&self, threshold: u16) {
        self.threshold.store(threshold, Ordering::Release);
    }

    /// Raise the response-pending flag for `cmd`
    pub fn post(&self, cmd: u8) {
        self.pending.store(PENDING | cmd as u16, Ordering::Release);
    }

    /// Take the pending command, if any, clearing the flag
    pub fn take_pending(&self) -> Option<u8> {
        let slot = self.pending.swap(0, Ordering::AcqRel);
        if slot & PENDING != 0 {
            Some((slot & 0x00FF) as u8)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        for byte in [0x48, 0x49, 0x4A, 0x4B, 0x4C, 0x52, 0x54] {
            let cmd = Command::try_from(byte).unwrap();
            assert_eq!(cmd.as_byte(), byte);
        }
        assert_eq!(Command::try_from(0x00), Err(ProtocolError::UnknownCommand(0x00)));
        assert_eq!(Command::try_from(0x4D), Err(ProtocolError::UnknownCommand(0x4D)));
    }

    #[test]
    fn test_mailbox_take_once() {
        let link = SharedLink::new(20);
        assert_eq!(link.take_pending(), None);

        link.post(0x49);
        assert_eq!(link.take_pending(), Some(0x49));
        assert_eq!(link.take_pending(), None);
    }

    #[test]
    fn test_mailbox_last_command_wins() {
        let link = SharedLink::new(20);
        link.post(0x48);
        link.post(0x4B);
        assert_eq!(link.take_pending(), Some(0x4B));
    }

    #[test]
    fn test_mailbox_carries_zero_command() {
        let link = SharedLink::new(20);
        link.post(0x00);
        assert_eq!(link.take_pending(), Some(0x00));
    }

    #[test]
    fn test_heading_and_threshold() {
        let link = SharedLink::new(20);
        assert_eq!(link.heading(), 0);
        assert_eq!(link.threshold(), 20);
        link.set_heading(359);
        link.set_threshold(45);
        assert_eq!(link.heading(), 359);
        assert_eq!(link.threshold(), 45);
    }
}
