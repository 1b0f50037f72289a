//! Error types
//!
//! Only configuration, unknown commands and oversized responses are errors
//! here. A failed sensor read, a malformed frame or a queue overflow is
//! absorbed where it happens.

use thiserror::Error;

/// Rejected [`ScanConfig`](crate::ScanConfig)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("interval {0} must be non-zero and divide 360")]
    Interval(u16),

    #[error("range {0} must be between 1 and 180 degrees")]
    Range(u16),

    #[error("maximum distance must be non-zero")]
    MaxDistance,

    #[error("bearing table of {0} samples does not fit a response frame")]
    TableTooLarge(usize),

    #[error("queue capacity {0} must be between 1 and 63")]
    QueueCapacity(usize),
}

/// Host protocol failures reported to the caller of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown command 0x{0:02X}")]
    UnknownCommand(u8),

    #[error("payload of {0} bytes does not fit the LEN byte")]
    PayloadTooLong(usize),
}
