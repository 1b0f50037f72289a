//! Sensor Board Core
//!
//! Platform-independent obstacle detection and host reporting for a sweeping
//! range sensor mounted on an autonomous sailing vessel.
//!
//! The crate contains no I/O. The ranging sensor, the scan actuator and the
//! serial line are reached through the traits in [`io`], so the same code runs
//! on the board, in the host simulator and in tests.
//!
//! # Pipeline
//!
//! ```text
//! ScanController --(mapper)--> BearingTable --> Segmenter --> ObstacleQueue
//!                                                                  |
//!      host bytes --> ProtocolReceiver --(SharedLink)--> Scanner::service_host --> Transport
//! ```
//!
//! - [`scan`]: sweeps the actuator between the two arc extremes and samples
//!   the range sensor once per step
//! - [`mapper`]: body-relative scan angle plus heading to true bearing
//! - [`table`]: bearing-indexed distance table
//! - [`segment`]: edge detection over the table, emits obstacles
//! - [`queue`]: bounded drop-oldest obstacle FIFO
//! - [`protocol`]: command frame byte machine and response framing
//! - [`scanner`]: the context object that owns all main-loop state
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sensorboard_core::{ProtocolReceiver, ScanConfig, Scanner, SharedLink};
//!
//! let config = ScanConfig::default();
//! let link = Arc::new(SharedLink::new(config.threshold));
//! let mut scanner = Scanner::new(config, link.clone())?;
//!
//! // Receive interrupt: one call per byte
//! let mut receiver = ProtocolReceiver::new(link);
//! receiver.on_byte(byte);
//!
//! // Main loop, once per tick
//! scanner.tick(&mut sensor, &mut servo);
//! scanner.service_host(&mut uart)?;
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod lidar;
pub mod mapper;
pub mod protocol;
pub mod queue;
pub mod scan;
pub mod scanner;
pub mod segment;
pub mod table;

pub use config::{ScanConfig, SweepMode};
pub use error::{ConfigError, ProtocolError};
pub use io::{Actuator, RangeSensor, Transport};
pub use mapper::{to_true_bearing, wrap360};
pub use protocol::{Command, ProtocolReceiver, ReceiverState, SharedLink};
pub use queue::{Obstacle, ObstacleQueue};
pub use scan::{ScanController, ScanState, StepReport};
pub use scanner::{Scanner, ScannerStatus};
pub use segment::Segmenter;
pub use table::BearingTable;

/// Distance in the sensor's native unit (centimetres for the LIDAR-Lite)
pub type DistanceSample = u16;
