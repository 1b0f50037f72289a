//! Inbound frame parser
//!
//! Runs once per received byte in the receive context. It never blocks,
//! never allocates and never logs.

use std::sync::Arc;

use super::{Command, SharedLink, END, START};

/// Position in the inbound command frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiverState {
    #[default]
    Idle,
    /// First START seen
    SawStart,
    /// Next byte is the command code
    ReadCommand,
    /// Next byte is the value high byte
    ReadParam0,
    /// Next byte is the value low byte
    ReadParam1,
    /// Next byte must be END
    AwaitEnd,
    /// END received, frame ready for dispatch
    Complete,
}

impl ReceiverState {
    /// Next state after receiving `byte` in this state
    pub fn next(self, byte: u8) -> ReceiverState {
        match self {
            ReceiverState::Idle | ReceiverState::Complete => {
                if byte == START {
                    ReceiverState::SawStart
                } else {
                    ReceiverState::Idle
                }
            }
            ReceiverState::SawStart => {
                if byte == START {
                    ReceiverState::ReadCommand
                } else {
                    ReceiverState::Idle
                }
            }
            ReceiverState::ReadCommand => {
                if byte == START || byte == END {
                    ReceiverState::Idle
                } else {
                    ReceiverState::ReadParam0
                }
            }
            // Parameter bytes may equal either marker
            ReceiverState::ReadParam0 => ReceiverState::ReadParam1,
            ReceiverState::ReadParam1 => ReceiverState::AwaitEnd,
            ReceiverState::AwaitEnd => {
                if byte == END {
                    ReceiverState::Complete
                } else {
                    ReceiverState::Idle
                }
            }
        }
    }
}

/// Byte machine for inbound command frames
#[derive(Debug)]
pub struct ProtocolReceiver {
    state: ReceiverState,
    cmd: u8,
    param0: u8,
    param1: u8,
    link: Arc<SharedLink>,
}

impl ProtocolReceiver {
    pub fn new(link: Arc<SharedLink>) -> Self {
        ProtocolReceiver {
            state: ReceiverState::Idle,
            cmd: 0,
            param0: 0,
            param1: 0,
            link,
        }
    }

    pub fn state(&self) -> ReceiverState {
        self.state
    }

    /// Feed one received byte, returns true when it completed a frame
    pub fn on_byte(&mut self, byte: u8) -> bool {
        match self.state {
            ReceiverState::ReadCommand => self.cmd = byte,
            ReceiverState::ReadParam0 => self.param0 = byte,
            ReceiverState::ReadParam1 => self.param1 = byte,
            _ => {}
        }

        self.state = self.state.next(byte);
        if self.state != ReceiverState::Complete {
            return false;
        }

        self.dispatch();
        self.state = ReceiverState::Idle;
        true
    }

    fn dispatch(&self) {
        let value = u16::from_be_bytes([self.param0, self.param1]);
        if self.cmd == Command::SetThreshold.as_byte() {
            self.link.set_threshold(value);
        } else {
            self.link.set_heading(value);
        }
        self.link.post(self.cmd);
    }
}
