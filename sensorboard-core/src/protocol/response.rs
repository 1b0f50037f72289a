//! Response framing
//!
//! Pure functions building outbound frames. The only side effect is the
//! queue drain performed by the `OBSTACLES` response.

use super::{Command, END, START};
use crate::error::ProtocolError;
use crate::queue::ObstacleQueue;
use crate::table::BearingTable;
use crate::DistanceSample;

/// Wrap a payload in `START START cmd LEN payload END`
///
/// Configuration validation keeps every scanner response within 255 bytes;
/// anything longer is refused rather than sent with a wrapped LEN.
pub fn frame(cmd: u8, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let len =
        u8::try_from(payload.len()).map_err(|_| ProtocolError::PayloadTooLong(payload.len()))?;

    let mut out = Vec::with_capacity(payload.len() + 5);
    out.push(START);
    out.push(START);
    out.push(cmd);
    out.push(len);
    out.extend_from_slice(payload);
    out.push(END);
    Ok(out)
}

/// Samples as big-endian byte pairs
pub fn encode_samples(samples: &[DistanceSample]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

/// Build the response frame for a received command code
///
/// Returns `Ok(None)` for commands that produce no frame (`RESET`,
/// `SET_THRESHOLD`), [`ProtocolError::UnknownCommand`] for codes outside
/// the command table and [`ProtocolError::PayloadTooLong`] for a table half
/// wider than a frame can carry.
pub fn respond(
    cmd: u8,
    queue: &mut ObstacleQueue,
    table: &BearingTable,
    last_distance: DistanceSample,
) -> Result<Option<Vec<u8>>, ProtocolError> {
    let payload = match Command::try_from(cmd)? {
        Command::Reset | Command::SetThreshold => return Ok(None),
        Command::Obstacles => {
            let mut payload = Vec::with_capacity(queue.len() * 4);
            for obstacle in queue.drain() {
                payload.extend_from_slice(&obstacle.to_be_bytes());
            }
            payload
        }
        Command::NumObstacles => vec![queue.len() as u8],
        Command::LastDistance => last_distance.to_be_bytes().to_vec(),
        Command::DistMatrixHalf1 => encode_samples(table.half(0)),
        Command::DistMatrixHalf2 => encode_samples(table.half(1)),
    };

    frame(cmd, &payload).map(Some)
}
