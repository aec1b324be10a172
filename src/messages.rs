//! Subject identifiers and fixed-layout payload codecs
//!
//! Payload layouts follow the bus convention: all fields little-endian at
//! fixed offsets, reserved bytes zero.

use crate::protocol::SubjectId;
use crate::wire;

/// Fixed subject of the node liveness (heartbeat) message.
pub const HEARTBEAT_SUBJECT: SubjectId = match SubjectId::new(7509) {
    Some(subject) => subject,
    None => panic!("heartbeat subject out of range"),
};

/// Vendor subject of the ultrasound range sensor.
pub const ULTRASOUND_SUBJECT: SubjectId = match SubjectId::new(2300) {
    Some(subject) => subject,
    None => panic!("ultrasound subject out of range"),
};

/// Maximum serialized heartbeat size.
pub const HEARTBEAT_EXTENT: usize = 7;

/// Maximum serialized ultrasound reading size.
pub const ULTRASOUND_EXTENT: usize = 7;

/// Node liveness message: `u32` uptime in bytes 0..4, bytes 4..7 reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    pub uptime_secs: u32,
}

impl Heartbeat {
    pub fn encode(&self) -> [u8; HEARTBEAT_EXTENT] {
        let mut payload = [0u8; HEARTBEAT_EXTENT];
        payload[..4].copy_from_slice(&self.uptime_secs.to_le_bytes());
        payload
    }

    pub fn decode(payload: &[u8]) -> Option<Self> {
        Some(Self {
            uptime_secs: wire::read_u32_le(payload, 0)?,
        })
    }
}

/// Ultrasound range reading: `f32` meters at offset 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UltrasoundReading {
    pub range_m: f32,
}

impl UltrasoundReading {
    /// Decodes the reading. A payload shorter than four bytes yields `None`,
    /// which is an absence of data, not a zero reading.
    pub fn decode(payload: &[u8]) -> Option<Self> {
        Some(Self {
            range_m: wire::read_f32_le(payload, 0)?,
        })
    }
}
