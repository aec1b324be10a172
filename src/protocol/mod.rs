//! Cyphal/CAN protocol layer
//!
//! Typed identifiers, the classic CAN frame value type, the CAN ID / tail
//! byte / transfer CRC wire format, transfer segmentation (tx) and
//! reassembly (rx).

pub mod format;
pub mod frame;
pub mod rx;
pub mod tx;

use crate::error::Error;

/// Transfer priority, 3-bit CAN ID field.
///
/// Lower numeric value wins bus arbitration first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    Exceptional = 0,
    Immediate = 1,
    Fast = 2,
    High = 3,
    /// Default for periodic traffic, including heartbeats.
    Nominal = 4,
    Low = 5,
    Slow = 6,
    Optional = 7,
}

impl Priority {
    pub const fn from_bits(code: u8) -> Priority {
        match code & 0x7 {
            0 => Priority::Exceptional,
            1 => Priority::Immediate,
            2 => Priority::Fast,
            3 => Priority::High,
            4 => Priority::Nominal,
            5 => Priority::Low,
            6 => Priority::Slow,
            _ => Priority::Optional,
        }
    }

    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

/// 7-bit node identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u8);

impl NodeId {
    pub const MAX: u8 = 0x7F;

    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn into_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u16> for NodeId {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value <= Self::MAX as u16 {
            Ok(Self(value as u8))
        } else {
            Err(Error::InvalidNodeId(value))
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 13-bit subject (topic) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId(u16);

impl SubjectId {
    pub const MAX: u16 = 0x1FFF;

    pub const fn new(value: u16) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn into_u16(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 5-bit transfer sequence number, wrapping modulo 32.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct TransferId(u8);

impl TransferId {
    pub const MAX: u8 = 0x1F;

    pub const fn from_truncating(value: u8) -> Self {
        Self(value & Self::MAX)
    }

    pub const fn into_u8(self) -> u8 {
        self.0
    }

    /// Successor modulo the 5-bit counter width.
    pub const fn next(self) -> Self {
        Self((self.0 + 1) & Self::MAX)
    }
}

/// Per-frame transmission unit. Classic CAN only, no FD.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mtu(usize);

impl Mtu {
    pub const CLASSIC: Mtu = Mtu(8);

    /// Total frame data capacity, tail byte included.
    pub const fn frame_capacity(self) -> usize {
        self.0
    }

    /// Payload bytes per frame after the tail byte.
    pub const fn payload_capacity(self) -> usize {
        self.0 - 1
    }
}

/// A fully reassembled application-level message.
///
/// The payload is owned; dropping the transfer releases it on every dispatch
/// path, matched or not.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub priority: Priority,
    pub subject: SubjectId,
    /// `None` for anonymous senders.
    pub source: Option<NodeId>,
    pub transfer_id: TransferId,
    pub payload: Vec<u8>,
}
