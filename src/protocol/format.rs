//! Cyphal/CAN wire format: CAN ID layout, tail byte, transfer CRC

use super::{NodeId, Priority, SubjectId, TransferId};

/// Service-transfer flag, CAN ID bit 25. Message frames keep it clear.
const FLAG_SERVICE_NOT_MESSAGE: u32 = 1 << 25;
/// Anonymous-source flag, CAN ID bit 24.
const FLAG_ANONYMOUS: u32 = 1 << 24;
/// Reserved bit 23, must be clear on valid message frames.
const FLAG_RESERVED_23: u32 = 1 << 23;
/// Reserved bits 21 and 22, set on transmit, ignored on receipt.
const RESERVED_21_22: u32 = 0x0060_0000;

const PRIORITY_OFFSET: u32 = 26;
const SUBJECT_OFFSET: u32 = 8;

/// Header fields recovered from a message-transfer CAN ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub priority: Priority,
    pub subject: SubjectId,
    /// `None` when the anonymous flag is set.
    pub source: Option<NodeId>,
}

/// Encode the 29-bit CAN ID of a message frame from a known source node.
pub fn encode_message_id(priority: Priority, subject: SubjectId, source: NodeId) -> u32 {
    (priority.into_bits() as u32) << PRIORITY_OFFSET
        | RESERVED_21_22
        | (subject.into_u16() as u32) << SUBJECT_OFFSET
        | source.into_u8() as u32
}

/// Parse a 29-bit CAN ID as a message frame header.
///
/// Service frames and frames with the reserved bit set yield `None`; this is
/// the "wrong transfer kind" filter of the receive path.
pub fn parse_message_id(id: u32) -> Option<MessageHeader> {
    if id & FLAG_SERVICE_NOT_MESSAGE != 0 || id & FLAG_RESERVED_23 != 0 {
        return None;
    }
    let priority = Priority::from_bits((id >> PRIORITY_OFFSET) as u8);
    let subject = SubjectId::new((id >> SUBJECT_OFFSET) as u16 & SubjectId::MAX)?;
    let source = if id & FLAG_ANONYMOUS != 0 {
        None
    } else {
        NodeId::new(id as u8 & NodeId::MAX)
    };
    Some(MessageHeader {
        priority,
        subject,
        source,
    })
}

/// Tail byte: the last data byte of every Cyphal/CAN frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailByte(u8);

impl TailByte {
    const START_OF_TRANSFER: u8 = 7;
    const END_OF_TRANSFER: u8 = 6;
    const TOGGLE_BIT: u8 = 5;

    pub fn new(sot: bool, eot: bool, toggle: bool, transfer_id: TransferId) -> Self {
        Self(
            (sot as u8) << Self::START_OF_TRANSFER
                | (eot as u8) << Self::END_OF_TRANSFER
                | (toggle as u8) << Self::TOGGLE_BIT
                | transfer_id.into_u8(),
        )
    }

    pub fn sot(&self) -> bool {
        (self.0 >> Self::START_OF_TRANSFER) & 0x1 != 0
    }

    pub fn eot(&self) -> bool {
        (self.0 >> Self::END_OF_TRANSFER) & 0x1 != 0
    }

    pub fn toggle(&self) -> bool {
        (self.0 >> Self::TOGGLE_BIT) & 0x1 != 0
    }

    pub fn transfer_id(&self) -> TransferId {
        TransferId::from_truncating(self.0)
    }
}

impl From<TailByte> for u8 {
    fn from(value: TailByte) -> Self {
        value.0
    }
}

impl From<u8> for TailByte {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Toggle bit value of a start-of-transfer frame.
pub const SOT_TOGGLE: bool = true;

/// CRC-16/CCITT-FALSE over multi-frame transfer payloads.
///
/// The CRC is appended big-endian; running the CRC over payload plus the
/// appended bytes leaves the zero residue checked on receipt.
#[derive(Debug, Clone, Copy)]
pub struct TransferCrc(u16);

impl Default for TransferCrc {
    fn default() -> Self {
        Self(Self::INIT_VALUE)
    }
}

impl TransferCrc {
    pub const LENGTH: usize = 2;
    pub const RESIDUE: u16 = 0x0000;
    const INIT_VALUE: u16 = 0xFFFF;
    const POLYNOMIAL: u16 = 0x1021;

    pub fn add(&mut self, byte: u8) {
        self.0 ^= u16::from(byte) << 8;
        for _bit in 0..8 {
            if (self.0 & 0x8000) != 0 {
                self.0 = (self.0 << 1) ^ Self::POLYNOMIAL;
            } else {
                self.0 <<= 1;
            }
        }
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        bytes.iter().for_each(|&byte| self.add(byte));
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}
