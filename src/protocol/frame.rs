//! Classic CAN frame value type

use super::Mtu;

/// A single classic CAN data frame with a 29-bit extended identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanFrame {
    id: u32,
    data: FrameData,
}

impl CanFrame {
    pub const EXTENDED_ID_MAX: u32 = 0x1FFF_FFFF;

    /// Build a frame. Returns `None` if the identifier exceeds 29 bits or
    /// the data does not fit a classic CAN frame.
    pub fn new(id: u32, data: &[u8]) -> Option<Self> {
        if id > Self::EXTENDED_ID_MAX {
            return None;
        }
        Some(Self {
            id,
            data: FrameData::new(data)?,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The tail byte is always the last data byte of a Cyphal frame.
    pub fn tail(&self) -> Option<u8> {
        self.data.last().copied()
    }
}

/// Frame data storage: fixed 8-byte array plus an explicit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameData {
    len: u8,
    bytes: [u8; 8],
}

impl FrameData {
    pub fn new(data: &[u8]) -> Option<Self> {
        if data.len() > Mtu::CLASSIC.frame_capacity() {
            return None;
        }
        let mut bytes = [0u8; 8];
        bytes[..data.len()].copy_from_slice(data);
        Some(Self {
            len: data.len() as u8,
            bytes,
        })
    }
}

impl std::ops::Deref for FrameData {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.bytes[..self.len as usize]
    }
}
