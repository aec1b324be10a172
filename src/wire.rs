//! Fixed-width field extraction from raw payload bytes
//!
//! All readers are total: a buffer too short for the requested field yields
//! `None`, never a panic. Nothing here allocates.

/// Read a `u8` at `offset`.
#[inline]
pub fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

/// Read a little-endian `u16` at `offset`.
#[inline]
pub fn read_u16_le(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a little-endian `u32` at `offset`.
#[inline]
pub fn read_u32_le(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a little-endian IEEE-754 `f32` at `offset`.
#[inline]
pub fn read_f32_le(buf: &[u8], offset: usize) -> Option<f32> {
    read_u32_le(buf, offset).map(f32::from_bits)
}
