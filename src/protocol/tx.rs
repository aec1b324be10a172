//! Transfer segmentation: one logical message into 1..n CAN frames

use super::format::{self, TailByte, TransferCrc, SOT_TOGGLE};
use super::frame::CanFrame;
use super::{Mtu, NodeId, Priority, SubjectId, TransferId};

/// Split a message transfer into transmission-ready CAN frames.
///
/// Payloads that fit a single frame alongside the tail byte are emitted as
/// one frame; larger payloads are segmented with the transfer CRC appended
/// big-endian after the last payload byte. Every produced frame respects the
/// MTU bound.
pub fn encode(
    priority: Priority,
    subject: SubjectId,
    source: NodeId,
    transfer_id: TransferId,
    payload: &[u8],
    mtu: Mtu,
) -> Vec<CanFrame> {
    let id = format::encode_message_id(priority, subject, source);
    let capacity = mtu.payload_capacity();

    if payload.len() <= capacity {
        return vec![build_frame(id, payload, TailByte::new(true, true, SOT_TOGGLE, transfer_id))];
    }

    // Multi-frame: payload followed by the big-endian transfer CRC.
    let mut crc = TransferCrc::default();
    crc.add_bytes(payload);
    let mut stream = Vec::with_capacity(payload.len() + TransferCrc::LENGTH);
    stream.extend_from_slice(payload);
    stream.extend_from_slice(&crc.get().to_be_bytes());

    let mut frames = Vec::with_capacity(stream.len().div_ceil(capacity));
    let mut toggle = SOT_TOGGLE;
    let mut chunks = stream.chunks(capacity).peekable();
    let mut first = true;
    while let Some(chunk) = chunks.next() {
        let last = chunks.peek().is_none();
        let tail = TailByte::new(first, last, toggle, transfer_id);
        frames.push(build_frame(id, chunk, tail));
        toggle = !toggle;
        first = false;
    }
    frames
}

fn build_frame(id: u32, chunk: &[u8], tail: TailByte) -> CanFrame {
    let mut data = Vec::with_capacity(chunk.len() + 1);
    data.extend_from_slice(chunk);
    data.push(tail.into());
    CanFrame::new(id, &data).expect("chunk sized to the classic CAN frame limit")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> SubjectId {
        SubjectId::new(7509).unwrap()
    }

    fn source() -> NodeId {
        NodeId::new(42).unwrap()
    }

    #[test]
    fn test_single_frame_transfer() {
        let payload = [1, 2, 3, 4, 5, 6, 7];
        let frames = encode(
            Priority::Nominal,
            subject(),
            source(),
            TransferId::from_truncating(3),
            &payload,
            Mtu::CLASSIC,
        );

        assert_eq!(frames.len(), 1);
        let data = frames[0].data();
        assert_eq!(data.len(), 8);
        assert_eq!(&data[..7], &payload);

        let tail = TailByte::from(data[7]);
        assert!(tail.sot());
        assert!(tail.eot());
        assert!(tail.toggle());
        assert_eq!(tail.transfer_id().into_u8(), 3);
    }

    #[test]
    fn test_empty_payload_single_frame() {
        let frames = encode(
            Priority::Nominal,
            subject(),
            source(),
            TransferId::default(),
            &[],
            Mtu::CLASSIC,
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data().len(), 1); // tail byte only
    }

    #[test]
    fn test_multi_frame_structure() {
        let payload: Vec<u8> = (0..12).collect();
        let frames = encode(
            Priority::Nominal,
            subject(),
            source(),
            TransferId::from_truncating(7),
            &payload,
            Mtu::CLASSIC,
        );

        // 12 payload + 2 CRC = 14 bytes over 7-byte chunks
        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert!(frame.data().len() <= Mtu::CLASSIC.frame_capacity());
        }

        let first = TailByte::from(*frames[0].data().last().unwrap());
        assert!(first.sot() && !first.eot() && first.toggle());

        let last = TailByte::from(*frames[1].data().last().unwrap());
        assert!(!last.sot() && last.eot() && !last.toggle());
        assert_eq!(last.transfer_id().into_u8(), 7);
    }

    #[test]
    fn test_multi_frame_crc_residue() {
        let payload: Vec<u8> = (0..20).collect();
        let frames = encode(
            Priority::Nominal,
            subject(),
            source(),
            TransferId::default(),
            &payload,
            Mtu::CLASSIC,
        );

        // Running the CRC over every transported byte leaves the residue.
        let mut crc = TransferCrc::default();
        for frame in &frames {
            let data = frame.data();
            crc.add_bytes(&data[..data.len() - 1]);
        }
        assert_eq!(crc.get(), TransferCrc::RESIDUE);
    }

    #[test]
    fn test_all_frames_share_can_id() {
        let payload = [0u8; 30];
        let frames = encode(
            Priority::High,
            subject(),
            source(),
            TransferId::default(),
            &payload,
            Mtu::CLASSIC,
        );
        assert!(frames.len() > 1);
        assert!(frames.iter().all(|f| f.id() == frames[0].id()));
    }
}
