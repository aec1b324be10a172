//! Local node state: identity, outbound queue, transfer-ID counters

use std::collections::{HashMap, VecDeque};

use crate::protocol::frame::CanFrame;
use crate::protocol::{tx, Mtu, NodeId, Priority, SubjectId, TransferId};

/// Process-wide node state, created once at startup.
///
/// The per-subject transfer-ID counters live here as explicit fields rather
/// than hidden statics; each counter strictly increments modulo the 5-bit
/// width and never repeats before wraparound.
pub struct LocalNode {
    id: NodeId,
    mtu: Mtu,
    tx_queue: VecDeque<CanFrame>,
    tx_transfer_ids: HashMap<SubjectId, TransferId>,
}

impl LocalNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            mtu: Mtu::CLASSIC,
            tx_queue: VecDeque::new(),
            tx_transfer_ids: HashMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn mtu(&self) -> Mtu {
        self.mtu
    }

    /// Encode a broadcast message transfer and append its frames to the
    /// outbound queue.
    ///
    /// The subject's transfer-ID is consumed and incremented unconditionally,
    /// independent of later transmission outcome.
    pub fn publish(&mut self, priority: Priority, subject: SubjectId, payload: &[u8]) {
        let transfer_id = self.tx_transfer_ids.entry(subject).or_default();
        let frames = tx::encode(priority, subject, self.id, *transfer_id, payload, self.mtu);
        *transfer_id = transfer_id.next();
        self.tx_queue.extend(frames);
    }

    /// Pop the oldest pending outbound frame.
    pub fn pop_frame(&mut self) -> Option<CanFrame> {
        self.tx_queue.pop_front()
    }

    pub fn pending_frames(&self) -> usize {
        self.tx_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::format::TailByte;

    fn node() -> LocalNode {
        LocalNode::new(NodeId::new(42).unwrap())
    }

    fn subject() -> SubjectId {
        SubjectId::new(7509).unwrap()
    }

    #[test]
    fn test_publish_enqueues_single_frame() {
        let mut node = node();
        node.publish(Priority::Nominal, subject(), &[0u8; 7]);
        assert_eq!(node.pending_frames(), 1);

        let frame = node.pop_frame().unwrap();
        assert!(frame.data().len() <= node.mtu().frame_capacity());
        assert_eq!(node.pending_frames(), 0);
    }

    #[test]
    fn test_transfer_id_strictly_increments_and_wraps() {
        let mut node = node();
        let mut seen = Vec::new();
        for _ in 0..=TransferId::MAX as usize + 1 {
            node.publish(Priority::Nominal, subject(), &[0u8; 7]);
            let frame = node.pop_frame().unwrap();
            let tail = TailByte::from(frame.tail().unwrap());
            seen.push(tail.transfer_id().into_u8());
        }
        // 0..=31 then wrap to 0, no repeats before wraparound.
        for (i, id) in seen.iter().enumerate().take(TransferId::MAX as usize + 1) {
            assert_eq!(*id as usize, i);
        }
        assert_eq!(*seen.last().unwrap(), 0);
    }

    #[test]
    fn test_counters_are_per_subject() {
        let mut node = node();
        let other = SubjectId::new(2300).unwrap();
        node.publish(Priority::Nominal, subject(), &[0u8; 7]);
        node.publish(Priority::Nominal, other, &[0u8; 7]);

        let first = TailByte::from(node.pop_frame().unwrap().tail().unwrap());
        let second = TailByte::from(node.pop_frame().unwrap().tail().unwrap());
        assert_eq!(first.transfer_id().into_u8(), 0);
        assert_eq!(second.transfer_id().into_u8(), 0);
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut node = node();
        node.publish(Priority::Nominal, subject(), &[1; 7]);
        node.publish(Priority::Nominal, subject(), &[2; 7]);
        assert_eq!(node.pop_frame().unwrap().data()[0], 1);
        assert_eq!(node.pop_frame().unwrap().data()[0], 2);
    }
}
