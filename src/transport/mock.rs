//! Mock transport for testing

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::FrameIo;
use crate::error::Result;
use crate::protocol::frame::CanFrame;

/// Mock transport: inject inbound frames, capture outbound frames,
/// script send failures. Clones share the same state.
#[derive(Clone, Default)]
pub struct MockFrameIo {
    inner: Arc<Mutex<MockFrameIoInner>>,
}

#[derive(Default)]
struct MockFrameIoInner {
    rx_queue: VecDeque<CanFrame>,
    sent: Vec<CanFrame>,
    failing_sends: usize,
    send_attempts: usize,
}

impl MockFrameIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame for the node to receive.
    pub fn inject(&self, frame: CanFrame) {
        let mut inner = self.inner.lock().unwrap();
        inner.rx_queue.push_back(frame);
    }

    /// All frames sent so far, in transmission order.
    pub fn sent(&self) -> Vec<CanFrame> {
        let inner = self.inner.lock().unwrap();
        inner.sent.clone()
    }

    /// Total send attempts, successful or not.
    pub fn send_attempts(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.send_attempts
    }

    /// Make the next `n` sends fail with an I/O error.
    pub fn fail_next_sends(&self, n: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.failing_sends = n;
    }
}

impl FrameIo for MockFrameIo {
    fn send(&mut self, frame: &CanFrame) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.send_attempts += 1;
        if inner.failing_sends > 0 {
            inner.failing_sends -= 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted send failure").into());
        }
        inner.sent.push(*frame);
        Ok(())
    }

    fn recv(&mut self, _timeout: Duration) -> Result<Option<CanFrame>> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.rx_queue.pop_front())
    }
}
