//! Frame I/O abstraction over the physical CAN transport

use std::time::Duration;

use crate::error::Result;
use crate::protocol::frame::CanFrame;

mod mock;
mod socket;

pub use mock::MockFrameIo;
pub use socket::SocketCanIo;

/// Transport trait for raw CAN frame exchange
pub trait FrameIo: Send {
    /// Transmit one frame.
    fn send(&mut self, frame: &CanFrame) -> Result<()>;

    /// Receive one frame, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` when the wait expires without a frame. This is the
    /// only blocking call the node runtime makes.
    fn recv(&mut self, timeout: Duration) -> Result<Option<CanFrame>>;
}
