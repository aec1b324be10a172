//! Linux SocketCAN transport

use std::io;
use std::time::Duration;

use socketcan::{CanSocket, EmbeddedFrame, ExtendedId, Id, Socket};

use super::FrameIo;
use crate::error::Result;
use crate::protocol::frame::CanFrame;

/// SocketCAN transport for a classic CAN interface (e.g. `can0`, `vcan0`)
pub struct SocketCanIo {
    socket: CanSocket,
}

impl SocketCanIo {
    /// Open a CAN interface by name. Classic CAN framing only.
    pub fn open(interface: &str) -> Result<Self> {
        let socket = CanSocket::open(interface)?;
        log::info!("Opened CAN interface: {}", interface);
        Ok(SocketCanIo { socket })
    }
}

impl FrameIo for SocketCanIo {
    fn send(&mut self, frame: &CanFrame) -> Result<()> {
        let id = ExtendedId::new(frame.id())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "CAN id exceeds 29 bits"))?;
        let raw = socketcan::CanFrame::new(id, frame.data())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "frame data exceeds 8 bytes"))?;
        self.socket.write_frame(&raw)?;
        Ok(())
    }

    fn recv(&mut self, timeout: Duration) -> Result<Option<CanFrame>> {
        match self.socket.read_frame_timeout(timeout) {
            Ok(socketcan::CanFrame::Data(raw)) => {
                // Cyphal traffic is extended-id only; base-id frames on the
                // same bus are not ours.
                let Id::Extended(id) = raw.id() else {
                    return Ok(None);
                };
                Ok(CanFrame::new(id.as_raw(), raw.data()))
            }
            // Remote and error frames carry no transfer data.
            Ok(_) => Ok(None),
            Err(e)
                if e.kind() == io::ErrorKind::TimedOut
                    || e.kind() == io::ErrorKind::WouldBlock =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
