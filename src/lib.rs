//! setu-node - Cyphal/CAN bus node library
//!
//! Core components of a single-node bus participant: the protocol codec
//! (transfer segmentation and reassembly over classic CAN), the transport
//! abstraction, and the cooperative runtime loop that interleaves heartbeat
//! publication, outbound draining, and inbound dispatch.

pub mod dispatch;
pub mod error;
pub mod heartbeat;
pub mod messages;
pub mod node;
pub mod protocol;
pub mod runtime;
pub mod transport;
pub mod wire;

// Re-export commonly used types
pub use error::{Error, Result};
pub use node::LocalNode;
pub use runtime::Runtime;
