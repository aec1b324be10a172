//! Error types for setu-node

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// setu-node error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from the CAN transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Node identifier outside the 7-bit Cyphal range
    #[error("Invalid node id: {0} (must be 0..=127)")]
    InvalidNodeId(u16),

    /// Subject identifier outside the 13-bit Cyphal range
    #[error("Invalid subject id: {0} (must be 0..=8191)")]
    InvalidSubjectId(u16),

    /// A subscription for this subject already exists
    #[error("Duplicate subscription for subject {0}")]
    DuplicateSubscription(u16),
}
