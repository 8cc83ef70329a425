use std::net::SocketAddr;

/// Errors that can occur on the radio link boundary.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Failed to bind the bridge socket.
    #[error("failed to bind radio bridge to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// An I/O error occurred on the bridge socket.
    #[error("radio link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame exceeds the link-layer maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The receiving side of the event channel has gone away.
    #[error("link event channel closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, LinkError>;
