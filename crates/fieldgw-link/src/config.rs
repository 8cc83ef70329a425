use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use serde::{Deserialize, Serialize};

/// Typical link-layer maximum frame size (nRF24L01 payload).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 32;

/// Largest payload a single UDP datagram can carry over IPv4.
pub const MAX_FRAME_SIZE_LIMIT: usize = 65_507;

/// Largest accepted link event queue.
pub const MAX_QUEUE_DEPTH: usize = 65_536;

/// Default UDP port of the radio bridge.
pub const DEFAULT_BRIDGE_PORT: u16 = 2424;

/// Default number of link events buffered ahead of the dispatcher.
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

/// Radio link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Address the UDP radio bridge listens on.
    pub bind: SocketAddr,
    /// Frames longer than this are dropped on receive and refused on send.
    pub max_frame_size: usize,
    /// Capacity of the link event channel.
    pub queue_depth: usize,
}

impl LinkConfig {
    /// Reject sizes the bridge cannot honor.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(1..=MAX_FRAME_SIZE_LIMIT).contains(&self.max_frame_size) {
            return Err(format!(
                "max_frame_size must be between 1 and {MAX_FRAME_SIZE_LIMIT}, got {}",
                self.max_frame_size
            ));
        }
        if !(1..=MAX_QUEUE_DEPTH).contains(&self.queue_depth) {
            return Err(format!(
                "queue_depth must be between 1 and {MAX_QUEUE_DEPTH}, got {}",
                self.queue_depth
            ));
        }
        Ok(())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_BRIDGE_PORT)),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}
