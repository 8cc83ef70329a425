//! Radio link boundary for the field gateway.
//!
//! The gateway never talks to radio hardware directly. A link implementation
//! pushes [`LinkEvent`]s into the channel created by [`event_channel`] and the
//! dispatcher consumes them. [`UdpLink`] is the bundled implementation: a
//! bridge that receives one radio frame per UDP datagram.

pub mod config;
pub mod error;
pub mod event;
pub mod udp;

pub use config::{LinkConfig, DEFAULT_MAX_FRAME_SIZE, MAX_FRAME_SIZE_LIMIT, MAX_QUEUE_DEPTH};
pub use error::{LinkError, Result};
pub use event::{event_channel, LinkEvent, LinkSender};
pub use udp::UdpLink;
