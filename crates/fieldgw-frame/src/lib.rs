//! Radio telemetry frame decoding for the field gateway.
//!
//! Every frame received from a sensor node starts with a one-byte header:
//! - The top nibble is the message kind (0 = echo, 1 = device readings)
//! - The bottom nibble is the length of the device id that follows
//!
//! Device-readings frames carry a UTF-8 payload of comma-separated
//! `<sensor id> <value>` pairs, which map onto feeds keyed by device id plus
//! sensor id. Decoding is pure: no I/O and no shared state.

pub mod codec;
pub mod error;
pub mod feed;
pub mod hex;
pub mod kind;
pub mod readings;

pub use codec::{
    decode, encode_frame, encode_readings, DecodedMessage, DeviceReadings, Header, HEADER_SIZE,
    MAX_DEVICE_ID_LEN,
};
pub use error::{DecodeError, EncodeError, HexError, Result};
pub use feed::{feed_key, map_to_feeds, FeedEntry};
pub use kind::{MessageKind, DEVICE_READINGS, ECHO};
pub use readings::{tokenize, SensorReading};
