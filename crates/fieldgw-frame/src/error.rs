use std::str::Utf8Error;

/// Errors that can occur while decoding a received frame.
///
/// Every variant is local to a single frame: the caller drops the frame and
/// carries on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The frame does not even contain the one-byte header.
    #[error("frame too short to contain header")]
    TooShortForHeader,

    /// The header announces more device id bytes than the frame carries.
    #[error("frame too short to contain device id ({actual} bytes, need {needed})")]
    TooShortForDeviceId { needed: usize, actual: usize },

    /// Nothing follows the device id.
    #[error("frame too short to contain any sensor readings")]
    NoPayload,

    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    InvalidPayloadEncoding(#[from] Utf8Error),

    /// A reading segment is not exactly `<sensor id> <value>`.
    #[error("malformed sensor reading {0:?}")]
    MalformedReading(String),

    /// The payload contained only separators.
    #[error("payload contains no sensor readings")]
    NoReadings,
}

impl DecodeError {
    /// Stable, machine-friendly name of the error kind for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::TooShortForHeader => "too_short_for_header",
            DecodeError::TooShortForDeviceId { .. } => "too_short_for_device_id",
            DecodeError::NoPayload => "no_payload",
            DecodeError::InvalidPayloadEncoding(_) => "invalid_payload_encoding",
            DecodeError::MalformedReading(_) => "malformed_reading",
            DecodeError::NoReadings => "no_readings",
        }
    }
}

/// Errors that can occur while building a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The device id does not fit the 4-bit length field.
    #[error("device id too long ({len} bytes, max {max})")]
    DeviceIdTooLong { len: usize, max: usize },

    /// The kind tag does not fit the 4-bit kind field.
    #[error("message kind tag {0} out of range (max 15)")]
    KindOutOfRange(u8),

    /// A reading would not survive tokenization on the receiving side.
    #[error("sensor reading {0:?} cannot be encoded")]
    UnencodableReading(String),
}

/// Errors from parsing hexadecimal text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    /// An odd number of hex digits was supplied.
    #[error("odd number of hex digits ({0})")]
    OddLength(usize),

    /// A character that is neither a hex digit nor an accepted separator.
    #[error("invalid hex character {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
