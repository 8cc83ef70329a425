//! Message kind tags carried in the top nibble of the header byte.
//!
//! Tags 0-15 fit the nibble. Only [`DEVICE_READINGS`] has a structured
//! payload; every other tag is surfaced as an echo.

/// Raw payload, surfaced for diagnostics only.
pub const ECHO: u8 = 0;

/// Device id followed by comma-separated `<sensor> <value>` readings.
pub const DEVICE_READINGS: u8 = 1;

/// Largest tag that fits the 4-bit kind field.
pub const MAX_KIND_TAG: u8 = 0x0F;

/// The two message kinds the gateway distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Echo,
    DeviceReadings,
}

impl MessageKind {
    /// Classify a 4-bit kind tag. Unrecognized tags fall back to `Echo`.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            DEVICE_READINGS => MessageKind::DeviceReadings,
            _ => MessageKind::Echo,
        }
    }

    /// The canonical tag written by encoders for this kind.
    pub fn tag(self) -> u8 {
        match self {
            MessageKind::Echo => ECHO,
            MessageKind::DeviceReadings => DEVICE_READINGS,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Echo => "ECHO",
            MessageKind::DeviceReadings => "DEVICE_READINGS",
        }
    }
}

/// Returns true if the tag has a dedicated decoding (not the echo fallback).
pub fn is_recognized(tag: u8) -> bool {
    tag == ECHO || tag == DEVICE_READINGS
}
