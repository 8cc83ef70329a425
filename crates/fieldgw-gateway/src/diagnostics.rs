//! Diagnostic rendering of frames for logs and the CLI.

use fieldgw_frame::kind::is_recognized;
use fieldgw_frame::{hex, DeviceReadings, FeedEntry, Header};
use tracing::{debug, trace};

/// What the gateway reports about an echo frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoSummary {
    pub length: usize,
    /// Raw kind nibble, so unrecognized kinds stay visible.
    pub kind_tag: u8,
    /// False when the tag only decoded as echo through the fallback.
    pub recognized_kind: bool,
    /// Uppercase dash-separated hex, e.g. `"00-68-69"`.
    pub bcd: String,
    /// Best-effort UTF-8 rendering.
    pub unicode: String,
}

impl EchoSummary {
    pub fn from_frame(raw: &[u8]) -> Self {
        let kind_tag = raw.first().map_or(0, |byte| Header::from_byte(*byte).kind_tag);
        Self {
            length: raw.len(),
            kind_tag,
            recognized_kind: is_recognized(kind_tag),
            bcd: hex::encode_dashed_upper(raw),
            unicode: String::from_utf8_lossy(raw).into_owned(),
        }
    }
}

/// Log an echo frame at debug level.
pub fn log_echo(raw: &[u8]) {
    let summary = EchoSummary::from_frame(raw);
    debug!(
        length = summary.length,
        kind_tag = summary.kind_tag,
        recognized_kind = summary.recognized_kind,
        bcd = %summary.bcd,
        unicode = %summary.unicode,
        "message data"
    );
}

/// `sensor=value` pairs separated by spaces, in payload order.
pub fn readings_summary(readings: &DeviceReadings) -> String {
    readings
        .readings
        .iter()
        .map(|reading| format!("{}={}", reading.sensor_id, reading.value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Log decoded readings at debug level and each feed value at trace level.
pub fn log_readings(readings: &DeviceReadings, entries: &[FeedEntry]) {
    debug!(
        device_id = %readings.device_id,
        count = readings.readings.len(),
        readings = %readings_summary(readings),
        "sensor readings"
    );
    for entry in entries {
        trace!(key = %entry.key, value = %entry.value, "feed value");
    }
}
