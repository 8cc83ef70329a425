//! Sensor reading payloads: `id1 value1,id2 value2,...`.

use crate::error::{DecodeError, EncodeError, Result};

/// Separator between readings.
pub const READING_SEPARATOR: char = ',';

/// Separator between a sensor id and its value.
pub const FIELD_SEPARATOR: char = ' ';

/// One `(sensor id, value)` pair from a device-readings payload.
///
/// The value is kept as the exact text the device sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorReading {
    pub sensor_id: String,
    pub value: String,
}

impl SensorReading {
    /// Create a reading.
    pub fn new(sensor_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            value: value.into(),
        }
    }
}

/// Split a payload into readings, in order of appearance.
///
/// Empty segments produced by repeated separators are discarded at both
/// levels. Sensor ids are lower-cased; values are returned verbatim. The
/// first malformed segment rejects the whole payload. A payload made only of
/// separators yields an empty list.
pub fn tokenize(payload: &str) -> Result<Vec<SensorReading>> {
    let mut readings = Vec::new();

    for segment in payload
        .split(READING_SEPARATOR)
        .filter(|segment| !segment.is_empty())
    {
        let mut fields = segment
            .split(FIELD_SEPARATOR)
            .filter(|field| !field.is_empty());

        let (sensor_id, value) = match (fields.next(), fields.next(), fields.next()) {
            (Some(sensor_id), Some(value), None) => (sensor_id, value),
            _ => return Err(DecodeError::MalformedReading(segment.to_string())),
        };

        readings.push(SensorReading::new(sensor_id.to_lowercase(), value));
    }

    Ok(readings)
}

/// Render readings back into payload text.
///
/// Rejects readings that [`tokenize`] could not recover: empty fields or
/// fields containing either separator.
pub fn render(readings: &[SensorReading]) -> std::result::Result<String, EncodeError> {
    let mut out = String::new();
    for (i, reading) in readings.iter().enumerate() {
        for field in [&reading.sensor_id, &reading.value] {
            if field.is_empty() || field.contains([READING_SEPARATOR, FIELD_SEPARATOR]) {
                return Err(EncodeError::UnencodableReading(format!(
                    "{}{FIELD_SEPARATOR}{}",
                    reading.sensor_id, reading.value
                )));
            }
        }
        if i > 0 {
            out.push(READING_SEPARATOR);
        }
        out.push_str(&reading.sensor_id);
        out.push(FIELD_SEPARATOR);
        out.push_str(&reading.value);
    }
    Ok(out)
}
