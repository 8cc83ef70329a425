//! Mapping of decoded readings onto named telemetry feeds.

use crate::readings::SensorReading;

/// One value destined for the feed named `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedEntry {
    pub key: String,
    pub value: String,
}

impl FeedEntry {
    /// Create a feed entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Feed key for a sensor on a device: the device id directly followed by the
/// sensor id, no separator.
pub fn feed_key(device_id: &str, sensor_id: &str) -> String {
    let mut key = String::with_capacity(device_id.len() + sensor_id.len());
    key.push_str(device_id);
    key.push_str(sensor_id);
    key
}

/// Build one feed entry per reading, preserving order.
pub fn map_to_feeds(device_id: &str, readings: &[SensorReading]) -> Vec<FeedEntry> {
    readings
        .iter()
        .map(|reading| FeedEntry {
            key: feed_key(device_id, &reading.sensor_id),
            value: reading.value.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_single_reading() {
        let feeds = map_to_feeds("ab", &[SensorReading::new("temp", "21.5")]);
        assert_eq!(feeds, vec![FeedEntry::new("abtemp", "21.5")]);
    }

    #[test]
    fn preserves_reading_order() {
        let readings = vec![
            SensorReading::new("t", "21.5"),
            SensorReading::new("h", "60"),
            SensorReading::new("p", "1013"),
        ];
        let keys: Vec<String> = map_to_feeds("0a-0b", &readings)
            .into_iter()
            .map(|entry| entry.key)
            .collect();
        assert_eq!(keys, vec!["0a-0bt", "0a-0bh", "0a-0bp"]);
    }

    #[test]
    fn empty_device_id_keys_by_sensor_only() {
        let feeds = map_to_feeds("", &[SensorReading::new("t", "1")]);
        assert_eq!(feeds, vec![FeedEntry::new("t", "1")]);
    }

    #[test]
    fn no_readings_no_feeds() {
        assert!(map_to_feeds("ab", &[]).is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn feed_entry_serializes_as_key_value_object() {
        let json = serde_json::to_value(FeedEntry::new("abt", "21.5")).unwrap();
        assert_eq!(json, serde_json::json!({"key": "abt", "value": "21.5"}));
    }
}
