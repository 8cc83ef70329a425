use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use fieldgw_frame::{map_to_feeds, DecodedMessage, FeedEntry, Header};
use fieldgw_gateway::diagnostics::EchoSummary;
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReadingOutput<'a> {
    sensor_id: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    length: usize,
    kind: &'static str,
    kind_tag: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    readings: Option<Vec<ReadingOutput<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feeds: Option<&'a [FeedEntry]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bcd: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unicode: Option<&'a str>,
}

/// Render a successfully decoded frame.
pub fn render_decoded(raw: &[u8], message: &DecodedMessage, format: OutputFormat) -> String {
    let kind_tag = raw.first().map_or(0, |byte| Header::from_byte(*byte).kind_tag);

    match message {
        DecodedMessage::Echo(frame) => {
            let echo = EchoSummary::from_frame(frame);
            match format {
                OutputFormat::Json => to_json(&DecodedOutput {
                    length: echo.length,
                    kind: message.kind().name(),
                    kind_tag,
                    device_id: None,
                    readings: None,
                    feeds: None,
                    bcd: Some(&echo.bcd),
                    unicode: Some(&echo.unicode),
                }),
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table
                        .load_preset(UTF8_FULL)
                        .set_content_arrangement(ContentArrangement::Dynamic)
                        .set_header(vec!["KIND", "TAG", "LENGTH", "BCD", "UNICODE"])
                        .add_row(vec![
                            message.kind().name().to_string(),
                            kind_tag.to_string(),
                            echo.length.to_string(),
                            echo.bcd.clone(),
                            echo.unicode.clone(),
                        ]);
                    table.to_string()
                }
                OutputFormat::Pretty => format!(
                    "kind={} tag={} length={} bcd={} unicode={:?}",
                    message.kind().name(),
                    kind_tag,
                    echo.length,
                    echo.bcd,
                    echo.unicode
                ),
            }
        }
        DecodedMessage::DeviceReadings(readings) => {
            let feeds = map_to_feeds(&readings.device_id, &readings.readings);
            match format {
                OutputFormat::Json => to_json(&DecodedOutput {
                    length: raw.len(),
                    kind: message.kind().name(),
                    kind_tag,
                    device_id: Some(&readings.device_id),
                    readings: Some(
                        readings
                            .readings
                            .iter()
                            .map(|r| ReadingOutput {
                                sensor_id: &r.sensor_id,
                                value: &r.value,
                            })
                            .collect(),
                    ),
                    feeds: Some(&feeds),
                    bcd: None,
                    unicode: None,
                }),
                OutputFormat::Table => {
                    let mut table = Table::new();
                    table
                        .load_preset(UTF8_FULL)
                        .set_content_arrangement(ContentArrangement::Dynamic)
                        .set_header(vec!["DEVICE", "SENSOR", "VALUE", "FEED KEY"]);
                    for (reading, feed) in readings.readings.iter().zip(&feeds) {
                        table.add_row(vec![
                            readings.device_id.clone(),
                            reading.sensor_id.clone(),
                            reading.value.clone(),
                            feed.key.clone(),
                        ]);
                    }
                    table.to_string()
                }
                OutputFormat::Pretty => {
                    let mut out = format!(
                        "kind={} device={} readings={}",
                        message.kind().name(),
                        readings.device_id,
                        readings.readings.len()
                    );
                    for feed in &feeds {
                        out.push_str(&format!("\n  {} = {}", feed.key, feed.value));
                    }
                    out
                }
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
