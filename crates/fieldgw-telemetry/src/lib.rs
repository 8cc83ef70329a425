//! Telemetry client boundary for the field gateway.
//!
//! The gateway publishes the readings of each frame as one group update
//! through the [`TelemetryClient`] trait. [`AdafruitIoClient`] talks to the
//! Adafruit IO REST API; [`LogOnlyClient`] is used for dry runs.

pub mod adafruit;
pub mod client;
pub mod config;
pub mod error;

pub use adafruit::AdafruitIoClient;
pub use client::{LogOnlyClient, PublishTarget, TelemetryClient};
pub use config::{TelemetryConfig, DEFAULT_BASE_URL};
pub use error::{PublishError, Result};
pub use fieldgw_frame::FeedEntry;
