use async_trait::async_trait;
use fieldgw_frame::FeedEntry;
use reqwest::Url;
use serde::Serialize;
use tracing::debug;

use crate::client::{PublishTarget, TelemetryClient};
use crate::config::TelemetryConfig;
use crate::error::{PublishError, Result};

/// Header carrying the Adafruit IO API key.
pub const API_KEY_HEADER: &str = "X-AIO-Key";

#[derive(Serialize)]
struct GroupData<'a> {
    feeds: &'a [FeedEntry],
}

/// Adafruit IO group-data client.
///
/// Publishes with `POST {base}/api/v2/{account}/groups/{group}/data`; the
/// service creates missing feeds inside the group on first write.
#[derive(Debug, Clone)]
pub struct AdafruitIoClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl AdafruitIoClient {
    /// Build a client from telemetry settings.
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(PublishError::InvalidConfig("api_key is empty".to_string()));
        }

        let base_url = Url::parse(config.base_url()).map_err(|err| {
            PublishError::InvalidConfig(format!("base_url {:?}: {err}", config.base_url()))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PublishError::InvalidConfig(format!(
                "base_url {base_url} cannot carry a path"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint for a group-data write. Account and group are
    /// percent-encoded as single path segments.
    pub fn group_data_url(&self, target: &PublishTarget) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PublishError::InvalidConfig(format!("base_url {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend([
                "api",
                "v2",
                target.account(),
                "groups",
                target.group(),
                "data",
            ]);
        Ok(url)
    }
}

#[async_trait]
impl TelemetryClient for AdafruitIoClient {
    fn name(&self) -> &str {
        "adafruit-io"
    }

    async fn publish_group(&self, target: &PublishTarget, entries: &[FeedEntry]) -> Result<()> {
        let url = self.group_data_url(target)?;
        debug!(%url, entries = entries.len(), "publishing group data");

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GroupData { feeds: entries })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "group data accepted");
        Ok(())
    }
}
