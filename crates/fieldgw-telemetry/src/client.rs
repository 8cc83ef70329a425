use async_trait::async_trait;
use fieldgw_frame::FeedEntry;
use tracing::info;

use crate::error::Result;

/// Account and group a set of feed entries is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    account: String,
    group: String,
}

impl PublishTarget {
    /// Create a target. The group name is lower-cased; the account is kept as given.
    pub fn new(account: impl Into<String>, group: impl AsRef<str>) -> Self {
        Self {
            account: account.into(),
            group: group.as_ref().to_lowercase(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn group(&self) -> &str {
        &self.group
    }
}

/// Publishes feed entries to a cloud telemetry service.
///
/// Implementations own their transport, including timeouts. The gateway
/// calls `publish_group` once per decoded frame and never retries.
#[async_trait]
pub trait TelemetryClient: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Publish all entries for one device in a single group update.
    async fn publish_group(&self, target: &PublishTarget, entries: &[FeedEntry]) -> Result<()>;
}

/// Client that only logs what it would publish.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlyClient;

#[async_trait]
impl TelemetryClient for LogOnlyClient {
    fn name(&self) -> &str {
        "log-only"
    }

    async fn publish_group(&self, target: &PublishTarget, entries: &[FeedEntry]) -> Result<()> {
        for entry in entries {
            info!(
                account = target.account(),
                group = target.group(),
                key = %entry.key,
                value = %entry.value,
                "feed value (dry run)"
            );
        }
        Ok(())
    }
}
