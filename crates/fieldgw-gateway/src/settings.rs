use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fieldgw_link::LinkConfig;
use fieldgw_telemetry::{PublishTarget, TelemetryConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::SettingsError;

/// Settings file name used when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "config.json";

/// Everything the gateway reads from its settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySettings {
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub link: LinkConfig,
}

impl GatewaySettings {
    /// Placeholder settings written when no file exists yet.
    pub fn template() -> Self {
        Self {
            telemetry: TelemetryConfig {
                base_url: Some(DEFAULT_BASE_URL.to_string()),
                user_name: "Adafruit IO user name goes here".to_string(),
                api_key: "Adafruit IO API key goes here".to_string(),
                group_name: "Adafruit IO group name goes here".to_string(),
                timeout_ms: fieldgw_telemetry::config::DEFAULT_TIMEOUT_MS,
            },
            link: LinkConfig::default(),
        }
    }

    /// Load settings from `path`.
    ///
    /// A missing file is replaced by [`GatewaySettings::template`] and
    /// reported as [`SettingsError::Missing`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                error!(path = %path.display(), "settings file not found");
                Self::template().write(path, false)?;
                return Err(SettingsError::Missing {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Self = serde_json::from_str(&text).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write these settings as pretty JSON.
    ///
    /// Unless `overwrite` is set, an existing file is left alone and
    /// [`SettingsError::AlreadyExists`] is returned.
    pub fn write(&self, path: impl AsRef<Path>, overwrite: bool) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = match options.open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(SettingsError::AlreadyExists {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => return Err(io_err(err)),
        };

        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.write_all(b"\n").map_err(io_err)?;
        Ok(())
    }

    /// Reject settings the gateway cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let required = [
            ("telemetry.user_name", &self.telemetry.user_name),
            ("telemetry.api_key", &self.telemetry.api_key),
            ("telemetry.group_name", &self.telemetry.group_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(SettingsError::Invalid(format!("{name} must not be empty")));
            }
        }

        self.link
            .validate()
            .map_err(|msg| SettingsError::Invalid(format!("link.{msg}")))
    }

    /// Account and (lower-cased) group readings are published under.
    pub fn publish_target(&self) -> PublishTarget {
        PublishTarget::new(&self.telemetry.user_name, &self.telemetry.group_name)
    }

    /// Log the effective configuration. The API key is redacted.
    pub fn log_summary(&self) {
        info!(
            base_url = self.telemetry.base_url(),
            user_name = %self.telemetry.user_name,
            api_key = %self.telemetry.redacted_api_key(),
            group_name = %self.telemetry.group_name,
            timeout_ms = self.telemetry.timeout_ms,
            "telemetry configuration"
        );
        info!(
            bind = %self.link.bind,
            max_frame_size = self.link.max_frame_size,
            queue_depth = self.link.queue_depth,
            "radio link configuration"
        );
    }
}

/// Resolve the settings path, falling back to [`DEFAULT_SETTINGS_FILE`].
pub fn settings_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}
