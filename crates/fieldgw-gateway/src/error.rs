use std::path::PathBuf;

/// Errors that can occur while loading or writing gateway settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No settings file existed; a template was written in its place.
    #[error("settings file {path} not found; a template was written, edit it and restart")]
    Missing { path: PathBuf },

    /// Refused to overwrite an existing settings file.
    #[error("settings file {path} already exists")]
    AlreadyExists { path: PathBuf },

    /// The settings file could not be read or written.
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for the expected shape.
    #[error("settings file {path} is invalid: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A required setting is missing or empty.
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Errors that stop the gateway as a whole.
///
/// Per-frame decode and publish failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("radio link error: {0}")]
    Link(#[from] fieldgw_link::LinkError),

    #[error("telemetry client error: {0}")]
    Telemetry(#[from] fieldgw_telemetry::PublishError),

    /// The radio link task panicked or was aborted.
    #[error("radio link task failed: {0}")]
    LinkTask(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
