/// Errors that can occur while publishing to the telemetry service.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The request could not be sent or the response could not be read.
    #[error("telemetry request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("telemetry service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The client configuration is unusable.
    #[error("invalid telemetry configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PublishError>;
