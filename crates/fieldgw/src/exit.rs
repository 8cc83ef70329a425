use std::fmt;
use std::io;

use fieldgw_frame::{DecodeError, EncodeError, HexError};
use fieldgw_gateway::{GatewayError, SettingsError};
use fieldgw_link::LinkError;
use fieldgw_telemetry::PublishError;

// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::AddrInUse | io::ErrorKind::AddrNotAvailable => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn settings_error(context: &str, err: SettingsError) -> CliError {
    match err {
        SettingsError::Io { source, path } => {
            io_error(&format!("{context}: {}", path.display()), source)
        }
        SettingsError::Json { .. } | SettingsError::Invalid(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        SettingsError::Missing { .. } | SettingsError::AlreadyExists { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Bind { source, .. } | LinkError::Io(source) => io_error(context, source),
        LinkError::FrameTooLarge { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        LinkError::Closed => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
    }
}

pub fn publish_error(context: &str, err: PublishError) -> CliError {
    match err {
        PublishError::InvalidConfig(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        PublishError::Http(ref http) if http.is_timeout() => {
            CliError::new(TIMEOUT, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn gateway_error(context: &str, err: GatewayError) -> CliError {
    match err {
        GatewayError::Settings(err) => settings_error(context, err),
        GatewayError::Link(err) => link_error(context, err),
        GatewayError::Telemetry(err) => publish_error(context, err),
        GatewayError::LinkTask(err) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn decode_error(context: &str, err: DecodeError) -> CliError {
    CliError::new(
        DATA_INVALID,
        format!("{context}: {err} ({})", err.kind()),
    )
}

pub fn hex_error(context: &str, err: HexError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}

pub fn encode_error(context: &str, err: EncodeError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}
