//! Field gateway core: receives radio frames and republishes sensor readings.
//!
//! # Crate Structure
//!
//! - [`dispatcher`]: Per-frame decode, routing and background publication
//! - [`gateway`]: Runs a UDP radio bridge into a dispatcher
//! - [`diagnostics`]: Log rendering of echo frames and readings
//! - [`settings`]: JSON settings file with template bootstrap

pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod settings;

pub use dispatcher::{DispatchStats, Dispatcher, FrameOutcome};
pub use error::{GatewayError, Result, SettingsError};
pub use gateway::Gateway;
pub use settings::{settings_path, GatewaySettings, DEFAULT_SETTINGS_FILE};
