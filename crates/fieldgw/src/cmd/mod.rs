use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub mod decode;
pub mod init;
pub mod run;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the gateway: receive radio frames and publish readings.
    Run(RunArgs),
    /// Write a settings template.
    Init(InitArgs),
    /// Decode one frame given as hex and print the result.
    Decode(DecodeArgs),
    /// Encode and transmit one frame to a UDP radio bridge.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args),
        Command::Init(args) => init::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Send(args) => send::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Settings file. Default: config.json in the working directory.
    #[arg(long, short = 'c', env = "FIELDGW_CONFIG")]
    pub config: Option<PathBuf>,
    /// Override the radio bridge listen address from the settings file.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
    /// Log feed values instead of publishing them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Settings file to create.
    #[arg(long, short = 'c', env = "FIELDGW_CONFIG")]
    pub config: Option<PathBuf>,
    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex; spaces, '-' and ':' are ignored (e.g. "11-AB-74-20-31").
    pub frame: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Radio bridge address to send to.
    pub addr: SocketAddr,
    /// Device id as hex (up to 15 bytes).
    #[arg(long, short = 'd', requires = "readings", conflicts_with = "raw")]
    pub device: Option<String>,
    /// Sensor readings, e.g. "t 21.5,h 60".
    #[arg(long, short = 'r', requires = "device", conflicts_with = "raw")]
    pub readings: Option<String>,
    /// Send these exact frame bytes (hex) instead.
    #[arg(long, conflicts_with_all = ["device", "readings"])]
    pub raw: Option<String>,
    /// Link-layer maximum frame size.
    #[arg(long, default_value_t = fieldgw_link::DEFAULT_MAX_FRAME_SIZE)]
    pub max_frame_size: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Multi-threaded runtime for the async commands.
pub(crate) fn build_runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("runtime setup failed: {err}")))
}
