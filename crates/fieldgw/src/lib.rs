//! Field gateway for low-power radio sensor networks.
//!
//! Sensor nodes send short binary frames over the radio; the gateway decodes
//! them and republishes the readings to a cloud telemetry feed.
//!
//! # Crate Structure
//!
//! - [`frame`]: Frame decoding, reading tokenization and feed mapping
//! - [`link`]: Radio link events and the UDP radio bridge
//! - [`telemetry`]: Telemetry client trait and the Adafruit IO client
//! - [`gateway`]: Dispatcher, gateway runner and settings

/// Re-export frame types.
pub mod frame {
    pub use fieldgw_frame::*;
}

/// Re-export link types.
pub mod link {
    pub use fieldgw_link::*;
}

/// Re-export telemetry types.
pub mod telemetry {
    pub use fieldgw_telemetry::*;
}

/// Re-export gateway types.
pub mod gateway {
    pub use fieldgw_gateway::*;
}
