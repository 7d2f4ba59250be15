// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod config;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod line;
pub mod response;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::Command;

// From config.rs
pub use config::DriverConfig;

// From crc.rs
pub use crc::{calculate_crc7, verify_field_crc};

// From error.rs
pub use error::{DecodeError, Ens210Error, Fault};

// From hal_traits.rs
pub use hal_traits::{BridgeSerial, LineSource, Sink, Timer, Transport};

// From line.rs
pub use line::{Line, LineBuffer};

// From response/mod.rs
pub use response::{match_line, MatchResult, ResponsePattern};

// From types.rs
pub use types::{decode, CrcCheck, FirmwareVersion, Measurement};
