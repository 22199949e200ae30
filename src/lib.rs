#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod catalog;
mod config;
mod driver;
mod error;
mod rate;
mod session;
pub mod sysex;
pub mod transport;

pub use config::DeviceConfig;
pub use driver::{APPLY_ATTEMPTS, ApplyOutcome, NanoSync};
pub use error::Error;
pub use rate::RefreshRate;
pub use session::{DeviceIdentity, RECEIVE_ATTEMPTS, RECEIVE_INTERVAL, Session};
