//! Hardware support for the Crista IMU
//!
//! Serial transport, link configuration and an emulated device, shared by
//! the `listen_imu` and `mock_imu` tools.

pub mod config;
pub mod mock;
pub mod serial;

pub use config::{ConfigError, LinkConfig, OutputSettingsConfig};
pub use mock::MockImu;
pub use serial::SerialLink;
