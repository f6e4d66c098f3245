//! Serial link configuration file
//!
//! Stored as pretty-printed JSON. Every field has a default, so a file only
//! needs the entries it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crista::{ImuData, OutputDevice, OutputMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid output settings: {0}")]
    Settings(String),
}

/// Output settings pushed to the IMU when a link opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSettingsConfig {
    /// Output device bits (0x01 serial, 0x02 CAN)
    pub device: u8,
    /// Output mode bits (0x01 converted, 0x02 raw, 0x04 high-speed raw)
    pub mode: u8,
    pub oversample_ratio: u16,
    pub output_rate_hz: f32,
}

impl Default for OutputSettingsConfig {
    fn default() -> Self {
        Self {
            device: OutputDevice::SERIAL.bits(),
            mode: OutputMode::CONVERTED.bits(),
            oversample_ratio: 1,
            output_rate_hz: 100.0,
        }
    }
}

impl OutputSettingsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.output_rate_hz.is_finite() && self.output_rate_hz > 0.0) {
            return Err(ConfigError::Settings(format!(
                "output rate must be positive, got {}",
                self.output_rate_hz
            )));
        }
        if OutputDevice::from_bits(self.device).is_none() {
            return Err(ConfigError::Settings(format!(
                "unknown output device bits {:#04x}",
                self.device
            )));
        }
        if OutputMode::from_bits(self.mode).is_none() {
            return Err(ConfigError::Settings(format!(
                "unknown output mode bits {:#04x}",
                self.mode
            )));
        }
        Ok(())
    }

    /// Device-state fields read by [`crista::encode_settings`].
    pub fn to_imu_data(&self) -> ImuData {
        ImuData {
            output_device: OutputDevice::from_bits_retain(self.device),
            output_mode: OutputMode::from_bits_retain(self.mode),
            oversample_ratio: self.oversample_ratio,
            output_rate: self.output_rate_hz,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Serial device path, e.g. /dev/ttyUSB0
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    /// Settings to push at start-up; `None` leaves the IMU as it is
    pub settings: Option<OutputSettingsConfig>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            read_timeout_ms: 10,
            settings: None,
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(settings) = &self.settings {
            settings.validate()?;
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_load_roundtrip() {
        let config = LinkConfig {
            port: "/dev/ttyTHS1".to_string(),
            baud_rate: 460_800,
            read_timeout_ms: 5,
            settings: Some(OutputSettingsConfig {
                device: 0x03,
                mode: 0x04,
                oversample_ratio: 8,
                output_rate_hz: 500.0,
            }),
        };

        let file = NamedTempFile::new().unwrap();
        config.save_to_file(file.path()).unwrap();
        let loaded = LinkConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{ "port": "/dev/ttyS2" }"#).unwrap();

        let loaded = LinkConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.port, "/dev/ttyS2");
        assert_eq!(loaded.baud_rate, 115_200);
        assert_eq!(loaded.read_timeout_ms, 10);
        assert!(loaded.settings.is_none());
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{ "settings": { "device": 1, "mode": 1, "oversample_ratio": 1, "output_rate_hz": 0.0 } }"#,
        )
        .unwrap();

        let err = LinkConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn test_unknown_mode_bits_rejected() {
        let settings = OutputSettingsConfig {
            mode: 0x40,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        assert!(OutputSettingsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LinkConfig::load_from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_json() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{ port: ").unwrap();
        let err = LinkConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_settings_to_imu_data() {
        let data = OutputSettingsConfig::default().to_imu_data();
        assert_eq!(data.output_device, OutputDevice::SERIAL);
        assert_eq!(data.output_mode, OutputMode::CONVERTED);
        assert_eq!(data.output_rate, 100.0);
    }
}
