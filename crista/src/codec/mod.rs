//! Payload layouts for each message type
//!
//! [`decode`] applies a validated packet to an [`ImuData`](crate::ImuData)
//! record. The `encode_*` functions build complete frames: the host-side
//! set (settings, configuration and calibration requests) and the
//! device-side set used to emulate an IMU.

mod decode;
mod encode;

pub use decode::{decode, decode_payload, expected_payload_len, DecodeError};
pub use encode::{
    encode_cal_param, encode_cal_param_request, encode_config_request, encode_dates,
    encode_gyro_temp, encode_hs_raw, encode_hs_serial, encode_raw_accel, encode_raw_gyro,
    encode_resolution, encode_serial_num_config, encode_settings, encode_settings_report,
    encode_sw_version, encode_timing,
};

/// Timing counter ticks per millisecond.
pub const TICKS_PER_MS: f64 = 10_000.0;

/// Microseconds per second, relating output rate to sample period.
pub const MICROS_PER_SECOND: f64 = 1.0e6;
