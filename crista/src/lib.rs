//! Crista IMU serial protocol
//!
//! Framing, CRC-16 and payload codec for the binary telemetry stream of the
//! Crista inertial measurement unit, plus the commands a host sends back.
//!
//! Bytes from the transport go through a [`PacketFramer`], which hands out
//! CRC-checked [`Packet`]s. [`decode`] applies each packet to an
//! [`ImuData`] record. The `encode_*` functions build outbound [`Frame`]s.

pub mod byte_order;
pub mod codec;
pub mod crc16;
mod frame;
mod framer;
mod imu_data;
mod link;
pub mod messages;

pub use codec::{
    decode, decode_payload, encode_cal_param, encode_cal_param_request, encode_config_request,
    encode_dates, encode_gyro_temp, encode_hs_raw, encode_hs_serial, encode_raw_accel,
    encode_raw_gyro, encode_resolution, encode_serial_num_config, encode_settings,
    encode_settings_report, encode_sw_version, encode_timing, DecodeError,
};
pub use crc16::{crc16, crc16_one_byte, verify_crc};
pub use frame::{
    Frame, FrameError, Packet, CRC_BYTES, HEADER_BYTES, MAX_FRAME_BYTES, MAX_PAYLOAD_BYTES,
    SYNC_BYTE0, SYNC_BYTE1,
};
pub use framer::{FramerState, PacketFramer};
pub use imu_data::{
    sensor, temp, Axis, DeviceDate, HardwareConfig, ImuData, OutputDevice, OutputMode,
    SoftwareVersion, AD16_TO_GYROVOLTS, AD16_TO_VOLTS, GRAVITY,
};
pub use link::{ByteSink, ByteSource, ImuLink, LinkError, LinkStats, POLL_BUDGET};
pub use messages::{MessageType, HS_RAW_PAYLOAD_BYTES};
