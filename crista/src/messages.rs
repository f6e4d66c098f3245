//! Message type tags carried in byte 2 of every Crista frame

/// Raw type tag values.
pub mod type_id {
    pub const RAW_GYRO: u8 = 0;
    pub const RAW_ACCEL: u8 = 2;
    pub const TIMING: u8 = 3;
    pub const RESOLUTION: u8 = 4;
    pub const RES_UNITS_GYRO: u8 = 5;
    pub const RES_UNITS_ACCEL: u8 = 6;
    pub const SET_SETTINGS: u8 = 7;
    pub const SETTINGS: u8 = 8;
    pub const MFR_CAL_DATE: u8 = 9;
    pub const SERIAL_NUM_CONFIG: u8 = 10;
    pub const SW_VERSION: u8 = 11;
    pub const BOARD_REFERENCE: u8 = 12;
    pub const REQ_CONFIG: u8 = 13;
    pub const REQ_CAL_PARAM: u8 = 21;
    pub const CAL_PARAM: u8 = 22;
    pub const RAW_GYRO_TEMP_X: u8 = 23;
    pub const RAW_GYRO_TEMP_Y: u8 = 24;
    pub const RAW_GYRO_TEMP_Z: u8 = 25;
    pub const SENSOR_HEAD_CRC_STATUS: u8 = 27;
    pub const GYRO_STDEV: u8 = 30;
    pub const ACCEL_STDEV: u8 = 31;
    pub const GYRO_MINIMUM: u8 = 32;
    pub const ACCEL_MINIMUM: u8 = 33;
    pub const GYRO_MAXIMUM: u8 = 34;
    pub const ACCEL_MAXIMUM: u8 = 35;
    pub const HS_RAW_GYRO_TEMP: u8 = 0xFD;
    /// High-speed raw samples. The only frame with no length byte.
    pub const HS_RAW: u8 = 0xFE;
    pub const HS_SERIAL: u8 = 0xFF;

    /// Tags that exist in the numbering but carry nothing.
    pub const RESERVED: [u8; 11] = [1, 14, 15, 16, 17, 18, 19, 20, 26, 28, 29];
}

/// Fixed payload length of a high-speed raw frame.
pub const HS_RAW_PAYLOAD_BYTES: usize = 13;

/// Every known Crista message type.
///
/// Conversion from `u8` never fails: tags with no assigned meaning become
/// [`MessageType::Reserved`] or [`MessageType::Unknown`] and round-trip
/// back to the same byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Raw gyro A/D samples
    RawGyro,
    /// Raw accelerometer A/D samples
    RawAccel,
    /// Time since PPS, PPS count and clock error
    Timing,
    /// Gyro and accelerometer full-scale ranges
    Resolution,
    /// Gyro data in resolution units
    ResUnitsGyro,
    /// Accelerometer data in resolution units
    ResUnitsAccel,
    /// Host request to change output settings
    SetSettings,
    /// Current output settings reported by the IMU
    Settings,
    /// Manufacture and calibration dates
    MfrCalDate,
    /// Serial number and hardware configuration
    SerialNumConfig,
    /// Firmware version
    SwVersion,
    /// Processor board crystal frequency and A/D reference
    BoardReference,
    /// Host request for all configuration messages
    ReqConfig,
    /// Host request for one calibration parameter
    ReqCalParam,
    /// Calibration parameter value
    CalParam,
    RawGyroTempX,
    RawGyroTempY,
    RawGyroTempZ,
    /// Sensor head CRC pass/fail status
    SensorHeadCrcStatus,
    GyroStdev,
    AccelStdev,
    GyroMinimum,
    AccelMinimum,
    GyroMaximum,
    AccelMaximum,
    /// High-speed raw gyro temperatures
    HsRawGyroTemp,
    /// High-speed raw samples (length byte elided on the wire)
    HsRaw,
    /// High-speed converted samples
    HsSerial,
    /// A tag held in reserve by the protocol
    Reserved(u8),
    Unknown(u8),
}

impl From<u8> for MessageType {
    fn from(value: u8) -> Self {
        use type_id::*;

        match value {
            RAW_GYRO => MessageType::RawGyro,
            RAW_ACCEL => MessageType::RawAccel,
            TIMING => MessageType::Timing,
            RESOLUTION => MessageType::Resolution,
            RES_UNITS_GYRO => MessageType::ResUnitsGyro,
            RES_UNITS_ACCEL => MessageType::ResUnitsAccel,
            SET_SETTINGS => MessageType::SetSettings,
            SETTINGS => MessageType::Settings,
            MFR_CAL_DATE => MessageType::MfrCalDate,
            SERIAL_NUM_CONFIG => MessageType::SerialNumConfig,
            SW_VERSION => MessageType::SwVersion,
            BOARD_REFERENCE => MessageType::BoardReference,
            REQ_CONFIG => MessageType::ReqConfig,
            REQ_CAL_PARAM => MessageType::ReqCalParam,
            CAL_PARAM => MessageType::CalParam,
            RAW_GYRO_TEMP_X => MessageType::RawGyroTempX,
            RAW_GYRO_TEMP_Y => MessageType::RawGyroTempY,
            RAW_GYRO_TEMP_Z => MessageType::RawGyroTempZ,
            SENSOR_HEAD_CRC_STATUS => MessageType::SensorHeadCrcStatus,
            GYRO_STDEV => MessageType::GyroStdev,
            ACCEL_STDEV => MessageType::AccelStdev,
            GYRO_MINIMUM => MessageType::GyroMinimum,
            ACCEL_MINIMUM => MessageType::AccelMinimum,
            GYRO_MAXIMUM => MessageType::GyroMaximum,
            ACCEL_MAXIMUM => MessageType::AccelMaximum,
            HS_RAW_GYRO_TEMP => MessageType::HsRawGyroTemp,
            HS_RAW => MessageType::HsRaw,
            HS_SERIAL => MessageType::HsSerial,
            other if RESERVED.contains(&other) => MessageType::Reserved(other),
            other => MessageType::Unknown(other),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> Self {
        use type_id::*;

        match kind {
            MessageType::RawGyro => RAW_GYRO,
            MessageType::RawAccel => RAW_ACCEL,
            MessageType::Timing => TIMING,
            MessageType::Resolution => RESOLUTION,
            MessageType::ResUnitsGyro => RES_UNITS_GYRO,
            MessageType::ResUnitsAccel => RES_UNITS_ACCEL,
            MessageType::SetSettings => SET_SETTINGS,
            MessageType::Settings => SETTINGS,
            MessageType::MfrCalDate => MFR_CAL_DATE,
            MessageType::SerialNumConfig => SERIAL_NUM_CONFIG,
            MessageType::SwVersion => SW_VERSION,
            MessageType::BoardReference => BOARD_REFERENCE,
            MessageType::ReqConfig => REQ_CONFIG,
            MessageType::ReqCalParam => REQ_CAL_PARAM,
            MessageType::CalParam => CAL_PARAM,
            MessageType::RawGyroTempX => RAW_GYRO_TEMP_X,
            MessageType::RawGyroTempY => RAW_GYRO_TEMP_Y,
            MessageType::RawGyroTempZ => RAW_GYRO_TEMP_Z,
            MessageType::SensorHeadCrcStatus => SENSOR_HEAD_CRC_STATUS,
            MessageType::GyroStdev => GYRO_STDEV,
            MessageType::AccelStdev => ACCEL_STDEV,
            MessageType::GyroMinimum => GYRO_MINIMUM,
            MessageType::AccelMinimum => ACCEL_MINIMUM,
            MessageType::GyroMaximum => GYRO_MAXIMUM,
            MessageType::AccelMaximum => ACCEL_MAXIMUM,
            MessageType::HsRawGyroTemp => HS_RAW_GYRO_TEMP,
            MessageType::HsRaw => HS_RAW,
            MessageType::HsSerial => HS_SERIAL,
            MessageType::Reserved(raw) | MessageType::Unknown(raw) => raw,
        }
    }
}

impl MessageType {
    /// Short name for logs and CSV output.
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::RawGyro => "raw_gyro",
            MessageType::RawAccel => "raw_accel",
            MessageType::Timing => "timing",
            MessageType::Resolution => "resolution",
            MessageType::ResUnitsGyro => "res_units_gyro",
            MessageType::ResUnitsAccel => "res_units_accel",
            MessageType::SetSettings => "set_settings",
            MessageType::Settings => "settings",
            MessageType::MfrCalDate => "mfr_cal_date",
            MessageType::SerialNumConfig => "serial_num_config",
            MessageType::SwVersion => "sw_version",
            MessageType::BoardReference => "board_reference",
            MessageType::ReqConfig => "req_config",
            MessageType::ReqCalParam => "req_cal_param",
            MessageType::CalParam => "cal_param",
            MessageType::RawGyroTempX => "raw_gyro_temp_x",
            MessageType::RawGyroTempY => "raw_gyro_temp_y",
            MessageType::RawGyroTempZ => "raw_gyro_temp_z",
            MessageType::SensorHeadCrcStatus => "sensor_head_crc_status",
            MessageType::GyroStdev => "gyro_stdev",
            MessageType::AccelStdev => "accel_stdev",
            MessageType::GyroMinimum => "gyro_minimum",
            MessageType::AccelMinimum => "accel_minimum",
            MessageType::GyroMaximum => "gyro_maximum",
            MessageType::AccelMaximum => "accel_maximum",
            MessageType::HsRawGyroTemp => "hs_raw_gyro_temp",
            MessageType::HsRaw => "hs_raw",
            MessageType::HsSerial => "hs_serial",
            MessageType::Reserved(_) => "reserved",
            MessageType::Unknown(_) => "unknown",
        }
    }

    /// True for the high-speed frame whose length byte is absent on the wire.
    pub fn is_length_elided(&self) -> bool {
        matches!(self, MessageType::HsRaw)
    }
}
