//! Last known state of a Crista IMU
//!
//! [`ImuData`] is filled in piecemeal as packets arrive. Fields from
//! different message types are never a consistent snapshot: converted
//! high-speed samples, for example, are scaled with whatever ranges the
//! last resolution packet reported (zero until one arrives).

use bitflags::bitflags;

/// Volts per count of a 16-bit A/D reading (Vref / 65536).
pub const AD16_TO_VOLTS: f64 = 0.0000625;
/// Volts per count for gyro channels, undoing the gyro voltage divider.
pub const AD16_TO_GYROVOLTS: f64 = AD16_TO_VOLTS / 0.8085;
/// Standard gravity used to scale accelerometer range, m/s^2
pub const GRAVITY: f64 = 9.81;

/// Indices into the per-sensor arrays.
pub mod sensor {
    pub const GYRO_X: usize = 0;
    pub const GYRO_Y: usize = 1;
    pub const GYRO_Z: usize = 2;
    pub const ACCEL_X: usize = 3;
    pub const ACCEL_Y: usize = 4;
    pub const ACCEL_Z: usize = 5;
    pub const COUNT: usize = 6;

    pub const GYROS: [usize; 3] = [GYRO_X, GYRO_Y, GYRO_Z];
    pub const ACCELS: [usize; 3] = [ACCEL_X, ACCEL_Y, ACCEL_Z];
}

/// Indices into [`ImuData::gyro_temp_volts`].
///
/// The accelerometers have no temperature channel of their own and read the
/// gyro channel that shares their physical location.
pub mod temp {
    pub const GYRO_X: usize = 0;
    pub const GYRO_Y: usize = 1;
    pub const GYRO_Z: usize = 2;
    pub const COUNT: usize = 3;

    pub const ACCEL_X: usize = GYRO_Y;
    pub const ACCEL_Y: usize = GYRO_X;
    pub const ACCEL_Z: usize = GYRO_Y;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Gyro temperature channel for this axis.
    pub fn temp_index(self) -> usize {
        match self {
            Axis::X => temp::GYRO_X,
            Axis::Y => temp::GYRO_Y,
            Axis::Z => temp::GYRO_Z,
        }
    }
}

bitflags! {
    /// Where the IMU sends its telemetry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OutputDevice: u8 {
        const SERIAL = 0x01;
        const CAN = 0x02;
    }
}

bitflags! {
    /// Which telemetry the IMU emits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OutputMode: u8 {
        /// Engineering-unit data
        const CONVERTED = 0x01;
        const RAW = 0x02;
        /// High-speed raw data only
        const HS_RAW = 0x04;
    }
}

impl Default for OutputDevice {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Sensor head identification from the serial-number/config message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HardwareConfig {
    pub serial_number: u16,
    pub eeprom_version: u8,
    pub hw_rev_major: u8,
    pub hw_rev_minor: u8,
    pub accel_config: u8,
    pub gyro_config: u8,
    pub config_bits: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoftwareVersion {
    pub major: u8,
    pub minor: u8,
    pub sub: u8,
    /// Six bits on the wire
    pub patch: u8,
    pub released: bool,
    pub date: DeviceDate,
}

impl std::fmt::Display for SoftwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{} patch {}{} ({:04}-{:02}-{:02})",
            self.major,
            self.minor,
            self.sub,
            self.patch,
            if self.released { "" } else { " (unreleased)" },
            self.date.year,
            self.date.month,
            self.date.day
        )
    }
}

/// Device-state record updated in place by [`crate::decode`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImuData {
    /// Raw analog sensor outputs, volts
    pub sensors_volts: [f32; sensor::COUNT],
    /// Gyros in deg/s, accelerometers in m/s^2
    pub sensors_converted: [f32; sensor::COUNT],
    pub gyro_temp_volts: [f32; temp::COUNT],

    pub build_date: DeviceDate,
    pub cal_date: DeviceDate,
    pub hardware: HardwareConfig,
    pub software: SoftwareVersion,
    pub enhanced_processor: bool,

    /// Full-scale gyro range, deg/s
    pub gyro_range: f32,
    /// Full-scale accelerometer range, in g
    pub accel_range: f32,

    /// Hz
    pub output_rate: f32,
    pub oversample_ratio: u16,
    pub output_device: OutputDevice,
    pub output_mode: OutputMode,

    /// Milliseconds since the last PPS edge
    pub time_since_pps: f32,
    pub pps_count: u8,
    /// PPS versus internal clock seconds
    pub clock_error: i16,

    pub sequence_number: u8,
}

impl ImuData {
    pub fn new() -> Self {
        Self::default()
    }

    /// deg/s per count of a high-speed converted gyro sample.
    pub fn gyro_resolution(&self) -> f64 {
        2.0 * f64::from(self.gyro_range) / 65535.0
    }

    /// m/s^2 per count of a high-speed converted accelerometer sample.
    pub fn accel_resolution(&self) -> f64 {
        2.0 * f64::from(self.accel_range) * GRAVITY / 65535.0
    }

    /// Temperature channel voltages seen by the three accelerometers.
    pub fn accel_temp_volts(&self) -> [f32; 3] {
        [
            self.gyro_temp_volts[temp::ACCEL_X],
            self.gyro_temp_volts[temp::ACCEL_Y],
            self.gyro_temp_volts[temp::ACCEL_Z],
        ]
    }

    pub fn gyro_converted(&self) -> [f32; 3] {
        sensor::GYROS.map(|i| self.sensors_converted[i])
    }

    pub fn accel_converted(&self) -> [f32; 3] {
        sensor::ACCELS.map(|i| self.sensors_converted[i])
    }

    /// True once a resolution packet has set nonzero ranges.
    pub fn has_ranges(&self) -> bool {
        self.gyro_range != 0.0 && self.accel_range != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accel_temp_aliasing() {
        let data = ImuData {
            gyro_temp_volts: [1.0, 2.0, 3.0],
            ..Default::default()
        };
        assert_eq!(data.accel_temp_volts(), [2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_resolutions() {
        let data = ImuData {
            gyro_range: 300.0,
            accel_range: 10.0,
            ..Default::default()
        };
        assert_relative_eq!(data.gyro_resolution(), 600.0 / 65535.0);
        assert_relative_eq!(data.accel_resolution(), 196.2 / 65535.0, epsilon = 1e-12);
        assert!(data.has_ranges());
        assert!(!ImuData::new().has_ranges());
    }

    #[test]
    fn test_gyro_volts_constant() {
        assert_relative_eq!(AD16_TO_GYROVOLTS * 0.8085, AD16_TO_VOLTS);
    }

    #[test]
    fn test_output_flags_keep_unknown_bits() {
        let mode = OutputMode::from_bits_retain(0x85);
        assert!(mode.contains(OutputMode::CONVERTED | OutputMode::HS_RAW));
        assert_eq!(mode.bits(), 0x85);
        assert_eq!(OutputDevice::default(), OutputDevice::empty());
    }

    #[test]
    fn test_version_display() {
        let version = SoftwareVersion {
            major: 2,
            minor: 1,
            sub: 4,
            patch: 3,
            released: true,
            date: DeviceDate {
                year: 2009,
                month: 6,
                day: 30,
            },
        };
        assert_eq!(version.to_string(), "2.1.4 patch 3 (2009-06-30)");
    }
}
