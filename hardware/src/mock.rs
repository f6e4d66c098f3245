//! Emulated Crista IMU for hardware-in-the-loop testing
//!
//! Answers the host commands a real unit answers (configuration request,
//! settings change, calibration parameters) and produces high-speed sample
//! frames from caller-supplied rates and accelerations.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};

use crista::byte_order::{round_to_i16, round_to_u16, WireReader};
use crista::{
    decode_payload, encode_cal_param, encode_dates, encode_gyro_temp, encode_hs_raw,
    encode_hs_serial, encode_resolution, encode_serial_num_config, encode_settings_report,
    encode_sw_version, Axis, DeviceDate, Frame, HardwareConfig, ImuData, MessageType, OutputDevice,
    OutputMode, Packet, PacketFramer, SoftwareVersion, AD16_TO_GYROVOLTS, AD16_TO_VOLTS, GRAVITY,
};

/// Timing counter ticks in one PPS second.
pub const TICKS_PER_SECOND: u32 = 10_000_000;
const NANOS_PER_TICK: u128 = 100;

/// Longest gap between samples, whatever rate the host asks for.
pub const MAX_SAMPLE_INTERVAL: Duration = Duration::from_secs(86_400);

/// Gyro output at zero rate, volts
const GYRO_NULL_VOLTS: f64 = 2.5;
const GYRO_VOLTS_PER_DPS: f64 = 0.005;
/// Accelerometer output at zero acceleration, volts
const ACCEL_NULL_VOLTS: f64 = 2.5;
const ACCEL_VOLTS_PER_G: f64 = 0.1;

/// Nominal identity and settings of the emulated unit.
pub fn nominal_state() -> ImuData {
    ImuData {
        gyro_temp_volts: [1.25, 1.26, 1.24],
        build_date: DeviceDate {
            year: 2009,
            month: 6,
            day: 1,
        },
        cal_date: DeviceDate {
            year: 2009,
            month: 7,
            day: 15,
        },
        hardware: HardwareConfig {
            serial_number: 1001,
            eeprom_version: 2,
            hw_rev_major: 1,
            hw_rev_minor: 3,
            accel_config: 1,
            gyro_config: 1,
            config_bits: 0,
        },
        software: SoftwareVersion {
            major: 2,
            minor: 1,
            sub: 0,
            patch: 0,
            released: true,
            date: DeviceDate {
                year: 2009,
                month: 5,
                day: 20,
            },
        },
        enhanced_processor: false,
        gyro_range: 300.0,
        accel_range: 10.0,
        output_rate: 100.0,
        oversample_ratio: 1,
        output_device: OutputDevice::SERIAL,
        output_mode: OutputMode::CONVERTED,
        ..Default::default()
    }
}

pub struct MockImu {
    state: ImuData,
    framer: PacketFramer,
    cal_params: HashMap<u8, f32>,
    sequence: u8,
    ticks: u32,
    pps_count: u8,
}

impl MockImu {
    pub fn new(state: ImuData) -> Self {
        Self {
            state,
            framer: PacketFramer::new(),
            cal_params: HashMap::new(),
            sequence: 0,
            ticks: 0,
            pps_count: 0,
        }
    }

    pub fn state(&self) -> &ImuData {
        &self.state
    }

    pub fn cal_param(&self, index: u8) -> f32 {
        self.cal_params.get(&index).copied().unwrap_or(0.0)
    }

    /// Time between samples at the current output rate.
    pub fn sample_interval(&self) -> Duration {
        if self.state.output_rate > 0.0 {
            Duration::try_from_secs_f64(1.0 / f64::from(self.state.output_rate))
                .map_or(MAX_SAMPLE_INTERVAL, |interval| interval.min(MAX_SAMPLE_INTERVAL))
        } else {
            Duration::from_secs(1)
        }
    }

    /// Feed one byte from the host; returns any frames the device replies with.
    pub fn handle_byte(&mut self, byte: u8) -> Vec<Frame> {
        match self.framer.feed(byte) {
            Some(packet) => self.respond(&packet),
            None => Vec::new(),
        }
    }

    pub fn handle_bytes(&mut self, bytes: &[u8]) -> Vec<Frame> {
        bytes.iter().flat_map(|&b| self.handle_byte(b)).collect()
    }

    fn respond(&mut self, packet: &Packet) -> Vec<Frame> {
        let kind = packet.message_type();
        debug!("Host sent {}", kind.name());

        match kind {
            MessageType::ReqConfig => self.config_frames(),
            MessageType::SetSettings => {
                if let Err(e) = decode_payload(kind, packet.payload(), &mut self.state) {
                    warn!("Ignoring settings change: {e}");
                    return Vec::new();
                }
                info!(
                    "Settings now: device {:?}, mode {:?}, ratio {}, {:.1} Hz",
                    self.state.output_device,
                    self.state.output_mode,
                    self.state.oversample_ratio,
                    self.state.output_rate
                );
                vec![encode_settings_report(&self.state)]
            }
            MessageType::ReqCalParam => match packet.payload().first() {
                Some(&index) => vec![encode_cal_param(index, self.cal_param(index))],
                None => Vec::new(),
            },
            MessageType::CalParam => {
                self.store_cal_param(packet.payload());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn store_cal_param(&mut self, payload: &[u8]) {
        let mut reader = WireReader::new(payload);
        if reader.remaining() < 5 {
            warn!("Calibration parameter payload too short ({} bytes)", payload.len());
            return;
        }

        let index = reader.u8();
        match reader.f32().into_option() {
            Some(value) => {
                debug!("Calibration parameter {index} = {value}");
                self.cal_params.insert(index, value);
            }
            None => warn!("Rejecting invalid value for calibration parameter {index}"),
        }
    }

    /// Every configuration message, in the order the unit sends them.
    pub fn config_frames(&self) -> Vec<Frame> {
        let s = &self.state;
        let mut frames = vec![
            encode_settings_report(s),
            encode_sw_version(&s.software, s.enhanced_processor),
            encode_serial_num_config(&s.hardware),
            encode_dates(&s.build_date, &s.cal_date),
        ];
        frames.extend(
            Axis::ALL.map(|axis| encode_gyro_temp(axis, s.gyro_temp_volts[axis.temp_index()])),
        );
        frames.push(encode_resolution(s.gyro_range, s.accel_range));
        frames
    }

    fn advance_clock(&mut self) {
        let per_second = u128::from(TICKS_PER_SECOND);
        let total = u128::from(self.ticks) + self.sample_interval().as_nanos() / NANOS_PER_TICK;

        self.ticks = (total % per_second) as u32;
        // PPS counter is a wrapping u8
        self.pps_count = self
            .pps_count
            .wrapping_add((total / per_second % 256) as u8);
        self.sequence = self.sequence.wrapping_add(1);
    }

    /// Produce the next high-speed sample for the given body rates (deg/s)
    /// and accelerations (m/s^2).
    ///
    /// High-speed raw mode emits A/D counts; otherwise counts are in the
    /// resolution units of the reported ranges.
    pub fn next_sample(&mut self, gyro_dps: [f64; 3], accel_mps2: [f64; 3]) -> Frame {
        self.advance_clock();

        if self.state.output_mode.contains(OutputMode::HS_RAW) {
            let mut counts = [0u16; 6];
            for (i, dps) in gyro_dps.iter().enumerate() {
                let volts = GYRO_NULL_VOLTS + dps * GYRO_VOLTS_PER_DPS;
                counts[i] = round_to_u16(volts / AD16_TO_GYROVOLTS);
            }
            for (i, mps2) in accel_mps2.iter().enumerate() {
                let volts = ACCEL_NULL_VOLTS + mps2 / GRAVITY * ACCEL_VOLTS_PER_G;
                counts[3 + i] = round_to_u16(volts / AD16_TO_VOLTS);
            }
            encode_hs_raw(counts, self.sequence)
        } else {
            let gyro_res = self.state.gyro_resolution();
            let accel_res = self.state.accel_resolution();

            let mut counts = [0i16; 6];
            for (i, dps) in gyro_dps.iter().enumerate() {
                counts[i] = round_to_i16(dps / gyro_res);
            }
            for (i, mps2) in accel_mps2.iter().enumerate() {
                counts[3 + i] = round_to_i16(mps2 / accel_res);
            }
            encode_hs_serial(counts, self.ticks, self.pps_count, self.sequence)
        }
    }
}

impl Default for MockImu {
    fn default() -> Self {
        Self::new(nominal_state())
    }
}
