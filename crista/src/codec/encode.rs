use super::MICROS_PER_SECOND;
use crate::byte_order::{round_to_u32, WireWriter};
use crate::frame::Frame;
use crate::imu_data::{Axis, DeviceDate, HardwareConfig, ImuData, SoftwareVersion};
use crate::messages::{MessageType, HS_RAW_PAYLOAD_BYTES};

fn frame(kind: MessageType, payload: &WireWriter) -> Frame {
    Frame::framed(kind, payload.as_slice())
}

fn settings_payload(data: &ImuData) -> WireWriter {
    let period_us = round_to_u32(MICROS_PER_SECOND / f64::from(data.output_rate));

    let mut payload = WireWriter::new();
    payload
        .u8(data.output_device.bits())
        .u8(data.output_mode.bits())
        .u16(data.oversample_ratio)
        .u32(period_us);
    payload
}

fn date(payload: &mut WireWriter, date: &DeviceDate) {
    payload.u8(date.month).u8(date.day).u16(date.year);
}

/// Ask the IMU to switch to the output device, mode, oversample ratio and
/// rate held in `data`.
///
/// The rate travels as a period in microseconds; a zero rate saturates the
/// period.
pub fn encode_settings(data: &ImuData) -> Frame {
    frame(MessageType::SetSettings, &settings_payload(data))
}

/// Ask the IMU to send all of its configuration messages.
pub fn encode_config_request() -> Frame {
    let mut payload = WireWriter::new();
    payload.u8(0);
    frame(MessageType::ReqConfig, &payload)
}

pub fn encode_cal_param(index: u8, value: f32) -> Frame {
    let mut payload = WireWriter::new();
    payload.u8(index).f32(value);
    frame(MessageType::CalParam, &payload)
}

pub fn encode_cal_param_request(index: u8) -> Frame {
    let mut payload = WireWriter::new();
    payload.u8(index);
    frame(MessageType::ReqCalParam, &payload)
}

// Device side

pub fn encode_raw_gyro(counts: [u16; 3], sequence: u8) -> Frame {
    let mut payload = WireWriter::new();
    for count in counts {
        payload.u16(count);
    }
    payload.u8(sequence);
    frame(MessageType::RawGyro, &payload)
}

pub fn encode_raw_accel(counts: [u16; 3], sequence: u8) -> Frame {
    let mut payload = WireWriter::new();
    for count in counts {
        payload.u16(count);
    }
    payload.u8(sequence);
    frame(MessageType::RawAccel, &payload)
}

/// `ticks` are 0.1 us counts since the last PPS edge.
pub fn encode_timing(ticks: u32, pps_count: u8, sequence: u8, clock_error: i16) -> Frame {
    let mut payload = WireWriter::new();
    payload
        .u32(ticks)
        .u8(pps_count)
        .u8(sequence)
        .i16(clock_error);
    frame(MessageType::Timing, &payload)
}

pub fn encode_gyro_temp(axis: Axis, volts: f32) -> Frame {
    let kind = match axis {
        Axis::X => MessageType::RawGyroTempX,
        Axis::Y => MessageType::RawGyroTempY,
        Axis::Z => MessageType::RawGyroTempZ,
    };
    let mut payload = WireWriter::new();
    payload.f32(volts);
    frame(kind, &payload)
}

/// The IMU's report of its current output settings.
pub fn encode_settings_report(data: &ImuData) -> Frame {
    frame(MessageType::Settings, &settings_payload(data))
}

pub fn encode_resolution(gyro_range: f32, accel_range: f32) -> Frame {
    let mut payload = WireWriter::new();
    payload.f32(gyro_range).f32(accel_range);
    frame(MessageType::Resolution, &payload)
}

pub fn encode_serial_num_config(hw: &HardwareConfig) -> Frame {
    let mut payload = WireWriter::new();
    payload
        .u16(hw.serial_number)
        .u8(hw.eeprom_version)
        .u8(hw.hw_rev_major)
        .u8(hw.hw_rev_minor)
        .u8(hw.accel_config)
        .u8(hw.gyro_config)
        .u8(hw.config_bits);
    frame(MessageType::SerialNumConfig, &payload)
}

pub fn encode_sw_version(sw: &SoftwareVersion, enhanced_processor: bool) -> Frame {
    let packed =
        (u8::from(enhanced_processor) << 7) | ((sw.patch & 0x3F) << 1) | u8::from(sw.released);

    let mut payload = WireWriter::new();
    payload.u8(sw.major).u8(sw.minor).u8(sw.sub).u8(packed);
    date(&mut payload, &sw.date);
    frame(MessageType::SwVersion, &payload)
}

pub fn encode_dates(build: &DeviceDate, cal: &DeviceDate) -> Frame {
    let mut payload = WireWriter::new();
    date(&mut payload, build);
    date(&mut payload, cal);
    frame(MessageType::MfrCalDate, &payload)
}

/// High-speed raw sample: gyro X/Y/Z then accel X/Y/Z counts.
pub fn encode_hs_raw(counts: [u16; 6], sequence: u8) -> Frame {
    let mut payload = WireWriter::new();
    for count in counts {
        payload.u16(count);
    }
    payload.u8(sequence);

    let mut block = [0u8; HS_RAW_PAYLOAD_BYTES];
    block.copy_from_slice(payload.as_slice());
    Frame::build_hs_raw(&block)
}

/// High-speed converted sample in resolution units: gyro X/Y/Z then
/// accel X/Y/Z, then PPS ticks and count.
pub fn encode_hs_serial(counts: [i16; 6], ticks: u32, pps_count: u8, sequence: u8) -> Frame {
    let mut payload = WireWriter::new();
    for count in counts {
        payload.i16(count);
    }
    payload.u32(ticks).u8(pps_count).u8(sequence);
    frame(MessageType::HsSerial, &payload)
}
