use log::{debug, trace, warn};
use thiserror::Error;

use super::{MICROS_PER_SECOND, TICKS_PER_MS};
use crate::byte_order::WireReader;
use crate::frame::Packet;
use crate::imu_data::{
    sensor, Axis, DeviceDate, ImuData, OutputDevice, OutputMode, AD16_TO_GYROVOLTS, AD16_TO_VOLTS,
};
use crate::messages::{MessageType, HS_RAW_PAYLOAD_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{} payload too short: expected {expected} bytes, got {got}", .kind.name())]
    Truncated {
        kind: MessageType,
        expected: usize,
        got: usize,
    },
}

/// Fixed layout for one message type.
struct Decoder {
    len: usize,
    apply: fn(&mut WireReader<'_>, &mut ImuData),
}

fn decoder(kind: MessageType) -> Option<Decoder> {
    let decoder = match kind {
        MessageType::RawGyro => Decoder {
            len: 7,
            apply: raw_gyro,
        },
        MessageType::RawAccel => Decoder {
            len: 7,
            apply: raw_accel,
        },
        MessageType::Timing => Decoder {
            len: 8,
            apply: timing,
        },
        MessageType::RawGyroTempX => Decoder {
            len: 4,
            apply: |r, d| gyro_temp(r, d, Axis::X),
        },
        MessageType::RawGyroTempY => Decoder {
            len: 4,
            apply: |r, d| gyro_temp(r, d, Axis::Y),
        },
        MessageType::RawGyroTempZ => Decoder {
            len: 4,
            apply: |r, d| gyro_temp(r, d, Axis::Z),
        },
        MessageType::Settings | MessageType::SetSettings => Decoder {
            len: 8,
            apply: settings,
        },
        MessageType::Resolution => Decoder {
            len: 8,
            apply: resolution,
        },
        MessageType::SerialNumConfig => Decoder {
            len: 8,
            apply: hardware_config,
        },
        MessageType::SwVersion => Decoder {
            len: 8,
            apply: software_version,
        },
        MessageType::MfrCalDate => Decoder {
            len: 8,
            apply: dates,
        },
        MessageType::HsRaw => Decoder {
            len: HS_RAW_PAYLOAD_BYTES,
            apply: hs_raw,
        },
        MessageType::HsSerial => Decoder {
            len: 18,
            apply: hs_serial,
        },
        _ => return None,
    };

    Some(decoder)
}

/// Payload length a message type must carry to be decoded, or `None` if the
/// type is not decoded.
pub fn expected_payload_len(kind: MessageType) -> Option<usize> {
    decoder(kind).map(|d| d.len)
}

/// Apply a validated packet to the device-state record.
///
/// Returns the packet's message type. Types without a decoder leave the
/// record untouched and still succeed.
pub fn decode(packet: &Packet, data: &mut ImuData) -> Result<MessageType, DecodeError> {
    let kind = packet.message_type();
    decode_payload(kind, packet.payload(), data)?;
    Ok(kind)
}

/// Apply a bare payload of the given type to the device-state record.
///
/// A payload shorter than the type's layout is rejected before any field is
/// written. Trailing bytes beyond the layout are ignored.
pub fn decode_payload(
    kind: MessageType,
    payload: &[u8],
    data: &mut ImuData,
) -> Result<(), DecodeError> {
    let Some(decoder) = decoder(kind) else {
        trace!("No decoder for {} ({:#04x})", kind.name(), u8::from(kind));
        return Ok(());
    };

    if payload.len() < decoder.len {
        warn!(
            "Dropping {}: {} byte payload, layout needs {}",
            kind.name(),
            payload.len(),
            decoder.len
        );
        return Err(DecodeError::Truncated {
            kind,
            expected: decoder.len,
            got: payload.len(),
        });
    }

    let mut reader = WireReader::new(payload);
    (decoder.apply)(&mut reader, data);
    debug!("Decoded {} ({} bytes)", kind.name(), payload.len());

    Ok(())
}

fn float_field(reader: &mut WireReader<'_>, field: &str) -> f32 {
    let checked = reader.f32();
    if checked.invalid {
        warn!("Invalid float in {field}, using {}", checked.value);
    }
    checked.value
}

fn ticks_to_ms(ticks: u32) -> f32 {
    (f64::from(ticks) / TICKS_PER_MS) as f32
}

fn date(reader: &mut WireReader<'_>) -> DeviceDate {
    let month = reader.u8();
    let day = reader.u8();
    let year = reader.u16();
    DeviceDate { year, month, day }
}

fn gyro_volts(reader: &mut WireReader<'_>, data: &mut ImuData) {
    for i in sensor::GYROS {
        data.sensors_volts[i] = (f64::from(reader.u16()) * AD16_TO_GYROVOLTS) as f32;
    }
}

fn accel_volts(reader: &mut WireReader<'_>, data: &mut ImuData) {
    for i in sensor::ACCELS {
        data.sensors_volts[i] = (f64::from(reader.u16()) * AD16_TO_VOLTS) as f32;
    }
}

fn raw_gyro(reader: &mut WireReader<'_>, data: &mut ImuData) {
    gyro_volts(reader, data);
    data.sequence_number = reader.u8();
}

fn raw_accel(reader: &mut WireReader<'_>, data: &mut ImuData) {
    accel_volts(reader, data);
    data.sequence_number = reader.u8();
}

fn timing(reader: &mut WireReader<'_>, data: &mut ImuData) {
    data.time_since_pps = ticks_to_ms(reader.u32());
    data.pps_count = reader.u8();
    data.sequence_number = reader.u8();
    data.clock_error = reader.i16();
}

fn gyro_temp(reader: &mut WireReader<'_>, data: &mut ImuData, axis: Axis) {
    data.gyro_temp_volts[axis.temp_index()] = float_field(reader, "gyro temperature");
}

fn settings(reader: &mut WireReader<'_>, data: &mut ImuData) {
    data.output_device = OutputDevice::from_bits_retain(reader.u8());
    data.output_mode = OutputMode::from_bits_retain(reader.u8());
    data.oversample_ratio = reader.u16();

    let period_us = reader.u32();
    data.output_rate = if period_us == 0 {
        0.0
    } else {
        (MICROS_PER_SECOND / f64::from(period_us)) as f32
    };
}

fn resolution(reader: &mut WireReader<'_>, data: &mut ImuData) {
    data.gyro_range = float_field(reader, "gyro range");
    data.accel_range = float_field(reader, "accel range");
}

fn hardware_config(reader: &mut WireReader<'_>, data: &mut ImuData) {
    let hw = &mut data.hardware;
    hw.serial_number = reader.u16();
    hw.eeprom_version = reader.u8();
    hw.hw_rev_major = reader.u8();
    hw.hw_rev_minor = reader.u8();
    hw.accel_config = reader.u8();
    hw.gyro_config = reader.u8();
    hw.config_bits = reader.u8();
}

fn software_version(reader: &mut WireReader<'_>, data: &mut ImuData) {
    let sw = &mut data.software;
    sw.major = reader.u8();
    sw.minor = reader.u8();
    sw.sub = reader.u8();

    // bit 7: enhanced processor, bits 1-6: patch, bit 0: released
    let packed = reader.u8();
    sw.patch = (packed >> 1) & 0x3F;
    sw.released = packed & 0x01 != 0;
    data.enhanced_processor = packed & 0x80 != 0;

    sw.date = date(reader);
}

fn dates(reader: &mut WireReader<'_>, data: &mut ImuData) {
    data.build_date = date(reader);
    data.cal_date = date(reader);
}

fn hs_raw(reader: &mut WireReader<'_>, data: &mut ImuData) {
    gyro_volts(reader, data);
    accel_volts(reader, data);
    data.sequence_number = reader.u8();
}

fn hs_serial(reader: &mut WireReader<'_>, data: &mut ImuData) {
    // Scaled by whatever ranges were last reported
    let gyro_res = data.gyro_resolution();
    let accel_res = data.accel_resolution();

    for i in sensor::GYROS {
        data.sensors_converted[i] = (f64::from(reader.i16()) * gyro_res) as f32;
    }
    for i in sensor::ACCELS {
        data.sensors_converted[i] = (f64::from(reader.i16()) * accel_res) as f32;
    }

    data.time_since_pps = ticks_to_ms(reader.u32());
    data.pps_count = reader.u8();
    data.sequence_number = reader.u8();
}
