//! Whole byte streams through framer and codec

use approx::assert_relative_eq;
use crista::{
    crc16, crc16_one_byte, decode, encode_config_request, encode_hs_raw, encode_hs_serial,
    encode_resolution, encode_settings, encode_settings_report, encode_timing, sensor, ImuData,
    MessageType, OutputDevice, OutputMode, Packet, PacketFramer, AD16_TO_GYROVOLTS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RAW_GYRO_FRAME: [u8; 13] = [
    0x55, 0xAA, 0x00, 0x07, 0x12, 0x34, 0x80, 0x00, 0xFF, 0xFF, 0x2A, 0x3D, 0xB0,
];

fn run(stream: &[u8]) -> (Vec<Packet>, ImuData) {
    let mut framer = PacketFramer::new();
    let mut data = ImuData::new();
    let packets = framer.push_bytes(stream);
    for packet in &packets {
        decode(packet, &mut data).unwrap();
    }
    (packets, data)
}

#[test]
fn test_raw_gyro_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (packets, data) = run(&RAW_GYRO_FRAME);
    assert_eq!(packets.len(), 1);

    let expected = [0x1234u16, 0x8000, 0xFFFF];
    for (axis, count) in sensor::GYROS.into_iter().zip(expected) {
        assert_relative_eq!(
            data.sensors_volts[axis],
            (f64::from(count) * AD16_TO_GYROVOLTS) as f32
        );
    }
    assert_eq!(data.sequence_number, 0x2A);
}

#[test]
fn test_flipped_crc_yields_nothing() {
    let mut frame = RAW_GYRO_FRAME;
    frame[12] ^= 0xFF;

    let (packets, data) = run(&frame);
    assert!(packets.is_empty());
    assert_eq!(data, ImuData::new());
}

#[test]
fn test_resync_after_non_sync_prefix() {
    let mut rng = StdRng::seed_from_u64(0x1234_5678);

    for prefix_len in [1usize, 2, 17, 100, 255] {
        let mut stream: Vec<u8> = (0..prefix_len)
            .map(|_| match rng.gen::<u8>() {
                0x55 => 0x54,
                b => b,
            })
            .collect();
        stream.extend_from_slice(&RAW_GYRO_FRAME);

        let (packets, _) = run(&stream);
        let (alone, _) = run(&RAW_GYRO_FRAME);
        assert_eq!(packets, alone, "prefix of {prefix_len} bytes");
    }
}

#[test]
fn test_feeding_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(0xCAFE_F00D);
    let mut stream = Vec::new();
    for i in 0..50u32 {
        stream.extend_from_slice(encode_timing(i * 1000, i as u8, i as u8, 0).as_bytes());
        for _ in 0..(i % 7) {
            stream.push(rng.gen::<u8>());
        }
        stream.extend_from_slice(encode_hs_raw([i as u16; 6], i as u8).as_bytes());
    }

    let whole = PacketFramer::new().push_bytes(&stream);

    let mut framer = PacketFramer::new();
    let mut chunked = Vec::new();
    for chunk in stream.chunks(5) {
        chunked.extend(framer.push_bytes(chunk));
    }

    let mut framer = PacketFramer::new();
    let single: Vec<Packet> = stream.iter().filter_map(|&b| framer.feed(b)).collect();

    assert_eq!(whole, chunked);
    assert_eq!(whole, single);
    assert!(whole.len() >= 90, "only {} packets recovered", whole.len());
}

#[test]
fn test_crc_fold_matches_block() {
    let mut rng = StdRng::seed_from_u64(42);
    for len in [0usize, 1, 2, 7, 24, 300] {
        let block: Vec<u8> = (0..len).map(|_| rng.gen::<u8>()).collect();
        let folded = block.iter().fold(0, |crc, &b| crc16_one_byte(b, crc));
        assert_eq!(crc16(&block), folded);
    }
    assert_eq!(crc16(b"123456789"), 0xBB3D);
}

#[test]
fn test_settings_roundtrip_through_stream() {
    let state = ImuData {
        output_device: OutputDevice::SERIAL,
        output_mode: OutputMode::CONVERTED | OutputMode::RAW,
        oversample_ratio: 25,
        output_rate: 200.0,
        ..Default::default()
    };

    let (packets, data) = run(encode_settings(&state).as_bytes());
    assert_eq!(packets[0].message_type(), MessageType::SetSettings);
    assert_eq!(data.oversample_ratio, 25);
    assert_relative_eq!(data.output_rate, 200.0);

    let (_, data) = run(encode_settings_report(&state).as_bytes());
    assert_eq!(data.output_mode, state.output_mode);
}

#[test]
fn test_host_startup_sequence() {
    // Device answers a config request, then streams converted samples
    let mut stream = Vec::new();
    stream.extend_from_slice(encode_config_request().as_bytes());
    stream.extend_from_slice(encode_resolution(250.0, 5.0).as_bytes());
    stream.extend_from_slice(encode_hs_serial([100, 0, -100, 0, 0, 1000], 20_000, 1, 9).as_bytes());

    let (packets, data) = run(&stream);
    let kinds: Vec<MessageType> = packets.iter().map(Packet::message_type).collect();
    assert_eq!(
        kinds,
        vec![
            MessageType::ReqConfig,
            MessageType::Resolution,
            MessageType::HsSerial
        ]
    );

    assert_relative_eq!(
        data.sensors_converted[sensor::GYRO_X],
        (100.0 * 500.0 / 65535.0) as f32
    );
    assert_relative_eq!(
        data.sensors_converted[sensor::GYRO_Z],
        (-100.0 * 500.0 / 65535.0) as f32
    );
    assert_relative_eq!(
        data.sensors_converted[sensor::ACCEL_Z],
        (1000.0 * 2.0 * 5.0 * 9.81 / 65535.0) as f32,
        max_relative = 1e-6
    );
    assert_relative_eq!(data.time_since_pps, 2.0);
    assert_eq!(data.sequence_number, 9);
}
