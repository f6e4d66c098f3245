//! Decode a captured Crista byte stream into CSV
//!
//! Runs a raw serial dump through the framer and codec and writes one row
//! per accepted packet with the device state right after it was applied.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use crista::{decode, sensor, ImuData, MessageType, Packet, PacketFramer};

#[derive(Parser, Debug)]
#[command(name = "parse_dump")]
#[command(about = "Decode a captured Crista IMU byte dump to CSV")]
struct Args {
    /// Raw byte dump captured from the serial link
    dump: PathBuf,

    /// CSV file to write
    output: PathBuf,
}

#[derive(Debug, Default)]
struct Counts {
    packets: usize,
    packet_bytes: usize,
    truncated: usize,
    by_type: Vec<(MessageType, usize)>,
}

impl Counts {
    fn record(&mut self, packet: &Packet) {
        self.packets += 1;
        self.packet_bytes += packet.wire_len();

        let kind = packet.message_type();
        match self.by_type.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => self.by_type.push((kind, 1)),
        }
    }
}

fn write_header(out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "index,type,tag,len,sequence,time_since_pps_ms,pps_count,\
         gyro_x_v,gyro_y_v,gyro_z_v,accel_x_v,accel_y_v,accel_z_v,\
         gyro_x,gyro_y,gyro_z,accel_x,accel_y,accel_z,payload_hex"
    )?;
    Ok(())
}

fn write_row(out: &mut impl Write, index: usize, packet: &Packet, data: &ImuData) -> Result<()> {
    let kind = packet.message_type();
    let volts = &data.sensors_volts;
    let conv = &data.sensors_converted;
    let hex = packet
        .payload()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");

    writeln!(
        out,
        "{index},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{hex}",
        kind.name(),
        u8::from(kind),
        packet.len,
        data.sequence_number,
        data.time_since_pps,
        data.pps_count,
        volts[sensor::GYRO_X],
        volts[sensor::GYRO_Y],
        volts[sensor::GYRO_Z],
        volts[sensor::ACCEL_X],
        volts[sensor::ACCEL_Y],
        volts[sensor::ACCEL_Z],
        conv[sensor::GYRO_X],
        conv[sensor::GYRO_Y],
        conv[sensor::GYRO_Z],
        conv[sensor::ACCEL_X],
        conv[sensor::ACCEL_Y],
        conv[sensor::ACCEL_Z],
    )?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let bytes = std::fs::read(&args.dump)
        .with_context(|| format!("Failed to read {}", args.dump.display()))?;
    info!("Read {} bytes from {}", bytes.len(), args.dump.display());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    write_header(&mut out)?;

    let mut framer = PacketFramer::new();
    let mut data = ImuData::new();
    let mut counts = Counts::default();

    for packet in framer.push_bytes(&bytes) {
        counts.record(&packet);
        match decode(&packet, &mut data) {
            Ok(_) => write_row(&mut out, counts.packets, &packet, &data)?,
            Err(e) => {
                warn!("Packet {}: {e}", counts.packets);
                counts.truncated += 1;
            }
        }
    }
    out.flush()
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let skipped = bytes.len().saturating_sub(counts.packet_bytes);
    info!(
        "Parsed {} packets ({} truncated), {skipped} bytes outside valid frames",
        counts.packets, counts.truncated
    );
    for (kind, n) in &counts.by_type {
        info!("  {:<22} {n}", kind.name());
    }
    info!("Wrote {}", args.output.display());

    Ok(())
}
