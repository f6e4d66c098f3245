//! Mock Crista IMU on a serial port
//!
//! Answers host configuration, settings and calibration commands and
//! streams high-speed samples at the configured output rate.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use crista::{ByteSink, ByteSource, Frame, OutputMode};
use hardware::mock::nominal_state;
use hardware::{LinkConfig, MockImu, SerialLink};

#[derive(Parser, Debug)]
#[command(name = "mock_imu")]
#[command(about = "Mock Crista IMU transmitter")]
struct Args {
    /// Serial port path (e.g., /dev/ttyUSB1)
    #[arg(long)]
    port: String,

    #[arg(long, default_value = "115200")]
    baud: u32,

    /// Initial output rate in Hz (the host may change it)
    #[arg(long, default_value = "100.0")]
    rate_hz: f32,

    /// Send high-speed raw samples instead of converted ones
    #[arg(long)]
    raw: bool,

    /// Number of samples to send (0 = infinite)
    #[arg(short, long, default_value = "0")]
    count: u64,

    /// Simulated angular rate in deg/s about each axis
    #[arg(long, default_value = "0.0")]
    rate_dps: f64,
}

fn send(link: &mut impl ByteSink, frame: &Frame) -> Result<()> {
    let written = link
        .write_block(frame.as_bytes())
        .context("Failed to write frame")?;
    if written != frame.len() {
        warn!(
            "Short write of {}: {written}/{}",
            frame.message_type().name(),
            frame.len()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if !(args.rate_hz.is_finite() && args.rate_hz > 0.0) {
        anyhow::bail!("Output rate must be positive, got {}", args.rate_hz);
    }

    let config = LinkConfig {
        port: args.port.clone(),
        baud_rate: args.baud,
        read_timeout_ms: 1,
        settings: None,
    };
    let mut link = SerialLink::open(&config)
        .with_context(|| format!("Failed to open serial port {}", config.port))?;

    let mut state = nominal_state();
    state.output_rate = args.rate_hz;
    if args.raw {
        state.output_mode = OutputMode::HS_RAW;
    }
    let mut imu = MockImu::new(state);

    let gyro = [args.rate_dps; 3];
    let accel = [0.0, 0.0, crista::GRAVITY];

    info!(
        "Starting {} sample transmission at {:.1} Hz",
        if args.raw { "high-speed raw" } else { "converted" },
        args.rate_hz
    );

    let start_time = Instant::now();
    let mut next_send = Instant::now();
    let mut sample_count: u64 = 0;

    loop {
        // Host commands
        loop {
            match link.read_byte() {
                Ok(Some(byte)) => {
                    for reply in imu.handle_byte(byte) {
                        send(&mut link, &reply)?;
                        debug!("Replied with {}", reply.message_type().name());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Read error: {e}");
                    break;
                }
            }
        }

        let now = Instant::now();
        if now >= next_send {
            let frame = imu.next_sample(gyro, accel);
            send(&mut link, &frame)?;

            sample_count += 1;
            next_send += imu.sample_interval();

            if args.count > 0 && sample_count >= args.count {
                break;
            }

            if sample_count % 500 == 0 {
                let elapsed = start_time.elapsed().as_secs_f64();
                let rate = sample_count as f64 / elapsed;
                info!("Sent {sample_count} samples in {elapsed:.2}s ({rate:.1} Hz)");
            }
        } else {
            std::thread::sleep((next_send - now).min(Duration::from_millis(1)));
        }
    }

    let elapsed = start_time.elapsed().as_secs_f64();
    let rate = sample_count as f64 / elapsed;
    info!("Complete: {sample_count} samples in {elapsed:.2}s ({rate:.1} Hz)");

    Ok(())
}
