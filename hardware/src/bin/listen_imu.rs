//! Listen for Crista IMU telemetry on a serial port
//!
//! Optionally pushes output settings, then requests the IMU configuration
//! until its sensor ranges arrive. After that, prints each high-speed
//! converted sample with the time since the previous one and reports
//! packet-rate statistics.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use serialport::SerialPort;

use crista::{
    encode_config_request, encode_settings, sensor, ImuData, ImuLink, LinkStats, MessageType,
};
use hardware::{LinkConfig, OutputSettingsConfig, SerialLink};

type SerialImuLink = ImuLink<SerialLink<Box<dyn SerialPort>>>;

#[derive(Parser, Debug)]
#[command(name = "listen_imu")]
#[command(about = "Crista IMU receiver and sample printer")]
struct Args {
    /// JSON link configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial port path (overrides the config file)
    #[arg(long)]
    port: Option<String>,

    /// Baud rate (overrides the config file)
    #[arg(long)]
    baud: Option<u32>,

    /// Output rate in Hz to request from the IMU
    #[arg(long)]
    rate_hz: Option<f32>,

    /// Number of samples to print (0 = infinite)
    #[arg(short, long, default_value = "0")]
    count: u64,

    /// Report statistics interval in packets
    #[arg(long, default_value = "500")]
    report_interval: u64,

    /// Milliseconds between configuration requests while waiting for ranges
    #[arg(long, default_value = "250")]
    request_interval_ms: u64,
}

fn resolve_config(args: &Args) -> Result<LinkConfig> {
    let mut config = match &args.config {
        Some(path) => LinkConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LinkConfig::default(),
    };

    if let Some(port) = &args.port {
        config.port = port.clone();
    }
    if let Some(baud) = args.baud {
        config.baud_rate = baud;
    }
    if let Some(rate) = args.rate_hz {
        let settings = config.settings.get_or_insert_with(OutputSettingsConfig::default);
        settings.output_rate_hz = rate;
    }

    config.validate().context("Invalid link configuration")?;
    Ok(config)
}

/// Statistics tracker
struct Statistics {
    by_type: BTreeMap<&'static str, u64>,
    total_packets: u64,
    start_time: Instant,
    last_report_time: Instant,
    last_report_count: u64,
}

impl Statistics {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            by_type: BTreeMap::new(),
            total_packets: 0,
            start_time: now,
            last_report_time: now,
            last_report_count: 0,
        }
    }

    fn record_packet(&mut self, kind: MessageType) {
        self.total_packets += 1;
        *self.by_type.entry(kind.name()).or_default() += 1;
    }

    fn type_summary(&self) -> String {
        self.by_type
            .iter()
            .map(|(name, n)| format!("{name}={n}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn report(&mut self, link: &LinkStats) {
        let now = Instant::now();
        let total_elapsed = self.start_time.elapsed().as_secs_f64();
        let interval_elapsed = now.duration_since(self.last_report_time).as_secs_f64();
        let interval_packets = self.total_packets - self.last_report_count;

        info!(
            "Packets: {} | Rate: {:.1} Hz (interval: {:.1} Hz) | Truncated: {} | Types: {}",
            self.total_packets,
            self.total_packets as f64 / total_elapsed,
            interval_packets as f64 / interval_elapsed,
            link.truncated,
            self.type_summary()
        );

        self.last_report_time = now;
        self.last_report_count = self.total_packets;
    }

    fn final_report(&self, link: &LinkStats) {
        let elapsed = self.start_time.elapsed().as_secs_f64();

        info!("=== Final Statistics ===");
        info!("Total packets: {}", self.total_packets);
        info!("Duration: {elapsed:.2}s");
        info!(
            "Average rate: {:.1} Hz",
            self.total_packets as f64 / elapsed
        );
        info!("Bytes read: {}", link.bytes_read);
        info!("Truncated payloads: {}", link.truncated);
        info!("Frames sent: {}", link.frames_sent);
        info!("Packet types: {}", self.type_summary());
    }
}

fn print_sample(data: &ImuData, last_time: &mut Option<f32>) {
    let conv = &data.sensors_converted;
    let dt = match *last_time {
        Some(previous) => data.time_since_pps - previous,
        None => 0.0,
    };
    *last_time = Some(data.time_since_pps);

    println!(
        "{:10.2}{:10.2}{:10.2}{:10.2}{:10.2}{:10.2}{:10.1}",
        conv[sensor::GYRO_X],
        conv[sensor::GYRO_Y],
        conv[sensor::GYRO_Z],
        conv[sensor::ACCEL_X],
        conv[sensor::ACCEL_Y],
        conv[sensor::ACCEL_Z],
        dt
    );
}

fn run_receiver(mut link: SerialImuLink, config: &LinkConfig, args: &Args) -> Result<()> {
    info!("Starting Crista IMU receiver...");

    if let Some(settings) = &config.settings {
        info!(
            "Requesting {:.1} Hz output, mode {:#04x}, oversample {}",
            settings.output_rate_hz, settings.mode, settings.oversample_ratio
        );
        link.send(&encode_settings(&settings.to_imu_data()))
            .context("Failed to send settings")?;
    }

    let request_interval = Duration::from_millis(args.request_interval_ms);
    link.send(&encode_config_request())
        .context("Failed to send configuration request")?;
    let mut last_request = Instant::now();
    let mut waiting = true;
    info!("Waiting for IMU configuration...");

    let mut stats = Statistics::new();
    let mut samples: u64 = 0;
    let mut last_time = None;

    loop {
        match link.next_message() {
            Ok(Some(kind)) => {
                stats.record_packet(kind);
                debug!("Received {}", kind.name());

                if waiting {
                    if kind == MessageType::Resolution {
                        let data = link.data();
                        info!(
                            "IMU serial {} firmware {} | gyro range {} deg/s, accel range {} g | {:.1} Hz",
                            data.hardware.serial_number,
                            data.software,
                            data.gyro_range,
                            data.accel_range,
                            data.output_rate
                        );
                        println!(
                            "   gx[d/s]   gy[d/s]   gz[d/s] ax[m/s/s] ay[m/s/s] az[m/s/s]    dT[ms]"
                        );
                        waiting = false;
                    }
                } else if kind == MessageType::HsSerial {
                    print_sample(link.data(), &mut last_time);
                    samples += 1;

                    if args.count > 0 && samples >= args.count {
                        stats.final_report(&link.stats());
                        return Ok(());
                    }
                }

                if args.report_interval > 0 && stats.total_packets % args.report_interval == 0 {
                    stats.report(&link.stats());
                }
            }
            Ok(None) => {
                // No data, brief sleep to avoid busy-wait
                std::thread::sleep(Duration::from_micros(100));
            }
            Err(e) => {
                warn!("Read error: {e}");
                std::thread::sleep(Duration::from_millis(10));
            }
        }

        if waiting && last_request.elapsed() >= request_interval {
            link.send(&encode_config_request())
                .context("Failed to send configuration request")?;
            last_request = Instant::now();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    let serial = SerialLink::open(&config)
        .with_context(|| format!("Failed to open serial port {}", config.port))?;

    run_receiver(ImuLink::new(serial), &config, &args)
}
