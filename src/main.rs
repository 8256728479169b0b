use std::error::Error;
use std::fmt::Debug;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;

use brickpi3::config::BrickConfig;
use brickpi3::runtime::{SensorEvent, watch_sensor};
use brickpi3::{Brick, MotorPort, SensorPort, SensorType};
use clap::{Parser, Subcommand};
use linux_embedded_hal::SpidevDevice;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Sensors report CONFIGURING for a short while after their type is set
const SENSOR_SETTLE: Duration = Duration::from_millis(200);

// Keeps the watch period at 1 ms or more
const MAX_POLL_HZ: u64 = 1000;

#[derive(Parser)]
#[command(name = "brickpi3", about = "Talk to a BrickPi3 over SPI")]
struct Cli {
    /// JSON connection config
    #[arg(long)]
    config: Option<PathBuf>,

    /// SPI device, overrides the config
    #[arg(long)]
    device: Option<String>,

    /// Board address, overrides the config
    #[arg(long)]
    address: Option<u8>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Board identity
    Info,
    /// Rail voltages
    Voltage,
    /// Flags, power, encoder and speed of one motor
    MotorStatus { port: MotorPort },
    /// Encoder position of one motor
    Encoder { port: MotorPort },
    /// Set motor power in percent (-128 floats)
    Power {
        #[arg(long, value_delimiter = ',', required = true)]
        ports: Vec<MotorPort>,
        #[arg(allow_negative_numbers = true)]
        power: i32,
    },
    /// Configure a sensor port and read it once
    Sensor {
        port: SensorPort,
        #[arg(value_enum)]
        sensor_type: SensorType,
    },
    /// Configure a sensor port and print every change
    Watch {
        port: SensorPort,
        #[arg(value_enum)]
        sensor_type: SensorType,
        /// Poll rate, overrides the config
        #[arg(long)]
        hz: Option<u64>,
    },
    /// LED brightness in percent, 255 for firmware control
    Led { percent: u8 },
    /// Unconfigure sensors, float motors, restore defaults
    Reset,
}

fn print<T: Serialize + Debug>(json: bool, value: &T) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{:#?}", value);
    }
    Ok(())
}

fn open(config: &BrickConfig) -> Result<Brick<SpidevDevice>, Box<dyn Error>> {
    let mut spi = SpidevDevice::open(&config.device)
        .map_err(|e| format!("opening {}: {:?}", config.device, e))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(config.clock_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)?;
    info!("Opened {} at {} Hz", config.device, config.clock_hz);
    Ok(Brick::new(spi, config.address))
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => BrickConfig::load(path)?,
        None => BrickConfig::default(),
    };
    if let Some(device) = cli.device {
        config.device = device;
    }
    if let Some(address) = cli.address {
        config.address = address;
    }

    let mut brick = open(&config)?;

    match cli.command {
        Command::Info => print(cli.json, &brick.board_info()?)?,
        Command::Voltage => print(cli.json, &brick.voltages()?)?,
        Command::MotorStatus { port } => print(cli.json, &brick.motor_status(port)?)?,
        Command::Encoder { port } => print(cli.json, &brick.motor_encoder(port)?)?,
        Command::Power { ports, power } => brick.set_motor_power(&ports, power)?,
        Command::Sensor { port, sensor_type } => {
            brick.set_sensor_type(&[port], sensor_type)?;
            tokio::time::sleep(SENSOR_SETTLE).await;
            print(cli.json, &brick.read_sensor(port)?)?;
        }
        Command::Watch {
            port,
            sensor_type,
            hz,
        } => {
            brick.set_sensor_type(&[port], sensor_type)?;
            let hz = hz.unwrap_or(config.poll_hz).clamp(1, MAX_POLL_HZ);
            let json = cli.json;
            watch_sensor(&mut brick, port, Duration::from_millis(1000 / hz), |event| {
                match event {
                    SensorEvent::Changed(value) => {
                        if let Err(e) = print(json, &value) {
                            eprintln!("{}", e);
                            return ControlFlow::Break(());
                        }
                    }
                    SensorEvent::Unavailable(e) => eprintln!("{}: {}", port, e),
                }
                ControlFlow::Continue(())
            })
            .await?;
        }
        Command::Led { percent } => brick.set_led(percent)?,
        Command::Reset => brick.reset_all()?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
