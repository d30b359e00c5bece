//! rc-chassis host simulator.
//!
//! Runs the controller against stdin/stdout with simulated PWM outputs, so
//! the serial protocol can be exercised without a vehicle.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                    │
//! │                                                             │
//! │  ConsoleTransport   ServoPwm<Simulated>   FixedRangefinders │
//! │  (LineTransport)    (PwmSink)             (DistancePort)    │
//! │  MonotonicClock     LogEventSink          JsonConfigFile    │
//! │  (Clock)            (EventSink)           (ConfigPort)      │
//! │                                                             │
//! │  ─────────────── Port Trait Boundary ───────────────────    │
//! │                                                             │
//! │  ┌───────────────────────────────────────────────────┐      │
//! │  │           Controller (pure logic)                 │      │
//! │  │  parse · dispatch · neutral safety · self-test    │      │
//! │  └───────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr; stdout carries only the link traffic.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use rc_chassis::adapters::config_file::JsonConfigFile;
use rc_chassis::adapters::console::{spawn_stdin_reader, ConsoleTransport};
use rc_chassis::adapters::hardware::simulated_servos;
use rc_chassis::adapters::log_sink::LogEventSink;
use rc_chassis::adapters::rangefinder::{parse_reading, FixedRangefinders};
use rc_chassis::adapters::time::MonotonicClock;
use rc_chassis::app::ports::{ConfigPort, DistanceReading, LineTransport};
use rc_chassis::app::service::{Controller, LoopExit};
use rc_chassis::config::ControllerConfig;
use rc_chassis::pins;

/// Sleep between loop passes when the link is quiet.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

const BANNER: &str = "Commands must end with character: '\\n'";

#[derive(Parser)]
#[clap(version, about = "RC chassis controller, host simulator")]
struct Opts {
    /// JSON config file; defaults are used for missing fields
    #[clap(long)]
    config: Option<PathBuf>,
    /// Override the self-test hold per step, in milliseconds
    #[clap(long)]
    hold_ms: Option<u32>,
    /// Do not echo received lines
    #[clap(long)]
    no_echo: bool,
    /// Simulated rangefinder reading, `<name>=<cm>`; repeatable
    #[clap(long = "range", value_parser = parse_reading)]
    ranges: Vec<DistanceReading>,
    /// Exit on `reset` instead of restarting the loop
    #[clap(long)]
    exit_on_reset: bool,
    /// More log output (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn load_config(opts: &Opts) -> Result<ControllerConfig> {
    let mut config = match &opts.config {
        Some(path) => JsonConfigFile::new(path)
            .load()
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ControllerConfig::default(),
    };
    if let Some(ms) = opts.hold_ms {
        config.selftest_hold_ms = ms;
    }
    if opts.no_echo {
        config.echo_input = false;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    TermLogger::init(
        log_level(opts.verbose),
        ConfigBuilder::new().build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("installing logger")?;

    info!("rc-chassis v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "motor GPIO{} / steering GPIO{} @ {} Hz",
        pins::MOTOR_PWM_GPIO,
        pins::STEERING_PWM_GPIO,
        pins::SERVO_PWM_FREQ_HZ
    );

    let config = load_config(&opts)?;
    info!(
        "motor {}-{}us, steering {}-{}us, self-test hold {} ms",
        config.motor_limits.min_us,
        config.motor_limits.max_us,
        config.steering_limits.min_us,
        config.steering_limits.max_us,
        config.selftest_hold_ms
    );

    let mut sensors = FixedRangefinders::default();
    for reading in opts.ranges {
        sensors
            .push(reading)
            .map_err(|r| anyhow::anyhow!("too many rangefinders at '{}'", r.name))?;
    }

    let _reader = spawn_stdin_reader().context("spawning stdin reader")?;
    let mut link = ConsoleTransport::new();
    let clock = MonotonicClock::new();
    let mut events = LogEventSink::new();
    let mut servos = simulated_servos();

    loop {
        link.write_line(BANNER);
        let mut controller = Controller::new(servos, &config).context("building controller")?;
        controller.start(&mut events);
        let exit = controller.run(&mut link, &mut sensors, &clock, &mut events, || {
            thread::sleep(POLL_INTERVAL);
        });
        servos = controller.into_sink();

        match exit {
            LoopExit::ResetRequested if !opts.exit_on_reset => {
                info!("soft restart");
            }
            LoopExit::ResetRequested => {
                info!("reset, exiting");
                break;
            }
            LoopExit::TransportClosed => break,
        }
    }

    Ok(())
}
