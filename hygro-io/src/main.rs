//! HygroIO - humidity sensor reader
//!
//! Connects to the sensor's serial port, prints every humidity reading as it
//! arrives, and disconnects cleanly on Ctrl-C.
//!
//! ## Usage
//!
//! ```bash
//! hygro-io --list-ports
//! hygro-io --port /dev/ttyUSB0
//! hygro-io --config hygro-io.toml
//! ```
//!
//! The port is taken from `--port`, then from `[serial] port` in the config,
//! then from the last port used. The chosen port is remembered for next time.

use hygro_io::config::Config;
use hygro_io::error::{Error, Result};
use hygro_io::session::{SensorSession, SessionConfig, SessionEvent};
use hygro_io::settings::LastPortStore;
use hygro_io::transport::{list_ports, SerialTransport};
use std::env;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "hygro-io.toml";
const EVENT_WAIT: Duration = Duration::from_millis(200);

/// Parsed command line
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config_path: Option<String>,
    port: Option<String>,
    list_ports: bool,
    help: bool,
}

/// Parse command line arguments.
///
/// Supports:
/// - `--config <path>` / `-c <path>`
/// - `--port <port>` / `-p <port>`
/// - `--list-ports`
/// - `--help` / `-h`
fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                parsed.config_path = Some(args.next().ok_or_else(|| {
                    Error::InvalidArgument(format!("{} requires a path", arg))
                })?);
            }
            "--port" | "-p" => {
                parsed.port = Some(args.next().ok_or_else(|| {
                    Error::InvalidArgument(format!("{} requires a port", arg))
                })?);
            }
            "--list-ports" => parsed.list_ports = true,
            "--help" | "-h" => parsed.help = true,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "Unknown argument: {}",
                    other
                )))
            }
        }
    }

    Ok(parsed)
}

/// Load the config file; a missing default file falls back to defaults
fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH),
        None => Ok(Config::default()),
    }
}

/// Pick the port: command line, then config, then last used
fn resolve_port(
    cli_port: Option<&str>,
    config: &Config,
    last_port: Option<String>,
) -> Result<String> {
    cli_port
        .map(str::to_string)
        .or_else(|| config.serial.port.clone())
        .or(last_port)
        .filter(|port| !port.trim().is_empty())
        .ok_or(Error::NoPortSelected)
}

fn print_usage() {
    println!("Usage: hygro-io [--config <path>] [--port <port>] [--list-ports]");
    println!();
    println!("  -c, --config <path>  TOML configuration (default: {})", DEFAULT_CONFIG_PATH);
    println!("  -p, --port <port>    Serial port of the humidity sensor");
    println!("      --list-ports     List available serial ports and exit");
    println!("  -h, --help           Show this help");
}

fn print_ports() -> Result<()> {
    let ports = list_ports()?;
    println!("Available serial ports:");
    if ports.is_empty() {
        println!("  (none)");
    }
    for port in ports {
        println!("  {}", port);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let config = load_config(args.config_path.as_deref())?;

    // Initialize logger
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("HygroIO v{} starting...", env!("CARGO_PKG_VERSION"));

    if args.list_ports {
        return print_ports();
    }

    let store = LastPortStore::new(&config.settings.state_file);
    let last_port = store.load().unwrap_or_else(|e| {
        log::warn!("Ignoring saved settings in {}: {}", store.path().display(), e);
        None
    });

    let port = match resolve_port(args.port.as_deref(), &config, last_port) {
        Ok(port) => port,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Use --list-ports to see available ports, then --port <PORT>");
            return Err(e);
        }
    };

    if let Err(e) = store.save(&port) {
        log::warn!("Failed to remember port {}: {}", port, e);
    }

    println!("Status: Connecting...");
    let transport =
        match SerialTransport::open(&port, config.serial.baud_rate, config.serial.read_timeout()) {
            Ok(transport) => transport,
            Err(e) => {
                eprintln!("error: port connect error: {}", e);
                return Err(e);
            }
        };

    let (mut session, events) =
        SensorSession::connect(transport, SessionConfig::from_config(&config))?;

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    while running.load(Ordering::Relaxed) {
        match events.recv_timeout(EVENT_WAIT) {
            Ok(event) => display(&event),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    session.disconnect()?;
    for event in events.try_iter() {
        display(&event);
    }

    Ok(())
}

/// Render one session event for the terminal
fn display(event: &SessionEvent) {
    match event {
        SessionEvent::Reading(reading) => {
            if !reading.is_physical() {
                log::warn!("Out-of-range reading from {} record: {}", reading.tag, reading);
            }
            println!("Humidity: {}", reading);
        }
        SessionEvent::Status(status) => println!("Status: {}", status),
        SessionEvent::TransportError(message) => eprintln!("error: {}", message),
        SessionEvent::Problem(problem) => log::warn!("{}", problem),
        SessionEvent::Ignored(record) => log::debug!("Ignored record {:?}", record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["-c", "custom.toml", "--port", "COM3"]).unwrap();
        assert_eq!(parsed.config_path.as_deref(), Some("custom.toml"));
        assert_eq!(parsed.port.as_deref(), Some("COM3"));
        assert!(!parsed.list_ports);

        assert!(args(&["--list-ports"]).unwrap().list_ports);
        assert!(args(&["-h"]).unwrap().help);
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(args(&["--port"]), Err(Error::InvalidArgument(_))));
        assert!(matches!(args(&["--baud"]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_resolve_port_precedence() {
        let mut config = Config::default();
        config.serial.port = Some("/dev/ttyS0".to_string());
        let last = || Some("/dev/ttyUSB9".to_string());

        assert_eq!(resolve_port(Some("COM3"), &config, last()).unwrap(), "COM3");
        assert_eq!(resolve_port(None, &config, last()).unwrap(), "/dev/ttyS0");

        config.serial.port = None;
        assert_eq!(resolve_port(None, &config, last()).unwrap(), "/dev/ttyUSB9");
        assert!(matches!(
            resolve_port(None, &config, None),
            Err(Error::NoPortSelected)
        ));
        assert!(matches!(
            resolve_port(Some(" "), &config, None),
            Err(Error::NoPortSelected)
        ));
    }

    #[test]
    fn test_load_explicit_missing_config_fails() {
        assert!(load_config(Some("/nonexistent/hygro-io.toml")).is_err());
    }
}
