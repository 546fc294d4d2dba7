//! Serial port raw stream dumper
//!
//! Opens the sensor port and prints every chunk as received, with control
//! characters escaped, followed by what the parser made of it.
//!
//! Usage: cargo run --example serial_dump -- <PORT> [SECONDS]

use hygro_io::transport::{SerialTransport, Transport};
use hygro_io::SensorStreamParser;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let port = args
        .next()
        .ok_or("usage: serial_dump <PORT> [SECONDS]")?;
    let seconds: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(10);

    log::info!("Opening {} at 4800 baud...", port);
    let mut transport = SerialTransport::open(&port, 4800, Duration::from_millis(100))?;
    let mut parser = SensorStreamParser::default();

    log::info!("Capturing for {} seconds", seconds);

    let start = Instant::now();
    let duration = Duration::from_secs(seconds);
    let mut buffer = vec![0u8; 256];
    let mut total_bytes = 0;
    let mut blocks = 0;

    while start.elapsed() < duration {
        let bytes_read = transport.read(&mut buffer)?;
        if bytes_read == 0 {
            continue;
        }
        total_bytes += bytes_read;

        let chunk = &buffer[..bytes_read];
        blocks += chunk.iter().filter(|&&b| b == b'$').count();
        println!(
            "[{:06}] {} bytes: {}",
            total_bytes,
            bytes_read,
            chunk.escape_ascii()
        );

        let output = parser.feed(chunk);
        for reading in &output.readings {
            println!("  --> {} {}", reading.tag, reading);
        }
        for problem in &output.problems {
            println!("  --> {}", problem);
        }
        for record in &output.ignored {
            println!("  --> ignored {:?}", record);
        }
    }

    log::info!(
        "Captured {} bytes, {} blocks, {} bytes still buffered",
        total_bytes,
        blocks,
        parser.buffered_len()
    );
    Ok(())
}
