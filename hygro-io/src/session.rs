//! Sensor connection session
//!
//! One session owns one transport and one [`SensorStreamParser`]. A reader
//! thread polls the transport, feeds the parser and forwards everything it
//! produces over an `mpsc` channel. The parser never leaves the
//! reader thread.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::protocol::{DecodeProblem, FeedOutput, ParserConfig, SensorStreamParser};
use crate::transport::Transport;
use crate::types::Reading;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Bytes requested from the transport per poll
const READ_CHUNK_SIZE: usize = 256;

/// Pause after a failed read before polling again
const ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// Connection state reported to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => f.write_str("Connected"),
            ConnectionStatus::Disconnected => f.write_str("Disconnected"),
        }
    }
}

/// Everything the reader thread reports
///
/// Events from successive reads arrive in read order. Within one read,
/// problems come first, then ignored records, then readings; readings keep
/// their record order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Status(ConnectionStatus),
    Reading(Reading),
    /// Malformed record or buffer overflow
    Problem(DecodeProblem),
    /// Record with an unrecognized tag
    Ignored(String),
    /// Read failure from the transport; the reader keeps polling
    TransportError(String),
}

/// Reader settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub parser: ParserConfig,
    /// Delay between transport reads
    pub poll_interval: Duration,
}

impl SessionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            parser: config.parser.to_parser_config(),
            poll_interval: config.serial.poll_interval(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Counters updated by the reader thread
#[derive(Debug, Default)]
struct SessionCounters {
    reads: AtomicU64,
    bytes: AtomicU64,
    readings: AtomicU64,
    problems: AtomicU64,
    transport_errors: AtomicU64,
}

/// Point-in-time copy of the session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Reads that returned at least one byte
    pub reads: u64,
    pub bytes: u64,
    pub readings: u64,
    /// Malformed records and overflows
    pub problems: u64,
    pub transport_errors: u64,
}

/// An open connection to the humidity sensor
pub struct SensorSession {
    port_name: String,
    shutdown: Arc<AtomicBool>,
    reader_handle: Option<JoinHandle<()>>,
    counters: Arc<SessionCounters>,
}

impl SensorSession {
    /// Start reading from `transport`
    ///
    /// Returns the session handle and the receiving end of its event
    /// channel. The first event is always `Status(Connected)` and the last
    /// one `Status(Disconnected)`.
    pub fn connect<T>(
        transport: T,
        config: SessionConfig,
    ) -> Result<(Self, Receiver<SessionEvent>)>
    where
        T: Transport + 'static,
    {
        let port_name = transport.name().to_string();
        let shutdown = Arc::new(AtomicBool::new(false));
        let counters = Arc::new(SessionCounters::default());
        let (events, receiver) = mpsc::channel();

        let reader = Reader {
            transport,
            parser: SensorStreamParser::new(config.parser),
            shutdown: Arc::clone(&shutdown),
            events,
            counters: Arc::clone(&counters),
            poll_interval: config.poll_interval,
        };

        let reader_handle = thread::Builder::new()
            .name("hygro-reader".to_string())
            .spawn(move || reader.run())
            .map_err(|e| Error::Other(format!("Failed to spawn reader thread: {}", e)))?;

        log::info!(
            "Sensor session started on {} ({:?} drain, poll every {:?})",
            port_name,
            config.parser.drain_policy,
            config.poll_interval
        );

        Ok((
            Self {
                port_name,
                shutdown,
                reader_handle: Some(reader_handle),
                counters,
            },
            receiver,
        ))
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// True until the reader thread has exited
    pub fn is_running(&self) -> bool {
        self.reader_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn stats(&self) -> SessionStats {
        let c = &self.counters;
        SessionStats {
            reads: c.reads.load(Ordering::Relaxed),
            bytes: c.bytes.load(Ordering::Relaxed),
            readings: c.readings.load(Ordering::Relaxed),
            problems: c.problems.load(Ordering::Relaxed),
            transport_errors: c.transport_errors.load(Ordering::Relaxed),
        }
    }

    /// Stop the reader thread and drop the parser state
    ///
    /// Safe to call more than once.
    pub fn disconnect(&mut self) -> Result<()> {
        let Some(handle) = self.reader_handle.take() else {
            return Ok(());
        };

        log::info!("Disconnecting from {}...", self.port_name);
        self.shutdown.store(true, Ordering::Relaxed);
        handle.join().map_err(|_| Error::ThreadPanic)?;

        let stats = self.stats();
        log::info!(
            "Disconnected from {} ({} readings, {} problems, {} transport errors)",
            self.port_name,
            stats.readings,
            stats.problems,
            stats.transport_errors
        );
        Ok(())
    }
}

impl Drop for SensorSession {
    fn drop(&mut self) {
        let _ = self.disconnect();
    }
}

/// State moved into the reader thread
struct Reader<T> {
    transport: T,
    parser: SensorStreamParser,
    shutdown: Arc<AtomicBool>,
    events: Sender<SessionEvent>,
    counters: Arc<SessionCounters>,
    poll_interval: Duration,
}

impl<T: Transport> Reader<T> {
    fn run(mut self) {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let _ = self
            .events
            .send(SessionEvent::Status(ConnectionStatus::Connected));

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.transport.read(&mut buf) {
                Ok(0) => {}
                Ok(n) => {
                    self.counters.reads.fetch_add(1, Ordering::Relaxed);
                    self.counters.bytes.fetch_add(n as u64, Ordering::Relaxed);

                    let output = self.parser.feed(&buf[..n]);
                    if self.forward(output).is_err() {
                        log::info!("Event receiver dropped, stopping reader");
                        break;
                    }
                }
                Err(e) => {
                    self.counters
                        .transport_errors
                        .fetch_add(1, Ordering::Relaxed);
                    log::error!("Read error on {}: {}", self.transport.name(), e);

                    let event = SessionEvent::TransportError(format!("read error: {}", e));
                    if self.events.send(event).is_err() {
                        break;
                    }
                    thread::sleep(ERROR_BACKOFF);
                }
            }

            thread::sleep(self.poll_interval);
        }

        let _ = self
            .events
            .send(SessionEvent::Status(ConnectionStatus::Disconnected));
        log::info!("Sensor reader thread exiting");
    }

    /// Send one feed's results: problems, ignored records, then readings
    fn forward(&self, output: FeedOutput) -> std::result::Result<(), SendError<SessionEvent>> {
        for problem in output.problems {
            self.counters.problems.fetch_add(1, Ordering::Relaxed);
            self.events.send(SessionEvent::Problem(problem))?;
        }
        for record in output.ignored {
            self.events.send(SessionEvent::Ignored(record))?;
        }
        for reading in output.readings {
            let count = self.counters.readings.fetch_add(1, Ordering::Relaxed) + 1;
            if count % 100 == 0 {
                log::debug!(
                    "Sensor: {} readings, {} problems, {} bytes",
                    count,
                    self.counters.problems.load(Ordering::Relaxed),
                    self.counters.bytes.load(Ordering::Relaxed)
                );
            }
            self.events.send(SessionEvent::Reading(reading))?;
        }
        Ok(())
    }
}
