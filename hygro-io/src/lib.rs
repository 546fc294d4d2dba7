//! HygroIO - Serial humidity sensor reader
//!
//! This library turns the ASCII stream of a serial humidity sensor into
//! decoded readings.
//!
//! ## Layers
//!
//! - [`protocol`]: pure stream parser (`feed(bytes)` -> readings + problems)
//! - [`transport`]: serial port and scripted mock behind one trait
//! - [`session`]: reader thread that polls a transport and emits events
//! - [`config`] / [`settings`]: TOML configuration and the last used port

pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use protocol::{DecodeProblem, DrainPolicy, FeedOutput, ParserConfig, SensorStreamParser};
pub use session::{ConnectionStatus, SensorSession, SessionConfig, SessionEvent};
pub use types::{Reading, RecordTag};
