//! Transport layer for I/O abstraction

use crate::error::Result;

mod mock;
mod serial;

pub use mock::MockTransport;
pub use serial::{list_ports, PortInfo, SerialTransport};

/// Transport trait for reading the sensor byte stream
pub trait Transport: Send {
    /// Read data into buffer, returns number of bytes read
    ///
    /// A read timeout is not an error: implementations return `Ok(0)`.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Human-readable name of the underlying port
    fn name(&self) -> &str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        (**self).read(buffer)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
