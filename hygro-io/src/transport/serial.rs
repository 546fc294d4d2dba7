//! Serial transport implementation

use super::Transport;
use crate::error::Result;
use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use std::io::{ErrorKind, Read};
use std::time::Duration;

/// Serial transport for the humidity sensor UART
pub struct SerialTransport {
    path: String,
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial port
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyUSB0", "COM3")
    /// * `baud_rate` - Baud rate (the sensor uses 4800)
    /// * `timeout` - Read timeout; an expired read returns 0 bytes
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()?;

        log::info!("Opened serial port: {} at {} baud", path, baud_rate);

        Ok(SerialTransport {
            path: path.to_string(),
            port,
        })
    }
}

impl Transport for SerialTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        &self.path
    }
}

/// A serial port found on the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Device path passed to [`SerialTransport::open`]
    pub name: String,
    /// Short description (USB product, or port type)
    pub description: String,
}

impl std::fmt::Display for PortInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// Enumerate the serial ports available on this machine
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()?;
    Ok(ports
        .into_iter()
        .map(|port| PortInfo {
            description: describe(&port.port_type),
            name: port.port_name,
        })
        .collect())
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(info) => match (&info.manufacturer, &info.product) {
            (_, Some(product)) => product.clone(),
            (Some(manufacturer), None) => format!("{} USB serial", manufacturer),
            (None, None) => format!("USB {:04x}:{:04x}", info.vid, info.pid),
        },
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    fn usb(manufacturer: Option<&str>, product: Option<&str>) -> SerialPortType {
        SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x0403,
            pid: 0x6001,
            serial_number: None,
            manufacturer: manufacturer.map(str::to_string),
            product: product.map(str::to_string),
        })
    }

    #[test]
    fn test_describe_usb() {
        assert_eq!(describe(&usb(Some("FTDI"), Some("FT232R"))), "FT232R");
        assert_eq!(describe(&usb(Some("FTDI"), None)), "FTDI USB serial");
        assert_eq!(describe(&usb(None, None)), "USB 0403:6001");
    }

    #[test]
    fn test_describe_other() {
        assert_eq!(describe(&SerialPortType::PciPort), "PCI");
        assert_eq!(describe(&SerialPortType::Unknown), "Unknown");
    }

    #[test]
    fn test_port_info_display() {
        let info = PortInfo {
            name: "/dev/ttyUSB0".to_string(),
            description: "FT232R".to_string(),
        };
        assert_eq!(info.to_string(), "/dev/ttyUSB0 - FT232R");
    }

    #[test]
    fn test_open_missing_port_fails() {
        let result = SerialTransport::open(
            "/dev/hygro-io-does-not-exist",
            4800,
            Duration::from_millis(10),
        );
        assert!(result.is_err());
    }
}
