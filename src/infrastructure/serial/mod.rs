// Serial module - serialport-backed transport and port enumeration
pub mod client;
pub mod ports;

pub use client::{SerialConnector, SerialTransport};
pub use ports::{scan_ports, PortListing};
