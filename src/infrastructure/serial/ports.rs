use crate::domain::error::{SerialComError, SerialComResult};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};
use std::path::Path;

/// Placeholder for fields the OS does not report
pub const BLANK: &str = "N/A";

/// One row of the port scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortListing {
    pub port_name: String,
    pub description: String,
    pub manufacturer: String,
    pub serial_number: String,
    /// Path used to open the port
    pub system_location: String,
    pub vendor_id: String,
    pub product_id: String,
}

impl PortListing {
    pub fn from_info(info: &SerialPortInfo) -> Self {
        let system_location = info.port_name.clone();
        let port_name = Path::new(&system_location)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| system_location.clone());

        let mut listing = Self {
            port_name,
            description: BLANK.to_string(),
            manufacturer: BLANK.to_string(),
            serial_number: BLANK.to_string(),
            system_location,
            vendor_id: BLANK.to_string(),
            product_id: BLANK.to_string(),
        };

        if let SerialPortType::UsbPort(usb) = &info.port_type {
            listing.description = or_blank(usb.product.as_deref());
            listing.manufacturer = or_blank(usb.manufacturer.as_deref());
            listing.serial_number = or_blank(usb.serial_number.as_deref());
            listing.vendor_id = hex_id_or_blank(usb.vid);
            listing.product_id = hex_id_or_blank(usb.pid);
        }

        listing
    }
}

fn or_blank(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => BLANK.to_string(),
    }
}

fn hex_id_or_blank(id: u16) -> String {
    if id == 0 {
        BLANK.to_string()
    } else {
        format!("{:x}", id)
    }
}

/// Enumerate the serial ports the OS knows about
pub fn scan_ports() -> SerialComResult<Vec<PortListing>> {
    let ports = serialport::available_ports().map_err(|e| SerialComError::Configuration(format!(
        "Failed to list serial ports: {}",
        e
    )))?;
    Ok(ports.iter().map(PortListing::from_info).collect())
}
