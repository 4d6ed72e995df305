use crate::cli::args::OutputFormat;
use crate::core::console::{Notice, Severity};
use crate::domain::config::SerialComConfig;
use crate::infrastructure::serial::PortListing;
use serde_json;
use std::io;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_ports(&self, ports: &[PortListing]) -> Result<(), OutputError>;
    fn write_config(&self, config: &SerialComConfig) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    /// Progress and notices; kept off stdout so received data stays clean
    fn write_notice(&self, notice: &Notice) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::SerialComError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_ports(&self, ports: &[PortListing]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                if ports.is_empty() {
                    println!("No serial ports found");
                }
                for port in ports {
                    println!("Port: {}", port.port_name);
                    println!("  Location: {}", port.system_location);
                    println!("  Description: {}", port.description);
                    println!("  Manufacturer: {}", port.manufacturer);
                    println!("  Serial number: {}", port.serial_number);
                    println!("  Vendor ID: {}", port.vendor_id);
                    println!("  Product ID: {}", port.product_id);
                    println!();
                }
            }
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(ports)?;
                println!("{}", output);
            }
            OutputFormat::Table => {
                if !ports.is_empty() {
                    let table_data: Vec<PortTableRow> = ports.iter().map(PortTableRow::from).collect();
                    let table = Table::new(table_data);
                    println!("{}", table);
                }
            }
            OutputFormat::Csv => {
                print!("{}", ports_csv(ports));
            }
        }
        Ok(())
    }

    fn write_config(&self, config: &SerialComConfig) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                println!("SerialCom Configuration:");
                for (key, value) in config_entries(config) {
                    println!("  {}: {}", key, value);
                }
            }
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(config)?;
                println!("{}", output);
            }
            OutputFormat::Table => {
                let table_data: Vec<ConfigTableRow> = config_entries(config)
                    .into_iter()
                    .map(|(key, value)| ConfigTableRow { key, value })
                    .collect();
                println!("{}", Table::new(table_data));
            }
            OutputFormat::Csv => {
                println!("key,value");
                for (key, value) in config_entries(config) {
                    println!("{},{}", key, csv_field(&value));
                }
            }
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "message": message,
                    "level": "info"
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                println!("{}", message);
            }
        }
        Ok(())
    }

    fn write_notice(&self, notice: &Notice) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "title": notice.title,
                    "message": notice.message,
                    "level": severity_label(notice.severity),
                });
                eprintln!("{}", serde_json::to_string(&output)?);
            }
            _ => {
                eprintln!("{}", notice);
            }
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": error,
                    "level": "error"
                });
                eprintln!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                eprintln!("Error: {}", error);
            }
        }
        Ok(())
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Critical => "critical",
    }
}

fn config_entries(config: &SerialComConfig) -> Vec<(String, String)> {
    let optional = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    vec![
        ("global.log_level".to_string(), config.global.log_level.clone()),
        (
            "global.log_file".to_string(),
            optional(config.global.log_file.as_ref().map(|p| p.display().to_string())),
        ),
        ("port.name".to_string(), optional(config.port.name.clone())),
        ("port.baud_rate".to_string(), config.port.baud_rate.to_string()),
        ("port.data_bits".to_string(), u8::from(config.port.data_bits).to_string()),
        ("port.parity".to_string(), config.port.parity.to_string()),
        ("port.stop_bits".to_string(), u8::from(config.port.stop_bits).to_string()),
        ("port.flow_control".to_string(), config.port.flow_control.to_string()),
        ("display.hex_display".to_string(), config.display.hex_display.to_string()),
        ("display.append_cr".to_string(), config.display.append_cr.to_string()),
        ("display.append_lf".to_string(), config.display.append_lf.to_string()),
        (
            "display.receive_file".to_string(),
            optional(config.display.receive_file.as_ref().map(|p| p.display().to_string())),
        ),
    ]
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn ports_csv(ports: &[PortListing]) -> String {
    let mut csv = "port_name,system_location,description,manufacturer,serial_number,vendor_id,product_id\n".to_string();
    for port in ports {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_field(&port.port_name),
            csv_field(&port.system_location),
            csv_field(&port.description),
            csv_field(&port.manufacturer),
            csv_field(&port.serial_number),
            port.vendor_id,
            port.product_id
        ));
    }
    csv
}

/// Table row for the port scan
#[derive(Tabled)]
struct PortTableRow {
    port: String,
    location: String,
    description: String,
    manufacturer: String,
    serial: String,
    vid: String,
    pid: String,
}

impl From<&PortListing> for PortTableRow {
    fn from(port: &PortListing) -> Self {
        Self {
            port: port.port_name.clone(),
            location: port.system_location.clone(),
            description: port.description.clone(),
            manufacturer: port.manufacturer.clone(),
            serial: port.serial_number.clone(),
            vid: port.vendor_id.clone(),
            pid: port.product_id.clone(),
        }
    }
}

#[derive(Tabled)]
struct ConfigTableRow {
    key: String,
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::serial::ports::BLANK;

    fn listing(name: &str, description: &str) -> PortListing {
        PortListing {
            port_name: name.to_string(),
            description: description.to_string(),
            manufacturer: BLANK.to_string(),
            serial_number: BLANK.to_string(),
            system_location: format!("/dev/{}", name),
            vendor_id: "1a86".to_string(),
            product_id: "7523".to_string(),
        }
    }

    #[test]
    fn test_ports_csv_quotes_commas() {
        let csv = ports_csv(&[listing("ttyUSB0", "USB, Serial")]);
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("port_name,"));
        assert_eq!(
            lines.next().unwrap(),
            "ttyUSB0,/dev/ttyUSB0,\"USB, Serial\",N/A,N/A,1a86,7523"
        );
    }

    #[test]
    fn test_config_entries_cover_every_section() {
        let entries = config_entries(&SerialComConfig::default());
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"global.log_level"));
        assert!(keys.contains(&"port.baud_rate"));
        assert!(keys.contains(&"display.receive_file"));

        let baud = entries.iter().find(|(k, _)| k == "port.baud_rate").unwrap();
        assert_eq!(baud.1, "460800");
    }

    #[test]
    fn test_table_row_from_listing() {
        let row = PortTableRow::from(&listing("ttyACM0", BLANK));
        assert_eq!(row.port, "ttyACM0");
        assert_eq!(row.description, "N/A");
        assert_eq!(row.location, "/dev/ttyACM0");
    }
}
