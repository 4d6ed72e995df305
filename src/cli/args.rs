use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::core::communication::PayloadFormat;
use crate::domain::config::{
    BaudRateSelector, DataBits, FlowControl, Parity, PortSelection, StopBits,
};
use crate::domain::error::{SerialComError, SerialComResult};

/// Command line arguments for SerialCom
#[derive(Parser, Debug)]
#[command(
    name = "serialcom",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive serial port terminal",
    long_about = "An interactive serial port terminal: scan ports, open a port, send text, and view received data as text or hex on screen or in a log file."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress diagnostic logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Command to execute (defaults to the terminal UI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available serial ports
    Ports,
    /// Print received data until Ctrl+C
    Monitor(MonitorArgs),
    /// Send one message and optionally print the reply
    Send(SendArgs),
    /// Interactive terminal UI
    Tui,
    /// Configuration management commands
    Config(ConfigArgs),
    /// Display version information
    Version,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
    /// CSV output
    Csv,
}

/// Port settings shared by the session commands.
///
/// Anything left out falls back to the `[port]` section of the configuration.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct PortArgs {
    /// Serial port path
    #[arg(short, long)]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Data bits (5-8)
    #[arg(long)]
    pub data_bits: Option<u8>,

    /// Stop bits (1 or 2)
    #[arg(long)]
    pub stop_bits: Option<u8>,

    /// Parity
    #[arg(long, value_enum)]
    pub parity: Option<ParityArg>,

    /// Flow control
    #[arg(long, value_enum)]
    pub flow_control: Option<FlowControlArg>,
}

impl PortArgs {
    /// Override `selection` with whatever was given on the command line
    pub fn apply_to(&self, selection: &mut PortSelection) -> SerialComResult<()> {
        if let Some(port) = &self.port {
            selection.port_name = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            selection.baud = BaudRateSelector::with_rate(baud);
        }
        if let Some(bits) = self.data_bits {
            selection.data_bits = DataBits::try_from(bits).map_err(SerialComError::InvalidInput)?;
        }
        if let Some(bits) = self.stop_bits {
            selection.stop_bits = StopBits::try_from(bits).map_err(SerialComError::InvalidInput)?;
        }
        if let Some(parity) = self.parity {
            selection.parity = parity.into();
        }
        if let Some(flow_control) = self.flow_control {
            selection.flow_control = flow_control.into();
        }
        Ok(())
    }
}

/// Monitor arguments
#[derive(ClapArgs, Debug)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub port: PortArgs,

    /// Show received bytes as hex pairs
    #[arg(long)]
    pub hex: bool,

    /// Write received data to this file instead of stdout
    #[arg(short, long)]
    pub file: Option<String>,
}

/// Send arguments
#[derive(ClapArgs, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub port: PortArgs,

    /// Data to send
    pub data: String,

    /// Data format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: DataFormat,

    /// Append a carriage return
    #[arg(long)]
    pub cr: bool,

    /// Append a line feed
    #[arg(long)]
    pub lf: bool,

    /// Print whatever arrives within this many milliseconds after sending
    #[arg(short, long, default_value = "0")]
    pub wait: u64,

    /// Show the reply as hex pairs
    #[arg(long)]
    pub hex: bool,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Show which configuration file is in use
    Path,
    /// Create default configuration
    Init {
        /// Directory for the project configuration
        #[arg(short, long)]
        dir: Option<String>,
        /// Write the global configuration instead
        #[arg(short, long)]
        global: bool,
    },
}

/// Parity configuration argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ParityArg {
    None,
    Even,
    Odd,
}

/// Flow control configuration argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FlowControlArg {
    None,
    Software,
    Hardware,
}

/// Data format argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DataFormat {
    Text,
    Hex,
    Base64,
}

impl From<ParityArg> for Parity {
    fn from(parity: ParityArg) -> Self {
        match parity {
            ParityArg::None => Self::None,
            ParityArg::Even => Self::Even,
            ParityArg::Odd => Self::Odd,
        }
    }
}

impl From<FlowControlArg> for FlowControl {
    fn from(flow_control: FlowControlArg) -> Self {
        match flow_control {
            FlowControlArg::None => Self::None,
            FlowControlArg::Software => Self::Software,
            FlowControlArg::Hardware => Self::Hardware,
        }
    }
}

impl From<DataFormat> for PayloadFormat {
    fn from(format: DataFormat) -> Self {
        match format {
            DataFormat::Text => Self::Text,
            DataFormat::Hex => Self::Hex,
            DataFormat::Base64 => Self::Base64,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
