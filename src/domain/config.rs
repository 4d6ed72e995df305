use crate::domain::error::{SerialComError, SerialComResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// SerialCom configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerialComConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Default port settings
    #[serde(default)]
    pub port: PortDefaults,
    /// Receive display and send options
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file used while the terminal UI owns the screen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Port settings applied when nothing else is chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDefaults {
    /// Preferred port name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default)]
    pub data_bits: DataBits,
    #[serde(default)]
    pub parity: Parity,
    #[serde(default)]
    pub stop_bits: StopBits,
    #[serde(default)]
    pub flow_control: FlowControl,
}

/// Receive display and send options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show received bytes as hex pairs
    #[serde(default)]
    pub hex_display: bool,
    /// Append a carriage return to sent messages
    #[serde(default)]
    pub append_cr: bool,
    /// Append a line feed to sent messages
    #[serde(default)]
    pub append_lf: bool,
    /// Initial receive file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl Default for PortDefaults {
    fn default() -> Self {
        Self {
            name: None,
            baud_rate: default_baud_rate(),
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            flow_control: FlowControl::default(),
        }
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    #[default]
    Eight,
}

impl TryFrom<u8> for DataBits {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            _ => Err(format!("Invalid data bits: {}", bits)),
        }
    }
}

impl From<DataBits> for u8 {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::None => write!(f, "none"),
            Parity::Odd => write!(f, "odd"),
            Parity::Even => write!(f, "even"),
        }
    }
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StopBits {
    #[default]
    One,
    Two,
}

impl TryFrom<u8> for StopBits {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(format!("Invalid stop bits: {}", bits)),
        }
    }
}

impl From<StopBits> for u8 {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

/// Flow control configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    #[default]
    None,
    Software,
    Hardware,
}

impl fmt::Display for FlowControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowControl::None => write!(f, "none"),
            FlowControl::Software => write!(f, "xon/xoff"),
            FlowControl::Hardware => write!(f, "rts/cts"),
        }
    }
}

/// Everything needed to open a serial port.
///
/// Built from a [`PortSelection`] and never modified while the session that
/// uses it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfig {
    pub name: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
}

impl PortConfig {
    /// 8N1 without flow control
    pub fn new(name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            name: name.into(),
            baud_rate,
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            flow_control: FlowControl::default(),
        }
    }
}

impl fmt::Display for PortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        write!(
            f,
            "{} @ {} {}{}{}",
            self.name,
            self.baud_rate,
            u8::from(self.data_bits),
            parity,
            u8::from(self.stop_bits)
        )?;
        if self.flow_control != FlowControl::None {
            write!(f, " {}", self.flow_control)?;
        }
        Ok(())
    }
}

pub const DEFAULT_BAUD_RATE: u32 = 460_800;

/// Label of the sentinel item that unlocks free-form baud entry
pub const CUSTOM_BAUD_LABEL: &str = "custom";

/// Entries of the baud-rate box, in display order
pub const BAUD_RATE_ITEMS: &[BaudRateItem] = &[
    BaudRateItem::Fixed(460_800),
    BaudRateItem::Fixed(2_008_000),
    BaudRateItem::Fixed(250_000),
    BaudRateItem::Fixed(128_000),
    BaudRateItem::Fixed(115_200),
    BaudRateItem::Fixed(76_800),
    BaudRateItem::Fixed(57_600),
    BaudRateItem::Fixed(38_400),
    BaudRateItem::Custom,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudRateItem {
    Fixed(u32),
    Custom,
}

impl fmt::Display for BaudRateItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaudRateItem::Fixed(rate) => write!(f, "{}", rate),
            BaudRateItem::Custom => write!(f, "{}", CUSTOM_BAUD_LABEL),
        }
    }
}

/// Baud-rate box: a fixed list plus an editable custom entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaudRateSelector {
    index: usize,
    custom_text: String,
}

impl BaudRateSelector {
    pub fn new() -> Self {
        Self {
            index: 0,
            custom_text: String::new(),
        }
    }

    /// Start on the matching fixed item, or on custom with the rate filled in
    pub fn with_rate(baud_rate: u32) -> Self {
        let mut selector = Self::new();
        match BAUD_RATE_ITEMS
            .iter()
            .position(|item| *item == BaudRateItem::Fixed(baud_rate))
        {
            Some(index) => selector.select(index),
            None => {
                selector.select(BAUD_RATE_ITEMS.len() - 1);
                selector.custom_text = baud_rate.to_string();
            }
        }
        selector
    }

    pub fn labels() -> Vec<String> {
        BAUD_RATE_ITEMS.iter().map(ToString::to_string).collect()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_item(&self) -> BaudRateItem {
        BAUD_RATE_ITEMS[self.index]
    }

    /// Selecting the custom item makes the field editable and clears it
    pub fn select(&mut self, index: usize) {
        let index = index.min(BAUD_RATE_ITEMS.len() - 1);
        self.index = index;
        if self.is_editable() {
            self.custom_text.clear();
        }
    }

    pub fn select_next(&mut self) {
        self.select((self.index + 1) % BAUD_RATE_ITEMS.len());
    }

    pub fn select_previous(&mut self) {
        let len = BAUD_RATE_ITEMS.len();
        self.select((self.index + len - 1) % len);
    }

    pub fn is_editable(&self) -> bool {
        self.current_item() == BaudRateItem::Custom
    }

    /// Text shown in the box
    pub fn text(&self) -> String {
        match self.current_item() {
            BaudRateItem::Fixed(rate) => rate.to_string(),
            BaudRateItem::Custom => self.custom_text.clone(),
        }
    }

    pub fn set_custom_text(&mut self, text: impl Into<String>) -> SerialComResult<()> {
        if !self.is_editable() {
            return Err(SerialComError::Configuration(
                "Baud rate is not editable unless 'custom' is selected".to_string(),
            ));
        }
        self.custom_text = text.into();
        Ok(())
    }

    pub fn baud_rate(&self) -> SerialComResult<u32> {
        match self.current_item() {
            BaudRateItem::Fixed(rate) => Ok(rate),
            BaudRateItem::Custom => {
                let text = self.custom_text.trim();
                if text.is_empty() {
                    return Err(SerialComError::Configuration(
                        "Enter a custom baud rate".to_string(),
                    ));
                }
                match text.parse::<u32>() {
                    Ok(0) | Err(_) => Err(SerialComError::Configuration(format!(
                        "Invalid baud rate: {}",
                        text
                    ))),
                    Ok(rate) => Ok(rate),
                }
            }
        }
    }
}

impl Default for BaudRateSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// The user's current port choice, validated into a [`PortConfig`] on open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSelection {
    pub port_name: Option<String>,
    pub baud: BaudRateSelector,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
}

impl PortSelection {
    pub fn from_defaults(defaults: &PortDefaults) -> Self {
        Self {
            port_name: defaults.name.clone(),
            baud: BaudRateSelector::with_rate(defaults.baud_rate),
            data_bits: defaults.data_bits,
            parity: defaults.parity,
            stop_bits: defaults.stop_bits,
            flow_control: defaults.flow_control,
        }
    }

    pub fn to_port_config(&self) -> SerialComResult<PortConfig> {
        let name = self
            .port_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SerialComError::Configuration("No serial port selected".to_string()))?;

        Ok(PortConfig {
            name: name.to_string(),
            baud_rate: self.baud.baud_rate()?,
            data_bits: self.data_bits,
            parity: self.parity,
            stop_bits: self.stop_bits,
            flow_control: self.flow_control,
        })
    }
}

impl Default for PortSelection {
    fn default() -> Self {
        Self::from_defaults(&PortDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = SerialComConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: SerialComConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SerialComConfig = toml::from_str(
            r#"
            [port]
            name = "/dev/ttyUSB0"
            data_bits = 7
            parity = "even"
            "#,
        )
        .unwrap();

        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.port.name.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.port.baud_rate, 460_800);
        assert_eq!(config.port.data_bits, DataBits::Seven);
        assert_eq!(config.port.parity, Parity::Even);
        assert_eq!(config.port.stop_bits, StopBits::One);
        assert!(!config.display.hex_display);
    }

    #[test]
    fn test_invalid_data_bits_rejected() {
        let result: Result<SerialComConfig, _> = toml::from_str("[port]\ndata_bits = 9\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_baud_rate_items() {
        assert_eq!(
            BaudRateSelector::labels(),
            vec!["460800", "2008000", "250000", "128000", "115200", "76800", "57600", "38400", "custom"]
        );
        let selector = BaudRateSelector::new();
        assert_eq!(selector.text(), "460800");
        assert!(!selector.is_editable());
        assert_eq!(selector.baud_rate().unwrap(), 460_800);
    }

    #[test]
    fn test_custom_baud_is_editable_and_empty() {
        let mut selector = BaudRateSelector::new();
        assert!(selector.set_custom_text("9600").is_err());

        selector.select(8);
        assert!(selector.is_editable());
        assert_eq!(selector.text(), "");

        selector.set_custom_text("9600").unwrap();
        assert_eq!(selector.baud_rate().unwrap(), 9600);

        // reselecting custom clears prior text
        selector.select(0);
        selector.select(8);
        assert_eq!(selector.text(), "");
        assert!(selector.baud_rate().is_err());
    }

    #[test]
    fn test_custom_baud_rejects_garbage() {
        let mut selector = BaudRateSelector::new();
        selector.select_previous();
        assert!(selector.is_editable());
        selector.set_custom_text("fast").unwrap();
        assert!(matches!(selector.baud_rate(), Err(SerialComError::Configuration(_))));
        selector.set_custom_text("0").unwrap();
        assert!(selector.baud_rate().is_err());
    }

    #[test]
    fn test_with_rate_prefills_custom() {
        assert_eq!(BaudRateSelector::with_rate(115_200).text(), "115200");
        let custom = BaudRateSelector::with_rate(9600);
        assert!(custom.is_editable());
        assert_eq!(custom.baud_rate().unwrap(), 9600);
    }

    #[test]
    fn test_port_selection_requires_port() {
        let mut selection = PortSelection::default();
        assert!(matches!(
            selection.to_port_config(),
            Err(SerialComError::Configuration(_))
        ));

        selection.port_name = Some("/dev/ttyACM0".to_string());
        let config = selection.to_port_config().unwrap();
        assert_eq!(config, PortConfig::new("/dev/ttyACM0", 460_800));
        assert_eq!(config.to_string(), "/dev/ttyACM0 @ 460800 8N1");
    }
}
