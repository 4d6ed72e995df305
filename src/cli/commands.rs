use crate::cli::args::{Args, Command, ConfigCommand, DataFormat, MonitorArgs, PortArgs, SendArgs};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::communication::{parse_payload, PayloadFormat};
use crate::core::console::{Console, Notice};
use crate::domain::config::SerialComConfig;
use crate::domain::error::{SerialComError, SerialComResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::{init_logging, LogTarget};
use crate::infrastructure::serial::{scan_ports, SerialConnector};
use crate::tui::app::App;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// How often the CLI loops check the port for data
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Execute CLI command
pub async fn execute_command(args: Args) -> SerialComResult<()> {
    let writer = ConsoleWriter::new(args.output);

    let config_manager = ConfigManager::new()?;
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(Path::new(config_path))?
    } else {
        config_manager.load_config()?
    };

    let is_tui = matches!(args.command, None | Some(Command::Tui));
    init_logging(
        &config.global.log_level,
        args.verbose,
        log_target(&config, args.quiet, is_tui),
    )?;

    match args.command.unwrap_or(Command::Tui) {
        Command::Ports => {
            let ports = scan_ports()?;
            writer.write_ports(&ports)?;
            Ok(())
        }
        Command::Monitor(monitor_args) => execute_monitor(monitor_args, &writer, &config).await,
        Command::Send(send_args) => execute_send(send_args, &writer, &config).await,
        Command::Tui => {
            let console = Console::new(&config, Box::new(SerialConnector::new()));
            let mut app = App::new(console)?;
            app.run().await
        }
        Command::Config(config_args) => match config_args.command {
            ConfigCommand::Show => {
                writer.write_config(&config)?;
                Ok(())
            }
            ConfigCommand::Path => {
                let path = match &args.config {
                    Some(path) => Some(PathBuf::from(path)),
                    None => config_manager.active_config_path().map(Path::to_path_buf),
                };
                match path {
                    Some(path) => writer.write_message(&path.display().to_string())?,
                    None => writer.write_message(&format!(
                        "No configuration file found; defaults in use (global path: {})",
                        config_manager.get_global_config_path_ref().display()
                    ))?,
                }
                Ok(())
            }
            ConfigCommand::Init { dir, global } => {
                let path = if global {
                    config_manager.init_global_config()?.to_path_buf()
                } else {
                    let dir = match dir {
                        Some(dir) => PathBuf::from(dir),
                        None => std::env::current_dir()?,
                    };
                    config_manager.init_project_config(&dir)?
                };
                writer.write_message(&format!("Configuration written to {}", path.display()))?;
                Ok(())
            }
        },
        Command::Version => {
            writer.write_message(&format!("serialcom {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

/// Logs go to stderr for CLI commands. The terminal UI owns the screen, so
/// there they go to the configured log file or nowhere.
fn log_target(config: &SerialComConfig, quiet: bool, is_tui: bool) -> LogTarget {
    if quiet {
        return LogTarget::Disabled;
    }
    if is_tui {
        return match &config.global.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None => LogTarget::Disabled,
        };
    }
    LogTarget::Stderr
}

fn open_console(port_args: &PortArgs, config: &SerialComConfig) -> SerialComResult<Console> {
    let mut console = Console::new(config, Box::new(SerialConnector::new()));
    if let Some(selection) = console.selection_mut() {
        port_args.apply_to(selection)?;
    }
    Ok(console)
}

/// Print whatever the relay collected since the last call
fn flush_display(console: &mut Console, writer: &ConsoleWriter) -> SerialComResult<()> {
    let text = console.relay_mut().display_mut().drain();
    if !text.is_empty() {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
    }
    for notice in console.take_notices() {
        writer.write_notice(&notice)?;
    }
    Ok(())
}

async fn execute_monitor(
    args: MonitorArgs,
    writer: &ConsoleWriter,
    config: &SerialComConfig,
) -> SerialComResult<()> {
    let mut console = open_console(&args.port, config)?;
    console.relay_mut().set_hex_display(args.hex);
    if let Some(file) = &args.file {
        console.relay_mut().set_receive_path(file)?;
        console.toggle_file_output()?;
    }

    console.toggle_port()?;
    if let Some(port) = console.session().config() {
        writer.write_notice(&Notice::info(
            "Monitoring",
            format!("{} (Press Ctrl+C to stop)", port),
        ))?;
    }

    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Ok(()),
            _ = ticker.tick() => {
                console.pump();
                flush_display(&mut console, writer)?;
                if !console.session().is_open() {
                    break Err(SerialComError::NotConnected);
                }
            }
        }
    };

    console.shutdown();
    result
}

async fn execute_send(
    args: SendArgs,
    writer: &ConsoleWriter,
    config: &SerialComConfig,
) -> SerialComResult<()> {
    let mut console = open_console(&args.port, config)?;
    console.relay_mut().set_hex_display(args.hex);
    console.send_options_mut().append_cr = args.cr;
    console.send_options_mut().append_lf = args.lf;
    console.toggle_port()?;

    match args.format {
        DataFormat::Text => console.send_message(&args.data)?,
        format => {
            let mut bytes = parse_payload(&args.data, PayloadFormat::from(format))?;
            if args.cr {
                bytes.push(b'\r');
            }
            if args.lf {
                bytes.push(b'\n');
            }
            console.session_mut().write(&bytes)?;
        }
    }
    tracing::info!(bytes = console.session().statistics().bytes_sent, "Message sent");

    if args.wait > 0 {
        let deadline = Instant::now() + Duration::from_millis(args.wait);
        let mut ticker = interval(POLL_INTERVAL);
        while Instant::now() < deadline && console.session().is_open() {
            ticker.tick().await;
            console.pump();
            flush_display(&mut console, writer)?;
        }
        if console.relay().hex_display() {
            writer.write_message("")?;
        }
    }

    console.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_selection() {
        let mut config = SerialComConfig::default();
        assert_eq!(log_target(&config, false, false), LogTarget::Stderr);
        assert_eq!(log_target(&config, true, false), LogTarget::Disabled);
        assert_eq!(log_target(&config, false, true), LogTarget::Disabled);

        config.global.log_file = Some(PathBuf::from("/tmp/serialcom.log"));
        assert_eq!(
            log_target(&config, false, true),
            LogTarget::File(PathBuf::from("/tmp/serialcom.log"))
        );
        assert_eq!(log_target(&config, true, true), LogTarget::Disabled);
    }

    #[test]
    fn test_open_console_applies_port_args() {
        let args = PortArgs {
            port: Some("/dev/ttyS9".to_string()),
            baud: Some(57_600),
            ..PortArgs::default()
        };
        let console = open_console(&args, &SerialComConfig::default()).unwrap();
        let port = console.selection().to_port_config().unwrap();
        assert_eq!(port.name, "/dev/ttyS9");
        assert_eq!(port.baud_rate, 57_600);
        assert!(!console.session().is_open());
    }
}
