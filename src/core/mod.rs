// Core module - Session lifecycle, data relay and the console that owns them
pub mod communication;
pub mod console;
pub mod relay;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use console::{Console, Notice, SendOptions, Severity, UiCommand};
