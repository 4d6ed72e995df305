pub mod help;
pub mod log;
pub mod notice;
pub mod settings;
pub mod status;
