// Relay module - Received data rendering and routing
pub mod relay;
pub mod sink;

pub use relay::{DataRelay, Route};
pub use sink::{DisplayLog, FileLog, OutputSink};
