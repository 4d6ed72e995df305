// Communication module - Transport abstraction and data framing
pub mod encoding;
pub mod transport;

pub use encoding::{encode_hex_spaced, frame_outgoing, parse_payload, DisplayEncoding, PayloadFormat};
pub use transport::{Connector, Transport, TransportErrorKind, TransportEvent, TransportFault};
