use crate::domain::error::{SerialComError, SerialComResult};
use base64::Engine;

/// How received bytes are rendered before they reach a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayEncoding {
    #[default]
    Text,
    Hex,
}

impl DisplayEncoding {
    pub fn from_hex_flag(hex: bool) -> Self {
        if hex {
            Self::Hex
        } else {
            Self::Text
        }
    }

    pub fn render(self, bytes: &[u8]) -> String {
        match self {
            DisplayEncoding::Text => decode_text(bytes),
            DisplayEncoding::Hex => encode_hex_spaced(bytes),
        }
    }
}

/// Uppercase hex pairs separated by single spaces: `[0x41, 0x42]` -> `"41 42"`.
pub fn encode_hex_spaced(bytes: &[u8]) -> String {
    let encoded = hex::encode_upper(bytes);
    let mut spaced = String::with_capacity(encoded.len() + bytes.len().saturating_sub(1));
    for (i, pair) in encoded.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            spaced.push(' ');
        }
        // hex::encode_upper only emits ASCII digits and letters
        spaced.extend(pair.iter().map(|&b| b as char));
    }
    spaced
}

/// Lossy UTF-8; a multi-byte character split across two reads shows up as
/// replacement characters.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Bytes written for an outgoing message, with optional CR then LF
pub fn frame_outgoing(text: &str, append_cr: bool, append_lf: bool) -> Vec<u8> {
    let mut data = Vec::with_capacity(text.len() + 2);
    data.extend_from_slice(text.as_bytes());
    if append_cr {
        data.push(b'\r');
    }
    if append_lf {
        data.push(b'\n');
    }
    data
}

/// Payload formats accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Text,
    Hex,
    Base64,
}

pub fn parse_payload(data: &str, format: PayloadFormat) -> SerialComResult<Vec<u8>> {
    match format {
        PayloadFormat::Text => Ok(data.as_bytes().to_vec()),
        PayloadFormat::Hex => {
            let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
            hex::decode(&cleaned)
                .map_err(|e| SerialComError::InvalidInput(format!("Invalid hex data: {}", e)))
        }
        PayloadFormat::Base64 => base64::engine::general_purpose::STANDARD
            .decode(data.trim())
            .map_err(|e| SerialComError::InvalidInput(format!("Invalid base64 data: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hex_pairs_are_spaced_and_uppercase() {
        assert_eq!(encode_hex_spaced(&[0x41, 0x42]), "41 42");
        assert_eq!(encode_hex_spaced(&[0x0a, 0xff, 0x00]), "0A FF 00");
        assert_eq!(encode_hex_spaced(&[0xab]), "AB");
        assert_eq!(encode_hex_spaced(&[]), "");
    }

    #[test]
    fn test_text_decoding_is_lossy() {
        assert_eq!(decode_text(b"hello"), "hello");
        assert_eq!(decode_text(&[0x68, 0xff, 0x69]), "h\u{fffd}i");
    }

    #[test]
    fn test_frame_outgoing() {
        assert_eq!(frame_outgoing("hi", true, false), b"hi\r".to_vec());
        assert_eq!(frame_outgoing("hi", false, true), b"hi\n".to_vec());
        assert_eq!(frame_outgoing("hi", true, true), b"hi\r\n".to_vec());
        assert_eq!(frame_outgoing("", false, false), Vec::<u8>::new());
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload("AT", PayloadFormat::Text).unwrap(), b"AT".to_vec());
        assert_eq!(
            parse_payload("01 02\nff", PayloadFormat::Hex).unwrap(),
            vec![0x01, 0x02, 0xff]
        );
        assert_eq!(parse_payload("QVQ=", PayloadFormat::Base64).unwrap(), b"AT".to_vec());
        assert!(matches!(
            parse_payload("0g", PayloadFormat::Hex),
            Err(SerialComError::InvalidInput(_))
        ));
        assert!(parse_payload("%%%", PayloadFormat::Base64).is_err());
    }

    proptest! {
        #[test]
        fn hex_length_matches_pairs_plus_separators(bytes in proptest::collection::vec(any::<u8>(), 1..512)) {
            let rendered = encode_hex_spaced(&bytes);
            prop_assert_eq!(rendered.len(), 2 * bytes.len() + (bytes.len() - 1));
            prop_assert_eq!(rendered.to_uppercase(), rendered.clone());
            prop_assert_eq!(encode_hex_spaced(&bytes), rendered);
        }
    }
}
