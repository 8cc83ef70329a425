//! Hex rendering for device ids and raw frames.

use crate::error::HexError;

/// Characters accepted between digit pairs when parsing.
const SEPARATORS: [char; 3] = [' ', '-', ':'];

/// Lowercase hex with no separators (`[0xAB, 0x01]` -> `"ab01"`).
pub fn encode_lower(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Lowercase, hyphen-separated hex (`[0xDE, 0x0A]` -> `"de-0a"`).
///
/// This is how device ids are named in feed keys.
pub fn encode_dashed_lower(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| ::hex::encode([*byte]))
        .collect::<Vec<_>>()
        .join("-")
}

/// Uppercase, hyphen-separated hex (`[0x11, 0xAB]` -> `"11-AB"`).
pub fn encode_dashed_upper(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| ::hex::encode_upper([*byte]))
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse hex text into bytes.
///
/// Either case is accepted. Spaces, `-` and `:` between digits are ignored so
/// that `"11ab74"`, `"11-AB-74"` and `"de-0a-ff"` all parse. Error positions
/// refer to the text as given.
pub fn decode(text: &str) -> Result<Vec<u8>, HexError> {
    let (positions, digits): (Vec<usize>, String) = text
        .char_indices()
        .filter(|(_, c)| !SEPARATORS.contains(c))
        .unzip();

    ::hex::decode(&digits).map_err(|err| match err {
        ::hex::FromHexError::InvalidHexCharacter { c, index } => HexError::InvalidDigit {
            position: positions.get(index).copied().unwrap_or(index),
            found: c,
        },
        _ => HexError::OddLength(digits.chars().count()),
    })
}
