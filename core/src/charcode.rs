//! Character codes exchanged with the recognition engine.
//!
//! The engine names characters by their JIS X 0208 row/column pair, i.e. an
//! EUC-JP byte pair with the high bit stripped. The zero/zero pair never
//! names a character; it stands for "nothing" wherever a code is optional.

use std::fmt;

use encoding_rs::EUC_JP;

/// Two-byte legacy character code, compared bytewise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharacterCode {
    bytes: [u8; 2],
}

impl CharacterCode {
    /// The "no character" value.
    pub const SENTINEL: CharacterCode = CharacterCode { bytes: [0, 0] };

    pub const fn new(b0: u8, b1: u8) -> Self {
        CharacterCode { bytes: [b0, b1] }
    }

    pub fn bytes(&self) -> [u8; 2] {
        self.bytes
    }

    pub fn is_sentinel(&self) -> bool {
        self.bytes == [0, 0]
    }

    /// Parse a code from the first four characters of `token`.
    ///
    /// All four must be ASCII hex digits; anything after them is ignored.
    pub fn from_hex_prefix(token: &str) -> Option<Self> {
        let digits = token.as_bytes().get(..4)?;
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        // Slicing is safe: the four bytes are ASCII.
        let b0 = u8::from_str_radix(&token[0..2], 16).ok()?;
        let b1 = u8::from_str_radix(&token[2..4], 16).ok()?;
        Some(CharacterCode::new(b0, b1))
    }

    /// Four lower-case hex digits, as the engine writes them.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}", self.bytes[0], self.bytes[1])
    }

    /// The EUC-JP bytes for this code (high bit restored).
    pub fn euc_jp_bytes(&self) -> [u8; 2] {
        [0x80 | self.bytes[0], 0x80 | self.bytes[1]]
    }

    /// Decode to a UTF-8 string for display, clipboard and export.
    ///
    /// Returns `None` for the sentinel and for pairs EUC-JP cannot map.
    pub fn to_display_string(&self) -> Option<String> {
        if self.is_sentinel() {
            return None;
        }
        let euc = self.euc_jp_bytes();
        EUC_JP
            .decode_without_bom_handling_and_without_replacement(&euc)
            .map(|text| text.into_owned())
    }
}

impl fmt::Display for CharacterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_display_string() {
            Some(text) => f.write_str(&text),
            None => f.write_str("\u{FFFD}"),
        }
    }
}
