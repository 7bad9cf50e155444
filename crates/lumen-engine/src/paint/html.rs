use std::fmt;

use super::Rgba;

/// Error returned by [`Rgba::from_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid colour code {:?}: expected #RRGGBB or #RRGGBBAA", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl Rgba {
    /// Parses `#RRGGBB` (opaque) or `#RRGGBBAA`. Hex digits are case-insensitive;
    /// surrounding whitespace is ignored.
    pub fn from_html(code: &str) -> Result<Rgba, ColorParseError> {
        let err = || ColorParseError(code.to_string());

        let hex = code.trim().strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Rgba::from_u8(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Formats as `#RRGGBB` when opaque, `#RRGGBBAA` otherwise (uppercase).
    pub fn to_html(self) -> String {
        let [r, g, b, a] = self.to_u8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}
