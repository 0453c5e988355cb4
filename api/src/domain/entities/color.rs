//! Hex colour value used for canvas fills

use serde::{Deserialize, Serialize};

/// An opaque RGB colour written as `#RRGGBB` or `#RGB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const WHITE: HexColor = HexColor([0xFF, 0xFF, 0xFF]);

    pub fn channels(&self) -> [u8; 3] {
        self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl std::str::FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid hex colour: {}", s));
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|e| e.to_string());

        match hex.len() {
            6 => Ok(HexColor([
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ])),
            // #RGB shorthand doubles each digit
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    out[i] = channel(&format!("{c}{c}"))?;
                }
                Ok(HexColor(out))
            }
            _ => Err(format!("Invalid hex colour: {}", s)),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}
