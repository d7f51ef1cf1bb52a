use serde::{Serialize, Serializer};
use std::fmt;

/// A `#rrggbb` colour constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(&'static str);

impl HexColor {
    pub const WHITE: HexColor = HexColor("#FFFFFF");

    pub const fn new(hex: &'static str) -> Self {
        HexColor(hex)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Red, green and blue channels. Malformed constants decode as white.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.0.trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(0xFF)
        };
        (channel(0), channel(2), channel(4))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// One colour per integer score 1..=25, green through red.
pub const SCORE_PALETTE: [HexColor; 25] = [
    HexColor("#C6EFCE"),
    HexColor("#C9F2D0"),
    HexColor("#CCFFCC"),
    HexColor("#E5FFD6"),
    HexColor("#FFFFCC"),
    HexColor("#FFFEBF"),
    HexColor("#FFFEB2"),
    HexColor("#FFED9C"),
    HexColor("#FFEA8A"),
    HexColor("#FFD966"),
    HexColor("#FFD157"),
    HexColor("#FFC848"),
    HexColor("#FFBF39"),
    HexColor("#FFB62A"),
    HexColor("#F4B084"),
    HexColor("#F3A677"),
    HexColor("#F29C6A"),
    HexColor("#F1925D"),
    HexColor("#F08851"),
    HexColor("#FF9999"),
    HexColor("#FF8A8A"),
    HexColor("#FF7B7B"),
    HexColor("#FF6C6C"),
    HexColor("#FF5D5D"),
    HexColor("#FF4E4E"),
];

/// Palette colour for a score, indexed by its nearest integer.
///
/// Anything that does not round into 1..=25 (including NaN) is white.
pub fn score_color(score: f64) -> HexColor {
    if !score.is_finite() {
        return HexColor::WHITE;
    }
    let rounded = score.round();
    if !(1.0..=25.0).contains(&rounded) {
        return HexColor::WHITE;
    }
    SCORE_PALETTE[rounded as usize - 1]
}
