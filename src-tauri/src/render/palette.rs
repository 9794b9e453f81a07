use crate::models::scale::MAX_SCORE;
use crate::models::view::CellStyle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Green,
    Blue,
    Monochrome,
}

impl ColorScheme {
    pub const NAMES: [&'static str; 3] = ["green", "blue", "monochrome"];

    fn saturated(self) -> Rgb {
        match self {
            ColorScheme::Green => Rgb(0x3f, 0x6e, 0x12),
            ColorScheme::Blue => Rgb(0x1d, 0x4e, 0xd8),
            ColorScheme::Monochrome => Rgb(0x1f, 0x29, 0x37),
        }
    }
}

/// Series colours for the radar chart, one per competitor slot.
pub const SERIES_COLORS: [&str; 10] = [
    "#2563eb", "#dc2626", "#16a34a", "#d97706", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
    "#475569", "#ea580c",
];

const LIGHT: Rgb = Rgb(0xf3, 0xf4, 0xf6);
const DARK_TEXT: &str = "#374151";
const LIGHT_TEXT: &str = "#ffffff";
const NULL_BACKGROUND: &str = "#ffffff";
const NULL_TEXT: &str = "#9ca3af";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

impl Rgb {
    fn lerp(self, to: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, to.0), mix(self.1, to.1), mix(self.2, to.2))
    }

    fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Colour weight of a score in `(0, 1]`. Zero still gets a visible tint.
pub fn intensity(value: u8) -> f64 {
    (value.min(MAX_SCORE) as f64 + 1.0) / (MAX_SCORE as f64 + 1.0)
}

pub fn cell_style(value: Option<u8>, scheme: ColorScheme) -> CellStyle {
    match value {
        None => CellStyle {
            background: NULL_BACKGROUND.to_string(),
            foreground: NULL_TEXT.to_string(),
            class: "score-cell score-null".to_string(),
        },
        Some(v) => {
            let t = intensity(v);
            CellStyle {
                background: LIGHT.lerp(scheme.saturated(), t).hex(),
                foreground: (if t > 0.5 { LIGHT_TEXT } else { DARK_TEXT }).to_string(),
                class: format!("score-cell score-{v}"),
            }
        }
    }
}

pub fn series_color(competitor_idx: usize) -> &'static str {
    SERIES_COLORS[competitor_idx % SERIES_COLORS.len()]
}
