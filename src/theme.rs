//! Theme colors for the family boxes
//! The great-grandchild border color comes from config.toml

use ratatui::style::Color;
use thiserror::Error;

/// Default great-grandchild border (#6FDBFF)
pub const DEFAULT_BORDER: Color = Color::Rgb(111, 219, 255);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("invalid color '{0}' (expected #RRGGBB or #RGB)")]
    InvalidColor(String),
}

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Color,      // Great-grandchild box
    pub ancestor: Color,    // Parent/child/grandchild boxes
    pub accent: Color,      // Focused button, key hints
    pub text: Color,        // Primary text
    pub text_dim: Color,    // Labels, footer
    pub warning: Color,     // Status messages
    pub bg_selected: Color, // Focused button background
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: DEFAULT_BORDER,
            ancestor: Color::Rgb(88, 91, 112),
            accent: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            warning: Color::Rgb(243, 139, 168),
            bg_selected: Color::Rgb(69, 71, 90),
        }
    }
}

impl Theme {
    /// Default palette with the given great-grandchild border
    pub fn with_border(hex: &str) -> Result<Self, ThemeError> {
        Ok(Self {
            border: parse_hex_color(hex)?,
            ..Self::default()
        })
    }
}

/// Parse a hex color string (#RRGGBB or #RGB)
pub fn parse_hex_color(s: &str) -> Result<Color, ThemeError> {
    let invalid = || ThemeError::InvalidColor(s.to_string());
    let hex = s.trim().trim_start_matches('#');

    if !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>, scale: u8| {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v * scale)
            .map_err(|_| invalid())
    };

    match hex.len() {
        6 => Ok(Color::Rgb(channel(0..2, 1)?, channel(2..4, 1)?, channel(4..6, 1)?)),
        3 => Ok(Color::Rgb(channel(0..1, 17)?, channel(1..2, 17)?, channel(2..3, 17)?)),
        _ => Err(invalid()),
    }
}
