use ratatui::style::Color;

use crate::{config::ThemeName, models::IndicatorStatus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::LightBlue,
            foreground: Color::White,
            muted: Color::Gray,
            border: Color::DarkGray,
            highlight: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(100, 200, 255),
            secondary: Color::Rgb(150, 150, 255),
            success: Color::Rgb(100, 255, 100),
            warning: Color::Rgb(255, 200, 100),
            error: Color::Rgb(255, 100, 100),
            info: Color::Rgb(150, 200, 255),
            foreground: Color::Rgb(220, 220, 230),
            muted: Color::Rgb(140, 140, 160),
            border: Color::Rgb(60, 60, 80),
            highlight: Color::Rgb(40, 40, 60),
        }
    }

    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default(),
            ThemeName::Dark => Self::dark(),
        }
    }

    pub fn status(&self, status: IndicatorStatus) -> Color {
        match status {
            IndicatorStatus::Green => self.success,
            IndicatorStatus::Yellow => self.warning,
            IndicatorStatus::Red => self.error,
        }
    }
}
