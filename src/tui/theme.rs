use anyhow::anyhow;
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeVariant {
    #[default]
    Mocha, // Dark theme (default)
    Latte, // Light theme
}

impl FromStr for ThemeVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mocha" | "dark" => Ok(Self::Mocha),
            "latte" | "light" => Ok(Self::Latte),
            other => Err(anyhow!("Unknown theme '{}' (expected mocha or latte)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub accent_primary: Color, // Focus, selection
    pub accent_error: Color,
    pub accent_warning: Color,
    pub accent_success: Color,
    pub accent_info: Color,
    pub accent_muted: Color, // Key hints

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_tertiary: Color, // Labels, hints

    pub border_primary: Color,   // Focused section border
    pub border_secondary: Color, // Unfocused section border
    pub bg_surface: Color,       // Selection background
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Mocha => Self::mocha(),
            ThemeVariant::Latte => Self::latte(),
        }
    }

    fn mocha() -> Self {
        Self {
            accent_primary: Color::Rgb(0xb4, 0xbe, 0xfe), // lavender
            accent_error: Color::Rgb(0xf3, 0x8b, 0xa8),   // red
            accent_warning: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            accent_success: Color::Rgb(0xa6, 0xe3, 0xa1), // green
            accent_info: Color::Rgb(0x94, 0xe2, 0xd5),    // teal
            accent_muted: Color::Rgb(0xfa, 0xb3, 0x87),   // peach

            text_primary: Color::Rgb(0xcd, 0xd6, 0xf4),
            text_secondary: Color::Rgb(0xba, 0xc2, 0xde),
            text_tertiary: Color::Rgb(0xa6, 0xad, 0xc8),

            border_primary: Color::Rgb(0xb4, 0xbe, 0xfe),
            border_secondary: Color::Rgb(0x6c, 0x70, 0x86),
            bg_surface: Color::Rgb(0x31, 0x32, 0x44),
        }
    }

    fn latte() -> Self {
        Self {
            accent_primary: Color::Rgb(0x72, 0x87, 0xfd), // lavender
            accent_error: Color::Rgb(0xd2, 0x0f, 0x39),   // red
            accent_warning: Color::Rgb(0xdf, 0x8e, 0x1d), // yellow
            accent_success: Color::Rgb(0x40, 0xa0, 0x2b), // green
            accent_info: Color::Rgb(0x17, 0x92, 0x99),    // teal
            accent_muted: Color::Rgb(0xfe, 0x64, 0x0b),   // peach

            text_primary: Color::Rgb(0x4c, 0x4f, 0x69),
            text_secondary: Color::Rgb(0x5c, 0x5f, 0x77),
            text_tertiary: Color::Rgb(0x6c, 0x6f, 0x85),

            border_primary: Color::Rgb(0x72, 0x87, 0xfd),
            border_secondary: Color::Rgb(0x9c, 0xa0, 0xb0),
            bg_surface: Color::Rgb(0xcc, 0xd0, 0xda),
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_primary)
        } else {
            Style::default().fg(self.border_secondary)
        }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .bg(self.bg_surface)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.text_tertiary)
    }

    pub fn key(&self) -> Style {
        Style::default().fg(self.accent_muted)
    }
}
