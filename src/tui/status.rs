use ratatui::style::{Modifier, Style};

use super::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// The single user-visible message line. A new message replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn style(&self, theme: &Theme) -> Style {
        match self.severity {
            Severity::Info => Style::default().fg(theme.accent_info),
            Severity::Success => Style::default().fg(theme.accent_success),
            Severity::Error => Style::default().fg(theme.accent_error).add_modifier(Modifier::BOLD),
        }
    }
}
