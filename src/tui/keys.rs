use anyhow::anyhow;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::str::FromStr;

/// Represents a keyboard key with optional modifiers (Ctrl, Alt, Shift)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a key binding with no modifiers
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// Create a key binding with Ctrl modifier
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Create a key binding with Shift modifier
    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    /// Check if this key binding matches the given key event.
    ///
    /// Shift is ignored for characters and BackTab since terminals disagree on
    /// whether they report it.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if self.code != event.code {
            return false;
        }
        match self.code {
            KeyCode::Char(_) | KeyCode::BackTab => {
                let significant = KeyModifiers::CONTROL | KeyModifiers::ALT;
                (self.modifiers & significant) == (event.modifiers & significant)
            }
            _ => self.modifiers == event.modifiers,
        }
    }
}

/// Convert KeyCode to KeyBinding
impl From<KeyCode> for KeyBinding {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

impl FromStr for KeyBinding {
    type Err = anyhow::Error;

    /// Parse chords like `ctrl+c`, `shift+tab`, `esc`, `f1`, `q`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = KeyModifiers::empty();
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, mods) = parts
            .split_last()
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| anyhow!("Empty key binding"))?;

        for m in mods {
            match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                other => return Err(anyhow!("Unknown modifier '{}' in '{}'", other, s)),
            }
        }

        let lower = key.to_ascii_lowercase();
        let code = match lower.as_str() {
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            f if f.len() > 1 && f.starts_with('f') => {
                let n: u8 = f[1..].parse().map_err(|_| anyhow!("Unknown key '{}'", key))?;
                KeyCode::F(n)
            }
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(anyhow!("Unknown key '{}'", key)),
                }
            }
        };

        Ok(Self { code, modifiers })
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        match self.code {
            KeyCode::BackTab => f.write_str("Shift+Tab"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::Left => f.write_str("←"),
            KeyCode::Right => f.write_str("→"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Keys the event loop interprets itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    pub quit: KeyBinding,
    pub next_section: KeyBinding,
    pub prev_section: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::ctrl(KeyCode::Char('c')),
            next_section: KeyBinding::new(KeyCode::Tab),
            prev_section: KeyBinding::shift(KeyCode::BackTab),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_chords() {
        assert_eq!("ctrl+c".parse::<KeyBinding>().unwrap(), KeyBinding::ctrl(KeyCode::Char('c')));
        assert_eq!("Esc".parse::<KeyBinding>().unwrap(), KeyBinding::new(KeyCode::Esc));
        assert_eq!("f5".parse::<KeyBinding>().unwrap(), KeyBinding::new(KeyCode::F(5)));
        assert_eq!("shift+tab".parse::<KeyBinding>().unwrap().code, KeyCode::BackTab);
        assert!("".parse::<KeyBinding>().is_err());
        assert!("meta+x".parse::<KeyBinding>().is_err());
        assert!("banana".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn test_backtab_matches_with_or_without_shift() {
        let binding = KeyMap::default().prev_section;
        assert!(binding.matches(&key(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(binding.matches(&key(KeyCode::BackTab, KeyModifiers::NONE)));
        assert!(!binding.matches(&key(KeyCode::Tab, KeyModifiers::NONE)));
    }

    #[test]
    fn test_ctrl_required_for_ctrl_binding() {
        let quit = KeyMap::default().quit;
        assert!(quit.matches(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!quit.matches(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for chord in ["Ctrl+c", "Tab", "Shift+Tab", "Esc", "F1", "q"] {
            let binding: KeyBinding = chord.parse().unwrap();
            let reparsed: KeyBinding = binding.to_string().parse().unwrap();
            assert_eq!(binding.code, reparsed.code, "{}", chord);
        }
    }
}
