use crossterm::event::KeyCode;

/// Manages text input cursor and scrolling state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    cursor_pos: usize,    // Character index (0 = before first char)
    scroll_offset: usize, // For horizontal scrolling when text > width
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_cursor_to_end(&mut self, text: &str) {
        self.cursor_pos = text.chars().count();
    }

    /// Handle a key press against `value`.
    /// Returns Some(new_value) if text changed, None if only cursor moved
    pub fn handle_key(&mut self, key: KeyCode, value: &str, max_length: Option<usize>) -> Option<String> {
        let char_count = value.chars().count();
        self.cursor_pos = self.cursor_pos.min(char_count);

        match key {
            KeyCode::Char(c) => {
                if max_length.is_some_and(|max| char_count >= max) {
                    return None;
                }
                let mut chars: Vec<char> = value.chars().collect();
                chars.insert(self.cursor_pos, c);
                self.cursor_pos += 1;
                Some(chars.into_iter().collect())
            }
            KeyCode::Backspace if self.cursor_pos > 0 => {
                let mut chars: Vec<char> = value.chars().collect();
                chars.remove(self.cursor_pos - 1);
                self.cursor_pos -= 1;
                Some(chars.into_iter().collect())
            }
            KeyCode::Delete if self.cursor_pos < char_count => {
                let mut chars: Vec<char> = value.chars().collect();
                chars.remove(self.cursor_pos);
                Some(chars.into_iter().collect())
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.cursor_pos = (self.cursor_pos + 1).min(char_count);
                None
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                None
            }
            KeyCode::End => {
                self.cursor_pos = char_count;
                None
            }
            _ => None,
        }
    }

    /// Keep the cursor inside a window of `visible_width` characters.
    /// Returns the visible slice of `text`.
    pub fn visible<'a>(&mut self, visible_width: usize, text: &'a str) -> &'a str {
        let visible_width = visible_width.max(1);
        let char_count = text.chars().count();

        if self.cursor_pos < self.scroll_offset {
            self.scroll_offset = self.cursor_pos;
        } else if self.cursor_pos >= self.scroll_offset + visible_width {
            self.scroll_offset = self.cursor_pos + 1 - visible_width;
        }
        self.scroll_offset = self.scroll_offset.min(char_count.saturating_sub(visible_width - 1));

        let start = text.char_indices().nth(self.scroll_offset).map_or(text.len(), |(i, _)| i);
        let end = text
            .char_indices()
            .nth(self.scroll_offset + visible_width)
            .map_or(text.len(), |(i, _)| i);
        &text[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(state: &mut TextInputState, value: &mut String, s: &str) {
        for c in s.chars() {
            if let Some(v) = state.handle_key(KeyCode::Char(c), value, None) {
                *value = v;
            }
        }
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut state = TextInputState::new();
        let mut value = String::new();
        type_str(&mut state, &mut value, "héllo");
        assert_eq!(value, "héllo");

        value = state.handle_key(KeyCode::Backspace, &value, None).unwrap();
        assert_eq!(value, "héll");
        assert_eq!(state.cursor_pos(), 4);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut state = TextInputState::new();
        let mut value = String::from("ac");
        state.set_cursor_to_end(&value);
        state.handle_key(KeyCode::Left, &value, None);
        type_str(&mut state, &mut value, "b");
        assert_eq!(value, "abc");
    }

    #[test]
    fn test_max_length() {
        let mut state = TextInputState::new();
        let mut value = String::new();
        for c in "abcdef".chars() {
            if let Some(v) = state.handle_key(KeyCode::Char(c), &value, Some(3)) {
                value = v;
            }
        }
        assert_eq!(value, "abc");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut state = TextInputState::new();
        assert!(state.handle_key(KeyCode::Backspace, "abc", None).is_none());
    }

    #[test]
    fn test_visible_window_follows_cursor() {
        let mut state = TextInputState::new();
        let text = "abcdefghij";
        state.set_cursor_to_end(text);
        assert_eq!(state.visible(4, text), "hij");
        state.handle_key(KeyCode::Home, text, None);
        assert_eq!(state.visible(4, text), "abcd");
    }
}
