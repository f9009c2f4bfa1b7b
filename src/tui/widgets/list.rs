use crossterm::event::KeyCode;

/// Manages list selection and scrolling state
///
/// The state is independent of the items themselves, so a section keeps its
/// cursor and scroll position while focus is elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    selected: Option<usize>,
    scroll_offset: usize,
    scroll_off: usize,              // Rows from edge before scrolling (like vim scrolloff)
    wrap_around: bool,              // Wrap to bottom/top when reaching edges
    viewport_height: Option<usize>, // Last known viewport height from renderer
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ListState {
    /// Create a new ListState with no selection
    pub fn new() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            scroll_off: 2,
            wrap_around: true,
            viewport_height: None,
        }
    }

    /// Create a new ListState with first item selected
    pub fn with_selection() -> Self {
        Self {
            selected: Some(0),
            ..Self::new()
        }
    }

    /// Set the viewport height (called by renderer with actual area height)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = Some(height);
    }

    /// Get currently selected index
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Get current scroll offset
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Set selected index and adjust scroll to keep it visible
    pub fn select(&mut self, index: Option<usize>, item_count: usize) {
        self.selected = index.filter(|i| *i < item_count);
        self.update_scroll(item_count);
    }

    /// Re-validate after the underlying items were replaced
    pub fn reset(&mut self, item_count: usize) {
        self.scroll_offset = 0;
        self.select(if item_count > 0 { Some(0) } else { None }, item_count);
    }

    /// Handle navigation key, returns true if handled
    pub fn handle_key(&mut self, key: KeyCode, item_count: usize) -> bool {
        if item_count == 0 {
            return false;
        }

        let page = self.viewport_height.unwrap_or(10).max(1);

        match key {
            KeyCode::Up | KeyCode::Char('k') => self.move_up(item_count),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(item_count),
            KeyCode::PageUp => {
                self.selected = Some(self.selected.unwrap_or(0).saturating_sub(page));
            }
            KeyCode::PageDown => {
                self.selected = Some((self.selected.unwrap_or(0) + page).min(item_count - 1));
            }
            KeyCode::Home => self.selected = Some(0),
            KeyCode::End => self.selected = Some(item_count - 1),
            _ => return false,
        }

        // Ensure the new selection is visible
        self.update_scroll(item_count);
        true
    }

    fn move_up(&mut self, item_count: usize) {
        self.selected = match self.selected {
            Some(sel) if sel > 0 => Some(sel - 1),
            // At top, wrap to bottom
            Some(_) if self.wrap_around => Some(item_count - 1),
            Some(sel) => Some(sel),
            None => Some(0),
        };
    }

    fn move_down(&mut self, item_count: usize) {
        self.selected = match self.selected {
            Some(sel) if sel + 1 < item_count => Some(sel + 1),
            // At bottom, wrap to top
            Some(_) if self.wrap_around => Some(0),
            Some(sel) => Some(sel),
            None => Some(0),
        };
    }

    /// Update scroll offset based on selection and visible height
    pub fn update_scroll(&mut self, item_count: usize) {
        let Some(height) = self.viewport_height else {
            return;
        };
        if let Some(sel) = self.selected {
            // Calculate ideal scroll range to keep selection visible with scrolloff
            let min_scroll = sel.saturating_sub(height.saturating_sub(self.scroll_off + 1));
            let max_scroll = sel.saturating_sub(self.scroll_off);

            if self.scroll_offset < min_scroll {
                self.scroll_offset = min_scroll;
            } else if self.scroll_offset > max_scroll {
                self.scroll_offset = max_scroll;
            }

            // Clamp to valid range
            let max_offset = item_count.saturating_sub(height);
            self.scroll_offset = self.scroll_offset.min(max_offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_ways() {
        let mut list = ListState::with_selection();
        assert!(list.handle_key(KeyCode::Up, 3));
        assert_eq!(list.selected(), Some(2));
        assert!(list.handle_key(KeyCode::Down, 3));
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn test_empty_list_ignores_keys() {
        let mut list = ListState::new();
        assert!(!list.handle_key(KeyCode::Down, 0));
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut list = ListState::with_selection();
        list.set_viewport_height(5);
        for _ in 0..10 {
            list.handle_key(KeyCode::Down, 20);
        }
        assert_eq!(list.selected(), Some(10));
        assert!(list.scroll_offset() > 0);
        assert!(list.scroll_offset() <= 10);
    }

    #[test]
    fn test_reset_after_replacement() {
        let mut list = ListState::with_selection();
        list.handle_key(KeyCode::End, 8);
        list.reset(3);
        assert_eq!(list.selected(), Some(0));
        list.reset(0);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_unhandled_key() {
        let mut list = ListState::with_selection();
        assert!(!list.handle_key(KeyCode::Char('x'), 4));
    }
}
