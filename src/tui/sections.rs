//! Focus multiplexing between the panes of the unified screen.
//!
//! The multiplexer only knows which sections are visible and which one has
//! focus. Per-pane state (cursors, scroll offsets) lives with the app, so it
//! survives focus moving away and back.

use crossterm::event::KeyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    MainMenu = 0,
    Content = 1,
    Management = 2,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::MainMenu, Section::Content, Section::Management];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::MainMenu => "Menu",
            Section::Content => "Items",
            Section::Management => "Manage",
        }
    }
}

/// Panes that can receive keys routed by [`SectionMux::dispatch`]
pub trait SectionPanes {
    type Action;

    fn handle(&mut self, section: Section, key: KeyEvent) -> Option<Self::Action>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMux {
    active: Section,
    /// Indexed by `Section::index()`; the main menu is always visible
    visible: [bool; 3],
}

impl Default for SectionMux {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionMux {
    pub fn new() -> Self {
        Self {
            active: Section::MainMenu,
            visible: [true, false, false],
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.visible[section.index()]
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ALL.into_iter().filter(|s| self.is_visible(*s)).collect()
    }

    /// The innermost visible section
    pub fn innermost(&self) -> Section {
        Section::ALL
            .into_iter()
            .rev()
            .find(|s| self.is_visible(*s))
            .unwrap_or(Section::MainMenu)
    }

    pub fn next_section(&mut self) {
        self.step(1);
    }

    pub fn prev_section(&mut self) {
        let visible = self.visible_sections().len();
        self.step(visible.saturating_sub(1));
    }

    fn step(&mut self, by: usize) {
        let visible = self.visible_sections();
        if visible.len() <= 1 {
            return;
        }
        let pos = visible.iter().position(|s| *s == self.active).unwrap_or(0);
        self.active = visible[(pos + by) % visible.len()];
        log::debug!("Section focus -> {:?}", self.active);
    }

    /// Make `section` visible and focus it
    pub fn show(&mut self, section: Section) {
        self.visible[section.index()] = true;
        self.active = section;
    }

    pub fn hide(&mut self, section: Section) {
        if section == Section::MainMenu {
            return;
        }
        self.visible[section.index()] = false;
        if self.active == section {
            self.active = self.innermost();
        }
    }

    /// Hide the innermost section. Focus moves to the next-outer visible
    /// section only if the hidden one had it. Returns false when only the
    /// main menu is left.
    pub fn hide_innermost(&mut self) -> bool {
        let innermost = self.innermost();
        if innermost == Section::MainMenu {
            return false;
        }
        self.hide(innermost);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Route a key to the focused pane
    pub fn dispatch<P: SectionPanes>(&self, panes: &mut P, key: KeyEvent) -> Option<P::Action> {
        panes.handle(self.active, key)
    }
}
