//! Item manager: the unified browse / create / manage screen shared by the
//! proposal and settings tools. The data source is an [`ItemService`], so the
//! same screens work against the REST backend and the local settings file.

mod forms;
mod tasks;
mod update;
mod view;

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::Frame;
use std::sync::Arc;

use crate::api::{Item, ItemService};
use crate::tui::sections::{Section, SectionMux, SectionPanes};
use crate::tui::widgets::ListState;
use crate::tui::{App, Command, KeyMap, Screen, StatusMessage, Theme};

pub use view::help_entries;

pub struct ItemManager;

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Browse,
    Create,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [MenuAction::Browse, MenuAction::Create, MenuAction::Quit];

    pub fn label(self, noun: &str) -> String {
        match self {
            MenuAction::Browse => format!("List {}s", noun),
            MenuAction::Create => format!("New {}", noun),
            MenuAction::Quit => "Quit".to_string(),
        }
    }
}

/// Actions offered for the item opened in the management section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageAction {
    Refresh,
    Regenerate,
    Modify,
    Rename,
    Delete,
}

impl ManageAction {
    pub fn label(self) -> &'static str {
        match self {
            ManageAction::Refresh => "Refresh",
            ManageAction::Regenerate => "Regenerate document",
            ManageAction::Modify => "Modify",
            ManageAction::Rename => "Rename",
            ManageAction::Delete => "Delete",
        }
    }

    /// Actions a service supports, in menu order
    pub fn available(supports_artifacts: bool) -> Vec<ManageAction> {
        let mut actions = vec![ManageAction::Refresh];
        if supports_artifacts {
            actions.push(ManageAction::Regenerate);
        }
        actions.extend([ManageAction::Modify, ManageAction::Rename, ManageAction::Delete]);
        actions
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Listed(Result<Vec<Item>, String>),
    Created(Result<Item, String>),
    /// Refresh, regenerate, modify and rename all land here. `id` is the
    /// item the task was launched for; a rename may change it.
    Updated {
        id: String,
        verb: &'static str,
        result: Result<Item, String>,
    },
    Deleted {
        id: String,
        result: Result<(), String>,
    },
}

/// What a pane asks for when Enter is pressed in it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneAction {
    Menu(MenuAction),
    Open(usize),
    Manage(ManageAction),
}

pub struct State {
    service: Arc<dyn ItemService>,
    keys: KeyMap,
    noun: String,
    labels: forms::Labels,
    manage_actions: Vec<ManageAction>,

    screen: Screen,
    sections: SectionMux,
    menu: ListState,
    list: ListState,
    manage: ListState,

    /// Last successful fetch; replaced wholesale on every list completion
    items: Vec<Item>,
    loaded: bool,
    /// Item opened in the management section
    selected_id: Option<String>,

    status: Option<StatusMessage>,
    spinner: usize,
}

impl State {
    pub fn new(service: Arc<dyn ItemService>, keys: KeyMap) -> Self {
        let noun = service.noun().to_string();
        let labels = forms::Labels::from_service(service.as_ref());
        let manage_actions = ManageAction::available(service.supports_artifacts());
        Self {
            service,
            keys,
            noun,
            labels,
            manage_actions,
            screen: Screen::Unified,
            sections: SectionMux::new(),
            menu: ListState::with_selection(),
            list: ListState::new(),
            manage: ListState::with_selection(),
            items: Vec::new(),
            loaded: false,
            selected_id: None,
            status: None,
            spinner: 0,
        }
    }

    pub fn noun(&self) -> &str {
        &self.noun
    }

    pub fn title(&self) -> String {
        let mut noun = self.noun.clone();
        if let Some(first) = noun.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!("{} manager", noun)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn sections(&self) -> &SectionMux {
        &self.sections
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Cursor of the content list
    pub fn list_cursor(&self) -> &ListState {
        &self.list
    }

    pub fn manage_actions(&self) -> &[ManageAction] {
        &self.manage_actions
    }

    /// The item open in the management section, if it is still listed
    pub fn selected_item(&self) -> Option<&Item> {
        let id = self.selected_id.as_deref()?;
        self.items.iter().find(|item| item.id == id)
    }
}

impl SectionPanes for State {
    type Action = PaneAction;

    fn handle(&mut self, section: Section, key: KeyEvent) -> Option<PaneAction> {
        match section {
            Section::MainMenu => {
                if key.code == KeyCode::Enter {
                    return self
                        .menu
                        .selected()
                        .and_then(|i| MenuAction::ALL.get(i).copied())
                        .map(PaneAction::Menu);
                }
                self.menu.handle_key(key.code, MenuAction::ALL.len());
                None
            }
            Section::Content => {
                if key.code == KeyCode::Enter {
                    return self
                        .list
                        .selected()
                        .filter(|i| *i < self.items.len())
                        .map(PaneAction::Open);
                }
                self.list.handle_key(key.code, self.items.len());
                None
            }
            Section::Management => {
                if key.code == KeyCode::Enter {
                    return self
                        .manage
                        .selected()
                        .and_then(|i| self.manage_actions.get(i).copied())
                        .map(PaneAction::Manage);
                }
                self.manage.handle_key(key.code, self.manage_actions.len());
                None
            }
        }
    }
}

impl App for ItemManager {
    type State = State;
    type Msg = Msg;

    fn update(state: &mut State, msg: Msg) -> Command<Msg> {
        update::update(state, msg)
    }

    fn view(state: &mut State, frame: &mut Frame, theme: &Theme) {
        view::render(state, frame, theme);
    }

    fn on_event(_state: &State, event: Event) -> Option<Msg> {
        match event {
            Event::Key(key) => Some(Msg::Key(key)),
            Event::Resize(width, height) => Some(Msg::Resize(width, height)),
            _ => None,
        }
    }

    fn at_top_level(state: &State) -> bool {
        state.screen.is_unified() && state.sections.active() == Section::MainMenu
    }

    fn title(state: &State) -> String {
        state.title()
    }

    fn tick(state: &State) -> Option<Msg> {
        state.screen.is_loading().then_some(Msg::Tick)
    }
}
