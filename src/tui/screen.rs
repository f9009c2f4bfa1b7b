use crossterm::event::{KeyCode, KeyEvent};

use super::modal::{CancellableForm, ModalForm};
use super::sections::SectionMux;
use super::widgets::{FieldForm, ListState};
use crate::api::OutputFormat;

/// Which form a `FormEdit` screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    New,
    Modify,
    Rename,
    Delete,
}

/// Output format picker for regenerating an item's document
#[derive(Debug, Clone)]
pub struct FormatPicker {
    pub item_id: String,
    pub list: ListState,
    chosen: bool,
}

impl FormatPicker {
    pub fn new(item_id: impl Into<String>, current: Option<OutputFormat>) -> Self {
        let mut list = ListState::with_selection();
        let index = current.and_then(|f| OutputFormat::ALL.iter().position(|o| *o == f));
        list.select(index.or(Some(0)), OutputFormat::ALL.len());
        Self {
            item_id: item_id.into(),
            list,
            chosen: false,
        }
    }

    pub fn selected(&self) -> OutputFormat {
        self.list
            .selected()
            .and_then(|i| OutputFormat::ALL.get(i).copied())
            .unwrap_or_default()
    }
}

/// Arrows move, Enter picks the highlighted format
impl ModalForm for FormatPicker {
    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.chosen = true;
        } else {
            self.list.handle_key(key.code, OutputFormat::ALL.len());
        }
    }

    fn is_completed(&self) -> bool {
        self.chosen
    }
}

/// Top-level exclusive state of the terminal app. Exactly one is active.
///
/// Form and picker state is owned by its variant, so leaving the screen drops it.
pub enum Screen {
    Unified,
    Loading(String),
    FormEdit {
        kind: FormKind,
        /// Item being edited; `None` for `FormKind::New`
        item_id: Option<String>,
        form: CancellableForm<FieldForm>,
        /// Sections as they were when the form opened; restored on cancel
        origin: SectionMux,
    },
    ModeSelect(CancellableForm<FormatPicker>),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Unified
    }
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Unified => "unified",
            Screen::Loading(_) => "loading",
            Screen::FormEdit { .. } => "form",
            Screen::ModeSelect(_) => "mode-select",
        }
    }

    pub fn is_unified(&self) -> bool {
        matches!(self, Screen::Unified)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Screen::Loading(_))
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Unified => f.write_str("Unified"),
            Screen::Loading(message) => f.debug_tuple("Loading").field(message).finish(),
            Screen::FormEdit { kind, item_id, .. } => f
                .debug_struct("FormEdit")
                .field("kind", kind)
                .field("item_id", item_id)
                .finish_non_exhaustive(),
            Screen::ModeSelect(picker) => f.debug_tuple("ModeSelect").field(&picker.form().item_id).finish(),
        }
    }
}
