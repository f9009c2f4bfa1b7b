//! Transition function of the manager: (state, message) -> state change plus
//! at most one command.
//!
//! Only Enter on a menu or management entry, a submitted form or a picked
//! format can launch a task, and every launch moves the screen to `Loading`.
//! Completions always land back on `Unified` and never launch anything.

use crossterm::event::{KeyCode, KeyEvent};

use super::{ManageAction, MenuAction, Msg, PaneAction, State, forms, tasks};
use crate::api::{Item, MutationKind};
use crate::tui::modal::{CancellableForm, ModalOutcome};
use crate::tui::screen::{FormKind, FormatPicker};
use crate::tui::sections::Section;
use crate::tui::widgets::FieldForm;
use crate::tui::{Command, Screen, StatusMessage};

pub(super) fn update(state: &mut State, msg: Msg) -> Command<Msg> {
    match msg {
        Msg::Key(key) => handle_key(state, key),
        Msg::Resize(width, height) => {
            log::debug!("Resized to {}x{}", width, height);
            Command::None
        }
        Msg::Tick => {
            state.spinner = state.spinner.wrapping_add(1);
            Command::None
        }
        Msg::Listed(result) => {
            on_listed(state, result);
            Command::None
        }
        Msg::Created(result) => {
            on_created(state, result);
            Command::None
        }
        Msg::Updated { id, verb, result } => {
            on_updated(state, &id, verb, result);
            Command::None
        }
        Msg::Deleted { id, result } => {
            on_deleted(state, id, result);
            Command::None
        }
    }
}

fn handle_key(state: &mut State, key: KeyEvent) -> Command<Msg> {
    match state.screen {
        // Nothing but the global quit gets through while a task runs
        Screen::Loading(_) => Command::None,
        Screen::FormEdit { .. } => form_key(state, key),
        Screen::ModeSelect(_) => picker_key(state, key),
        Screen::Unified => unified_key(state, key),
    }
}

fn unified_key(state: &mut State, key: KeyEvent) -> Command<Msg> {
    if state.keys.next_section.matches(&key) {
        state.sections.next_section();
        return Command::None;
    }
    if state.keys.prev_section.matches(&key) {
        state.sections.prev_section();
        return Command::None;
    }

    if key.code == KeyCode::Esc {
        if !state.sections.hide_innermost() {
            return Command::Quit;
        }
        if !state.sections.is_visible(Section::Management) {
            state.selected_id = None;
        }
        return Command::None;
    }

    let sections = state.sections;
    match sections.dispatch(state, key) {
        Some(PaneAction::Menu(action)) => menu_action(state, action),
        Some(PaneAction::Open(index)) => {
            open_item(state, index);
            Command::None
        }
        Some(PaneAction::Manage(action)) => manage_action(state, action),
        None => Command::None,
    }
}

fn menu_action(state: &mut State, action: MenuAction) -> Command<Msg> {
    match action {
        MenuAction::Browse => {
            state.screen = Screen::Loading(format!("Loading {}s", state.noun));
            tasks::list(state.service.clone())
        }
        MenuAction::Create => {
            let form = forms::new_item(&state.noun, &state.labels);
            open_form(state, FormKind::New, None, form);
            // The new item's section is visible and focused while its form is open
            state.sections.show(Section::Content);
            Command::None
        }
        MenuAction::Quit => Command::Quit,
    }
}

fn open_item(state: &mut State, index: usize) {
    let Some(item) = state.items.get(index) else {
        return;
    };
    log::debug!("Managing {} {}", state.noun, item.id);
    state.selected_id = Some(item.id.clone());
    state.manage.reset(state.manage_actions.len());
    state.sections.show(Section::Management);
}

fn manage_action(state: &mut State, action: ManageAction) -> Command<Msg> {
    let Some(item) = state.selected_item().cloned() else {
        state.sections.hide(Section::Management);
        state.selected_id = None;
        return Command::None;
    };

    match action {
        ManageAction::Refresh => {
            state.screen = Screen::Loading(format!("Refreshing '{}'", item.title));
            tasks::refresh(state.service.clone(), item.id)
        }
        ManageAction::Regenerate => {
            state.screen = Screen::ModeSelect(CancellableForm::new(FormatPicker::new(item.id, item.format)));
            Command::None
        }
        ManageAction::Modify => {
            let form = forms::modify(&item, &state.labels);
            open_form(state, FormKind::Modify, Some(&item), form);
            Command::None
        }
        ManageAction::Rename => {
            let form = forms::rename(&item, &state.labels);
            open_form(state, FormKind::Rename, Some(&item), form);
            Command::None
        }
        ManageAction::Delete => {
            open_form(state, FormKind::Delete, Some(&item), forms::delete(&item));
            Command::None
        }
    }
}

fn open_form(state: &mut State, kind: FormKind, item: Option<&Item>, form: FieldForm) {
    state.screen = Screen::FormEdit {
        kind,
        item_id: item.map(|item| item.id.clone()),
        form: CancellableForm::new(form),
        origin: state.sections,
    };
}

fn form_key(state: &mut State, key: KeyEvent) -> Command<Msg> {
    let outcome = match &mut state.screen {
        Screen::FormEdit { form, .. } => form.update(key),
        _ => return Command::None,
    };

    match outcome {
        ModalOutcome::Active => Command::None,
        ModalOutcome::Cancelled => {
            // Back to the sections that opened the form, untouched
            if let Screen::FormEdit { origin, .. } = std::mem::take(&mut state.screen) {
                state.sections = origin;
            }
            Command::None
        }
        ModalOutcome::Completed => match std::mem::take(&mut state.screen) {
            Screen::FormEdit { kind, item_id, form, .. } => submit_form(state, kind, item_id, form.into_inner()),
            _ => Command::None,
        },
    }
}

fn submit_form(state: &mut State, kind: FormKind, item_id: Option<String>, form: FieldForm) -> Command<Msg> {
    let service = state.service.clone();
    match (kind, item_id) {
        (FormKind::New, _) => {
            state.screen = Screen::Loading(format!("Creating {}", state.noun));
            tasks::create(service, forms::draft(&form))
        }
        (FormKind::Modify, Some(id)) => {
            state.screen = Screen::Loading("Saving changes".to_string());
            tasks::mutate(service, id, MutationKind::Modify(forms::draft(&form)))
        }
        (FormKind::Rename, Some(id)) => {
            state.screen = Screen::Loading("Renaming".to_string());
            tasks::mutate(service, id, MutationKind::Rename(form.value(0)))
        }
        (FormKind::Delete, Some(id)) => {
            state.screen = Screen::Loading(format!("Deleting {}", state.noun));
            tasks::delete(service, id)
        }
        (kind, None) => {
            log::warn!("{:?} form submitted without an item", kind);
            state.screen = Screen::Unified;
            Command::None
        }
    }
}

fn picker_key(state: &mut State, key: KeyEvent) -> Command<Msg> {
    let outcome = match &mut state.screen {
        Screen::ModeSelect(picker) => picker.update(key),
        _ => return Command::None,
    };

    match outcome {
        ModalOutcome::Active => Command::None,
        ModalOutcome::Cancelled => {
            state.screen = Screen::Unified;
            Command::None
        }
        ModalOutcome::Completed => match std::mem::take(&mut state.screen) {
            Screen::ModeSelect(picker) => {
                let picker = picker.into_inner();
                let format = picker.selected();
                state.screen = Screen::Loading(format!("Rendering {} as {}", state.noun, format));
                tasks::mutate(state.service.clone(), picker.item_id, MutationKind::Regenerate(format))
            }
            _ => Command::None,
        },
    }
}

fn on_listed(state: &mut State, result: Result<Vec<Item>, String>) {
    state.screen = Screen::Unified;
    match result {
        Ok(items) => {
            log::info!("Loaded {} {}s", items.len(), state.noun);
            state.status = Some(StatusMessage::info(format!("Loaded {} {}s", items.len(), state.noun)));
            state.items = items;
            state.loaded = true;
            state.selected_id = None;
            state.list.reset(state.items.len());
            state.sections.hide(Section::Management);
            state.sections.show(Section::Content);
        }
        Err(e) => fail(state, e),
    }
}

fn on_created(state: &mut State, result: Result<Item, String>) {
    state.screen = Screen::Unified;
    match result {
        Ok(item) => {
            log::info!("Created {} {}", state.noun, item.id);
            state.status = Some(StatusMessage::success(format!("Created {} '{}'", state.noun, item.title)));
            state.selected_id = None;
            state.sections.reset();
        }
        Err(e) => fail(state, e),
    }
}

fn on_updated(state: &mut State, id: &str, verb: &str, result: Result<Item, String>) {
    state.screen = Screen::Unified;
    let item = match result {
        Ok(item) => item,
        Err(e) => return fail(state, e),
    };

    state.status = Some(StatusMessage::success(format!("{} '{}'", verb, item.title)));
    match state.items.iter_mut().find(|existing| existing.id == id) {
        Some(existing) => {
            state.selected_id = Some(item.id.clone());
            *existing = item;
            if !state.sections.is_visible(Section::Content) {
                state.sections.show(Section::Content);
            }
            state.sections.show(Section::Management);
        }
        None => {
            // Removed from the list while the task ran; nothing to show it in
            log::info!("{} {} is no longer listed, dropping its update", state.noun, id);
            state.sections.hide(Section::Management);
            state.selected_id = None;
        }
    }
}

fn on_deleted(state: &mut State, id: String, result: Result<(), String>) {
    state.screen = Screen::Unified;
    match result {
        Ok(()) => {
            log::info!("Deleted {} {}", state.noun, id);
            state.status = Some(StatusMessage::success(format!("Deleted {}", state.noun)));
            state.selected_id = None;
            state.sections.reset();
        }
        Err(e) => fail(state, e),
    }
}

/// Failed completion: error line, and drop sections that lost their content
fn fail(state: &mut State, error: String) {
    log::warn!("Task failed: {}", error);
    state.status = Some(StatusMessage::error(error));
    if !state.loaded {
        state.sections.hide(Section::Content);
    }
    if state.selected_item().is_none() {
        state.sections.hide(Section::Management);
        state.selected_id = None;
    }
}
