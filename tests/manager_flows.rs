//! End-to-end flows through the event loop against a file-backed settings store.

use bizctl::api::{ItemService, SettingsStore};
use bizctl::tui::apps::ItemManager;
use bizctl::tui::apps::manager::{ManageAction, State};
use bizctl::tui::{KeyMap, LoopEvent, Runtime, Screen, Section, Theme};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

type Manager = Runtime<ItemManager>;

fn store(dir: &TempDir) -> Arc<SettingsStore> {
    Arc::new(SettingsStore::new(dir.path().join("settings.toml")))
}

fn runtime(store: Arc<SettingsStore>) -> Manager {
    let keys = KeyMap::default();
    Runtime::new(State::new(store, keys), keys, Theme::default(), Duration::from_millis(100))
}

fn press(runtime: &mut Manager, code: KeyCode) -> bool {
    runtime.handle_event(LoopEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))))
}

fn type_text(runtime: &mut Manager, text: &str) {
    for c in text.chars() {
        assert!(press(runtime, KeyCode::Char(c)));
    }
}

/// Let the single in-flight task finish and feed its completion to the loop
async fn settle(runtime: &mut Manager) {
    assert_eq!(runtime.in_flight(), 1);
    let completion = tokio::time::timeout(Duration::from_secs(5), runtime.next_completion())
        .await
        .expect("task did not complete")
        .expect("completion channel closed");
    assert!(runtime.handle_event(LoopEvent::Completed(completion)));
    assert_eq!(runtime.in_flight(), 0);
}

async fn create_setting(runtime: &mut Manager, name: &str, value: &str) {
    press(runtime, KeyCode::Down);
    press(runtime, KeyCode::Enter);
    assert!(matches!(runtime.state().screen(), Screen::FormEdit { .. }));

    type_text(runtime, name);
    press(runtime, KeyCode::Tab);
    type_text(runtime, value);
    press(runtime, KeyCode::Enter);
    assert!(runtime.state().screen().is_loading());

    settle(runtime).await;
}

async fn browse(runtime: &mut Manager) {
    press(runtime, KeyCode::Enter);
    assert!(runtime.state().screen().is_loading());
    // The spinner only animates while something is loading
    assert!(runtime.redraws_after(&LoopEvent::Tick));
    settle(runtime).await;
    assert!(!runtime.redraws_after(&LoopEvent::Tick));
}

#[tokio::test]
async fn test_created_setting_is_listed_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);

    let mut first = runtime(store.clone());
    create_setting(&mut first, "currency", "EUR").await;
    let state = first.state();
    assert!(state.screen().is_unified());
    assert_eq!(state.sections().active(), Section::MainMenu);
    assert_eq!(state.status().unwrap().text, "Created setting 'currency'");

    let mut second = runtime(store);
    browse(&mut second).await;
    let state = second.state();
    assert!(state.is_loaded());
    assert_eq!(state.sections().active(), Section::Content);
    let items: Vec<_> = state.items().iter().map(|i| (i.id.as_str(), i.description.as_str())).collect();
    assert_eq!(items, vec![("currency", "EUR")]);
}

#[tokio::test]
async fn test_duplicate_create_reports_error_and_returns_to_menu() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    store
        .create(bizctl::api::ItemDraft::new("currency", "EUR"))
        .await
        .unwrap();

    let mut runtime = runtime(store.clone());
    create_setting(&mut runtime, "currency", "USD").await;

    let state = runtime.state();
    assert!(state.screen().is_unified());
    let status = state.status().unwrap();
    assert!(status.is_error());
    assert!(status.text.contains("already exists"));
    assert!(!state.sections().is_visible(Section::Content));

    // The stored value is untouched
    assert_eq!(store.get("currency").await.unwrap().description, "EUR");
}

#[tokio::test]
async fn test_rename_updates_the_listed_entry_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    store
        .create(bizctl::api::ItemDraft::new("currency", "EUR"))
        .await
        .unwrap();

    let mut runtime = runtime(store.clone());
    browse(&mut runtime).await;
    press(&mut runtime, KeyCode::Enter);
    assert_eq!(runtime.state().sections().active(), Section::Management);

    let rename = runtime
        .state()
        .manage_actions()
        .iter()
        .position(|a| *a == ManageAction::Rename)
        .unwrap();
    for _ in 0..rename {
        press(&mut runtime, KeyCode::Down);
    }
    press(&mut runtime, KeyCode::Enter);
    type_text(&mut runtime, "_code");
    press(&mut runtime, KeyCode::Enter);
    settle(&mut runtime).await;

    let state = runtime.state();
    assert_eq!(state.items().len(), 1);
    assert_eq!(state.items()[0].id, "currency_code");
    assert_eq!(state.selected_item().map(|i| i.id.as_str()), Some("currency_code"));
    assert!(state.sections().is_visible(Section::Management));
    assert_eq!(state.status().unwrap().text, "Renamed 'currency_code'");

    assert!(store.get("currency").await.is_err());
}

#[tokio::test]
async fn test_escape_unwinds_sections_then_quits() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    store
        .create(bizctl::api::ItemDraft::new("currency", "EUR"))
        .await
        .unwrap();

    let mut runtime = runtime(store);
    browse(&mut runtime).await;
    press(&mut runtime, KeyCode::Enter);

    let mut visible = Vec::new();
    loop {
        visible.push(runtime.state().sections().visible_sections().len());
        if !press(&mut runtime, KeyCode::Esc) {
            break;
        }
    }
    assert_eq!(visible, vec![3, 2, 1]);
    assert_eq!(runtime.in_flight(), 0);
}

#[tokio::test]
async fn test_cancelled_form_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);

    let mut runtime = runtime(store.clone());
    press(&mut runtime, KeyCode::Down);
    press(&mut runtime, KeyCode::Enter);
    assert_eq!(runtime.state().sections().active(), Section::Content);
    type_text(&mut runtime, "locale");
    press(&mut runtime, KeyCode::Esc);

    assert!(runtime.state().screen().is_unified());
    assert_eq!(runtime.state().sections().visible_sections(), vec![Section::MainMenu]);
    assert_eq!(runtime.state().sections().active(), Section::MainMenu);
    assert_eq!(runtime.in_flight(), 0);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_every_screen_renders() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    store
        .create(bizctl::api::ItemDraft::new("currency", "EUR"))
        .await
        .unwrap();

    let mut runtime = runtime(store);
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| runtime.render(frame)).unwrap();

    browse(&mut runtime).await;
    press(&mut runtime, KeyCode::Enter);
    terminal.draw(|frame| runtime.render(frame)).unwrap();

    // Modify form over the management section
    press(&mut runtime, KeyCode::Down);
    press(&mut runtime, KeyCode::Enter);
    assert!(matches!(runtime.state().screen(), Screen::FormEdit { .. }));
    terminal.draw(|frame| runtime.render(frame)).unwrap();

    let buffer = terminal.backend().buffer();
    let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
    assert!(text.contains("Setting manager"));
    assert!(text.contains("Value"));
}
