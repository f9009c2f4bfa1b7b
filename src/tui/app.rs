use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::{Command, Theme};

/// The main trait that all TUI apps must implement.
///
/// This follows the Elm architecture:
/// - State: the data that represents the app's current state
/// - Msg: events/actions that can happen
/// - update: handles one message and returns at most one command
/// - view: renders the current state
pub trait App: Sized + Send + 'static {
    /// The app's state type
    type State: Send;

    /// The app's message type
    type Msg: Send + 'static;

    /// Update the state based on a message and return a command
    fn update(state: &mut Self::State, msg: Self::Msg) -> Command<Self::Msg>;

    /// Render the current state into the whole frame
    /// Note: Takes &mut so list widgets can record their viewport height
    fn view(state: &mut Self::State, frame: &mut Frame, theme: &Theme);

    /// Translate a terminal event into a message, if the app cares about it
    fn on_event(state: &Self::State, event: Event) -> Option<Self::Msg>;

    /// Whether a plain `q` should quit (no form or nested section in the way)
    fn at_top_level(state: &Self::State) -> bool;

    /// Return the app's title
    fn title(state: &Self::State) -> String;

    /// Optional: message sent on every loop tick
    fn tick(_state: &Self::State) -> Option<Self::Msg> {
        None
    }
}
