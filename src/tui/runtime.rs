//! The event loop.
//!
//! Terminal input, task completions and ticks are merged into one ordered
//! stream with `tokio::select!`. Each event is fully processed (update, then
//! task launch) before the next one is looked at, and the frame is redrawn
//! after every event except ticks the app has no use for. The loop is the
//! only writer of app state.

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::tui::task::{Completion, TaskRunner};
use crate::tui::{App, Command, KeyMap, Theme};

/// One input to the loop
pub enum LoopEvent<Msg> {
    Terminal(Event),
    Completed(Completion<Msg>),
    Tick,
}

/// The runtime manages app state, event routing and command execution
pub struct Runtime<A: App> {
    state: A::State,
    tasks: TaskRunner<A::Msg>,
    completions: mpsc::UnboundedReceiver<Completion<A::Msg>>,
    keys: KeyMap,
    theme: Theme,
    tick_rate: Duration,
}

impl<A: App> Runtime<A> {
    pub fn new(state: A::State, keys: KeyMap, theme: Theme, tick_rate: Duration) -> Self {
        let (tasks, completions) = TaskRunner::new();
        Self {
            state,
            tasks,
            completions,
            keys,
            theme,
            tick_rate,
        }
    }

    pub fn state(&self) -> &A::State {
        &self.state
    }

    /// Tasks launched whose completion has not been processed yet
    pub fn in_flight(&self) -> usize {
        self.tasks.in_flight()
    }

    /// Process one event. Returns false when the app should quit.
    pub fn handle_event(&mut self, event: LoopEvent<A::Msg>) -> bool {
        match event {
            LoopEvent::Terminal(event) => self.handle_terminal(event),
            LoopEvent::Completed(completion) => match self.tasks.accept(completion) {
                Some(msg) => self.dispatch(msg),
                None => true,
            },
            LoopEvent::Tick => match A::tick(&self.state) {
                Some(msg) => self.dispatch(msg),
                None => true,
            },
        }
    }

    fn handle_terminal(&mut self, event: Event) -> bool {
        if let Event::Key(key) = &event {
            if key.kind != KeyEventKind::Press {
                return true;
            }

            // Global quit runs before any screen-specific handling
            if self.keys.quit.matches(key) {
                log::info!("Quit requested with {}", self.keys.quit);
                return false;
            }
            let plain_q = matches!(key.code, KeyCode::Char('q'))
                && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
            if plain_q && A::at_top_level(&self.state) {
                log::info!("Quit requested with q");
                return false;
            }
        }

        match A::on_event(&self.state, event) {
            Some(msg) => self.dispatch(msg),
            None => true,
        }
    }

    fn dispatch(&mut self, msg: A::Msg) -> bool {
        match A::update(&mut self.state, msg) {
            Command::None => true,
            Command::Perform(task) => {
                self.tasks.launch(task);
                true
            }
            Command::Quit => {
                log::info!("App requested quit");
                false
            }
        }
    }

    /// Whether processing `event` can change what is on screen. Ticks only
    /// matter while the app asks for them.
    pub fn redraws_after(&self, event: &LoopEvent<A::Msg>) -> bool {
        match event {
            LoopEvent::Tick => A::tick(&self.state).is_some(),
            _ => true,
        }
    }

    /// Wait for the next task completion (used when driving the loop without a terminal)
    pub async fn next_completion(&mut self) -> Option<Completion<A::Msg>> {
        self.completions.recv().await
    }

    pub fn render(&mut self, frame: &mut Frame) {
        A::view(&mut self.state, frame, &self.theme);
    }

    /// Run until the app quits or the terminal event stream ends
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        log::info!("Starting {}", A::title(&self.state));

        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(self.tick_rate);

        terminal
            .draw(|frame| self.render(frame))
            .context("Failed to draw frame")?;

        loop {
            let event = tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => LoopEvent::Terminal(event),
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => {
                        log::warn!("Terminal event stream closed");
                        return Ok(());
                    }
                },
                Some(completion) = self.completions.recv() => LoopEvent::Completed(completion),
                _ = ticker.tick() => LoopEvent::Tick,
            };

            let redraw = self.redraws_after(&event);
            if !self.handle_event(event) {
                break;
            }

            if redraw {
                terminal
                    .draw(|frame| self.render(frame))
                    .context("Failed to draw frame")?;
            }
        }

        if self.tasks.in_flight() > 0 {
            log::info!("Exiting with {} task(s) still running", self.tasks.in_flight());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use ratatui::backend::TestBackend;
    use ratatui::widgets::Paragraph;

    /// Counter that adds in the background on Enter; Esc quits
    struct Counter;

    struct CounterState {
        value: u32,
        loading: bool,
        nested: bool,
    }

    enum Msg {
        Key(KeyEvent),
        Added(Result<u32, String>),
    }

    impl App for Counter {
        type State = CounterState;
        type Msg = Msg;

        fn update(state: &mut CounterState, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Key(_) if state.loading => Command::None,
                Msg::Key(key) => match key.code {
                    KeyCode::Enter => {
                        state.loading = true;
                        let value = state.value;
                        Command::perform("add", async move { Ok(value + 1) }, Msg::Added)
                    }
                    KeyCode::Esc => Command::Quit,
                    _ => Command::None,
                },
                Msg::Added(result) => {
                    state.loading = false;
                    if let Ok(value) = result {
                        state.value = value;
                    }
                    Command::None
                }
            }
        }

        fn view(state: &mut CounterState, frame: &mut Frame, _theme: &Theme) {
            frame.render_widget(Paragraph::new(format!("value {}", state.value)), frame.area());
        }

        fn on_event(_state: &CounterState, event: Event) -> Option<Msg> {
            match event {
                Event::Key(key) => Some(Msg::Key(key)),
                _ => None,
            }
        }

        fn at_top_level(state: &CounterState) -> bool {
            !state.nested
        }

        fn title(_state: &CounterState) -> String {
            "Counter".to_string()
        }
    }

    fn runtime(nested: bool) -> Runtime<Counter> {
        let state = CounterState {
            value: 0,
            loading: false,
            nested,
        };
        Runtime::new(state, KeyMap::default(), Theme::default(), Duration::from_millis(100))
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> LoopEvent<Msg> {
        LoopEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers)))
    }

    #[tokio::test]
    async fn test_completion_feeds_back_into_update() {
        let mut rt = runtime(false);
        assert!(rt.handle_event(key(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(rt.in_flight(), 1);
        assert!(rt.state().loading);

        // Input while loading is ignored and launches nothing
        assert!(rt.handle_event(key(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(rt.in_flight(), 1);

        let completion = rt.next_completion().await.unwrap();
        assert!(rt.handle_event(LoopEvent::Completed(completion)));
        assert_eq!(rt.state().value, 1);
        assert_eq!(rt.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_ctrl_c_always_quits() {
        let mut rt = runtime(true);
        assert!(!rt.handle_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[tokio::test]
    async fn test_plain_q_only_quits_at_top_level() {
        let mut rt = runtime(true);
        assert!(rt.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE)));

        let mut rt = runtime(false);
        assert!(!rt.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE)));
    }

    #[tokio::test]
    async fn test_app_quit_command_stops_loop() {
        let mut rt = runtime(true);
        assert!(!rt.handle_event(key(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[tokio::test]
    async fn test_idle_ticks_skip_redraw() {
        let rt = runtime(false);
        assert!(!rt.redraws_after(&LoopEvent::Tick));
        assert!(rt.redraws_after(&key(KeyCode::Char('x'), KeyModifiers::NONE)));
    }

    #[tokio::test]
    async fn test_key_release_is_ignored() {
        let mut rt = runtime(false);
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(rt.handle_event(LoopEvent::Terminal(Event::Key(release))));
    }

    #[tokio::test]
    async fn test_render_uses_app_view() {
        let mut rt = runtime(false);
        let mut terminal = Terminal::new(TestBackend::new(20, 1)).unwrap();
        terminal.draw(|frame| rt.render(frame)).unwrap();
        let line: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(line.starts_with("value 0"), "{}", line);
    }
}
