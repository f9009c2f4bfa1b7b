use std::future::Future;

use super::task::Task;

/// Commands represent side effects that apps want to perform.
/// They are returned from the update() function and executed by the runtime.
///
/// An update yields at most one command, so a single transition can launch at
/// most one background task.
pub enum Command<Msg> {
    /// Do nothing
    None,

    /// Run an async operation and feed its result back as a message
    Perform(Task<Msg>),

    /// Quit the application
    Quit,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// Helper to create a command that performs an async operation.
    ///
    /// Errors from `future` (and panics inside it) reach `to_msg` as `Err(String)`.
    pub fn perform<F, T>(
        label: impl Into<String>,
        future: F,
        to_msg: impl FnOnce(Result<T, String>) -> Msg + Send + 'static,
    ) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        Command::Perform(Task::new(label, future, to_msg))
    }
}

impl<Msg> Command<Msg> {
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Command::Quit)
    }

    pub fn launches_task(&self) -> bool {
        matches!(self, Command::Perform(_))
    }

    /// Take the task out of a Perform command
    pub fn into_task(self) -> Option<Task<Msg>> {
        match self {
            Command::Perform(task) => Some(task),
            _ => None,
        }
    }
}

impl<Msg> Default for Command<Msg> {
    fn default() -> Self {
        Command::None
    }
}

impl<Msg> std::fmt::Debug for Command<Msg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::None => f.write_str("None"),
            Command::Perform(task) => f.debug_tuple("Perform").field(&task.label()).finish(),
            Command::Quit => f.write_str("Quit"),
        }
    }
}
