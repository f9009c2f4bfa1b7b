//! Background task execution for the event loop.
//!
//! A [`Task`] wraps one asynchronous unit of work (usually a short sequence of
//! data API calls) together with the function that turns its result into an
//! app message. The [`TaskRunner`] spawns it on the tokio runtime and delivers
//! exactly one [`Completion`] back through an mpsc channel. Errors and panics
//! are both converted into the message at the task boundary, so nothing
//! unwinds into the loop. While a task runs, [`current_task`] names it, which
//! lets a process-wide panic hook tell a caught task panic from a fatal one.

use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use tokio::sync::mpsc;

pub type TaskId = u64;

tokio::task_local! {
    static TASK_LABEL: String;
}

/// Label of the task being polled on this thread, if any
pub fn current_task() -> Option<String> {
    TASK_LABEL.try_with(|label| label.clone()).ok()
}

/// One unit of background work producing exactly one message
pub struct Task<Msg> {
    label: String,
    future: Pin<Box<dyn Future<Output = Msg> + Send>>,
}

impl<Msg: Send + 'static> Task<Msg> {
    pub fn new<F, T, M>(label: impl Into<String>, future: F, to_msg: M) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Send + 'static,
        M: FnOnce(Result<T, String>) -> Msg + Send + 'static,
    {
        let label = label.into();
        let guarded = TASK_LABEL.scope(label.clone(), AssertUnwindSafe(future).catch_unwind());
        let future = Box::pin(async move {
            let result = match guarded.await {
                Ok(result) => result.map_err(|e| format!("{:#}", e)),
                Err(payload) => Err(panic_message(payload.as_ref())),
            };
            to_msg(result)
        });

        Self { label, future }
    }
}

impl<Msg> Task<Msg> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Drive the task to completion on the current task (used by tests)
    pub async fn run(self) -> Msg {
        self.future.await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("Task panicked: {}", detail)
}

/// Message from a finished task, tagged with the id it was launched under
pub struct Completion<Msg> {
    pub id: TaskId,
    pub msg: Msg,
}

pub struct TaskRunner<Msg> {
    tx: mpsc::UnboundedSender<Completion<Msg>>,
    next_id: TaskId,
    /// Launched but not yet delivered: id -> label
    pending: HashMap<TaskId, String>,
}

impl<Msg: Send + 'static> TaskRunner<Msg> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Completion<Msg>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = Self {
            tx,
            next_id: 1,
            pending: HashMap::new(),
        };
        (runner, rx)
    }

    /// Spawn the task; its completion arrives later on the receiver
    pub fn launch(&mut self, task: Task<Msg>) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;

        let Task { label, future } = task;
        log::info!("Launching task #{} ({})", id, label);
        self.pending.insert(id, label);

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = future.await;
            if tx.send(Completion { id, msg }).is_err() {
                log::debug!("Task #{} finished after the event loop stopped", id);
            }
        });

        id
    }

    /// Admit a completion into the loop. Returns `None` for ids that are not
    /// pending, so each launch yields at most one message.
    pub fn accept(&mut self, completion: Completion<Msg>) -> Option<Msg> {
        match self.pending.remove(&completion.id) {
            Some(label) => {
                log::info!("Task #{} ({}) completed", completion.id, label);
                Some(completion.msg)
            }
            None => {
                log::warn!("Ignoring completion for unknown task #{}", completion.id);
                None
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }
}
