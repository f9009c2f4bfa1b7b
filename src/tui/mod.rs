pub mod app;
pub mod apps;
pub mod command;
pub mod keys;
pub mod modal;
pub mod runtime;
pub mod screen;
pub mod sections;
pub mod status;
pub mod task;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use command::Command;
pub use keys::{KeyBinding, KeyMap};
pub use modal::{CancellableForm, ModalForm, ModalOutcome};
pub use runtime::{LoopEvent, Runtime};
pub use screen::{FormKind, FormatPicker, Screen};
pub use sections::{Section, SectionMux, SectionPanes};
pub use status::{Severity, StatusMessage};
pub use task::{Completion, Task, TaskId, TaskRunner};
pub use theme::{Theme, ThemeVariant};
