pub mod client;
pub mod models;
pub mod service;
pub mod settings;

pub use client::RestItemService;
pub use models::{Item, ItemDraft, MutationKind, OutputFormat};
pub use service::ItemService;
pub use settings::SettingsStore;
