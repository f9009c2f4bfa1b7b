//! Background work launched by the manager. Each function returns the one
//! command an update may yield; the service handle is moved into the task.

use anyhow::Context;
use std::sync::Arc;

use super::Msg;
use crate::api::{ItemDraft, ItemService, MutationKind, OutputFormat};
use crate::tui::Command;

pub(super) fn list(service: Arc<dyn ItemService>) -> Command<Msg> {
    Command::perform("list items", async move { service.list().await }, Msg::Listed)
}

/// Create, then render the default document. A render failure is reported
/// as-is; the created record is not rolled back.
pub(super) fn create(service: Arc<dyn ItemService>, draft: ItemDraft) -> Command<Msg> {
    Command::perform(
        "create item",
        async move {
            let item = service.create(draft).await?;
            if !service.supports_artifacts() {
                return Ok(item);
            }
            service
                .mutate(&item.id, MutationKind::Regenerate(OutputFormat::default()))
                .await
                .with_context(|| format!("Created '{}' but rendering its document failed", item.title))
        },
        Msg::Created,
    )
}

pub(super) fn refresh(service: Arc<dyn ItemService>, id: String) -> Command<Msg> {
    let target = id.clone();
    Command::perform(
        "refresh item",
        async move { service.get(&target).await },
        move |result| Msg::Updated {
            id,
            verb: "Refreshed",
            result,
        },
    )
}

pub(super) fn mutate(service: Arc<dyn ItemService>, id: String, kind: MutationKind) -> Command<Msg> {
    let verb = kind.verb();
    let target = id.clone();
    Command::perform(
        format!("{} item", verb.to_lowercase()),
        async move { service.mutate(&target, kind).await },
        move |result| Msg::Updated { id, verb, result },
    )
}

pub(super) fn delete(service: Arc<dyn ItemService>, id: String) -> Command<Msg> {
    let target = id.clone();
    Command::perform(
        "delete item",
        async move { service.delete(&target).await },
        move |result| Msg::Deleted { id, result },
    )
}
