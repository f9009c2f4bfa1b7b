use anyhow::Result;
use async_trait::async_trait;

use super::models::{Item, ItemDraft, MutationKind};

/// Remote data collaborator consumed by the terminal tools.
///
/// Every call is treated as one atomic, already-serialized operation. The
/// caller never retries; failures surface to the user as-is.
#[async_trait]
pub trait ItemService: Send + Sync {
    /// Singular noun used in menu labels and status messages ("proposal")
    fn noun(&self) -> &str;

    /// Whether the backend can render documents for items
    fn supports_artifacts(&self) -> bool {
        true
    }

    /// Form labels for an item's title and description
    fn field_labels(&self) -> (&str, &str) {
        ("Title", "Description")
    }

    async fn list(&self) -> Result<Vec<Item>>;

    async fn create(&self, draft: ItemDraft) -> Result<Item>;

    async fn get(&self, id: &str) -> Result<Item>;

    async fn mutate(&self, id: &str, kind: MutationKind) -> Result<Item>;

    async fn delete(&self, id: &str) -> Result<()>;
}
