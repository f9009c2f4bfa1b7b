//! Local settings store backing the configuration manager.
//!
//! Entries live in a TOML file keyed by name. Each entry is presented to the
//! TUI as an [`Item`] whose id and title are the key and whose description is
//! the value.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::models::{Item, ItemDraft, MutationKind};
use super::service::ItemService;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    entries: BTreeMap<String, Entry>,
}

pub struct SettingsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles between concurrently running tasks
    lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<SettingsFile> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            log::debug!("Settings file {:?} missing, starting empty", self.path);
            return Ok(SettingsFile::default());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read settings file: {:?}", self.path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse settings file: {:?}", self.path))
    }

    async fn save(&self, file: &SettingsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(file).context("Failed to serialize settings to TOML")?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write settings file: {:?}", self.path))?;
        log::info!("Saved {} settings to {:?}", file.entries.len(), self.path);
        Ok(())
    }
}

fn to_item(key: &str, entry: &Entry) -> Item {
    Item {
        updated_at: entry.updated_at,
        ..Item::new(key, key, entry.value.clone())
    }
}

fn validate_key(key: &str) -> Result<&str> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Setting name cannot be empty");
    }
    if key.chars().any(char::is_whitespace) {
        anyhow::bail!("Setting name '{}' cannot contain whitespace", key);
    }
    Ok(key)
}

#[async_trait]
impl ItemService for SettingsStore {
    fn noun(&self) -> &str {
        "setting"
    }

    fn supports_artifacts(&self) -> bool {
        false
    }

    fn field_labels(&self) -> (&str, &str) {
        ("Name", "Value")
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        Ok(file.entries.iter().map(|(key, entry)| to_item(key, entry)).collect())
    }

    async fn create(&self, draft: ItemDraft) -> Result<Item> {
        let _guard = self.lock.lock().await;
        let key = validate_key(&draft.title)?.to_string();
        let mut file = self.load().await?;
        if file.entries.contains_key(&key) {
            anyhow::bail!("Setting '{}' already exists", key);
        }
        let entry = Entry {
            value: draft.description,
            updated_at: Some(Utc::now()),
        };
        let item = to_item(&key, &entry);
        file.entries.insert(key, entry);
        self.save(&file).await?;
        Ok(item)
    }

    async fn get(&self, id: &str) -> Result<Item> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        file.entries
            .get(id)
            .map(|entry| to_item(id, entry))
            .with_context(|| format!("Setting '{}' not found", id))
    }

    async fn mutate(&self, id: &str, kind: MutationKind) -> Result<Item> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        let mut entry = file
            .entries
            .remove(id)
            .with_context(|| format!("Setting '{}' not found", id))?;

        let new_key = match kind {
            MutationKind::Regenerate(_) => anyhow::bail!("Settings have no rendered documents"),
            MutationKind::Modify(draft) => {
                entry.value = draft.description;
                validate_key(&draft.title)?.to_string()
            }
            MutationKind::Rename(title) => validate_key(&title)?.to_string(),
        };
        if new_key != id && file.entries.contains_key(&new_key) {
            anyhow::bail!("Setting '{}' already exists", new_key);
        }

        entry.updated_at = Some(Utc::now());
        let item = to_item(&new_key, &entry);
        file.entries.insert(new_key, entry);
        self.save(&file).await?;
        Ok(item)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        if file.entries.remove(id).is_none() {
            anyhow::bail!("Setting '{}' not found", id);
        }
        self.save(&file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OutputFormat;

    fn store(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("nested").join("settings.toml"))
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_list_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.create(ItemDraft::new("vat_rate", "21")).await.unwrap();
        store.create(ItemDraft::new("currency", "EUR")).await.unwrap();

        let items = store.list().await.unwrap();
        let keys: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(keys, vec!["currency", "vat_rate"]);
        assert_eq!(items[0].description, "EUR");
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.create(ItemDraft::new("currency", "EUR")).await.unwrap();
        let err = store.create(ItemDraft::new("currency", "USD")).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_rename_moves_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.create(ItemDraft::new("currency", "EUR")).await.unwrap();

        let renamed = store
            .mutate("currency", MutationKind::Rename("default_currency".into()))
            .await
            .unwrap();
        assert_eq!(renamed.id, "default_currency");
        assert_eq!(renamed.description, "EUR");
        assert!(store.get("currency").await.is_err());
    }

    #[tokio::test]
    async fn test_modify_updates_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.create(ItemDraft::new("currency", "EUR")).await.unwrap();

        let item = store
            .mutate("currency", MutationKind::Modify(ItemDraft::new("currency", "USD")))
            .await
            .unwrap();
        assert_eq!(item.description, "USD");
        assert_eq!(store.get("currency").await.unwrap().description, "USD");
    }

    #[tokio::test]
    async fn test_regenerate_is_rejected_and_keeps_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.create(ItemDraft::new("currency", "EUR")).await.unwrap();

        let err = store
            .mutate("currency", MutationKind::Regenerate(OutputFormat::Pdf))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no rendered documents"));
        assert!(store.get("currency").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        assert!(store.delete("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        assert!(store.create(ItemDraft::new("two words", "x")).await.is_err());
        assert!(store.create(ItemDraft::new("  ", "x")).await.is_err());
    }
}
