use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A business record as the terminal tools see it (a proposal, a setting, ...)
///
/// Only the fields the UI needs are modelled; everything else the backend
/// returns is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Location of the last rendered document, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            artifact_url: None,
            format: None,
            updated_at: None,
        }
    }
}

/// Payload for create and modify requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
}

impl ItemDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Document formats the backend can render an item into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Docx,
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Pdf, OutputFormat::Docx, OutputFormat::Html];

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "PDF document",
            OutputFormat::Docx => "Word document",
            OutputFormat::Html => "Web page",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-place changes to an existing item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Render the item's document again in the given format
    Regenerate(OutputFormat),
    /// Replace title and description
    Modify(ItemDraft),
    /// Replace the title only
    Rename(String),
}

impl MutationKind {
    /// Past-tense verb used in status messages
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Regenerate(_) => "Regenerated",
            MutationKind::Modify(_) => "Updated",
            MutationKind::Rename(_) => "Renamed",
        }
    }
}
