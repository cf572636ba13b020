use crate::changes::FileChangeRecord;
use crate::tree::FlatFileRecord;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log;
use serde::Serialize;
use std::path::Path;

/// The collected files, ready to render.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub files: Vec<FlatFileRecord>,
}

/// Pending changes of a working tree, ready to render.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeReport {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub changes: IndexMap<String, FileChangeRecord>,
}

impl Document {
    pub fn build(title: String, files: Vec<FlatFileRecord>, include_timestamp: bool) -> Self {
        log::debug!("Building document '{}' with {} file(s)", title, files.len());
        Self {
            title,
            generated_at: include_timestamp.then(Utc::now),
            files,
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }
}

impl ChangeReport {
    pub fn build(
        title: String,
        changes: IndexMap<String, FileChangeRecord>,
        include_timestamp: bool,
    ) -> Self {
        log::debug!(
            "Building change report '{}' with {} file(s)",
            title,
            changes.len()
        );
        Self {
            title,
            generated_at: include_timestamp.then(Utc::now),
            changes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Directory name of `root`, or a placeholder when it has none (e.g. `/`).
pub fn default_title(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "UnknownProject".to_string())
}
