//! Text decodability probing and the unreadable-file policy shared by both
//! collectors.

use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Outcome of reading a file that is expected to contain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextProbe {
    Text(String),
    Binary,
}

/// What to do with a selected file whose bytes are not valid UTF-8.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnreadablePolicy {
    /// Log a warning and leave the file out.
    #[default]
    Skip,
    /// Abort the collection with `AppError::UnreadableFile`.
    Fail,
}

pub fn probe_text(path: &Path) -> Result<TextProbe> {
    let bytes = fs::read(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(probe_bytes(bytes))
}

pub fn probe_bytes(bytes: Vec<u8>) -> TextProbe {
    match String::from_utf8(bytes) {
        Ok(content) => TextProbe::Text(content),
        Err(_) => TextProbe::Binary,
    }
}

impl UnreadablePolicy {
    /// Applies the policy to a file found to be binary. `Ok(())` means the
    /// caller should skip the file and carry on.
    pub fn handle(self, path: &Path) -> Result<()> {
        match self {
            UnreadablePolicy::Skip => {
                log::warn!("Skipping non-UTF-8 file: {}", path.display());
                Ok(())
            }
            UnreadablePolicy::Fail => Err(AppError::UnreadableFile {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Applies the policy to a per-entry read or listing failure. Under
    /// `Skip` the error only costs that one entry.
    pub fn handle_error(self, err: AppError) -> Result<()> {
        match self {
            UnreadablePolicy::Skip => {
                log::warn!("Skipping unreadable entry: {}", err);
                Ok(())
            }
            UnreadablePolicy::Fail => Err(err),
        }
    }
}
