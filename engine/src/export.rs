//! JSON export of the in-memory document.

use std::io;
use std::path::{Path, PathBuf};

use denim_types::WizardDocument;
use denim_utils::{WriteOptions, write_atomic};
use thiserror::Error;

pub const EXPORT_FILE_NAME: &str = "denim_onboarding.json";
pub const EXPORT_MIME: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize answers: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Pretty-printed snapshot of `document` as it is now, independent of what
/// the storage slot last received.
pub fn export_snapshot(document: &WizardDocument) -> Result<ExportArtifact, ExportError> {
    let json = document.to_json_pretty()?;
    Ok(ExportArtifact {
        file_name: EXPORT_FILE_NAME,
        mime: EXPORT_MIME,
        bytes: json.into_bytes(),
    })
}

pub fn write_export(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
    let path = dir.join(artifact.file_name);
    write_atomic(&path, &artifact.bytes, WriteOptions::export()).map_err(|source| {
        ExportError::Write {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}
