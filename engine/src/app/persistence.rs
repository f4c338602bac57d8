//! Saving and exporting the document.

use std::path::PathBuf;

use chrono::Local;

use super::App;
use crate::export::{export_snapshot, write_export};
use crate::notices::NoticeLevel;
use crate::storage::STORAGE_KEY;

impl App {
    fn write_document(&mut self) -> Result<(), String> {
        let json = self.document.to_json_string().map_err(|e| e.to_string())?;
        self.store
            .set(STORAGE_KEY, &json)
            .map_err(|e| e.to_string())?;
        self.last_saved = Some(Local::now());
        self.save_warning_shown = false;
        Ok(())
    }

    /// Debounced write fired from `tick`.
    pub(crate) fn autosave_document(&mut self) -> bool {
        match self.write_document() {
            Ok(()) => {
                tracing::debug!("Autosaved answers");
                true
            }
            Err(e) => {
                tracing::warn!("Autosave failed: {e}");
                if !self.save_warning_shown {
                    self.notices
                        .push(NoticeLevel::Warn, "Autosave failed. Changes may not persist.");
                    self.save_warning_shown = true;
                }
                false
            }
        }
    }

    /// Write immediately. The pending autosave, if any, is left armed.
    pub fn save_now(&mut self) -> bool {
        if self.autosave.is_stopped() {
            return false;
        }
        match self.write_document() {
            Ok(()) => {
                tracing::info!("Saved answers");
                self.notices.push(NoticeLevel::Info, "Saved.");
                true
            }
            Err(e) => {
                tracing::warn!("Save failed: {e}");
                self.notices
                    .push(NoticeLevel::Warn, format!("Save failed: {e}"));
                false
            }
        }
    }

    /// Write `denim_onboarding.json` into the export directory.
    pub fn export(&mut self) -> Option<PathBuf> {
        let result = export_snapshot(&self.document)
            .and_then(|artifact| write_export(&self.export_dir, &artifact));
        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Exported answers");
                self.notices
                    .push(NoticeLevel::Info, format!("Exported to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Export failed: {e}");
                self.notices
                    .push(NoticeLevel::Warn, format!("Export failed: {e}"));
                None
            }
        }
    }

    /// Teardown: cancel the pending autosave. Nothing is written afterwards.
    pub fn shutdown(&mut self) {
        if self.autosave.is_pending() {
            tracing::debug!("Cancelling pending autosave");
        }
        self.autosave.stop();
    }
}
