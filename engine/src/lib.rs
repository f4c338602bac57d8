//! Core engine for the denim wizard: state machine, autosave and export.
//!
//! This crate owns the mutable wizard state without any TUI dependencies.

mod app;
mod autosave;
mod export;
mod notices;
mod storage;

pub use app::{App, AppOptions, FieldFocus};
pub use autosave::AutosaveScheduler;
pub use export::{
    EXPORT_FILE_NAME, EXPORT_MIME, ExportArtifact, ExportError, export_snapshot, write_export,
};
pub use notices::{Notice, NoticeLevel, NoticeLog};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, STORAGE_KEY, StorageError, load_document,
};

// Re-export the domain crate so frontends need a single dependency.
pub use denim_types;
