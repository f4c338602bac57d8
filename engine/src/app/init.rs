//! App construction.

use std::path::PathBuf;
use std::time::Duration;

use denim_config::{DEFAULT_DEBOUNCE_MS, DenimConfig};
use denim_types::WizardDocument;
use denim_types::ui::{NavigationState, UiOptions};

use super::{App, FieldFocus};
use crate::autosave::AutosaveScheduler;
use crate::notices::NoticeLog;
use crate::storage::{KeyValueStore, load_document};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    pub debounce: Duration,
    pub export_dir: PathBuf,
    pub ui: UiOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            export_dir: PathBuf::from("."),
            ui: UiOptions::default(),
        }
    }
}

impl AppOptions {
    #[must_use]
    pub fn from_config(config: Option<&DenimConfig>) -> Self {
        let Some(config) = config else {
            return Self::default();
        };
        Self {
            debounce: config.debounce(),
            export_dir: config.export_dir(),
            ui: config.ui_options(),
        }
    }
}

impl App {
    /// Start from whatever the store holds (or the default document).
    pub fn new(store: Box<dyn KeyValueStore>, options: AppOptions) -> Self {
        let document = load_document(store.as_ref());
        Self::with_document(document, store, options)
    }

    pub fn with_document(
        document: WizardDocument,
        store: Box<dyn KeyValueStore>,
        options: AppOptions,
    ) -> Self {
        tracing::info!(
            debounce_ms = options.debounce.as_millis() as u64,
            export_dir = %options.export_dir.display(),
            "Wizard initialized"
        );
        let mut app = Self {
            document,
            nav: NavigationState::new(),
            focus: FieldFocus::default(),
            autosave: AutosaveScheduler::new(options.debounce),
            store,
            export_dir: options.export_dir,
            ui_options: options.ui,
            notices: NoticeLog::new(),
            last_saved: None,
            save_warning_shown: false,
            should_quit: false,
        };
        app.reset_focus();
        app
    }
}
