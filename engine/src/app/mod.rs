//! The wizard state owned by the frame loop.
//!
//! `App` is mutated only from the loop task: key handlers call the methods
//! here and `tick()` runs time-based work (the autosave deadline) once per frame.

mod editing;
mod init;
mod persistence;

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Local};
use denim_types::ui::{NavigationState, PaletteState, UiOptions};
use denim_types::{FieldPath, FieldValue, Step, StepInfo, WizardDocument, step_info};

use crate::autosave::AutosaveScheduler;
use crate::notices::{Notice, NoticeLog};
use crate::storage::KeyValueStore;

pub use editing::FieldFocus;
pub use init::AppOptions;

pub struct App {
    document: WizardDocument,
    nav: NavigationState,
    focus: FieldFocus,
    autosave: AutosaveScheduler,
    store: Box<dyn KeyValueStore>,
    export_dir: PathBuf,
    ui_options: UiOptions,
    notices: NoticeLog,
    last_saved: Option<DateTime<Local>>,
    save_warning_shown: bool,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn document(&self) -> &WizardDocument {
        &self.document
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.nav.step()
    }

    #[must_use]
    pub fn step_info(&self) -> &'static StepInfo {
        step_info(self.nav.step())
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    #[must_use]
    pub fn autosave(&self) -> &AutosaveScheduler {
        &self.autosave
    }

    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    #[must_use]
    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.latest()
    }

    #[must_use]
    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Assign `value` at `path` and arm the autosave timer.
    ///
    /// Returns `false` when the write left the document unchanged; no save is
    /// scheduled in that case.
    pub fn apply(&mut self, path: &FieldPath, value: Option<FieldValue>) -> bool {
        self.apply_at(path, value, Instant::now())
    }

    pub fn apply_at(&mut self, path: &FieldPath, value: Option<FieldValue>, now: Instant) -> bool {
        let next = self.document.update(path, value);
        if next == self.document {
            return false;
        }
        tracing::debug!(%path, "Field updated");
        self.document = next;
        self.autosave.schedule(now);
        true
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn next_step(&mut self) -> bool {
        let moved = self.nav.next();
        if moved {
            self.on_step_changed();
        }
        moved
    }

    pub fn prev_step(&mut self) -> bool {
        let moved = self.nav.back();
        if moved {
            self.on_step_changed();
        }
        moved
    }

    pub fn go_to(&mut self, step: Step) {
        let changed = self.nav.step() != step;
        self.nav.go_to(step);
        if changed {
            self.on_step_changed();
        }
    }

    fn on_step_changed(&mut self) {
        tracing::debug!(step = ?self.nav.step(), "Step changed");
        self.reset_focus();
    }

    pub fn toggle_advanced(&mut self) {
        self.nav.toggle_advanced();
        self.clamp_focus();
    }

    pub fn toggle_why(&mut self) {
        self.nav.toggle_why();
    }

    /// Toggle the `n`-th (zero-based) note of the current step.
    pub fn toggle_note(&mut self, n: usize) -> bool {
        match self.step_info().notes.get(n) {
            Some(note) => {
                self.nav.toggle_accordion(note.key);
                true
            }
            None => false,
        }
    }

    /// Escape: close every overlay without leaving the step.
    pub fn close_overlays(&mut self) {
        self.nav.close_overlays();
        self.clamp_focus();
    }

    // ------------------------------------------------------------------
    // Command palette
    // ------------------------------------------------------------------

    #[must_use]
    pub fn palette(&self) -> Option<&PaletteState> {
        self.nav.palette()
    }

    pub fn open_palette(&mut self) {
        self.nav.open_palette();
    }

    pub fn close_palette(&mut self) {
        self.nav.close_palette();
    }

    pub fn palette_input(&mut self, c: char) {
        if let Some(palette) = self.nav.palette_mut() {
            palette.push_char(c);
        }
    }

    /// Delete from the filter; an empty filter closes the palette.
    pub fn palette_backspace(&mut self) {
        let deleted = self
            .nav
            .palette_mut()
            .is_some_and(PaletteState::backspace);
        if !deleted {
            self.nav.close_palette();
        }
    }

    pub fn palette_up(&mut self) {
        if let Some(palette) = self.nav.palette_mut() {
            palette.move_up();
        }
    }

    pub fn palette_down(&mut self) {
        if let Some(palette) = self.nav.palette_mut() {
            palette.move_down();
        }
    }

    /// Jump to the selected step and close the palette.
    pub fn palette_confirm(&mut self) -> Option<Step> {
        let before = self.nav.step();
        let step = self.nav.confirm_palette()?;
        if step != before {
            self.on_step_changed();
        }
        Some(step)
    }

    // ------------------------------------------------------------------
    // Time-based work
    // ------------------------------------------------------------------

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Run the autosave write if its quiet period has elapsed by `now`.
    pub fn tick_at(&mut self, now: Instant) {
        if self.autosave.take_due(now) {
            self.autosave_document();
        }
    }
}
