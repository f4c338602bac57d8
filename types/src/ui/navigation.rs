//! Step navigation and overlay state.
//!
//! Nothing here is persisted: a fresh session starts at [`Step::FIRST`] with
//! every overlay closed.

use crate::step::Step;
use crate::ui::palette::PaletteState;

/// An expanded accordion note. Scoped to the step it was opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccordionKey {
    pub step: Step,
    pub key: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    step: Step,
    advanced_open: bool,
    why_open: bool,
    accordion: Option<AccordionKey>,
    palette: Option<PaletteState>,
}

impl NavigationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Advance one step. Returns `false` (and does nothing) at the last step.
    pub fn next(&mut self) -> bool {
        match self.step.next() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Go back one step. Returns `false` (and does nothing) at the first step.
    pub fn back(&mut self) -> bool {
        match self.step.prev() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    pub fn go_to(&mut self, step: Step) {
        self.step = step;
    }

    #[must_use]
    pub fn advanced_open(&self) -> bool {
        self.advanced_open
    }

    pub fn toggle_advanced(&mut self) {
        self.advanced_open = !self.advanced_open;
    }

    #[must_use]
    pub fn why_open(&self) -> bool {
        self.why_open
    }

    pub fn toggle_why(&mut self) {
        self.why_open = !self.why_open;
    }

    /// Expand `key` on the current step, collapsing any other note.
    /// Toggling the expanded note collapses it.
    pub fn toggle_accordion(&mut self, key: &'static str) {
        let target = AccordionKey {
            step: self.step,
            key,
        };
        if self.accordion == Some(target) {
            self.accordion = None;
        } else {
            self.accordion = Some(target);
        }
    }

    /// Key of the note expanded on the current step, if any.
    #[must_use]
    pub fn expanded_accordion(&self) -> Option<&'static str> {
        self.accordion
            .filter(|open| open.step == self.step)
            .map(|open| open.key)
    }

    #[must_use]
    pub fn palette(&self) -> Option<&PaletteState> {
        self.palette.as_ref()
    }

    pub fn palette_mut(&mut self) -> Option<&mut PaletteState> {
        self.palette.as_mut()
    }

    #[must_use]
    pub fn palette_open(&self) -> bool {
        self.palette.is_some()
    }

    pub fn open_palette(&mut self) {
        self.palette = Some(PaletteState::new(self.step));
    }

    pub fn close_palette(&mut self) {
        self.palette = None;
    }

    /// Jump to the palette selection and close it. Returns the step jumped to.
    pub fn confirm_palette(&mut self) -> Option<Step> {
        let step = self.palette.take()?.selected_step()?;
        self.go_to(step);
        Some(step)
    }

    /// Escape: close every overlay, keep the current step.
    pub fn close_overlays(&mut self) {
        self.advanced_open = false;
        self.why_open = false;
        self.accordion = None;
        self.palette = None;
    }

    #[must_use]
    pub fn any_overlay_open(&self) -> bool {
        self.advanced_open || self.why_open || self.accordion.is_some() || self.palette.is_some()
    }
}
