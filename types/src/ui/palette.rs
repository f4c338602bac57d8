//! Command palette: filter steps by title and jump.

use unicode_segmentation::UnicodeSegmentation;

use crate::step::Step;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteState {
    filter: String,
    /// Index into [`PaletteState::matches`].
    selected: usize,
}

impl PaletteState {
    /// Open with an empty filter and `current` preselected.
    #[must_use]
    pub fn new(current: Step) -> Self {
        Self {
            filter: String::new(),
            selected: current.index(),
        }
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Steps whose title contains the filter, case-insensitively, in step order.
    #[must_use]
    pub fn matches(&self) -> Vec<Step> {
        let needle = self.filter.to_lowercase();
        Step::ALL
            .into_iter()
            .filter(|step| step.title().to_lowercase().contains(&needle))
            .collect()
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_step(&self) -> Option<Step> {
        self.matches().get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.matches().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    /// Remove the last grapheme. Returns `false` when the filter was already empty.
    pub fn backspace(&mut self) -> bool {
        let Some((idx, _)) = self.filter.grapheme_indices(true).next_back() else {
            return false;
        };
        self.filter.truncate(idx);
        self.selected = 0;
        true
    }
}
