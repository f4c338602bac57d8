//! Short status-bar messages for the user.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

const MAX_NOTICES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub at: DateTime<Local>,
}

/// Bounded log of recent notices, newest last.
#[derive(Debug, Default)]
pub struct NoticeLog {
    entries: VecDeque<Notice>,
}

impl NoticeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notice. A repeat of the newest notice only refreshes its time.
    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        let at = Local::now();
        if let Some(last) = self.entries.back_mut()
            && last.level == level
            && last.text == text
        {
            last.at = at;
            return;
        }
        if self.entries.len() == MAX_NOTICES {
            self.entries.pop_front();
        }
        self.entries.push_back(Notice { level, text, at });
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Notice> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter()
    }
}
