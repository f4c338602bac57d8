//! Field focus and keystroke editing.
//!
//! Text-like fields keep an edit buffer; every keystroke re-coerces the whole
//! buffer and writes the result through [`App::apply`]. Choice fields are
//! edited through an option cursor instead.

use denim_types::{
    FieldKind, FieldPath, FieldSpec, FieldValue, Node, format_number, parse_number,
    parse_percent, text_value, toggle_choice,
};
use unicode_segmentation::UnicodeSegmentation;

use super::App;

/// Which field has focus on the current step, plus its editing state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFocus {
    index: usize,
    option: usize,
    buffer: String,
}

impl FieldFocus {
    /// Position in [`App::visible_fields`].
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Option cursor for choice and multi-choice fields.
    #[must_use]
    pub fn option(&self) -> usize {
        self.option
    }

    /// Edit buffer for text, number and percent fields.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }
}

/// Whether `c` may be appended to `buffer`. Numeric buffers only take a
/// leading '-' and a single '.', so a stray key cannot make the whole
/// buffer unparsable and wipe the stored answer.
fn accepts(kind: FieldKind, buffer: &str, c: char) -> bool {
    match kind {
        FieldKind::Text => !c.is_control(),
        FieldKind::Number { .. } | FieldKind::Percent => match c {
            '-' => buffer.is_empty(),
            '.' => !buffer.contains('.'),
            _ => c.is_ascii_digit(),
        },
        FieldKind::Choice(_) | FieldKind::Multi(_) => false,
    }
}

impl App {
    #[must_use]
    pub fn focus(&self) -> &FieldFocus {
        &self.focus
    }

    /// Fields the user can reach on this step: primary fields, then the
    /// advanced ones while the side panel is open.
    #[must_use]
    pub fn visible_fields(&self) -> Vec<&'static FieldSpec> {
        let info = self.step_info();
        let mut fields: Vec<_> = info.primary_fields().collect();
        if self.nav.advanced_open() {
            fields.extend(info.advanced_fields());
        }
        fields
    }

    #[must_use]
    pub fn focused_field(&self) -> Option<&'static FieldSpec> {
        self.visible_fields().get(self.focus.index).copied()
    }

    fn path_for(&self, spec: &FieldSpec) -> Option<FieldPath> {
        FieldPath::field(self.nav.step().section(), spec.key).ok()
    }

    #[must_use]
    pub fn field_value(&self, spec: &FieldSpec) -> Option<&Node> {
        let path = self.path_for(spec)?;
        self.document.get(&path)
    }

    /// Stored value rendered as text; empty when unanswered.
    #[must_use]
    pub fn display_value(&self, spec: &FieldSpec) -> String {
        match self.field_value(spec) {
            Some(Node::Text(text)) => text.clone(),
            Some(Node::Number(n)) => format_number(*n),
            Some(Node::Choices(choices)) => choices.join(", "),
            Some(Node::Map(_)) | None => String::new(),
        }
    }

    pub fn focus_next_field(&mut self) -> bool {
        if self.focus.index + 1 >= self.visible_fields().len() {
            return false;
        }
        self.focus.index += 1;
        self.reseed_focus();
        true
    }

    pub fn focus_prev_field(&mut self) -> bool {
        if self.focus.index == 0 {
            return false;
        }
        self.focus.index -= 1;
        self.reseed_focus();
        true
    }

    pub(crate) fn reset_focus(&mut self) {
        self.focus.index = 0;
        self.reseed_focus();
    }

    /// Keep focus on a visible field after the advanced panel closes.
    pub(crate) fn clamp_focus(&mut self) {
        let len = self.visible_fields().len();
        if self.focus.index >= len {
            self.focus.index = len.saturating_sub(1);
            self.reseed_focus();
        }
    }

    fn reseed_focus(&mut self) {
        let Some(spec) = self.focused_field() else {
            self.focus.buffer.clear();
            self.focus.option = 0;
            return;
        };
        self.focus.buffer = if spec.kind.is_textual() {
            self.display_value(spec)
        } else {
            String::new()
        };
        self.focus.option = match (spec.kind, self.field_value(spec)) {
            (FieldKind::Choice(options), Some(Node::Text(current))) => {
                options.iter().position(|o| o == current).unwrap_or(0)
            }
            _ => 0,
        };
    }

    /// Type a character into the focused text-like field. Returns `false`
    /// when the field does not take `c`; numeric fields reject a '-' after
    /// the first position and a second '.'.
    pub fn insert_char(&mut self, c: char) -> bool {
        let Some(spec) = self.focused_field() else {
            return false;
        };
        if !accepts(spec.kind, &self.focus.buffer, c) {
            return false;
        }
        self.focus.buffer.push(c);
        self.commit_buffer(spec);
        true
    }

    /// Delete the last grapheme of the focused text-like field.
    pub fn delete_char(&mut self) -> bool {
        let Some(spec) = self.focused_field() else {
            return false;
        };
        if !spec.kind.is_textual() {
            return false;
        }
        let Some((idx, _)) = self.focus.buffer.grapheme_indices(true).next_back() else {
            return false;
        };
        self.focus.buffer.truncate(idx);
        self.commit_buffer(spec);
        true
    }

    fn commit_buffer(&mut self, spec: &'static FieldSpec) {
        let Some(path) = self.path_for(spec) else {
            return;
        };
        let value = match spec.kind {
            FieldKind::Text => text_value(&self.focus.buffer),
            FieldKind::Number { .. } => parse_number(&self.focus.buffer).map(FieldValue::Number),
            FieldKind::Percent => {
                let parsed = parse_percent(&self.focus.buffer);
                // Show the clamped value rather than the out-of-range input.
                if let Some(n) = parsed
                    && parse_number(&self.focus.buffer) != Some(n)
                {
                    self.focus.buffer = format_number(n);
                }
                parsed.map(FieldValue::Number)
            }
            FieldKind::Choice(_) | FieldKind::Multi(_) => return,
        };
        self.apply(&path, value);
    }

    /// Space: toggles a multi-choice option, otherwise types a space.
    pub fn space(&mut self) -> bool {
        match self.focused_field().map(|spec| spec.kind) {
            Some(FieldKind::Multi(_)) => self.toggle_focused_option(),
            Some(_) => self.insert_char(' '),
            None => false,
        }
    }

    /// Left/Right: pick the neighbouring option of a single-choice field, or
    /// move the option cursor of a multi-choice field.
    pub fn cycle_option(&mut self, forward: bool) -> bool {
        let Some(spec) = self.focused_field() else {
            return false;
        };
        match spec.kind {
            FieldKind::Choice(options) if !options.is_empty() => {
                let answered = matches!(self.field_value(spec), Some(Node::Text(_)));
                let len = options.len();
                let next = match (answered, forward) {
                    (false, true) => 0,
                    (false, false) => len - 1,
                    (true, true) => (self.focus.option + 1) % len,
                    (true, false) => (self.focus.option + len - 1) % len,
                };
                self.focus.option = next;
                let Some(path) = self.path_for(spec) else {
                    return false;
                };
                self.apply(&path, Some(FieldValue::Text(options[next].to_string())));
                true
            }
            FieldKind::Multi(options) if !options.is_empty() => {
                let len = options.len();
                self.focus.option = if forward {
                    (self.focus.option + 1) % len
                } else {
                    (self.focus.option + len - 1) % len
                };
                true
            }
            _ => false,
        }
    }

    /// Toggle the option under the cursor of a multi-choice field.
    /// Removing the last option clears the field.
    pub fn toggle_focused_option(&mut self) -> bool {
        let Some(spec) = self.focused_field() else {
            return false;
        };
        let FieldKind::Multi(options) = spec.kind else {
            return false;
        };
        let Some(option) = options.get(self.focus.option) else {
            return false;
        };
        let Some(path) = self.path_for(spec) else {
            return false;
        };
        let current = self
            .field_value(spec)
            .and_then(Node::as_choices)
            .unwrap_or_default();
        let next = toggle_choice(current, option);
        let value = (!next.is_empty()).then_some(FieldValue::Choices(next));
        self.apply(&path, value);
        true
    }
}
