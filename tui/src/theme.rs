//! Color theme and glyphs for the wizard TUI.
//!
//! Indigo-dye inspired palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use denim_types::ui::UiOptions;

/// Indigo palette constants.
mod colors {
    use super::Color;

    // === Backgrounds ===
    pub const BG_DARK: Color = Color::Rgb(16, 20, 33); // deep vat
    pub const BG_PANEL: Color = Color::Rgb(24, 30, 48);
    pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 48, 78);
    pub const BORDER: Color = Color::Rgb(70, 84, 122);

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(226, 224, 210); // ecru
    pub const TEXT_SECONDARY: Color = Color::Rgb(186, 190, 204);
    pub const TEXT_MUTED: Color = Color::Rgb(118, 126, 148);

    // === Brand ===
    pub const INDIGO: Color = Color::Rgb(108, 132, 214);
    pub const SKY: Color = Color::Rgb(134, 186, 222); // bleached denim

    // === Semantic ===
    pub const SUCCESS: Color = Color::Rgb(148, 190, 112);
    pub const WARNING: Color = Color::Rgb(232, 196, 128);
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            border: colors::BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::INDIGO,
            accent: colors::SKY,
            success: colors::SUCCESS,
            warning: colors::WARNING,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::Gray,
            primary: Color::White,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for markers.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub current: &'static str,
    pub answered: &'static str,
    pub unanswered: &'static str,
    pub focused: &'static str,
    pub checked: &'static str,
    pub unchecked: &'static str,
    pub expanded: &'static str,
    pub collapsed: &'static str,
    pub choice_prev: &'static str,
    pub choice_next: &'static str,
    pub separator: &'static str,
    pub empty_value: &'static str,
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            current: ">",
            answered: "*",
            unanswered: "o",
            focused: ">",
            checked: "[x]",
            unchecked: "[ ]",
            expanded: "v",
            collapsed: ">",
            choice_prev: "<",
            choice_next: ">",
            separator: "|",
            empty_value: "-",
        }
    } else {
        Glyphs {
            current: "▶",
            answered: "●",
            unanswered: "○",
            focused: "▸",
            checked: "☑",
            unchecked: "☐",
            expanded: "▾",
            collapsed: "▸",
            choice_prev: "‹",
            choice_next: "›",
            separator: "│",
            empty_value: "—",
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn label(palette: &Palette) -> Style {
        Style::default().fg(palette.text_secondary)
    }

    #[must_use]
    pub fn value(palette: &Palette) -> Style {
        Style::default().fg(palette.text_primary)
    }

    #[must_use]
    pub fn muted(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn focused_row(palette: &Palette) -> Style {
        Style::default()
            .bg(palette.bg_highlight)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border(palette: &Palette) -> Style {
        Style::default().fg(palette.border)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.accent)
    }
}
