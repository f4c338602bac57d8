//! TUI rendering for the denim wizard using ratatui.

mod input;
mod theme;

pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use denim_engine::{App, NoticeLevel};
use denim_types::ui::PaletteState;
use denim_types::{FieldKind, FieldSpec, Node, Step};

const RAIL_WIDTH: u16 = 28;
const ADVANCED_WIDTH: u16 = 42;
const WHY_HEIGHT: u16 = 6;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Wizard
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette, &glyphs);

    let mut columns = vec![Constraint::Length(RAIL_WIDTH), Constraint::Min(20)];
    if app.navigation().advanced_open() {
        columns.push(Constraint::Length(ADVANCED_WIDTH));
    }
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(columns)
        .split(chunks[1]);

    draw_step_rail(frame, app, body[0], &palette, &glyphs);
    draw_step_panel(frame, app, body[1], &palette, &glyphs);
    if let Some(area) = body.get(2) {
        draw_advanced_panel(frame, app, *area, &palette, &glyphs);
    }
    draw_status_bar(frame, app, chunks[2], &palette);

    if let Some(state) = app.palette() {
        draw_step_palette(frame, state, &palette, &glyphs);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let step = app.step();
    let line = Line::from(vec![
        Span::styled(" denim onboarding ", styles::title(palette)),
        Span::styled(format!("{} ", glyphs.separator), styles::muted(palette)),
        Span::styled(
            format!(
                "Step {}/{}: {}",
                step.index() + 1,
                Step::ALL.len(),
                step.title()
            ),
            styles::value(palette),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_step_rail(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let current = app.step();
    let lines: Vec<Line> = Step::ALL
        .into_iter()
        .map(|step| {
            let answered = app.document().answered(step.section());
            let (marker, style) = if step == current {
                (glyphs.current, styles::title(palette))
            } else if answered > 0 {
                (glyphs.answered, Style::default().fg(palette.success))
            } else {
                (glyphs.unanswered, styles::muted(palette))
            };
            let mut spans = vec![
                Span::styled(format!("{marker} "), style),
                Span::styled(step.title(), style),
            ];
            if answered > 0 {
                spans.push(Span::styled(
                    format!(" ({answered})"),
                    styles::muted(palette),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let rail = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::border(palette))
            .style(Style::default().bg(palette.bg_panel))
            .padding(Padding::horizontal(1))
            .title(Line::from(Span::styled(" Steps ", styles::label(palette)))),
    );
    frame.render_widget(rail, area);
}

fn draw_step_panel(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let area = if app.navigation().why_open() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(WHY_HEIGHT)])
            .split(area);
        draw_why_panel(frame, app, split[1], palette);
        split[0]
    } else {
        area
    };

    let info = app.step_info();
    let mut lines: Vec<Line> = vec![Line::from("")];
    for (index, spec) in info.primary_fields().enumerate() {
        push_field_lines(&mut lines, app, index, spec, palette, glyphs);
    }

    if !info.notes.is_empty() {
        lines.push(Line::from(""));
        let expanded = app.navigation().expanded_accordion();
        for (i, note) in info.notes.iter().enumerate() {
            let open = expanded == Some(note.key);
            let marker = if open { glyphs.expanded } else { glyphs.collapsed };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker} "), styles::key_hint(palette)),
                Span::styled(note.title, styles::label(palette)),
                Span::styled(format!("  Alt+{}", i + 1), styles::muted(palette)),
            ]));
            if open {
                lines.push(Line::from(Span::styled(
                    format!("    {}", note.body),
                    styles::value(palette),
                )));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(key_hints(palette, glyphs));

    let title = format!(" {} ", app.step().title());
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.primary))
                .style(Style::default().bg(palette.bg_panel))
                .padding(Padding::horizontal(1))
                .title(Line::from(Span::styled(title, styles::title(palette)))),
        );
    frame.render_widget(panel, area);
}

fn key_hints(palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    let hints = [
        ("Tab", "next"),
        ("Shift+Tab", "back"),
        ("Ctrl+K", "jump"),
        ("Ctrl+S", "save"),
        ("Ctrl+E", "export"),
        ("F1", "why"),
        ("F2", "advanced"),
        ("Ctrl+Q", "quit"),
    ];
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                format!(" {} ", glyphs.separator),
                styles::muted(palette),
            ));
        }
        spans.push(Span::styled(key, styles::key_hint(palette)));
        spans.push(Span::styled(format!(" {action}"), styles::muted(palette)));
    }
    Line::from(spans)
}

fn draw_why_panel(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let why = Paragraph::new(app.step_info().why)
        .style(styles::value(palette))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.accent))
                .style(Style::default().bg(palette.bg_panel))
                .padding(Padding::horizontal(1))
                .title(Line::from(Span::styled(
                    " Why we ask ",
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ))),
        );
    frame.render_widget(why, area);
}

fn draw_advanced_panel(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let info = app.step_info();
    // Advanced fields follow the primary ones in focus order.
    let offset = info.primary_fields().count();
    let mut lines: Vec<Line> = vec![Line::from("")];
    let mut any = false;
    for (i, spec) in info.advanced_fields().enumerate() {
        any = true;
        push_field_lines(&mut lines, app, offset + i, spec, palette, glyphs);
    }
    if !any {
        lines.push(Line::from(Span::styled(
            "No advanced fields on this step",
            styles::muted(palette),
        )));
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(styles::border(palette))
            .style(Style::default().bg(palette.bg_panel))
            .padding(Padding::horizontal(1))
            .title(Line::from(Span::styled(" Advanced ", styles::label(palette)))),
    );
    frame.render_widget(panel, area);
}

fn push_field_lines(
    lines: &mut Vec<Line<'static>>,
    app: &App,
    index: usize,
    spec: &FieldSpec,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let focused = app.focus().index() == index;
    let marker = if focused { glyphs.focused } else { " " };
    let row_style = if focused {
        styles::focused_row(palette)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(format!("{marker} "), styles::key_hint(palette)),
        Span::styled(format!("{}: ", spec.label), styles::label(palette)),
    ];
    spans.extend(value_spans(app, spec, focused, palette, glyphs));
    lines.push(Line::from(spans).style(row_style));

    // Focused multi-choice fields list every option with its checkbox.
    if focused && let FieldKind::Multi(options) = spec.kind {
        let selected = app
            .field_value(spec)
            .and_then(Node::as_choices)
            .unwrap_or_default();
        let cursor = app.focus().option();
        let mut option_spans = vec![Span::raw("    ")];
        for (i, option) in options.iter().enumerate() {
            let checked = selected.iter().any(|s| s == option);
            let mark = if checked { glyphs.checked } else { glyphs.unchecked };
            let mut style = if checked {
                Style::default().fg(palette.success)
            } else {
                styles::muted(palette)
            };
            if i == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            option_spans.push(Span::styled(format!("{mark} {option}"), style));
            option_spans.push(Span::raw("  "));
        }
        lines.push(Line::from(option_spans));
    }
}

fn value_spans(
    app: &App,
    spec: &FieldSpec,
    focused: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Span<'static>> {
    let unit = match spec.kind {
        FieldKind::Number { unit } => Some(unit),
        FieldKind::Percent => Some("%"),
        _ => None,
    };

    let text = if focused && spec.kind.is_textual() {
        app.focus().buffer().to_string()
    } else {
        app.display_value(spec)
    };

    let mut spans = Vec::new();
    if focused && matches!(spec.kind, FieldKind::Choice(_)) {
        spans.push(Span::styled(
            format!("{} ", glyphs.choice_prev),
            styles::key_hint(palette),
        ));
    }
    if text.is_empty() {
        if !(focused && spec.kind.is_textual()) {
            spans.push(Span::styled(glyphs.empty_value, styles::muted(palette)));
        }
    } else {
        spans.push(Span::styled(text, styles::value(palette)));
    }
    if focused && spec.kind.is_textual() {
        spans.push(Span::styled(
            "_",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    if let Some(unit) = unit {
        spans.push(Span::styled(format!(" {unit}"), styles::muted(palette)));
    }
    if focused && matches!(spec.kind, FieldKind::Choice(_)) {
        spans.push(Span::styled(
            format!(" {}", glyphs.choice_next),
            styles::key_hint(palette),
        ));
    }
    spans
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let (status_text, status_style) = match app.latest_notice() {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Warn => palette.warning,
                NoticeLevel::Info => palette.text_secondary,
            };
            (notice.text.clone(), Style::default().fg(color))
        }
        None => (String::new(), Style::default()),
    };

    let (save_text, save_style) = if app.autosave().is_stopped() {
        (String::new(), Style::default())
    } else if app.autosave().is_pending() {
        (
            "Autosave pending".to_string(),
            Style::default().fg(palette.warning),
        )
    } else if let Some(at) = app.last_saved() {
        (
            format!("Saved {}", at.format("%H:%M:%S")),
            Style::default().fg(palette.success),
        )
    } else {
        (String::new(), Style::default())
    };

    let save_width = u16::try_from(save_text.width() + 1).unwrap_or(u16::MAX);
    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(save_width)])
        .split(area);

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(status_text, status_style),
    ]));
    frame.render_widget(status, split[0]);

    let save = Paragraph::new(Span::styled(save_text, save_style)).alignment(Alignment::Right);
    frame.render_widget(save, split[1]);
}

fn draw_step_palette(frame: &mut Frame, state: &PaletteState, palette: &Palette, glyphs: &Glyphs) {
    let area = frame.area();
    let matches = state.matches();

    let palette_width = 44.min(area.width.saturating_sub(4));
    let rows = u16::try_from(matches.len().max(1)).unwrap_or(u16::MAX);
    let palette_height = rows.saturating_add(5).min(area.height);

    let palette_area = Rect {
        x: area.x + (area.width.saturating_sub(palette_width) / 2),
        y: area.y + (area.height.saturating_sub(palette_height) / 3),
        width: palette_width,
        height: palette_height,
    };

    // Clear background
    frame.render_widget(Clear, palette_area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    if state.filter().is_empty() {
        lines.push(Line::from(Span::styled(
            "  Type to filter steps...",
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  / ", styles::key_hint(palette)),
            Span::styled(state.filter().to_string(), styles::value(palette)),
        ]));
    }
    lines.push(Line::from(""));

    if matches.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No matching steps",
            styles::muted(palette),
        )));
    } else {
        for (i, step) in matches.iter().enumerate() {
            let selected = i == state.selected_index();
            let (marker, style) = if selected {
                (glyphs.current, styles::focused_row(palette).fg(palette.text_primary))
            } else {
                (" ", styles::label(palette))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {marker} "), styles::key_hint(palette)),
                Span::styled(
                    format!("{}. {}", step.index() + 1, step.title()),
                    style,
                ),
            ]));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.primary))
            .style(Style::default().bg(palette.bg_panel))
            .title(Line::from(vec![Span::styled(
                " Jump to step ",
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            )])),
    );

    frame.render_widget(widget, palette_area);
}
