//! Wizard screens rendered on a vt100 virtual terminal.


use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;

use denim_engine::{App, AppOptions, MemoryStore};
use denim_tui::{apply_event, draw};
use denim_types::ui::UiOptions;

use vt100_backend::VT100Backend;

const WIDTH: u16 = 120;
const HEIGHT: u16 = 32;

fn app_with(ui: UiOptions) -> App {
    let options = AppOptions {
        ui,
        ..AppOptions::default()
    };
    App::new(Box::new(MemoryStore::new()), options)
}

fn app() -> App {
    app_with(UiOptions::default())
}

fn press(app: &mut App, code: KeyCode) {
    press_with(app, code, KeyModifiers::NONE);
}

fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    apply_event(app, Event::Key(KeyEvent::new(code, modifiers)));
}

fn render(app: &App) -> Terminal<VT100Backend> {
    let backend = VT100Backend::new(WIDTH, HEIGHT);
    let mut terminal = Terminal::new(backend).expect("failed to create terminal");
    terminal
        .draw(|frame| draw(frame, app))
        .expect("failed to draw");
    terminal
}

fn screen(app: &App) -> String {
    render(app).backend().contents()
}

#[test]
fn first_screen_shows_rail_fields_and_hints() {
    let screen = screen(&app());

    assert!(screen.contains("denim onboarding"));
    assert!(screen.contains("Step 1/7: Warp range"));
    for title in [
        "Warp range",
        "Indigo control",
        "Shade & finish",
        "Effluent treatment",
        "Footprints",
        "Safety",
        "Handover",
    ] {
        assert!(screen.contains(title), "rail is missing {title}");
    }
    assert!(screen.contains("Dye range type:"));
    assert!(screen.contains("Range speed:"));
    // Advanced fields stay hidden until F2.
    assert!(!screen.contains("Ropes per run"));
    assert!(screen.contains("Ctrl+K"));
}

#[test]
fn current_step_is_bold_in_the_rail() {
    let mut app = app_with(UiOptions {
        ascii_only: true,
        high_contrast: false,
    });
    press(&mut app, KeyCode::Tab);
    let terminal = render(&app);
    let backend = terminal.backend();

    assert!(backend.contents().contains("Step 2/7: Indigo control"));
    let row = backend.row_of("> Indigo control").expect("rail row");
    let rows = backend.rows();
    let col = rows[row].find("> Indigo control").expect("marker column");
    // Rows are ASCII apart from box-drawing borders, one cell per char.
    let col = rows[row][..col].chars().count() + 2;
    assert!(backend.is_bold(
        u16::try_from(row).expect("row fits"),
        u16::try_from(col).expect("col fits"),
    ));

    let warp = backend.row_of("* Warp range").or_else(|| backend.row_of("o Warp range"));
    assert!(warp.is_some(), "previous step keeps its rail entry");
}

#[test]
fn typed_number_renders_with_its_unit() {
    let mut app = app();
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('1'));
    press(&mut app, KeyCode::Char('2'));
    assert!(screen(&app).contains("Yarn count: 12_ Ne"));

    press(&mut app, KeyCode::Down);
    let screen = screen(&app);
    assert!(screen.contains("Yarn count: 12 Ne"));
    assert!(screen.contains("(1)"), "rail counts answered fields");
}

#[test]
fn why_panel_toggles_with_f1() {
    let mut app = app();
    assert!(!screen(&app).contains("Why we ask"));

    press(&mut app, KeyCode::F(1));
    let screen = screen(&app);
    assert!(screen.contains("Why we ask"));
    assert!(screen.contains("Range type and warp geometry"));
}

#[test]
fn advanced_panel_lists_advanced_fields() {
    let mut app = app();
    press(&mut app, KeyCode::F(2));
    let screen = screen(&app);
    assert!(screen.contains("Advanced"));
    assert!(screen.contains("Ropes per run:"));
    assert!(screen.contains("Creel notes:"));
}

#[test]
fn advanced_panel_on_a_step_without_advanced_fields() {
    let mut app = app();
    press_with(&mut app, KeyCode::Char('k'), KeyModifiers::CONTROL);
    for c in "hand".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::F(2));

    let screen = screen(&app);
    assert!(screen.contains("Step 7/7: Handover"));
    assert!(screen.contains("No advanced fields on this step"));
}

#[test]
fn note_expands_with_alt_digit() {
    let mut app = app();
    assert!(!screen(&app).contains("Rope ranges run"));

    press_with(&mut app, KeyCode::Char('1'), KeyModifiers::ALT);
    assert!(screen(&app).contains("Rope ranges run 24-36 m/min"));

    press(&mut app, KeyCode::Esc);
    assert!(!screen(&app).contains("Rope ranges run"));
}

#[test]
fn palette_overlay_shows_filtered_steps() {
    let mut app = app();
    press_with(&mut app, KeyCode::Char('k'), KeyModifiers::CONTROL);
    let screen_open = screen(&app);
    assert!(screen_open.contains("Jump to step"));
    assert!(screen_open.contains("Type to filter steps..."));
    assert!(screen_open.contains("6. Safety"));

    for c in "foot".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    let filtered = screen(&app);
    assert!(filtered.contains("5. Footprints"));
    assert!(!filtered.contains("6. Safety"));

    for c in "zz".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    assert!(screen(&app).contains("No matching steps"));
}

#[test]
fn ascii_mode_renders_multi_choice_checkboxes() {
    let mut app = app_with(UiOptions {
        ascii_only: true,
        high_contrast: false,
    });
    for _ in 0..3 {
        press(&mut app, KeyCode::Tab);
    }
    assert!(screen(&app).contains("[ ] Physical"));

    press(&mut app, KeyCode::Char(' '));
    let screen = screen(&app);
    assert!(screen.contains("[x] Physical"));
    assert!(screen.contains("[ ] Chemical"));
    assert!(screen.contains("Treatment blocks: Physical"));
}

#[test]
fn save_shortcut_reports_in_the_status_bar() {
    let mut app = app();
    press(&mut app, KeyCode::Right);
    let before = screen(&app);
    assert!(before.contains("Autosave pending"));
    assert!(!before.contains("Saved."));

    press_with(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert!(screen(&app).contains("Saved."));
}

#[test]
fn choice_field_shows_arrows_when_focused() {
    let mut app = app_with(UiOptions {
        ascii_only: true,
        high_contrast: true,
    });
    press(&mut app, KeyCode::Right);
    assert!(screen(&app).contains("Dye range type: < Rope >"));
}
