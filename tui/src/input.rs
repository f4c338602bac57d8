//! Input handling for the denim wizard.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tokio::time::timeout;
use tracing::debug;

use denim_engine::App;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued terminal events into `app`. Returns `true` once the user asked to quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns whether the app should quit.
pub fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }

            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c' | 'q'))
            {
                app.request_quit();
                return true;
            }

            // Save and export work with or without the palette open.
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('s') => {
                        app.save_now();
                        return app.should_quit();
                    }
                    KeyCode::Char('e') => {
                        app.export();
                        return app.should_quit();
                    }
                    _ => {}
                }
            }

            if app.palette().is_some() {
                handle_palette_mode(app, key);
            } else {
                handle_wizard_mode(app, key);
            }
        }
        Event::Paste(text) => {
            if app.palette().is_some() {
                for c in text.chars().filter(|c| !c.is_control()) {
                    app.palette_input(c);
                }
            } else {
                for c in text.chars().filter(|c| !c.is_control()) {
                    app.insert_char(c);
                }
            }
        }
        _ => {}
    }
    app.should_quit()
}

fn handle_palette_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_overlays(),
        KeyCode::Enter => {
            if let Some(step) = app.palette_confirm() {
                debug!(?step, "Palette jump");
            }
        }
        KeyCode::Up => app.palette_up(),
        KeyCode::Down => app.palette_down(),
        KeyCode::Backspace => app.palette_backspace(),
        KeyCode::Char(c) if !key.modifiers.intersects(ctrl_or_alt()) => app.palette_input(c),
        _ => {}
    }
}

fn ctrl_or_alt() -> KeyModifiers {
    KeyModifiers::CONTROL | KeyModifiers::ALT
}

fn handle_wizard_mode(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        if key.code == KeyCode::Char('k') {
            app.open_palette();
        }
        return;
    }

    if alt {
        // Alt+1..9 toggles the n-th note of the step.
        if let KeyCode::Char(c) = key.code
            && let Some(digit) = c.to_digit(10)
            && digit > 0
        {
            app.toggle_note(digit as usize - 1);
        }
        return;
    }

    match key.code {
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            app.prev_step();
        }
        KeyCode::Tab => {
            app.next_step();
        }
        KeyCode::BackTab => {
            app.prev_step();
        }
        KeyCode::Esc => app.close_overlays(),
        KeyCode::F(1) => app.toggle_why(),
        KeyCode::F(2) => app.toggle_advanced(),
        KeyCode::Up => {
            app.focus_prev_field();
        }
        KeyCode::Down => {
            app.focus_next_field();
        }
        KeyCode::Left => {
            app.cycle_option(false);
        }
        KeyCode::Right => {
            app.cycle_option(true);
        }
        KeyCode::Char(' ') => {
            app.space();
        }
        KeyCode::Backspace => {
            app.delete_char();
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
        }
        _ => {}
    }
}
