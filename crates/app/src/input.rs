use std::{
    io::IsTerminal,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use sortify_core::RunSignals;

const POLL: Duration = Duration::from_millis(100);

pub const HELP: &str = "space pause/resume, +/- speed, q or ctrl-c cancel";

/// Effect of one key press on the running sort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Paused(bool),
    Cancelled,
    Speed(f64),
    Ignored,
}

pub fn apply_key(signals: &RunSignals, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            signals.cancel();
            KeyAction::Cancelled
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            signals.cancel();
            KeyAction::Cancelled
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => KeyAction::Paused(signals.toggle_pause()),
        KeyCode::Char('+') | KeyCode::Char('=') => rescale(signals, 2.0),
        KeyCode::Char('-') => rescale(signals, 0.5),
        _ => KeyAction::Ignored,
    }
}

fn rescale(signals: &RunSignals, factor: f64) -> KeyAction {
    let speed = signals.speed() * factor;
    match signals.set_speed(speed) {
        Ok(()) => KeyAction::Speed(speed),
        Err(err) => {
            tracing::debug!(%err, "speed change rejected");
            KeyAction::Ignored
        }
    }
}

/// Reads keys on a background thread while a run is in progress. Dropping it
/// stops the reader and restores the terminal.
pub struct KeyControls {
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl KeyControls {
    /// Returns `None` when stdin is not an interactive terminal.
    pub fn spawn(signals: RunSignals) -> sortify_core::Result<Option<Self>> {
        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }
        enable_raw_mode()?;
        let stop = Arc::new(AtomicBool::new(false));
        let reader = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || read_keys(&signals, &stop))
        };
        Ok(Some(Self {
            stop,
            reader: Some(reader),
        }))
    }
}

impl Drop for KeyControls {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        if let Err(err) = disable_raw_mode() {
            tracing::warn!(%err, "failed to restore terminal mode");
        }
    }
}

fn read_keys(signals: &RunSignals, stop: &AtomicBool) {
    while !stop.load(Ordering::SeqCst) {
        match event::poll(POLL) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    let action = apply_key(signals, key);
                    tracing::debug!(?action, "key control");
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "stopped reading keys");
                    break;
                }
            },
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(%err, "stopped reading keys");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn space_toggles_pause() {
        let signals = RunSignals::default();
        assert_eq!(apply_key(&signals, press(KeyCode::Char(' '))), KeyAction::Paused(true));
        assert!(signals.is_paused());
        assert_eq!(apply_key(&signals, press(KeyCode::Char('p'))), KeyAction::Paused(false));
        assert!(!signals.is_paused());
    }

    #[test]
    fn ctrl_c_and_q_cancel() {
        let signals = RunSignals::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(apply_key(&signals, ctrl_c), KeyAction::Cancelled);
        assert!(signals.is_cancelled());

        let other = RunSignals::default();
        assert_eq!(apply_key(&other, press(KeyCode::Char('c'))), KeyAction::Ignored);
        assert!(!other.is_cancelled());
        assert_eq!(apply_key(&other, press(KeyCode::Char('q'))), KeyAction::Cancelled);
    }

    #[test]
    fn plus_and_minus_rescale_speed() {
        let signals = RunSignals::new(2.0);
        assert_eq!(apply_key(&signals, press(KeyCode::Char('+'))), KeyAction::Speed(4.0));
        assert_eq!(apply_key(&signals, press(KeyCode::Char('-'))), KeyAction::Speed(2.0));
        assert_eq!(signals.speed(), 2.0);
    }
}
