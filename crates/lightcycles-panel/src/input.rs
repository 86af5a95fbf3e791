use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::warn;

use lightcycles_core::{Heading, InputSource, Seat};

/// Scoped raw-mode acquisition. Raw mode is restored on every exit path,
/// normal return or panic, via `Drop`.
pub struct RawModeGuard(());

impl RawModeGuard {
    pub fn acquire() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// Map a key to a seat intent. Seat one plays i/j/k/l, seat two w/a/s/d.
fn map_key(code: KeyCode) -> Option<(Seat, Heading)> {
    match code {
        KeyCode::Char('i') => Some((Seat::One, Heading::Up)),
        KeyCode::Char('k') => Some((Seat::One, Heading::Down)),
        KeyCode::Char('j') => Some((Seat::One, Heading::Left)),
        KeyCode::Char('l') => Some((Seat::One, Heading::Right)),
        KeyCode::Char('w') => Some((Seat::Two, Heading::Up)),
        KeyCode::Char('s') => Some((Seat::Two, Heading::Down)),
        KeyCode::Char('a') => Some((Seat::Two, Heading::Left)),
        KeyCode::Char('d') => Some((Seat::Two, Heading::Right)),
        _ => None,
    }
}

/// Shared-keyboard input source: both seats on one keyboard, non-blocking.
/// Holds at most one pending intent per seat; a newer press replaces an
/// unread one.
#[derive(Default)]
pub struct KeyboardInput {
    pending: [Option<Heading>; 2],
    quit: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain every queued terminal event into the per-seat buffers. A
    /// transient read failure is logged and treated as no input this tick.
    fn drain(&mut self) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(false) => return,
                Ok(true) => {},
                Err(e) => {
                    warn!(error = %e, "input poll failed");
                    return;
                },
            }
            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "input read failed");
                    return;
                },
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                self.quit = true;
                continue;
            }
            if let Some((seat, heading)) = map_key(key.code) {
                self.pending[seat.index()] = Some(heading);
            }
        }
    }
}

impl InputSource for KeyboardInput {
    fn poll_intent(&mut self, seat: Seat) -> Option<Heading> {
        self.drain();
        self.pending[seat.index()].take()
    }

    fn quit_requested(&mut self) -> bool {
        self.drain();
        self.quit
    }
}
