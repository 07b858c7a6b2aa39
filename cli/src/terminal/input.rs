//! Maps `q` / Ctrl-C onto a stop request.
//!
//! Raw mode suppresses the terminal's own signal generation, so Ctrl-C is
//! read as a key event here instead of being handled as a signal.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

pub struct StopListener {
    rx: Receiver<()>,
}

impl StopListener {
    /// Starts the key-listener thread. The thread exits after the first stop
    /// key; raw mode is restored either there or in `Drop`, whichever runs.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            if enable_raw_mode().is_err() {
                return;
            }
            loop {
                match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        let is_q = key.code == KeyCode::Char('q');
                        let is_ctrl_c = key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL);

                        if is_q || is_ctrl_c {
                            let _ = tx.send(());
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
            let _ = disable_raw_mode();
        });

        Self { rx }
    }

    pub fn stop_requested(&self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

impl Drop for StopListener {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
