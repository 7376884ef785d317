use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watches the keyboard for `q` or Ctrl-C while a scan runs and raises
/// `interrupt` when one is pressed. Ctrl-C sent as a signal counts too.
pub struct InputHandle {
    interrupt: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    keyboard: Option<JoinHandle<()>>,
    signal: tokio::task::JoinHandle<()>,
}

impl InputHandle {
    pub fn start(interrupt: Arc<AtomicBool>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));

        let keyboard = if std::io::stdin().is_terminal() {
            let interrupt = interrupt.clone();
            let stop = stop.clone();
            Some(thread::spawn(move || watch_keyboard(&interrupt, &stop)))
        } else {
            None
        };

        let signal = {
            let interrupt = interrupt.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    interrupt.store(true, Ordering::Relaxed);
                }
            })
        };

        Self {
            interrupt,
            stop,
            keyboard,
            signal,
        }
    }

    pub fn should_interrupt(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }
}

fn watch_keyboard(interrupt: &AtomicBool, stop: &AtomicBool) {
    if let Err(e) = enable_raw_mode() {
        warn!("Keyboard shortcuts unavailable: {e}");
        return;
    }

    while !stop.load(Ordering::Relaxed) {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                debug!("Stopped reading the keyboard: {e}");
                break;
            }
        }

        if let Ok(Event::Key(key_event)) = event::read() {
            let is_q = key_event.code == KeyCode::Char('q');
            let is_ctrl_c = key_event.code == KeyCode::Char('c')
                && key_event.modifiers.contains(KeyModifiers::CONTROL);

            if (is_q || is_ctrl_c) && key_event.kind == KeyEventKind::Press {
                interrupt.store(true, Ordering::Relaxed);
                break;
            }
        }
    }

    let _ = disable_raw_mode();
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.signal.abort();
        if let Some(keyboard) = self.keyboard.take() {
            let _ = keyboard.join();
        }
        let _ = disable_raw_mode();
    }
}
