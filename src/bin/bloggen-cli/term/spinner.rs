use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_millis(120);

/// Busy indicator drawn on stderr while a generation call is in flight.
///
/// On a non-terminal stderr the message is printed once and no animation
/// runs, so piped output stays free of escape codes.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        if !io::stderr().is_terminal() {
            eprintln!("{message}");
            return Self {
                running: Arc::new(AtomicBool::new(false)),
                handle: None,
            };
        }

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let message = message.to_string();
        let handle = tokio::spawn(async move {
            let mut frame: u64 = 0;
            while flag.load(Ordering::Relaxed) {
                draw(spinner_frame(frame), &message);
                frame = frame.wrapping_add(1);
                tokio::time::sleep(TICK).await;
            }
        });
        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stops the animation and clears its line.
    pub async fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle {
            let _ = handle.await;
            clear_line();
        }
    }
}

fn spinner_frame(frame: u64) -> &'static str {
    const FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
    let idx = (frame % FRAMES.len() as u64) as usize;
    FRAMES[idx]
}

fn draw(frame: &str, message: &str) {
    let mut stderr = io::stderr();
    let _ = execute!(stderr, MoveToColumn(0), Clear(ClearType::CurrentLine));
    let _ = write!(stderr, "{frame} {message}");
    let _ = stderr.flush();
}

fn clear_line() {
    let mut stderr = io::stderr();
    let _ = execute!(stderr, MoveToColumn(0), Clear(ClearType::CurrentLine));
    let _ = stderr.flush();
}
