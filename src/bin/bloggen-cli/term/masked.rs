use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Reads one line from the terminal, echoing `*` for every character.
///
/// Returns `None` when entry is aborted with Esc or Ctrl-C.
pub fn read_masked_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    enable_raw_mode()?;
    let result = read_loop();
    let restored = disable_raw_mode();
    println!();
    restored?;
    result
}

fn read_loop() -> io::Result<Option<String>> {
    let mut value = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(value)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Backspace => {
                if value.pop().is_some() {
                    erase_one()?;
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                value.push(c);
                echo_mask()?;
            }
            _ => {}
        }
    }
}

fn echo_mask() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "*")?;
    stdout.flush()
}

fn erase_one() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\u{8} \u{8}")?;
    stdout.flush()
}
