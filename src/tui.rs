use std::io::{self, Stdout};

use crossterm::{
    cursor, execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::{AppError, AppResult};

/// Full-screen terminal session; the terminal is restored on drop
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn new() -> AppResult<Self> {
        enable_raw_mode().map_err(terminal_error)?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            Clear(ClearType::All),
            cursor::Hide
        )
        .map_err(terminal_error)?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error)?;
        terminal.clear().map_err(terminal_error)?;
        Ok(Self { terminal })
    }

    /// Draw a frame using the provided closure
    pub fn draw<F>(&mut self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f).map_err(terminal_error)?;
        Ok(())
    }
}

fn terminal_error(e: io::Error) -> AppError {
    AppError::Terminal(e.to_string())
}

fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            eprintln!("Failed to restore terminal: {}", e);
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
