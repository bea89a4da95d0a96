use std::{env, io};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, warn};
use tui::{backend::CrosstermBackend, Terminal};

pub struct Term {
    pub terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Term {
    pub fn new() -> Result<Self, io::Error> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        let mut term = Term { terminal };
        term.enter()?;
        Ok(term)
    }

    /// Runs `func` with the terminal restored to the normal screen.
    pub fn call<F>(&mut self, func: F) -> Result<(), io::Error>
    where
        F: FnOnce(),
    {
        self.restore()?;
        func();
        self.enter()?;
        self.clear();
        Ok(())
    }

    /// Opens `url` with $BROWSER, falling back to xdg-open. Terminal browsers get the screen.
    pub fn open_url(&mut self, url: &str) -> Result<(), io::Error> {
        let browser = env::var("BROWSER").unwrap_or_else(|_| "xdg-open".into());
        info!("Opening {} with {}", url, browser);
        let mut command = std::process::Command::new(&browser);
        command.arg(url);
        self.call(|| {
            match command.status() {
                Ok(exit_code) => {
                    if !exit_code.success() {
                        warn!("{} finished with exit_code {}", browser, exit_code)
                    }
                }
                Err(err) => warn!("{} finished with error: {}", browser, err),
            };
        })
    }

    pub fn clear(&mut self) {
        if let Err(err) = self.terminal.clear() {
            error!("Error from terminal clear: {}", err);
        }
    }

    fn enter(&mut self) -> Result<(), io::Error> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)
    }

    fn restore(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            error!("Error during restoring terminal: {}", err);
        }
    }
}
