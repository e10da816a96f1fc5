//! Terminal front end for the navigator: raw mode, alternate screen, and the
//! blocking event loop.

use std::io;
use std::path::PathBuf;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;

use crate::config::Config;
use crate::error::Error;
use crate::navigator::{Event, Flow, Navigator};
use crate::picker::Key;
use crate::theme::TuiTheme;

/// Owns the terminal for the lifetime of the interactive session and
/// restores it on drop, including when an error unwinds the loop.
struct TerminalSession {
    /// Ratatui terminal over stdout.
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns `Error::Terminal` if the terminal cannot be prepared. Any
    /// partial setup is undone first.
    fn new() -> Result<Self, Error> {
        enable_raw_mode().map_err(Error::Terminal)?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            return Error::Terminal(err);
        })?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(|err| {
            teardown_terminal();
            return Error::Terminal(err);
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            return Error::Terminal(err);
        })?;

        return Ok(Self { terminal });
    }

    /// Draw the navigator's current lines as one paragraph.
    ///
    /// # Errors
    ///
    /// Returns `Error::Terminal` if the frame cannot be written.
    fn draw(&mut self, navigator: &Navigator) -> Result<(), Error> {
        let lines: Vec<Line<'static>> = navigator.lines(&TuiTheme).into_iter().map(Line::from).collect();
        let paragraph = Paragraph::new(Text::from(lines));
        self.terminal
            .draw(|frame| frame.render_widget(paragraph, frame.area()))
            .map_err(Error::Terminal)?;
        return Ok(());
    }

    /// Current terminal height in rows.
    ///
    /// # Errors
    ///
    /// Returns `Error::Terminal` if the size cannot be queried.
    fn height(&self) -> Result<usize, Error> {
        let size = self.terminal.size().map_err(Error::Terminal)?;
        return Ok(usize::from(size.height));
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.terminal.show_cursor() {
            tracing::warn!(error = %err, "failed to show cursor");
        }
        teardown_terminal();
    }
}

/// Leave raw mode and the alternate screen, logging instead of failing.
fn teardown_terminal() {
    if let Err(err) = disable_raw_mode() {
        tracing::warn!(error = %err, "failed to disable raw mode");
    }
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, LeaveAlternateScreen) {
        tracing::warn!(error = %err, "failed to leave alternate screen");
    }
    return;
}

/// Run the navigator until the operator quits.
///
/// # Errors
///
/// Returns `Error::Terminal` for terminal failures and any error from a
/// navigator transition. The terminal is restored before returning.
pub fn run(config: Config, documents: Vec<PathBuf>) -> Result<(), Error> {
    let mut session = TerminalSession::new()?;
    let height = session.height()?;
    let (mut navigator, _) = Navigator::new(config, documents).update(Event::Resize { height })?;

    loop {
        session.draw(&navigator)?;

        let Some(event) = translate(event::read().map_err(Error::Terminal)?) else {
            continue;
        };
        let previous = navigator.stage();
        let (next, flow) = navigator.update(event)?;
        if next.stage() != previous {
            tracing::debug!(from = ?previous, to = ?next.stage(), "stage changed");
        }
        navigator = next;
        if flow == Flow::Quit {
            tracing::debug!("operator quit");
            return Ok(());
        }
    }
}

/// Map a terminal event onto a navigator event. Key releases, repeats, and
/// unbound keys map to nothing.
fn translate(event: TermEvent) -> Option<Event> {
    return match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => translate_key(key),
        TermEvent::Resize(_, rows) => Some(Event::Resize { height: usize::from(rows) }),
        _ => None,
    };
}

/// Map a key press onto a navigator event.
fn translate_key(key: KeyEvent) -> Option<Event> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Event::Quit),
            _ => None,
        };
    }

    let key = match key.code {
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Down => Key::Down,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Home => Key::Home,
        KeyCode::Up => Key::Up,
        _ => return None,
    };
    return Some(Event::Key(key));
}
