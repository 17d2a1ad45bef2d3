//! Terminal detection for output decisions.

use std::io::IsTerminal;

use super::mode::OutputMode;

const DEFAULT_WIDTH: usize = 80;

/// Output flags taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiFlags {
    pub no_color: bool,
    pub ascii: bool,
    pub quiet: bool,
}

/// What the terminal can show, resolved once per invocation.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// stdout is a terminal (results are read by a person, not a pipe)
    pub is_tty: bool,
    /// stderr is a terminal; spinners and the attempt bar draw there
    pub stderr_tty: bool,
    pub color: bool,
    pub unicode: bool,
    /// Columns
    pub width: usize,
    pub mode: OutputMode,
    /// Suppress receipts and notices
    pub quiet: bool,
}

impl UiContext {
    /// Resolve from the process environment.
    ///
    /// Color needs a terminal on stdout and is off under `NO_COLOR`,
    /// `--no-color` or `TERM=dumb`.
    pub fn from_env(flags: UiFlags) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let stderr_tty = std::io::stderr().is_terminal();
        let term_is_dumb = std::env::var("TERM").is_ok_and(|term| term == "dumb");
        let color = is_tty
            && !flags.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && !term_is_dumb;

        Self {
            is_tty,
            stderr_tty,
            color,
            unicode: !flags.ascii,
            width: terminal_width().unwrap_or(DEFAULT_WIDTH),
            mode: OutputMode::resolve(is_tty, term_is_dumb),
            quiet: flags.quiet,
        }
    }

    /// Prompts need a person on both stdin and stdout.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && std::io::stdin().is_terminal()
    }

    pub fn allows_animation(&self) -> bool {
        self.stderr_tty && self.mode.is_pretty() && !self.quiet
    }
}

fn terminal_width() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.trim().parse::<usize>().ok())
        .filter(|cols| *cols > 0)
        .or_else(window_width)
}

#[cfg(unix)]
fn window_width() -> Option<usize> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCGWINSZ writes into `size`, which outlives the call.
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
    (rc == 0 && size.ws_col > 0).then_some(usize::from(size.ws_col))
}

#[cfg(not(unix))]
fn window_width() -> Option<usize> {
    None
}
