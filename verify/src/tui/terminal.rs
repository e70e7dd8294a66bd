//! Terminal setup and RAII restoration for the verification screen.
//!
//! This module provides the [`Tui`] struct that wraps a ratatui terminal with
//! automatic cleanup via the [`Drop`] trait. On creation the terminal enters
//! raw mode, switches to the alternate screen, and enables bracketed paste so
//! that a code pasted from a messaging app arrives as a single
//! [`Event::Paste`](crossterm::event::Event::Paste) rather than a burst of key
//! presses. All of it is undone on drop.
//!
//! # Cleanup Behavior
//!
//! The terminal state is restored in three scenarios:
//!
//! 1. **Normal drop**: When [`Tui`] goes out of scope
//! 2. **Explicit restore**: By calling [`Tui::restore()`]
//! 3. **Panic hook**: Via [`install_panic_hook()`] which ensures restoration
//!    even if a panic occurs before the [`Drop`] handler runs
//!
//! The [`Drop`] implementation silently ignores errors during cleanup to avoid
//! panics during stack unwinding.

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor::{Hide, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Installs a panic hook that restores terminal state before displaying panic messages.
///
/// This function should be called **once** at application startup, **before**
/// creating any [`Tui`] instance. It captures the existing panic hook and
/// replaces it with a custom hook that:
///
/// 1. Shows the cursor
/// 2. Disables bracketed paste
/// 3. Leaves the alternate screen
/// 4. Disables raw mode
/// 5. Calls the previous panic handler to display the panic message
///
/// This ensures that panic messages are visible to the user and the terminal
/// is left in a usable state, even if the panic occurs before the [`Tui`]'s
/// [`Drop`] handler can run.
///
/// # Notes
///
/// - The restoration code ignores errors because the terminal may already be
///   in an inconsistent state when a panic occurs.
/// - Calling this more than once just chains the hooks; it is intended to be
///   called only once.
pub fn install_panic_hook() {
    let previous_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        // Best-effort restoration. The terminal may be in an inconsistent
        // state, so errors are not propagated.
        let _ = execute!(io::stdout(), Show, DisableBracketedPaste);

        // Leave alternate screen so the panic message lands in the normal
        // terminal buffer where the user can read it.
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        // Restore line-buffered input.
        let _ = disable_raw_mode();

        previous_hook(panic_info);
    }));
}

/// A wrapper around ratatui's Terminal that provides RAII-based cleanup.
///
/// When dropped, this struct automatically:
/// - Shows the cursor
/// - Disables bracketed paste
/// - Leaves the alternate screen
/// - Disables raw mode
///
/// This ensures the terminal is restored to its original state even if the
/// application panics or exits unexpectedly.
pub struct Tui {
    /// The underlying ratatui terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Track whether the terminal has been restored to avoid double cleanup.
    restored: bool,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal for raw mode.
    ///
    /// This function:
    /// - Enables raw mode for character-by-character input
    /// - Enters the alternate screen buffer (preserves shell history)
    /// - Hides the cursor
    /// - Enables bracketed paste reporting
    /// - Creates the ratatui terminal
    ///
    /// # Errors
    ///
    /// Returns an error if any terminal initialization step fails. Earlier
    /// steps are rolled back before the error is returned.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();

        // If any later step fails, raw mode must be undone before returning.
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(e);
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let _ = execute!(io::stdout(), Show, DisableBracketedPaste, LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(e);
            }
        };

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Draws a frame to the terminal using the provided closure.
    ///
    /// The closure receives a [`ratatui::Frame`] that can be used to render
    /// widgets. The frame is automatically flushed to the terminal after the
    /// closure returns.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    /// Returns the current terminal size as (width, height).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be determined.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    /// Explicitly restores the terminal to its original state.
    ///
    /// After calling this method, the [`Tui`] should not be used for drawing.
    /// The [`Drop`] implementation will skip cleanup if this has been called.
    ///
    /// # Errors
    ///
    /// Returns an error if any restoration step fails. Unlike the [`Drop`]
    /// implementation, errors are propagated to the caller.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }

        self.restored = true;

        execute!(io::stdout(), Show, DisableBracketedPaste, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        Ok(())
    }

    /// Clears the entire terminal screen.
    ///
    /// # Errors
    ///
    /// Returns an error if clearing fails.
    pub fn clear(&mut self) -> io::Result<()> {
        self.terminal.clear()?;
        Ok(())
    }
}

impl Drop for Tui {
    /// Restores the terminal state when the [`Tui`] is dropped.
    ///
    /// Errors are silently ignored here. We may be unwinding from a panic,
    /// the terminal may already be in a bad state, and a second panic would
    /// abort the process.
    fn drop(&mut self) {
        if self.restored {
            return;
        }

        let _ = execute!(io::stdout(), Show, DisableBracketedPaste, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Most Tui behavior needs a real terminal and cannot run in CI. These
    // tests cover the API surface and the restore-flag logic.

    #[test]
    fn tui_struct_is_send() {
        // Terminal<CrosstermBackend<Stdout>> is Send but not Sync because
        // Stdout is not Sync. Compile-time check.
        fn assert_send<T: Send>() {}
        assert_send::<Tui>();
    }

    #[test]
    fn restore_flag_prevents_double_cleanup() {
        // The restored flag must make a second restore a no-op.
        let mut restored = false;

        if !restored {
            restored = true;
        }

        assert!(restored, "Flag should be set after first restore");

        let would_restore = !restored;
        assert!(!would_restore, "Flag should prevent second restore attempt");
    }

    #[test]
    fn install_panic_hook_can_be_called() {
        // Modifies global state (the panic hook); verifies hook chaining does
        // not panic rather than exercising real panic behavior.
        install_panic_hook();
        install_panic_hook();
    }

    #[test]
    fn panic_hook_closure_is_send_and_sync() {
        // std::panic::set_hook requires Send + Sync + 'static. Compile-time
        // check against a closure shaped like the one install_panic_hook uses.
        fn assert_hook_bounds<F>(_: F)
        where
            F: Fn(&panic::PanicHookInfo<'_>) + Send + Sync + 'static,
        {
        }

        let previous_hook = panic::take_hook();
        let hook = move |panic_info: &panic::PanicHookInfo<'_>| {
            let _ = execute!(io::stdout(), Show, DisableBracketedPaste);
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            previous_hook(panic_info);
        };

        assert_hook_bounds(hook);

        panic::set_hook(Box::new(|_| {}));
    }
}
