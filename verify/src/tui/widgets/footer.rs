//! Key hint footer widget.
//!
//! This module provides the [`FooterWidget`]: a single line of key hints
//! pinned under the active panel. The hints follow the screen (entry keys on
//! Verify, just the close keys on Done) and degrade on narrow terminals by
//! first tightening the separators, then dropping the self-evident entry
//! hints.
//!
//! ```text
//! 0-9 type  |  Bksp delete  |  Enter submit  |  r resend  |  t theme  |  q quit
//! ```
//!
//! The `r` hint is styled like the resend line in the panel: muted while the
//! cooldown is counting, highlighted once a resend is allowed.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::{Screen, Theme};

/// Separator between hints at full width.
const SEPARATOR: &str = "  |  ";

/// Separator between hints on narrow terminals.
const COMPACT_SEPARATOR: &str = "  ";

/// Height of the footer in rows.
pub const FOOTER_HEIGHT: u16 = 1;

/// Widget for displaying the key hint line.
#[derive(Debug)]
pub struct FooterWidget<'a> {
    /// Which screen the hints are for.
    screen: Screen,
    /// Whether a resend is currently allowed.
    resend_ready: bool,
    /// Reference to the theme for styling.
    theme: &'a Theme,
}

impl<'a> FooterWidget<'a> {
    /// Creates a new `FooterWidget`.
    #[must_use]
    pub fn new(screen: Screen, resend_ready: bool, theme: &'a Theme) -> Self {
        Self {
            screen,
            resend_ready,
            theme,
        }
    }

    /// Style for key names.
    fn key_style(&self) -> Style {
        self.theme.text_primary.add_modifier(Modifier::BOLD)
    }

    /// Style for the `r` key, tracking resend availability.
    fn resend_key_style(&self) -> Style {
        if self.resend_ready {
            self.theme.resend_ready
        } else {
            self.theme.text_muted
        }
    }

    /// Hint line for the entry screen.
    fn verify_line(&self, sep: &'static str) -> Line<'static> {
        let key = self.key_style();
        let label = self.theme.text_muted;

        Line::from(vec![
            Span::styled("0-9", key),
            Span::styled(" type", label),
            Span::styled(sep, label),
            Span::styled("Bksp", key),
            Span::styled(" delete", label),
            Span::styled(sep, label),
            Span::styled("Enter", key),
            Span::styled(" submit", label),
            Span::styled(sep, label),
            Span::styled("r", self.resend_key_style()),
            Span::styled(" resend", label),
            Span::styled(sep, label),
            Span::styled("t", key),
            Span::styled(" theme", label),
            Span::styled(sep, label),
            Span::styled("q", key),
            Span::styled(" quit", label),
        ])
    }

    /// Shortest useful hint line for the entry screen.
    fn verify_minimal_line(&self) -> Line<'static> {
        let key = self.key_style();
        let label = self.theme.text_muted;

        Line::from(vec![
            Span::styled("r", self.resend_key_style()),
            Span::styled(" resend", label),
            Span::styled(COMPACT_SEPARATOR, label),
            Span::styled("t", key),
            Span::styled(" theme", label),
            Span::styled(COMPACT_SEPARATOR, label),
            Span::styled("q", key),
            Span::styled(" quit", label),
        ])
    }

    /// Hint line for the success screen.
    fn done_line(&self) -> Line<'static> {
        let key = self.key_style();
        let label = self.theme.text_muted;

        Line::from(vec![
            Span::styled("Enter", key),
            Span::styled(" close", label),
            Span::styled(SEPARATOR, label),
            Span::styled("q", key),
            Span::styled(" quit", label),
        ])
    }

    /// Fallback when almost nothing fits.
    fn quit_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled("q", self.key_style()),
            Span::styled(" quit", self.theme.text_muted),
        ])
    }

    /// Picks the widest hint line that fits the available width.
    fn line_for_width(&self, width: usize) -> Line<'static> {
        match self.screen {
            Screen::Verify => {
                let full = self.verify_line(SEPARATOR);
                if full.width() <= width {
                    return full;
                }
                let compact = self.verify_line(COMPACT_SEPARATOR);
                if compact.width() <= width {
                    return compact;
                }
                let minimal = self.verify_minimal_line();
                if minimal.width() <= width {
                    minimal
                } else {
                    self.quit_line()
                }
            }
            Screen::Done => {
                let full = self.done_line();
                if full.width() <= width {
                    full
                } else {
                    self.quit_line()
                }
            }
        }
    }
}

impl Widget for FooterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let line = self.line_for_width(area.width as usize);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
