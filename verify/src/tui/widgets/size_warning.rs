//! Terminal size warning widget.
//!
//! This module provides a widget for displaying a warning when the terminal
//! is too small to render the verification screen. The warning shows the
//! current terminal size and the minimum required dimensions.
//!
//! The minimums themselves ([`MIN_WIDTH`] and [`MIN_HEIGHT`]) live in
//! [`crate::tui::ui`], next to the render dispatch that enforces them. A
//! terminal that is too small at startup is rejected with an error before the
//! first draw; this widget covers the case where a running terminal is
//! resized below the minimum.
//!
//! # Example
//!
//! ```ignore
//! use porchlight_verify::tui::widgets::SizeWarningWidget;
//!
//! let widget = SizeWarningWidget::new(area.width, area.height);
//! frame.render_widget(widget, frame.area());
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::tui::ui::{MIN_HEIGHT, MIN_WIDTH};

/// Widget that displays a warning when the terminal is too small.
///
/// Renders a centered message explaining that the terminal dimensions are
/// below the minimum required, showing both the current size and the required
/// minimum. Dimensions that fall short are highlighted.
///
/// The warning uses fixed yellow/red styling rather than the theme: it must
/// stay legible regardless of which theme is active.
#[derive(Debug, Clone, Copy)]
pub struct SizeWarningWidget {
    /// Current terminal width in columns.
    current_width: u16,
    /// Current terminal height in rows.
    current_height: u16,
}

impl SizeWarningWidget {
    /// Creates a new `SizeWarningWidget` for the given terminal size.
    #[must_use]
    pub fn new(current_width: u16, current_height: u16) -> Self {
        Self {
            current_width,
            current_height,
        }
    }

    /// Creates the warning message lines.
    fn create_message_lines(&self) -> Vec<Line<'static>> {
        let warning_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(Color::White);
        let size_style = Style::default().fg(Color::Cyan);
        let short_style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);

        // Highlight whichever dimensions fall short
        let width_style = if self.current_width >= MIN_WIDTH {
            size_style
        } else {
            short_style
        };
        let height_style = if self.current_height >= MIN_HEIGHT {
            size_style
        } else {
            short_style
        };

        vec![
            Line::from(vec![Span::styled("Terminal Too Small", warning_style)]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "The window is too small to show",
                text_style,
            )]),
            Line::from(vec![Span::styled("the verification screen.", text_style)]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Current size: ", text_style),
                Span::styled(format!("{}", self.current_width), width_style),
                Span::styled(" x ", text_style),
                Span::styled(format!("{}", self.current_height), height_style),
            ]),
            Line::from(vec![
                Span::styled("Required size: ", text_style),
                Span::styled(format!("{MIN_WIDTH}"), size_style),
                Span::styled(" x ", text_style),
                Span::styled(format!("{MIN_HEIGHT}"), size_style),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Resize the terminal to continue.",
                text_style,
            )]),
        ]
    }
}

impl Widget for SizeWarningWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Handle zero-size area gracefully
        if area.width == 0 || area.height == 0 {
            return;
        }

        let warning_style = Style::default().fg(Color::Yellow);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(warning_style)
            .title(" Warning ")
            .title_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let inner = block.inner(area);
        block.render(area, buf);

        // If the inner area cannot hold the message, show a minimal hint
        if inner.width < 10 || inner.height < 3 {
            let msg = "Resize";
            let x = inner.x + inner.width.saturating_sub(msg.len() as u16) / 2;
            let y = inner.y + inner.height / 2;
            if y < inner.y + inner.height && x < inner.x + inner.width {
                buf.set_string(x, y, msg, warning_style);
            }
            return;
        }

        let lines = self.create_message_lines();

        // Center the message vertically
        let content_height = lines.len() as u16;
        let vertical_offset = if inner.height > content_height {
            (inner.height - content_height) / 2
        } else {
            0
        };

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        let centered_area = Rect::new(
            inner.x,
            inner.y + vertical_offset,
            inner.width,
            inner.height.saturating_sub(vertical_offset),
        );

        paragraph.render(centered_area, buf);
    }
}
