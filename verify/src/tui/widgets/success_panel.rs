//! Success panel widget.
//!
//! This module provides the [`SuccessPanelWidget`] shown once a code has been
//! approved. It is the whole of the Done screen: a checkmark, the flow's
//! success copy, and a hint for leaving the screen.
//!
//! ```text
//! ┌ Porchlight ──────────────────────┐
//! │                                  │
//! │        ✓ Number verified         │
//! │         (•••) •••-••33           │
//! │                                  │
//! │   You are signed in to           │
//! │   Porchlight.                    │
//! │                                  │
//! │      Press Enter to close        │
//! └──────────────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::phone::PhoneNumber;
use crate::tui::app::{Flow, Symbols, Theme};

/// Minimum width of the panel box.
const MIN_PANEL_WIDTH: u16 = 36;

/// Maximum width of the panel box.
const MAX_PANEL_WIDTH: u16 = 56;

/// Height of the panel content (excluding borders).
const PANEL_CONTENT_HEIGHT: u16 = 7;

/// Widget for rendering the post-approval success screen.
///
/// Stateless; the copy comes from the [`Flow`] and the number from the
/// verified [`PhoneNumber`].
#[derive(Debug)]
pub struct SuccessPanelWidget<'a> {
    /// The journey that was completed.
    flow: Flow,
    /// The phone number that was verified.
    phone: &'a PhoneNumber,
    /// Reference to the theme for styling.
    theme: &'a Theme,
    /// Reference to the symbol set.
    symbols: &'a Symbols,
}

impl<'a> SuccessPanelWidget<'a> {
    /// Creates a new `SuccessPanelWidget`.
    #[must_use]
    pub fn new(flow: Flow, phone: &'a PhoneNumber, theme: &'a Theme, symbols: &'a Symbols) -> Self {
        Self {
            flow,
            phone,
            theme,
            symbols,
        }
    }

    /// Calculates the centered area for the panel box.
    fn centered_rect(&self, area: Rect) -> Rect {
        let width = area.width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH);
        let height = PANEL_CONTENT_HEIGHT + 2;

        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;

        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    /// Creates the panel content lines.
    fn create_message_lines(&self) -> Vec<Line<'static>> {
        let title_style = self.theme.success.add_modifier(Modifier::BOLD);

        vec![
            Line::from(vec![
                Span::styled(self.symbols.success, title_style),
                Span::styled(" ", title_style),
                Span::styled(self.flow.success_title(), title_style),
            ]),
            Line::styled(
                self.phone.masked(self.symbols.mask),
                self.theme.text_secondary,
            ),
            Line::from(""),
            Line::styled(self.flow.success_detail(), self.theme.text_primary),
            Line::from(""),
            Line::styled("Press Enter to close", self.theme.text_muted),
        ]
    }
}

impl Widget for SuccessPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let panel_area = self.centered_rect(area);

        let block = Block::default()
            .title(" Porchlight ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .style(self.theme.text_primary);

        let inner = block.inner(panel_area);
        block.render(panel_area, buf);

        if inner.width < 24 || inner.height < 4 {
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

        let centered_area = Rect::new(
            inner.x,
            inner.y + vertical_offset,
            inner.width,
            inner.height.saturating_sub(vertical_offset),
        );

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(centered_area, buf);
    }
}
