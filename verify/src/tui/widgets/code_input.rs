//! Code slot row widget.
//!
//! This module provides the [`CodeInputWidget`] for rendering the one-time
//! code as a row of per-digit slots. The slots are a pure projection of the
//! [`CodeEntry`] buffer: each slot shows its digit or a placeholder, and the
//! highlighted slot is derived from the buffer fill rather than tracked
//! separately.
//!
//! # Layout
//!
//! With enough room each slot is drawn as a small bordered box:
//!
//! ```text
//! ┌───┐ ┌───┐ ┌───┐ ┌───┐
//! │ 1 │ │ 2 │ │ · │ │ · │
//! └───┘ └───┘ └───┘ └───┘
//! ```
//!
//! On short areas the row degrades to a single line of spaced characters
//! (`1 2 · ·`) so the code stays visible even in a cramped panel.
//!
//! # Styling
//!
//! - The active slot (first empty, or last once full) gets the highlight
//!   border from the theme
//! - Filled slots use the filled border style, empty ones the idle style
//! - While a submission is in flight the row is locked and no slot is
//!   highlighted

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::otp::CodeEntry;
use crate::tui::app::{Symbols, Theme};

/// Width of one bordered slot in columns.
pub const SLOT_WIDTH: u16 = 5;

/// Height of one bordered slot in rows.
pub const SLOT_HEIGHT: u16 = 3;

/// Gap between slots in columns.
const SLOT_GAP: u16 = 1;

/// Widget for rendering the code entry slots.
///
/// Stateless; reads the buffer, theme, and symbol set by reference. Pass
/// `locked` while a submission is in flight so the row renders without an
/// active-slot highlight.
#[derive(Debug)]
pub struct CodeInputWidget<'a> {
    /// The digit buffer backing the slots.
    entry: &'a CodeEntry,
    /// Whether input is currently locked (submission in flight).
    locked: bool,
    /// Reference to the theme for styling.
    theme: &'a Theme,
    /// Reference to the symbol set.
    symbols: &'a Symbols,
}

impl<'a> CodeInputWidget<'a> {
    /// Creates a new `CodeInputWidget`.
    #[must_use]
    pub fn new(entry: &'a CodeEntry, locked: bool, theme: &'a Theme, symbols: &'a Symbols) -> Self {
        Self {
            entry,
            locked,
            theme,
            symbols,
        }
    }

    /// Returns the total width of a boxed row of `slots` slots.
    #[must_use]
    pub fn total_width(slots: usize) -> u16 {
        let slots = slots as u16;
        slots * SLOT_WIDTH + slots.saturating_sub(1) * SLOT_GAP
    }

    /// Border style for the slot at `index`.
    fn slot_border_style(&self, index: usize) -> Style {
        if !self.locked && index == self.entry.active_slot() {
            self.theme.slot_active
        } else if self.entry.slot(index).is_some() {
            self.theme.slot_filled
        } else {
            self.theme.slot_idle
        }
    }

    /// Character and style shown inside the slot at `index`.
    fn slot_char(&self, index: usize) -> (char, Style) {
        match self.entry.slot(index) {
            Some(digit) => (digit, self.theme.slot_digit),
            None => (self.symbols.placeholder, self.theme.slot_idle),
        }
    }

    /// Renders each slot as a bordered box with its digit centered inside.
    fn render_boxed(&self, area: Rect, buf: &mut Buffer) {
        let slots = self.entry.length();
        let total = Self::total_width(slots);
        let x0 = area.x + area.width.saturating_sub(total) / 2;
        let y0 = area.y + area.height.saturating_sub(SLOT_HEIGHT) / 2;

        for index in 0..slots {
            let rect = Rect::new(
                x0 + index as u16 * (SLOT_WIDTH + SLOT_GAP),
                y0,
                SLOT_WIDTH,
                SLOT_HEIGHT,
            );
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.slot_border_style(index));
            let inner = block.inner(rect);
            block.render(rect, buf);

            let (c, style) = self.slot_char(index);
            Paragraph::new(c.to_string())
                .style(style)
                .alignment(Alignment::Center)
                .render(inner, buf);
        }
    }

    /// Renders the slots as a single line of spaced characters.
    fn render_compact(&self, area: Rect, buf: &mut Buffer) {
        let slots = self.entry.length();
        let mut spans = Vec::with_capacity(slots * 2);

        for index in 0..slots {
            let (c, style) = self.slot_char(index);
            let style = if !self.locked && index == self.entry.active_slot() {
                style.patch(self.theme.slot_active)
            } else {
                style
            };
            spans.push(Span::styled(c.to_string(), style));
            if index + 1 < slots {
                spans.push(Span::raw(" "));
            }
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

impl Widget for CodeInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.entry.length() == 0 {
            return;
        }

        let total = Self::total_width(self.entry.length());
        if area.height >= SLOT_HEIGHT && area.width >= total {
            self.render_boxed(area, buf);
        } else {
            self.render_compact(area, buf);
        }
    }
}
