//! Code entry panel widget.
//!
//! This module provides the [`VerifyPanelWidget`] for rendering the
//! verification screen: the flow title, the prompt with the masked phone
//! number, the code slots, and the status lines underneath.
//!
//! # Layout
//!
//! The panel is rendered as a centered bordered box:
//!
//! ```text
//! ┌ Porchlight ──────────────────────────────┐
//! │                                          │
//! │            Verify your number            │
//! │       Enter the code we texted to        │
//! │             (•••) •••-••33               │
//! │                                          │
//! │        ┌───┐ ┌───┐ ┌───┐ ┌───┐           │
//! │        │ 1 │ │ 2 │ │ · │ │ · │           │
//! │        └───┘ └───┘ └───┘ └───┘           │
//! │                                          │
//! │     (error or progress line, if any)     │
//! │        Resend available in 00:27         │
//! │                                          │
//! └──────────────────────────────────────────┘
//! ```
//!
//! On short terminals the top padding is dropped and the slots degrade to
//! their compact one-line form so every status line stays visible.
//!
//! # Status lines
//!
//! - While a submission is in flight the status row shows a progress note
//! - Otherwise it shows the inline error, if one is set
//! - The resend row shows the countdown until ready, then the resend hint
//! - With `--show-code` the issued code is surfaced on its own row

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::tui::app::AppState;
use crate::tui::widgets::code_input::{CodeInputWidget, SLOT_HEIGHT};

/// Minimum width of the panel box.
const MIN_PANEL_WIDTH: u16 = 36;

/// Maximum width of the panel box.
const MAX_PANEL_WIDTH: u16 = 56;

/// Height of the panel content at full size (excluding borders).
const PANEL_CONTENT_HEIGHT: u16 = 13;

/// Widget for rendering the code entry screen.
///
/// Stateless; reads the entry buffer, flow copy, cooldown, and status fields
/// from the [`AppState`] it borrows. The active-slot highlight and every
/// status line are derived from that state on each render.
#[derive(Debug)]
pub struct VerifyPanelWidget<'a> {
    /// Reference to the application state.
    state: &'a AppState,
}

impl<'a> VerifyPanelWidget<'a> {
    /// Creates a new `VerifyPanelWidget` over the given state.
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Calculates the centered area for the panel box.
    fn centered_rect(&self, area: Rect) -> Rect {
        let width = area.width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH);
        let height = PANEL_CONTENT_HEIGHT + 2;

        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;

        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    /// Renders the flow title line.
    fn render_heading(&self, buf: &mut Buffer, area: Rect) {
        Paragraph::new(self.state.flow.title())
            .style(self.state.theme.title)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    /// Renders the prompt line above the phone number.
    fn render_prompt(&self, buf: &mut Buffer, area: Rect) {
        Paragraph::new(self.state.flow.prompt())
            .style(self.state.theme.text_secondary)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    /// Renders the masked phone number line.
    fn render_phone(&self, buf: &mut Buffer, area: Rect) {
        let masked = self.state.phone.masked(self.state.symbols.mask);
        Paragraph::new(masked)
            .style(self.state.theme.text_primary)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    /// Renders the progress or error status row.
    fn render_status(&self, buf: &mut Buffer, area: Rect) {
        let line = if self.state.submit.is_submitting() {
            Line::styled("Checking your code...", self.state.theme.text_secondary)
        } else if let Some(error) = &self.state.error {
            Line::styled(error.clone(), self.state.theme.error)
        } else {
            return;
        };

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    /// Renders the resend countdown or, once ready, the resend hint.
    fn render_resend(&self, buf: &mut Buffer, area: Rect) {
        let line = if self.state.cooldown.is_ready() {
            Line::from(vec![
                Span::styled("Press ", self.state.theme.text_muted),
                Span::styled("r", self.state.theme.resend_ready),
                Span::styled(" to send a new code", self.state.theme.text_muted),
            ])
        } else {
            Line::styled(
                format!("Resend available in {}", self.state.cooldown),
                self.state.theme.resend_waiting,
            )
        };

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    /// Renders the issued-code hint row when `--show-code` is active.
    fn render_code_hint(&self, buf: &mut Buffer, area: Rect) {
        if let Some(hint) = &self.state.code_hint {
            Paragraph::new(format!("code: {hint}"))
                .style(self.state.theme.text_muted)
                .alignment(Alignment::Center)
                .render(area, buf);
        }
    }
}

impl Widget for VerifyPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let panel_area = self.centered_rect(area);

        let block = Block::default()
            .title(" Porchlight ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.state.theme.border)
            .style(self.state.theme.text_primary);

        let inner = block.inner(panel_area);
        block.render(panel_area, buf);

        // Not even the compact layout fits; leave just the box
        if inner.width < 24 || inner.height < 8 {
            return;
        }

        let compact = inner.height < PANEL_CONTENT_HEIGHT;
        let top_pad = u16::from(!compact);
        let slot_rows = if compact { 1 } else { SLOT_HEIGHT };
        let status_rows = if compact { 1 } else { 2 };

        let chunks = Layout::vertical([
            Constraint::Length(top_pad),      // Top padding
            Constraint::Length(1),            // Flow title
            Constraint::Length(1),            // Prompt
            Constraint::Length(1),            // Masked phone
            Constraint::Length(1),            // Spacing
            Constraint::Length(slot_rows),    // Code slots
            Constraint::Length(1),            // Spacing
            Constraint::Length(status_rows),  // Error / progress
            Constraint::Length(1),            // Resend countdown
            Constraint::Length(1),            // Issued-code hint
            Constraint::Min(0),               // Bottom padding
        ])
        .split(inner);

        // Keep a little air between text and the border
        let h_padding = 2;
        let padded = |rect: Rect| -> Rect {
            Rect::new(
                rect.x + h_padding,
                rect.y,
                rect.width.saturating_sub(h_padding * 2),
                rect.height,
            )
        };

        self.render_heading(buf, padded(chunks[1]));
        self.render_prompt(buf, padded(chunks[2]));
        self.render_phone(buf, padded(chunks[3]));

        CodeInputWidget::new(
            &self.state.entry,
            self.state.submit.is_submitting(),
            &self.state.theme,
            &self.state.symbols,
        )
        .render(chunks[5], buf);

        self.render_status(buf, padded(chunks[7]));
        self.render_resend(buf, padded(chunks[8]));
        self.render_code_hint(buf, padded(chunks[9]));
    }
}
