//! Top-level rendering for the verification TUI.
//!
//! This module composes the widgets into a frame based on the current
//! [`AppState`]. Layout is derived from the frame area on every draw, so a
//! resize needs no bookkeeping beyond drawing again.
//!
//! # Screens
//!
//! - **Verify**: The code entry panel ([`VerifyPanelWidget`]) above a one-line
//!   key hint footer ([`FooterWidget`])
//! - **Done**: The success panel ([`SuccessPanelWidget`]) above the same footer
//!
//! Frames smaller than [`MIN_WIDTH`] x [`MIN_HEIGHT`] get the size warning
//! ([`SizeWarningWidget`]) instead of either screen.

use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

use crate::tui::app::{AppState, Screen};
use crate::tui::widgets::footer::FOOTER_HEIGHT;
use crate::tui::widgets::{
    FooterWidget, SizeWarningWidget, SuccessPanelWidget, VerifyPanelWidget,
};

/// Minimum terminal width for the verification screen to render.
///
/// Below this the code slots and status lines no longer fit on single rows.
pub const MIN_WIDTH: u16 = 40;

/// Minimum terminal height for the verification screen to render.
pub const MIN_HEIGHT: u16 = 12;

/// Renders the current application state to the frame.
///
/// Dispatches to the appropriate screen based on [`AppState::screen`], with a
/// size warning taking over whenever the frame is below the minimum size.
///
/// # Arguments
///
/// * `frame` - The ratatui frame to render into
/// * `state` - The current application state
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        frame.render_widget(SizeWarningWidget::new(area.width, area.height), area);
        return;
    }

    let chunks =
        Layout::vertical([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)]).split(area);

    match state.screen {
        Screen::Verify => {
            frame.render_widget(VerifyPanelWidget::new(state), chunks[0]);
        }
        Screen::Done => {
            frame.render_widget(
                SuccessPanelWidget::new(state.flow, &state.phone, &state.theme, &state.symbols),
                chunks[0],
            );
        }
    }

    frame.render_widget(
        FooterWidget::new(state.screen, state.cooldown.is_ready(), &state.theme),
        chunks[1],
    );
}
