//! Widget components for the verification TUI.
//!
//! This module contains the stateless widgets composed by [`crate::tui::ui`]:
//!
//! - [`VerifyPanelWidget`]: The code entry panel (title, prompt, slots,
//!   status lines)
//! - [`CodeInputWidget`]: The per-digit slot row inside the entry panel
//! - [`SuccessPanelWidget`]: The post-approval panel on the Done screen
//! - [`FooterWidget`]: The one-line key hint footer under either panel
//! - [`SizeWarningWidget`]: Full-frame warning when the terminal is too small
//!
//! Every widget borrows the state it renders and implements
//! [`ratatui::widgets::Widget`]; none of them hold state of their own.

pub mod code_input;
pub mod footer;
pub mod size_warning;
pub mod success_panel;
pub mod verify_panel;

pub use code_input::CodeInputWidget;
pub use footer::FooterWidget;
pub use size_warning::SizeWarningWidget;
pub use success_panel::SuccessPanelWidget;
pub use verify_panel::VerifyPanelWidget;
