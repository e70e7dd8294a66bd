//! Terminal user interface for the verification screen.
//!
//! This module provides a TUI built with [`ratatui`] for entering a one-time
//! verification code: a row of digit slots with derived focus, auto-submit on
//! the final digit, and a resend countdown.
//!
//! # Architecture
//!
//! - **App** (`app`): Application state, event types, and event handling
//! - **UI** (`ui`): Frame rendering and layout composition
//! - **Terminal** (`terminal`): Terminal setup, teardown, and raw mode
//!   management
//! - **Widgets** (`widgets`): Stateless components composed by `ui`
//!
//! # Usage
//!
//! ```ignore
//! use porchlight_verify::tui;
//! use porchlight_verify::tui::app::Flow;
//!
//! tui::app::run(&config, Flow::SignIn, "555-201-7733", false, verifier).await?;
//! ```

pub mod app;
pub mod terminal;
pub mod ui;
pub mod widgets;

// Re-exports for convenient access to core TUI types
pub use app::{run, App, AppState, Flow, Screen, Symbols, Theme, TuiEvent};
pub use terminal::{install_panic_hook, Tui};
