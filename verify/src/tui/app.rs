//! Application state and event management for the verification TUI.
//!
//! This module contains the core application state, event types, and the
//! behavior that drives the screen. The main types are:
//!
//! - [`AppState`]: Screen, entry buffer, submission flow, and cooldown state
//! - [`Screen`]: Current screen being displayed (Verify or Done)
//! - [`Flow`]: Which journey brought the user here (sign-in or password reset)
//! - [`TuiEvent`]: Events that drive the TUI event loop
//! - [`EventHandler`]: Async loop multiplexing terminal input and ticks
//! - [`ResendTicker`]: Owned 1 Hz task that decrements the resend cooldown
//! - [`App`]: Binds the state to a [`CodeVerifier`] and handles every event
//!
//! # Architecture
//!
//! The TUI uses an event-driven architecture where all state changes are
//! triggered by [`TuiEvent`] variants. The [`EventHandler`] runs an async
//! loop that:
//!
//! 1. Polls for terminal input (keyboard, paste, resize) with short timeouts
//! 2. Generates periodic tick events for render pacing
//! 3. Listens for shutdown signals to terminate gracefully
//!
//! Verification attempts and resend requests run in spawned tasks and report
//! back through the same channel, so the handlers themselves never block.
//! Because every event is applied on the single event loop, the dispatch
//! guard in [`VerifyFlow`] is checked and set within one event and a
//! keyboard Enter can never race an auto-submitted fourth digit.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use ratatui::style::{Color, Modifier, Style};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, TuiError};
use crate::otp::{CodeEntry, CooldownTick, Dispatch, ResendCooldown, VerifyFlow};
use crate::phone::PhoneNumber;
use crate::prefs::{Preferences, ThemeChoice};
use crate::verifier::{CodeReceipt, CodeVerifier, VerifyOutcome};

use super::terminal::{install_panic_hook, Tui};
use super::ui;

// =============================================================================
// Screen and Flow Types
// =============================================================================

/// Current screen being displayed in the TUI.
///
/// The client is a two-screen state machine:
///
/// - **Verify**: The code entry panel with slots, countdown, and footer
/// - **Done**: The success panel shown after the code is approved
///
/// There is no way back from Done; a verified code is consumed and the
/// session moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Code entry screen.
    #[default]
    Verify,

    /// Success screen after approval.
    Done,
}

/// The journey that brought the user to the verification screen.
///
/// Both flows share the same entry panel and differ only in copy, so the
/// widgets take a `Flow` and ask it for their strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Verifying a phone number to sign in.
    #[default]
    SignIn,

    /// Confirming a password reset code.
    PasswordReset,
}

impl Flow {
    /// Panel title for the entry screen.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Flow::SignIn => "Verify your number",
            Flow::PasswordReset => "Reset your password",
        }
    }

    /// Lead-in line above the slots; the widget appends the masked phone.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Flow::SignIn => "Enter the code we texted to",
            Flow::PasswordReset => "Enter the reset code we texted to",
        }
    }

    /// Title for the success screen.
    #[must_use]
    pub fn success_title(self) -> &'static str {
        match self {
            Flow::SignIn => "Number verified",
            Flow::PasswordReset => "Code accepted",
        }
    }

    /// Detail line for the success screen.
    #[must_use]
    pub fn success_detail(self) -> &'static str {
        match self {
            Flow::SignIn => "You are signed in to Porchlight.",
            Flow::PasswordReset => "You can now choose a new password.",
        }
    }
}

impl std::fmt::Display for Flow {
    /// Stable name used in log fields.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flow::SignIn => write!(f, "sign-in"),
            Flow::PasswordReset => write!(f, "password-reset"),
        }
    }
}

// =============================================================================
// Theme and Symbols
// =============================================================================

/// Theme configuration for the TUI.
///
/// Defines colors and styles used throughout the interface. The theme covers
/// the code slots, the countdown line, inline errors, and general text and
/// border styles.
///
/// # NO_COLOR Support
///
/// For environments where colors should be disabled (per the `NO_COLOR`
/// standard), use [`Theme::monochrome()`] or [`Theme::from_env()`], which
/// detects the `NO_COLOR` environment variable. [`Theme::resolve()`] combines
/// the saved preference with that detection.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Style for panel titles (default: white bold).
    pub title: Style,
    /// Style for the digit inside a filled slot (default: white bold).
    pub slot_digit: Style,
    /// Style for the border of the active slot (default: cyan).
    pub slot_active: Style,
    /// Style for the border of filled, inactive slots (default: gray).
    pub slot_filled: Style,
    /// Style for the border of empty, inactive slots (default: dark gray).
    pub slot_idle: Style,
    /// Style for the inline error line (default: red).
    pub error: Style,
    /// Style for success text and the check mark (default: green).
    pub success: Style,
    /// Style for the resend hint once available (default: cyan bold).
    pub resend_ready: Style,
    /// Style for the countdown while waiting (default: dark gray).
    pub resend_waiting: Style,
    /// Style for primary text (default: terminal default).
    pub text_primary: Style,
    /// Style for secondary text such as the phone line (default: gray).
    pub text_secondary: Style,
    /// Style for muted text such as key hints (default: dark gray).
    pub text_muted: Style,
    /// Style for panel borders (default: dark gray).
    pub border: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            slot_digit: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            slot_active: Style::default().fg(Color::Cyan),
            slot_filled: Style::default().fg(Color::Gray),
            slot_idle: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
            success: Style::default().fg(Color::Green),
            resend_ready: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            resend_waiting: Style::default().fg(Color::DarkGray),
            text_primary: Style::default(),
            text_secondary: Style::default().fg(Color::Gray),
            text_muted: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::DarkGray),
        }
    }
}

impl Theme {
    /// Creates a monochrome theme for `NO_COLOR` support.
    ///
    /// Uses only modifiers (bold, dim, underlined) without any color codes,
    /// per the [NO_COLOR standard](https://no-color.org/).
    #[must_use]
    pub fn monochrome() -> Self {
        Self {
            title: Style::default().add_modifier(Modifier::BOLD),
            slot_digit: Style::default().add_modifier(Modifier::BOLD),
            slot_active: Style::default().add_modifier(Modifier::BOLD),
            slot_filled: Style::default(),
            slot_idle: Style::default().add_modifier(Modifier::DIM),
            error: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            success: Style::default().add_modifier(Modifier::BOLD),
            resend_ready: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            resend_waiting: Style::default().add_modifier(Modifier::DIM),
            text_primary: Style::default(),
            text_secondary: Style::default().add_modifier(Modifier::DIM),
            text_muted: Style::default().add_modifier(Modifier::DIM),
            border: Style::default(),
        }
    }

    /// Creates a theme based on the environment.
    ///
    /// Returns [`Theme::monochrome()`] if `NO_COLOR` is set (to any value),
    /// [`Theme::default()`] otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        if std::env::var("NO_COLOR").is_ok() {
            Self::monochrome()
        } else {
            Self::default()
        }
    }

    /// Maps a saved preference to a theme, ignoring the environment.
    #[must_use]
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Standard => Self::default(),
            ThemeChoice::Monochrome => Self::monochrome(),
        }
    }

    /// Resolves the effective theme from a saved preference.
    ///
    /// `NO_COLOR` wins over the preference; a user who disabled color at the
    /// environment level gets monochrome regardless of the saved choice.
    #[must_use]
    pub fn resolve(choice: ThemeChoice) -> Self {
        if std::env::var("NO_COLOR").is_ok() {
            Self::monochrome()
        } else {
            Self::from_choice(choice)
        }
    }
}

/// Symbol set for the TUI (unicode or ASCII).
///
/// Unicode symbols render nicely on modern terminals; ASCII symbols keep the
/// screen legible on limited terminals such as the Linux console. Use
/// [`Symbols::detect()`] to pick a set based on the environment.
#[derive(Debug, Clone, Copy)]
pub struct Symbols {
    /// Character shown in an empty code slot.
    pub placeholder: char,
    /// Character used to mask phone number digits.
    pub mask: char,
    /// Symbol for success.
    pub success: &'static str,
    /// Symbol for failure.
    pub failure: &'static str,
    /// Arrow symbol for hints.
    pub arrow: &'static str,
    /// Bullet point symbol for lists.
    pub bullet: &'static str,
}

/// Unicode symbol set for modern terminals.
pub const UNICODE_SYMBOLS: Symbols = Symbols {
    placeholder: '·',
    mask: '•',
    success: "✓",
    failure: "✗",
    arrow: "→",
    bullet: "•",
};

/// ASCII symbol set for maximum compatibility.
pub const ASCII_SYMBOLS: Symbols = Symbols {
    placeholder: '_',
    mask: '*',
    success: "[+]",
    failure: "[x]",
    arrow: "->",
    bullet: "*",
};

impl Symbols {
    /// Detects and returns the appropriate symbol set for the current terminal.
    ///
    /// Returns [`ASCII_SYMBOLS`] when `TERM` contains "linux" or "vt100",
    /// [`UNICODE_SYMBOLS`] otherwise (including when `TERM` is unset).
    #[must_use]
    pub fn detect() -> Self {
        if std::env::var("TERM")
            .map(|t| t.contains("linux") || t.contains("vt100"))
            .unwrap_or(false)
        {
            ASCII_SYMBOLS
        } else {
            UNICODE_SYMBOLS
        }
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::detect()
    }
}

// =============================================================================
// Application State
// =============================================================================

/// Everything the renderer needs to draw a frame.
///
/// All user-visible state lives here; the digit buffer is the only record of
/// what was typed, and both the rendered slots and the active-slot highlight
/// are derived from it on each frame. [`App`] mutates this state in response
/// to [`TuiEvent`]s and the renderer reads it.
#[derive(Debug)]
pub struct AppState {
    /// Current screen being displayed.
    pub screen: Screen,

    /// The journey that produced this verification.
    pub flow: Flow,

    /// Phone number the code was sent to.
    pub phone: PhoneNumber,

    /// The digit buffer backing the code slots.
    pub entry: CodeEntry,

    /// Submission state machine and dispatch guard.
    pub submit: VerifyFlow,

    /// Resend cooldown counter.
    pub cooldown: ResendCooldown,

    /// Inline error message, if any.
    pub error: Option<String>,

    /// The issued code, surfaced on screen when `show_code` is set.
    pub code_hint: Option<String>,

    /// Whether to surface the issued code on screen (`--show-code`).
    pub show_code: bool,

    /// Saved theme preference backing the current theme.
    pub theme_choice: ThemeChoice,

    /// Theme configuration.
    pub theme: Theme,

    /// Symbol set (unicode or ASCII).
    pub symbols: Symbols,

    /// Flag indicating user requested exit.
    pub should_quit: bool,
}

impl AppState {
    /// Creates the initial state for a verification session.
    ///
    /// Starts on the Verify screen with an empty buffer and the cooldown
    /// already counting, matching a code having just been sent. Uses the
    /// default theme and unicode symbols; [`App::new`] substitutes the saved
    /// preference and environment detection.
    #[must_use]
    pub fn new(flow: Flow, phone: PhoneNumber, code_length: usize, cooldown_secs: u32) -> Self {
        Self {
            screen: Screen::Verify,
            flow,
            phone,
            entry: CodeEntry::new(code_length),
            submit: VerifyFlow::new(),
            cooldown: ResendCooldown::new(cooldown_secs),
            error: None,
            code_hint: None,
            show_code: false,
            theme_choice: ThemeChoice::Standard,
            theme: Theme::default(),
            symbols: UNICODE_SYMBOLS,
            should_quit: false,
        }
    }

    /// Returns `true` if the current screen is the entry screen.
    #[must_use]
    pub fn is_verify(&self) -> bool {
        self.screen == Screen::Verify
    }

    /// Returns `true` if the current screen is the success screen.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.screen == Screen::Done
    }

    /// Returns `true` if the application should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Signals that the application should quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// Events that drive the TUI event loop.
///
/// All state changes are triggered by incoming events, applied one at a time
/// on the main loop.
///
/// # Event Sources
///
/// - **Tick**: Generated by the [`EventHandler`] for render pacing
/// - **Key / Paste / Resize**: Forwarded from terminal input handling
/// - **CooldownTick**: Sent once a second by the [`ResendTicker`]
/// - **CodeRequested**: A resend completed and a fresh code is outstanding
/// - **Verify**: A spawned verification attempt resolved
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Periodic tick for render pacing.
    Tick,

    /// Terminal input event.
    Key(KeyEvent),

    /// Bracketed paste content from the terminal.
    ///
    /// Carries the raw pasted text; non-digit characters are filtered at the
    /// buffer, so `"code: 1234"` pasted from a message works.
    Paste(String),

    /// Terminal resize event (columns, rows).
    Resize(u16, u16),

    /// One-second cooldown tick from the [`ResendTicker`].
    CooldownTick,

    /// A requested code is now outstanding.
    CodeRequested(CodeReceipt),

    /// A verification attempt resolved.
    Verify(VerifyOutcome),
}

/// Default tick rate for the event handler (60ms = ~16 FPS).
pub const DEFAULT_TICK_RATE_MS: u64 = 60;

/// Default poll timeout for checking terminal input (10ms).
const DEFAULT_POLL_TIMEOUT_MS: u64 = 10;

/// Capacity of the main event channel.
const EVENT_CHANNEL_CAPACITY: usize = 100;

// =============================================================================
// Event Handler
// =============================================================================

/// Handles terminal input and generates periodic tick events.
///
/// The `EventHandler` runs an async event loop that:
///
/// 1. Polls for terminal input (key presses, paste, resize) with a short
///    timeout
/// 2. Generates [`TuiEvent::Tick`] events at a configurable interval
/// 3. Sends all events to the main application via an MPSC channel
/// 4. Terminates gracefully when a shutdown signal is received
///
/// # Architecture
///
/// The handler uses `tokio::select!` to multiplex three event sources: a
/// tick interval, non-blocking terminal polling via `spawn_blocking`, and a
/// oneshot shutdown channel checked first under biased selection.
#[derive(Debug)]
pub struct EventHandler {
    /// Channel sender for dispatching events to the main application.
    event_tx: mpsc::Sender<TuiEvent>,
    /// Receiver for the shutdown signal.
    shutdown_rx: oneshot::Receiver<()>,
    /// Tick rate in milliseconds.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new `EventHandler` with the default tick rate.
    pub fn new(event_tx: mpsc::Sender<TuiEvent>, shutdown_rx: oneshot::Receiver<()>) -> Self {
        Self {
            event_tx,
            shutdown_rx,
            tick_rate: Duration::from_millis(DEFAULT_TICK_RATE_MS),
        }
    }

    /// Creates a new `EventHandler` with a custom tick rate.
    pub fn with_tick_rate(
        event_tx: mpsc::Sender<TuiEvent>,
        shutdown_rx: oneshot::Receiver<()>,
        tick_rate: Duration,
    ) -> Self {
        Self {
            event_tx,
            shutdown_rx,
            tick_rate,
        }
    }

    /// Returns the configured tick rate.
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Runs the event loop until a shutdown signal is received.
    ///
    /// Consumes the handler and runs until a shutdown signal arrives or the
    /// event receiver is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal polling task panics.
    pub async fn run(mut self) -> std::io::Result<()> {
        let mut tick_interval = tokio::time::interval(self.tick_rate);
        // Burst mode avoids tick accumulation if processing falls behind.
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Burst);

        // The first tick fires immediately on creation; consume it.
        tick_interval.tick().await;

        loop {
            // Biased selection so shutdown is always checked first.
            tokio::select! {
                biased;

                _ = &mut self.shutdown_rx => {
                    debug!("EventHandler received shutdown signal");
                    break;
                }

                _ = tick_interval.tick() => {
                    if self.event_tx.send(TuiEvent::Tick).await.is_err() {
                        debug!("Event receiver dropped, exiting event loop");
                        break;
                    }
                }

                // Terminal polling runs on the blocking pool so synchronous
                // crossterm calls never stall the runtime.
                result = async {
                    tokio::time::sleep(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS)).await;
                    tokio::task::spawn_blocking(|| {
                        Self::poll_terminal_event(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS))
                    }).await
                } => {
                    match result {
                        Ok(Some(event)) => {
                            if self.event_tx.send(event).await.is_err() {
                                debug!("Event receiver dropped, exiting event loop");
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(join_error) => {
                            tracing::error!("spawn_blocking task panicked: {}", join_error);
                            return Err(std::io::Error::other("Terminal polling task panicked"));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Polls for a terminal event with the specified timeout.
    ///
    /// Synchronous, designed to be called via `spawn_blocking`. In
    /// non-terminal environments (CI, tests) polling fails; that is treated
    /// as "no event" rather than an error.
    fn poll_terminal_event(timeout: Duration) -> Option<TuiEvent> {
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(crossterm_event) => Self::convert_crossterm_event(crossterm_event),
                Err(e) => {
                    tracing::trace!("Failed to read terminal event: {}", e);
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                tracing::trace!("Failed to poll terminal: {}", e);
                None
            }
        }
    }

    /// Converts a crossterm event to a [`TuiEvent`].
    ///
    /// Key, paste, and resize events are forwarded; mouse and focus events
    /// are not handled.
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<TuiEvent> {
        match event {
            CrosstermEvent::Key(key_event) => Some(TuiEvent::Key(key_event)),
            CrosstermEvent::Paste(text) => Some(TuiEvent::Paste(text)),
            CrosstermEvent::Resize(cols, rows) => Some(TuiEvent::Resize(cols, rows)),
            CrosstermEvent::Mouse(_) => None,
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost => None,
        }
    }
}

// =============================================================================
// Resend Ticker
// =============================================================================

/// Default period of the cooldown ticker (1 second).
pub const DEFAULT_COOLDOWN_TICK_MS: u64 = 1000;

/// Owned task that sends [`TuiEvent::CooldownTick`] once per period.
///
/// The ticker owns its task handle, so at most one tick loop exists per
/// session: starting a new loop aborts the previous one, and dropping the
/// ticker aborts whatever is running. No tick can be delivered after
/// [`ResendTicker::cancel`] returns except one already in the channel, which
/// the cooldown counter treats as a stale no-op.
#[derive(Debug)]
pub struct ResendTicker {
    handle: Option<tokio::task::JoinHandle<()>>,
    period: Duration,
}

impl ResendTicker {
    /// Creates a ticker with the default 1-second period.
    #[must_use]
    pub fn new() -> Self {
        Self::with_period(Duration::from_millis(DEFAULT_COOLDOWN_TICK_MS))
    }

    /// Creates a ticker with a custom period. Tests use short periods to
    /// observe many ticks quickly.
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self {
            handle: None,
            period,
        }
    }

    /// Starts the tick loop, aborting any previous one.
    ///
    /// Must be called from within a tokio runtime. The first tick is
    /// delivered one full period after the call, not immediately; the
    /// displayed count holds its starting value for the first second.
    pub fn start(&mut self, event_tx: mpsc::Sender<TuiEvent>) {
        self.cancel();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // Consume the immediate first tick.
            interval.tick().await;
            loop {
                interval.tick().await;
                if event_tx.send(TuiEvent::CooldownTick).await.is_err() {
                    break;
                }
            }
        }));
    }

    /// Stops the tick loop if one is running.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Returns `true` while a tick loop is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for ResendTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResendTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// Application Driver
// =============================================================================

/// Binds the [`AppState`] to a [`CodeVerifier`] and applies events.
///
/// The `App` owns the state, the verifier handle, and the cooldown ticker.
/// Long-running work (verification attempts, resend requests) is spawned and
/// reports back via [`TuiEvent`]s on the shared channel; every handler here
/// returns promptly.
pub struct App {
    state: AppState,
    verifier: Arc<dyn CodeVerifier>,
    event_tx: mpsc::Sender<TuiEvent>,
    ticker: ResendTicker,
    cooldown_secs: u32,
    config_dir: PathBuf,
}

impl App {
    /// Builds the application from configuration.
    ///
    /// Parses the phone number, loads the saved theme preference, and
    /// resolves theme and symbols from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the phone number cannot be parsed.
    pub fn new(
        config: &Config,
        flow: Flow,
        phone: &str,
        show_code: bool,
        verifier: Arc<dyn CodeVerifier>,
        event_tx: mpsc::Sender<TuiEvent>,
    ) -> Result<Self> {
        let phone = PhoneNumber::parse(phone)?;
        let prefs = Preferences::load(&config.config_dir);

        let mut state = AppState::new(
            flow,
            phone,
            config.code_length,
            config.resend_cooldown_secs,
        );
        state.show_code = show_code;
        state.theme_choice = prefs.theme;
        state.theme = Theme::resolve(prefs.theme);
        state.symbols = Symbols::detect();

        Ok(Self {
            state,
            verifier,
            event_tx,
            ticker: ResendTicker::new(),
            cooldown_secs: config.resend_cooldown_secs,
            config_dir: config.config_dir.clone(),
        })
    }

    /// Read access for the renderer and tests. Mutation happens only through
    /// [`App::handle_event`].
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Requests the first code and starts the cooldown ticker.
    ///
    /// Called once before the event loop; the screen opens with a code
    /// already on its way and the countdown running.
    pub async fn request_initial_code(&mut self) {
        let receipt = self.verifier.request_code(&self.state.phone).await;
        self.apply_receipt(receipt);
        self.ticker.start(self.event_tx.clone());
    }

    /// Applies a single event to the state.
    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Tick => {}
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Paste(text) => self.on_paste(&text),
            // Layout is derived from the frame area on the next draw.
            TuiEvent::Resize(_, _) => {}
            TuiEvent::CooldownTick => self.on_cooldown_tick(),
            TuiEvent::CodeRequested(receipt) => self.apply_receipt(receipt),
            TuiEvent::Verify(outcome) => self.handle_outcome(outcome),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Ignore repeats and releases so terminals reporting both do not
        // double-enter digits.
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.quit();
            return;
        }

        if self.state.is_done() {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                self.state.quit();
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => self.on_digit(c),
            KeyCode::Backspace => self.on_backspace(),
            KeyCode::Enter => self.dispatch(),
            KeyCode::Char('r') => self.resend(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('q') | KeyCode::Esc => self.state.quit(),
            _ => {}
        }
    }

    fn on_digit(&mut self, digit: char) {
        if self.state.submit.is_submitting() {
            return;
        }
        match self.state.entry.push(digit) {
            crate::otp::EntryOutcome::Ignored => {}
            crate::otp::EntryOutcome::Accepted => {
                self.state.error = None;
            }
            crate::otp::EntryOutcome::Filled => {
                self.state.error = None;
                self.dispatch();
            }
        }
    }

    fn on_backspace(&mut self) {
        if self.state.submit.is_submitting() {
            return;
        }
        if self.state.entry.backspace() {
            self.state.error = None;
        }
    }

    fn on_paste(&mut self, text: &str) {
        if self.state.is_done() || self.state.submit.is_submitting() {
            return;
        }
        match self.state.entry.paste(text) {
            crate::otp::EntryOutcome::Ignored => {}
            crate::otp::EntryOutcome::Accepted => {
                self.state.error = None;
            }
            crate::otp::EntryOutcome::Filled => {
                self.state.error = None;
                self.dispatch();
            }
        }
    }

    /// Attempts to dispatch a verification for the current buffer.
    ///
    /// Reached from the auto-submit on the final digit, from Enter, and from
    /// a filling paste. The guard in [`VerifyFlow`] makes whichever trigger
    /// arrives first the only one that submits.
    fn dispatch(&mut self) {
        match self.state.submit.try_dispatch(&self.state.entry) {
            Dispatch::Started(code) => {
                self.state.error = None;
                debug!(flow = %self.state.flow, "Dispatching verification");
                let verifier = Arc::clone(&self.verifier);
                let phone = self.state.phone.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let outcome = verifier.verify(&phone, &code).await;
                    let _ = tx.send(TuiEvent::Verify(outcome)).await;
                });
            }
            Dispatch::Incomplete => {
                self.state.error = Some(format!(
                    "Enter all {} digits of the code",
                    self.state.entry.length()
                ));
            }
            Dispatch::AlreadyDispatched => {
                debug!("Verification already in flight");
            }
        }
    }

    fn handle_outcome(&mut self, outcome: VerifyOutcome) {
        // Outcomes arriving outside the Submitting phase are stale (the
        // resolve methods ignore them) and must not touch the buffer.
        let live = self.state.submit.is_submitting();
        match outcome {
            VerifyOutcome::Approved => {
                self.state.submit.resolve_approved();
                if live {
                    self.state.error = None;
                    self.state.screen = Screen::Done;
                    self.ticker.cancel();
                }
            }
            VerifyOutcome::Rejected(reason) => {
                self.state.submit.resolve_rejected();
                if live {
                    self.state.entry.clear();
                    self.state.error = Some(reason.to_string());
                }
            }
        }
    }

    /// Requests a fresh code if the cooldown allows it.
    ///
    /// During the cooldown, and while a verification is in flight, this is a
    /// silent no-op. On success the buffer, error, and submission flow are
    /// reset and the countdown restarts.
    fn resend(&mut self) {
        if self.state.submit.is_submitting() {
            return;
        }
        if !self.state.cooldown.is_ready() {
            debug!(
                remaining = self.state.cooldown.remaining(),
                "Resend requested during cooldown"
            );
            return;
        }

        self.state.entry.clear();
        self.state.error = None;
        self.state.code_hint = None;
        self.state.submit.reset();
        self.state.cooldown.start(self.cooldown_secs);
        self.ticker.start(self.event_tx.clone());

        let verifier = Arc::clone(&self.verifier);
        let phone = self.state.phone.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let receipt = verifier.request_code(&phone).await;
            let _ = tx.send(TuiEvent::CodeRequested(receipt)).await;
        });
    }

    fn on_cooldown_tick(&mut self) {
        match self.state.cooldown.tick() {
            CooldownTick::Counting(_) => {}
            // The loop has nothing left to count down.
            CooldownTick::Finished | CooldownTick::Idle => self.ticker.cancel(),
        }
    }

    fn toggle_theme(&mut self) {
        self.state.theme_choice = self.state.theme_choice.toggle();
        self.state.theme = Theme::resolve(self.state.theme_choice);

        let prefs = Preferences {
            theme: self.state.theme_choice,
        };
        if let Err(e) = prefs.save(&self.config_dir) {
            // A failed save costs only persistence of the choice.
            warn!(error = %e, "Failed to save theme preference");
        }
    }

    fn apply_receipt(&mut self, receipt: CodeReceipt) {
        debug!(
            issue_id = %receipt.issue_id,
            ttl_secs = receipt.ttl.as_secs(),
            "Verification code outstanding"
        );
        if self.state.show_code {
            self.state.code_hint = receipt.preview;
        }
    }
}

// =============================================================================
// Event Loop
// =============================================================================

/// Runs the verification screen until the user quits.
///
/// Sets up the terminal, requests the first code, and then applies events
/// from the [`EventHandler`] one at a time, drawing after each.
///
/// # Errors
///
/// Returns an error if the phone number is invalid, the terminal cannot be
/// initialized, the terminal is smaller than the minimum size, or rendering
/// fails.
pub async fn run(
    config: &Config,
    flow: Flow,
    phone: &str,
    show_code: bool,
    verifier: Arc<dyn CodeVerifier>,
) -> Result<()> {
    install_panic_hook();

    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let mut app = App::new(config, flow, phone, show_code, verifier, event_tx.clone())?;

    let mut tui = Tui::new().map_err(TuiError::TerminalInit)?;
    let (width, height) = tui.size().map_err(TuiError::TerminalInit)?;
    if width < ui::MIN_WIDTH || height < ui::MIN_HEIGHT {
        let _ = tui.restore();
        return Err(TuiError::TerminalTooSmall { width, height }.into());
    }

    let handler = EventHandler::new(event_tx, shutdown_rx);
    let handler_task = tokio::spawn(handler.run());

    app.request_initial_code().await;

    let result = loop {
        if let Err(e) = tui.draw(|frame| ui::render(frame, app.state())) {
            break Err(TuiError::Render(e).into());
        }

        match event_rx.recv().await {
            Some(event) => app.handle_event(event),
            None => break Err(TuiError::Event("event channel closed".to_string()).into()),
        }

        if app.state().should_quit() {
            break Ok(());
        }
    };

    let _ = shutdown_tx.send(());
    let _ = tokio::time::timeout(Duration::from_millis(250), handler_task).await;
    let _ = tui.restore();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::{MemoryVerifier, RejectReason, VerifierSettings};
    use serial_test::serial;
    use tempfile::TempDir;

    fn press(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            code_length: 4,
            resend_cooldown_secs: 30,
            verify_latency_ms: 0,
            pinned_code: None,
            code_ttl_secs: 300,
            max_attempts: 3,
            config_dir: dir.to_path_buf(),
        }
    }

    /// App wired to a zero-latency verifier that always issues `pinned`.
    fn test_app(
        dir: &std::path::Path,
        pinned: &str,
        latency: Duration,
    ) -> (App, mpsc::Receiver<TuiEvent>) {
        let verifier = Arc::new(MemoryVerifier::new(VerifierSettings {
            pinned_code: Some(pinned.to_string()),
            latency,
            ..VerifierSettings::default()
        }));
        let (tx, rx) = mpsc::channel(100);
        let app = App::new(
            &test_config(dir),
            Flow::SignIn,
            "555-201-7733",
            false,
            verifier,
            tx,
        )
        .expect("valid app");
        (app, rx)
    }

    /// Receives events until a `Verify` outcome arrives, skipping ticks.
    async fn next_outcome(rx: &mut mpsc::Receiver<TuiEvent>) -> VerifyOutcome {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("verify outcome within timeout")
                .expect("channel open");
            if let TuiEvent::Verify(outcome) = event {
                return outcome;
            }
        }
    }

    // =============================================================================
    // Screen and Flow Tests
    // =============================================================================

    #[test]
    fn screen_default_is_verify() {
        assert_eq!(Screen::default(), Screen::Verify);
    }

    #[test]
    fn screen_variants_are_distinct() {
        assert_ne!(Screen::Verify, Screen::Done);
    }

    #[test]
    fn flow_copy_differs_between_journeys() {
        assert_ne!(Flow::SignIn.title(), Flow::PasswordReset.title());
        assert_ne!(
            Flow::SignIn.success_detail(),
            Flow::PasswordReset.success_detail()
        );
    }

    #[test]
    fn flow_prompt_leads_into_the_phone_number() {
        assert!(Flow::SignIn.prompt().ends_with("texted to"));
        assert!(Flow::PasswordReset.prompt().contains("reset code"));
    }

    #[test]
    fn flow_display_names_are_stable() {
        assert_eq!(Flow::SignIn.to_string(), "sign-in");
        assert_eq!(Flow::PasswordReset.to_string(), "password-reset");
    }

    // =============================================================================
    // Theme Tests
    // =============================================================================

    #[test]
    fn theme_default_creates_colorful_theme() {
        let theme = Theme::default();
        assert_eq!(theme.title.fg, Some(Color::White));
        assert_eq!(theme.slot_active.fg, Some(Color::Cyan));
        assert_eq!(theme.error.fg, Some(Color::Red));
        assert_eq!(theme.success.fg, Some(Color::Green));
    }

    #[test]
    fn theme_monochrome_uses_no_colors() {
        let theme = Theme::monochrome();
        assert_eq!(theme.title.fg, None);
        assert_eq!(theme.slot_active.fg, None);
        assert_eq!(theme.error.fg, None);
        assert_eq!(theme.success.fg, None);
        assert_eq!(theme.resend_ready.fg, None);
    }

    #[test]
    fn theme_monochrome_uses_modifiers() {
        let theme = Theme::monochrome();
        assert!(theme.title.add_modifier.contains(Modifier::BOLD));
        assert!(theme.error.add_modifier.contains(Modifier::BOLD));
        assert!(theme.error.add_modifier.contains(Modifier::UNDERLINED));
        assert!(theme.slot_idle.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn theme_from_choice_maps_both_preferences() {
        let standard = Theme::from_choice(ThemeChoice::Standard);
        assert_eq!(standard.error.fg, Some(Color::Red));

        let mono = Theme::from_choice(ThemeChoice::Monochrome);
        assert_eq!(mono.error.fg, None);
    }

    #[test]
    #[serial]
    fn theme_from_env_returns_colorful_when_no_color_unset() {
        let _guard = EnvGuard::new("NO_COLOR");
        std::env::remove_var("NO_COLOR");

        let theme = Theme::from_env();
        assert_eq!(theme.error.fg, Some(Color::Red));
    }

    #[test]
    #[serial]
    fn theme_from_env_returns_monochrome_when_no_color_set() {
        let _guard = EnvGuard::new("NO_COLOR");
        std::env::set_var("NO_COLOR", "1");

        let theme = Theme::from_env();
        assert_eq!(theme.error.fg, None);
    }

    #[test]
    #[serial]
    fn theme_resolve_prefers_no_color_over_saved_choice() {
        let _guard = EnvGuard::new("NO_COLOR");
        std::env::set_var("NO_COLOR", "1");

        let theme = Theme::resolve(ThemeChoice::Standard);
        assert_eq!(theme.error.fg, None);
    }

    // =============================================================================
    // Symbols Tests
    // =============================================================================

    #[test]
    fn symbols_unicode_constants() {
        assert_eq!(UNICODE_SYMBOLS.placeholder, '·');
        assert_eq!(UNICODE_SYMBOLS.mask, '•');
        assert_eq!(UNICODE_SYMBOLS.success, "✓");
        assert_eq!(UNICODE_SYMBOLS.failure, "✗");
        assert_eq!(UNICODE_SYMBOLS.arrow, "→");
    }

    #[test]
    fn symbols_ascii_constants() {
        assert_eq!(ASCII_SYMBOLS.placeholder, '_');
        assert_eq!(ASCII_SYMBOLS.mask, '*');
        assert_eq!(ASCII_SYMBOLS.success, "[+]");
        assert_eq!(ASCII_SYMBOLS.failure, "[x]");
        assert_eq!(ASCII_SYMBOLS.arrow, "->");
    }

    #[test]
    #[serial]
    fn symbols_detect_returns_ascii_for_linux_console() {
        let _guard = EnvGuard::new("TERM");
        std::env::set_var("TERM", "linux");

        assert_eq!(Symbols::detect().mask, '*');
    }

    #[test]
    #[serial]
    fn symbols_detect_returns_unicode_when_term_unset() {
        let _guard = EnvGuard::new("TERM");
        std::env::remove_var("TERM");

        assert_eq!(Symbols::detect().mask, '•');
    }

    /// RAII guard for environment variable testing.
    /// Saves the current value and restores it on drop.
    struct EnvGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvGuard {
        fn new(key: &'static str) -> Self {
            let original = std::env::var(key).ok();
            Self { key, original }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.original {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }

    // =============================================================================
    // AppState Tests
    // =============================================================================

    fn test_state() -> AppState {
        let phone = PhoneNumber::parse("5552017733").expect("valid phone");
        AppState::new(Flow::SignIn, phone, 4, 30)
    }

    #[test]
    fn app_state_starts_on_verify_screen() {
        let state = test_state();
        assert!(state.is_verify());
        assert!(!state.is_done());
        assert!(!state.should_quit());
    }

    #[test]
    fn app_state_entry_matches_requested_length() {
        let phone = PhoneNumber::parse("5552017733").expect("valid phone");
        let state = AppState::new(Flow::SignIn, phone, 6, 30);
        assert_eq!(state.entry.length(), 6);
        assert!(state.entry.is_empty());
    }

    #[test]
    fn app_state_cooldown_starts_counting() {
        let state = test_state();
        assert!(!state.cooldown.is_ready());
        assert_eq!(state.cooldown.remaining(), 30);
    }

    #[test]
    fn app_state_quit_sets_flag() {
        let mut state = test_state();
        state.quit();
        assert!(state.should_quit());
    }

    // =============================================================================
    // TuiEvent Tests
    // =============================================================================

    #[test]
    fn tui_event_paste_carries_text() {
        let event = TuiEvent::Paste("12 34".to_string());
        if let TuiEvent::Paste(text) = event {
            assert_eq!(text, "12 34");
        } else {
            panic!("Expected TuiEvent::Paste variant");
        }
    }

    #[test]
    fn tui_event_verify_carries_outcome() {
        let event = TuiEvent::Verify(VerifyOutcome::Rejected(RejectReason::Mismatch));
        assert!(matches!(
            event,
            TuiEvent::Verify(VerifyOutcome::Rejected(RejectReason::Mismatch))
        ));
    }

    #[test]
    fn tui_event_is_clone() {
        let event = TuiEvent::CooldownTick;
        let cloned = event.clone();
        assert!(matches!(cloned, TuiEvent::CooldownTick));
    }

    // =============================================================================
    // EventHandler Tests
    // =============================================================================

    #[test]
    fn event_handler_new_has_default_tick_rate() {
        let (event_tx, _event_rx) = mpsc::channel(10);
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        let handler = EventHandler::new(event_tx, shutdown_rx);
        assert_eq!(
            handler.tick_rate(),
            Duration::from_millis(DEFAULT_TICK_RATE_MS)
        );
    }

    #[test]
    fn event_handler_with_custom_tick_rate() {
        let (event_tx, _event_rx) = mpsc::channel(10);
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        let custom_rate = Duration::from_millis(33);
        let handler = EventHandler::with_tick_rate(event_tx, shutdown_rx, custom_rate);
        assert_eq!(handler.tick_rate(), custom_rate);
    }

    #[test]
    fn convert_crossterm_key_event() {
        let key_event = KeyEvent::new(KeyCode::Char('7'), KeyModifiers::NONE);
        let result = EventHandler::convert_crossterm_event(CrosstermEvent::Key(key_event));

        if let Some(TuiEvent::Key(k)) = result {
            assert_eq!(k.code, KeyCode::Char('7'));
        } else {
            panic!("Expected TuiEvent::Key variant");
        }
    }

    #[test]
    fn convert_crossterm_paste_event_is_forwarded() {
        let result = EventHandler::convert_crossterm_event(CrosstermEvent::Paste(
            "code: 1234".to_string(),
        ));

        if let Some(TuiEvent::Paste(text)) = result {
            assert_eq!(text, "code: 1234");
        } else {
            panic!("Expected TuiEvent::Paste variant");
        }
    }

    #[test]
    fn convert_crossterm_resize_event() {
        let result = EventHandler::convert_crossterm_event(CrosstermEvent::Resize(80, 24));
        assert!(matches!(result, Some(TuiEvent::Resize(80, 24))));
    }

    #[test]
    fn convert_crossterm_focus_events_return_none() {
        assert!(EventHandler::convert_crossterm_event(CrosstermEvent::FocusGained).is_none());
        assert!(EventHandler::convert_crossterm_event(CrosstermEvent::FocusLost).is_none());
    }

    #[tokio::test]
    async fn event_handler_stops_on_shutdown_signal() {
        let (event_tx, _event_rx) = mpsc::channel(100);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handler =
            EventHandler::with_tick_rate(event_tx, shutdown_rx, Duration::from_millis(500));
        let handle = tokio::spawn(handler.run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = shutdown_tx.send(());

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(result.is_ok(), "Handler should complete within timeout");
        assert!(result.unwrap().unwrap().is_ok());
    }

    #[tokio::test]
    async fn event_handler_generates_tick_events() {
        let (event_tx, mut event_rx) = mpsc::channel(100);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handler =
            EventHandler::with_tick_rate(event_tx, shutdown_rx, Duration::from_millis(5));
        let handle = tokio::spawn(handler.run());

        let mut tick_count = 0;
        let deadline = tokio::time::Instant::now() + Duration::from_millis(200);
        while tokio::time::Instant::now() < deadline && tick_count < 3 {
            match tokio::time::timeout(Duration::from_millis(50), event_rx.recv()).await {
                Ok(Some(TuiEvent::Tick)) => tick_count += 1,
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => {}
            }
        }

        assert!(tick_count >= 3, "Expected at least 3 ticks, got {tick_count}");

        let _ = shutdown_tx.send(());
        let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
    }

    // =============================================================================
    // ResendTicker Tests
    // =============================================================================

    #[tokio::test]
    async fn resend_ticker_delivers_cooldown_ticks() {
        let (tx, mut rx) = mpsc::channel(100);
        let mut ticker = ResendTicker::with_period(Duration::from_millis(5));
        ticker.start(tx);

        for _ in 0..3 {
            let event = tokio::time::timeout(Duration::from_millis(500), rx.recv())
                .await
                .expect("tick within timeout")
                .expect("channel open");
            assert!(matches!(event, TuiEvent::CooldownTick));
        }

        ticker.cancel();
    }

    #[tokio::test]
    async fn resend_ticker_cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(100);
        let mut ticker = ResendTicker::with_period(Duration::from_millis(5));
        ticker.start(tx);

        // Let at least one tick through, then cancel and drain.
        let _ = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        ticker.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        while rx.try_recv().is_ok() {}

        // No further ticks arrive once the loop is gone.
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
        assert!(!ticker.is_running());
    }

    #[tokio::test]
    async fn resend_ticker_restart_keeps_a_single_loop() {
        let (tx, mut rx) = mpsc::channel(100);
        let mut ticker = ResendTicker::with_period(Duration::from_millis(50));
        ticker.start(tx.clone());
        ticker.start(tx);
        assert!(ticker.is_running());

        // A doubled loop would deliver ticks roughly every 25ms; a single
        // loop cannot produce 4 ticks in 120ms.
        tokio::time::sleep(Duration::from_millis(120)).await;
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert!(count <= 3, "Expected a single tick loop, got {count} ticks");

        ticker.cancel();
    }

    #[tokio::test]
    async fn resend_ticker_not_running_before_start() {
        let ticker = ResendTicker::new();
        assert!(!ticker.is_running());
    }

    // =============================================================================
    // App Behavior Tests
    // =============================================================================

    #[tokio::test]
    async fn fourth_digit_dispatches_and_approval_reaches_done() {
        let dir = TempDir::new().unwrap();
        let (mut app, mut rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        for digit in ['1', '2', '3', '4'] {
            app.handle_event(press(KeyCode::Char(digit)));
        }
        assert!(app.state().submit.is_submitting());

        let outcome = next_outcome(&mut rx).await;
        app.handle_event(TuiEvent::Verify(outcome));

        assert!(app.state().is_done());
        assert!(app.state().submit.is_verified());
        assert!(app.state().error.is_none());
    }

    #[tokio::test]
    async fn wrong_code_rejection_clears_entry_and_sets_error() {
        let dir = TempDir::new().unwrap();
        let (mut app, mut rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        for digit in ['9', '9', '9', '9'] {
            app.handle_event(press(KeyCode::Char(digit)));
        }
        let outcome = next_outcome(&mut rx).await;
        app.handle_event(TuiEvent::Verify(outcome));

        assert!(app.state().is_verify());
        assert!(app.state().entry.is_empty());
        assert_eq!(
            app.state().error.as_deref(),
            Some("Incorrect code. Check the message and try again")
        );
        // The guard reopened; a corrected entry can dispatch again.
        assert!(!app.state().submit.dispatched());
    }

    #[tokio::test]
    async fn enter_with_incomplete_entry_sets_inline_message() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        app.handle_event(press(KeyCode::Char('1')));
        app.handle_event(press(KeyCode::Enter));

        assert_eq!(
            app.state().error.as_deref(),
            Some("Enter all 4 digits of the code")
        );
        assert!(!app.state().submit.dispatched());
    }

    #[tokio::test]
    async fn typing_clears_previous_error() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        app.handle_event(press(KeyCode::Enter));
        assert!(app.state().error.is_some());

        app.handle_event(press(KeyCode::Char('5')));
        assert!(app.state().error.is_none());
    }

    #[tokio::test]
    async fn edits_are_ignored_while_submitting() {
        let dir = TempDir::new().unwrap();
        // Long latency holds the Submitting phase open.
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::from_secs(30));
        app.request_initial_code().await;
        app.ticker.cancel();

        for digit in ['1', '2', '3', '4'] {
            app.handle_event(press(KeyCode::Char(digit)));
        }
        assert!(app.state().submit.is_submitting());

        app.handle_event(press(KeyCode::Backspace));
        app.handle_event(press(KeyCode::Char('9')));
        app.handle_event(TuiEvent::Paste("999".to_string()));

        assert_eq!(app.state().entry.code(), "1234");
    }

    #[tokio::test]
    async fn paste_fills_and_dispatches() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::from_secs(30));
        app.request_initial_code().await;
        app.ticker.cancel();

        app.handle_event(TuiEvent::Paste("code: 12-34 thanks".to_string()));

        assert_eq!(app.state().entry.code(), "1234");
        assert!(app.state().submit.is_submitting());
    }

    #[tokio::test]
    async fn resend_during_cooldown_is_a_silent_no_op() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        app.handle_event(press(KeyCode::Char('1')));
        let remaining = app.state().cooldown.remaining();

        app.handle_event(press(KeyCode::Char('r')));

        // Nothing moved: no reset, no error, buffer intact.
        assert_eq!(app.state().cooldown.remaining(), remaining);
        assert_eq!(app.state().entry.code(), "1");
        assert!(app.state().error.is_none());
    }

    #[tokio::test]
    async fn resend_after_cooldown_restarts_count_and_clears_state() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        // Walk the cooldown down to zero.
        for _ in 0..30 {
            app.handle_event(TuiEvent::CooldownTick);
        }
        assert!(app.state().cooldown.is_ready());

        app.handle_event(press(KeyCode::Char('1')));
        app.handle_event(press(KeyCode::Char('r')));

        assert_eq!(app.state().cooldown.remaining(), 30);
        assert!(app.state().entry.is_empty());
        assert!(app.state().error.is_none());
        assert!(app.ticker.is_running());

        app.ticker.cancel();
    }

    #[tokio::test]
    async fn cooldown_ticker_is_cancelled_at_zero() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        assert!(app.ticker.is_running());

        for _ in 0..30 {
            app.handle_event(TuiEvent::CooldownTick);
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!app.ticker.is_running());
        assert_eq!(app.state().cooldown.remaining(), 0);
    }

    #[tokio::test]
    async fn theme_toggle_saves_preference() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        let before = app.state().theme_choice;
        app.handle_event(press(KeyCode::Char('t')));
        assert_eq!(app.state().theme_choice, before.toggle());

        let saved = Preferences::load(dir.path());
        assert_eq!(saved.theme, app.state().theme_choice);
    }

    #[tokio::test]
    async fn theme_toggle_survives_failed_save() {
        let dir = TempDir::new().unwrap();
        // A regular file where the config dir should go makes every save fail
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "occupied").unwrap();

        let (mut app, _rx) = test_app(&blocker.join("prefs"), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        let before = app.state().theme_choice;
        app.handle_event(press(KeyCode::Char('t')));
        assert_eq!(app.state().theme_choice, before.toggle());

        // The choice keeps toggling even though persistence never succeeds
        app.handle_event(press(KeyCode::Char('t')));
        assert_eq!(app.state().theme_choice, before);
        assert!(!app.state().should_quit());
    }

    #[tokio::test]
    async fn show_code_surfaces_the_issued_code() {
        let dir = TempDir::new().unwrap();
        let verifier = Arc::new(MemoryVerifier::new(VerifierSettings {
            pinned_code: Some("4321".to_string()),
            latency: Duration::ZERO,
            ..VerifierSettings::default()
        }));
        let (tx, _rx) = mpsc::channel(100);
        let mut app = App::new(
            &test_config(dir.path()),
            Flow::SignIn,
            "5552017733",
            true,
            verifier,
            tx,
        )
        .expect("valid app");

        app.request_initial_code().await;
        app.ticker.cancel();

        assert_eq!(app.state().code_hint.as_deref(), Some("4321"));
    }

    #[tokio::test]
    async fn q_and_ctrl_c_quit() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        app.handle_event(press(KeyCode::Char('q')));
        assert!(app.state().should_quit());

        let (mut app, _rx2) = test_app(dir.path(), "1234", Duration::ZERO);
        app.handle_event(TuiEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.state().should_quit());
    }

    #[tokio::test]
    async fn done_screen_ignores_digits_and_quits_on_enter() {
        let dir = TempDir::new().unwrap();
        let (mut app, mut rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        for digit in ['1', '2', '3', '4'] {
            app.handle_event(press(KeyCode::Char(digit)));
        }
        let outcome = next_outcome(&mut rx).await;
        app.handle_event(TuiEvent::Verify(outcome));
        assert!(app.state().is_done());

        app.handle_event(press(KeyCode::Char('5')));
        assert_eq!(app.state().entry.code(), "1234");
        assert!(!app.state().should_quit());

        app.handle_event(press(KeyCode::Enter));
        assert!(app.state().should_quit());
    }

    #[tokio::test]
    async fn release_events_do_not_enter_digits() {
        let dir = TempDir::new().unwrap();
        let (mut app, _rx) = test_app(dir.path(), "1234", Duration::ZERO);
        app.request_initial_code().await;
        app.ticker.cancel();

        let mut release = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_event(TuiEvent::Key(release));

        assert!(app.state().entry.is_empty());
    }
}
