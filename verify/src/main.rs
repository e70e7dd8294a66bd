//! Porchlight Verify - terminal phone verification.
//!
//! This binary opens the verification screen for a phone number: a code is
//! issued, the user types it into the digit slots, and the session ends
//! verified or abandoned.
//!
//! # Commands
//!
//! - `porchlight-verify signin --phone <number>`: Verify a number to sign in
//! - `porchlight-verify reset --phone <number>`: Confirm a password reset code
//!
//! # Environment Variables
//!
//! See the `config` module of the library crate for available options.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use porchlight_verify::config::Config;
use porchlight_verify::tui::app::{run, Flow};
use porchlight_verify::verifier::{MemoryVerifier, VerifierSettings};

/// Porchlight Verify - terminal phone verification.
///
/// Issues a one-time code for the given phone number and opens the code
/// entry screen. With no SMS channel attached, the code is written to the
/// log on stderr; pass --show-code to surface it on screen instead.
#[derive(Parser, Debug)]
#[command(name = "porchlight-verify")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    PORCHLIGHT_CODE_LENGTH           Number of digit slots, 3-10 (default: 4)
    PORCHLIGHT_RESEND_COOLDOWN_SECS  Seconds before resend is allowed (default: 30)
    PORCHLIGHT_VERIFY_LATENCY_MS     Simulated verification latency (default: 800)
    PORCHLIGHT_CODE                  Pin the issued code (default: random)
    PORCHLIGHT_CODE_TTL_SECS         Seconds before a code expires (default: 300)
    PORCHLIGHT_MAX_ATTEMPTS          Wrong guesses before lockout (default: 3)
    PORCHLIGHT_CONFIG_DIR            Preferences directory (default: ~/.porchlight)

EXAMPLES:
    # Verify a number to sign in
    porchlight-verify signin --phone 555-201-7733

    # Surface the issued code on screen while testing
    porchlight-verify signin --phone 555-201-7733 --show-code

    # Walk the password reset flow with a pinned code
    export PORCHLIGHT_CODE=1234
    porchlight-verify reset --phone \"(555) 201-7733\"
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Verify a phone number to sign in.
    ///
    /// Issues a code for the number and opens the entry screen with the
    /// sign-in copy.
    Signin {
        /// Phone number the code is sent to.
        #[arg(short, long)]
        phone: String,

        /// Show the issued code on screen (local testing aid).
        #[arg(long)]
        show_code: bool,
    },

    /// Confirm a password reset code.
    ///
    /// Same entry screen with the password reset copy.
    Reset {
        /// Phone number the code is sent to.
        #[arg(short, long)]
        phone: String,

        /// Show the issued code on screen (local testing aid).
        #[arg(long)]
        show_code: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (flow, phone, show_code) = match cli.command {
        Command::Signin { phone, show_code } => (Flow::SignIn, phone, show_code),
        Command::Reset { phone, show_code } => (Flow::PasswordReset, phone, show_code),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run_verify(flow, phone, show_code))
}

/// Runs one verification session.
async fn run_verify(flow: Flow, phone: String, show_code: bool) -> Result<()> {
    init_logging();

    info!(%flow, "Starting Porchlight Verify");

    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        code_length = config.code_length,
        cooldown_secs = config.resend_cooldown_secs,
        latency_ms = config.verify_latency_ms,
        "Configuration loaded"
    );

    let verifier = Arc::new(MemoryVerifier::new(VerifierSettings {
        code_length: config.code_length,
        pinned_code: config.pinned_code.clone(),
        ttl_secs: config.code_ttl_secs,
        max_attempts: config.max_attempts,
        latency: Duration::from_millis(config.verify_latency_ms),
    }));

    run(&config, flow, &phone, show_code, verifier)
        .await
        .context("Verification session failed")?;

    info!("Verification session ended");
    Ok(())
}

/// Initializes the logging subsystem.
///
/// Logs go to stderr; the TUI owns stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}
