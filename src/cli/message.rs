//! Console messaging macros.
//!
//! Trimmed from the teacher's `libs/messages::macros` trio
//! (`msg_success!`/`msg_info!`/`msg_warning!`, each routing to
//! `tracing` under `RUST_LOG`/`PORTSQL_DEBUG` and to plain `println!`
//! otherwise) down to plain format strings. This tool's CLI surface is
//! four subcommands, not dozens of typed messages, so a `Message` enum
//! would be ceremony without payoff.

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("PORTSQL_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[macro_export]
macro_rules! msg_success {
    ($($arg:tt)*) => {
        if $crate::cli::message::is_debug_mode() {
            tracing::info!("{}", format!($($arg)*));
        } else {
            println!("✓ {}", format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! msg_info {
    ($($arg:tt)*) => {
        if $crate::cli::message::is_debug_mode() {
            tracing::info!("{}", format!($($arg)*));
        } else {
            println!("{}", format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($($arg:tt)*) => {
        if $crate::cli::message::is_debug_mode() {
            tracing::warn!("{}", format!($($arg)*));
        } else {
            println!("warning: {}", format!($($arg)*));
        }
    };
}
