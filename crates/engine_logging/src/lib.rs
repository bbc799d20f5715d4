#![deny(missing_docs)]
//! Shared logging utilities for the harvester workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a thread-local harvest context that prefixes every line with the strategy
//! and page currently being worked on, and a minimal test initializer for the
//! global logger.

use std::cell::RefCell;

thread_local! {
    /// Strategy name and page number the current thread is harvesting.
    static CONTEXT: RefCell<Option<(String, u32)>> = const { RefCell::new(None) };
}

/// Records the strategy and page the current thread is working on.
/// The walker calls this before each fetch.
pub fn set_context(strategy: &str, page: u32) {
    CONTEXT.with(|ctx| *ctx.borrow_mut() = Some((strategy.to_string(), page)));
}

/// Clears the harvest context for the current thread.
pub fn clear_context() {
    CONTEXT.with(|ctx| *ctx.borrow_mut() = None);
}

/// Returns `"[strategy p<page>] "` when a context is set, otherwise an empty string.
pub fn context_prefix() -> String {
    CONTEXT.with(|ctx| match ctx.borrow().as_ref() {
        Some((strategy, page)) => format!("[{strategy} p{page}] "),
        None => String::new(),
    })
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
