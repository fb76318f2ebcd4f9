//! Error reporting shared by the CLI and the plugin lifecycle
//!
//! Errors that the user can fix (bad configuration, bad arguments) are shown
//! with their own message. Everything else is reported with the operation
//! context, and the underlying detail only appears at debug level.

/// Errors that know whether their message is meant for the user
///
/// When `is_user_actionable()` is true, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True when the message tells the user what to change
    fn is_user_actionable(&self) -> bool;

    /// The message to show when the error is user-actionable
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with the appropriate level of detail
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Log a non-fatal failure as a warning and carry on
pub fn warn_and_continue<E: std::fmt::Display>(error: &E, operation_context: &str) {
    log::warn!("{}: {}", operation_context, error);
}
