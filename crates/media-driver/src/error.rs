//! Driver error types.

use std::fmt;

use media_core::CoreError;

/// Errors that can occur in the receive-path driver.
#[derive(Debug)]
pub enum DriverError {
    /// Configuration error (invalid bind address, invalid CLI argument).
    ///
    /// These are fatal errors that prevent driver startup. Fix configuration
    /// and restart.
    Config(String),

    /// Transport/network error (bind failure, socket I/O error).
    ///
    /// May be transient or fatal depending on the underlying cause; see the
    /// error message for details.
    Transport(String),

    /// Core receive-path logic error, from `ReceiverDriver::process_event`.
    Core(CoreError),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Core(err) => write!(f, "core error: {err}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CoreError> for DriverError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<std::io::Error> for DriverError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
