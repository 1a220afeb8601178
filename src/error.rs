//! User-facing error taxonomy
//!
//! Every variant is recoverable: the interpreter reports it on the console's
//! error stream, the command returns failure, and the loop continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplError {
    /// `cd` target does not exist
    #[error("no such resource: {0}")]
    NoSuchResource(String),

    /// Send target has no resource descriptor
    #[error("resource not found")]
    ResourceNotFound,

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("unsupported authentication scheme: {0}")]
    UnsupportedScheme(String),

    #[error("no server selected")]
    NoServerSelected,

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0:#}")]
    Transport(anyhow::Error),

    #[error("{0:#}")]
    Import(anyhow::Error),

    /// Payload could not be prepared; the send is not issued
    #[error("cannot prepare payload: {0:#}")]
    Payload(anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReplError {
    /// Whether the error was caused by what the user typed
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::NoSuchResource(_)
                | Self::ResourceNotFound
                | Self::UnsupportedMethod(_)
                | Self::UnsupportedScheme(_)
                | Self::NoServerSelected
                | Self::Usage(_)
                | Self::Import(_)
        )
    }
}
