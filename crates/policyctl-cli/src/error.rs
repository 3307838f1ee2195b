//! CLI error types.

use policyctl_client::ClientError;
use policyctl_core::ValidationError;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    /// A required flag was not given or was blank.
    #[error("Flag '--{flag}' is required")]
    MissingFlag {
        /// Flag name without dashes.
        flag: String,
    },

    /// Flags were given but are unusable together or malformed.
    #[error("{context}: {reason}")]
    Arguments {
        /// What was being checked.
        context: String,
        /// What is wrong.
        reason: String,
    },

    /// The policy service call failed.
    #[error("{context}: {source}")]
    Remote {
        /// What the command was doing.
        context: String,
        /// Underlying client error.
        source: ClientError,
    },

    /// The user declined a confirmation prompt.
    #[error("Aborted {pending}")]
    Aborted {
        /// The action that was not performed.
        pending: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Creates a missing-flag error.
    pub fn missing_flag(flag: impl Into<String>) -> Self {
        Self::MissingFlag { flag: flag.into() }
    }

    /// Creates an argument error.
    pub fn arguments(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Arguments {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a validation failure, naming the flag it came from.
    pub fn invalid_flag(error: ValidationError) -> Self {
        Self::Arguments {
            context: format!("Invalid --{}", error.field.replace('_', "-")),
            reason: error.message,
        }
    }

    /// Returns a closure that wraps a client error with `context`.
    pub fn remote(context: impl Into<String>) -> impl FnOnce(ClientError) -> Self {
        let context = context.into();
        move |source| Self::Remote { context, source }
    }

    /// Returns true for errors detected before any call was made.
    pub const fn is_argument_error(&self) -> bool {
        matches!(self, Self::MissingFlag { .. } | Self::Arguments { .. })
    }

    /// Process exit status for this error.
    ///
    /// `2` for argument errors, `3` for an aborted confirmation and `1` for
    /// everything else.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingFlag { .. } | Self::Arguments { .. } => 2,
            Self::Aborted { .. } => 3,
            Self::Remote { .. } | Self::Config(_) | Self::Io(_) | Self::Json(_) => 1,
        }
    }
}
