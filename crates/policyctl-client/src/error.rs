//! Error types for the client crate.
//!
//! This module defines all errors that can occur while talking to the
//! policy service.

use thiserror::Error;
use tonic::{Code, Status};

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the policy service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service reported that the requested entity does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Message returned by the service.
        message: String,
    },

    /// The service could not be reached.
    #[error("policy service unavailable: {message}")]
    Unavailable {
        /// Transport or service message.
        message: String,
    },

    /// Any other RPC failure, including validation rejections.
    #[error("rpc failed ({code:?}): {message}")]
    Rpc {
        /// gRPC status code.
        code: Code,
        /// Message returned by the service.
        message: String,
    },

    /// The configured endpoint is not a valid URI.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The bearer token cannot be sent as gRPC metadata.
    #[error("invalid bearer token: {0}")]
    InvalidToken(String),

    /// gRPC transport configuration error.
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// IO error (reading a CA certificate).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Returns true if the service reported a missing entity.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<Status> for ClientError {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::NotFound => Self::NotFound { message },
            Code::Unavailable => Self::Unavailable { message },
            code => Self::Rpc { code, message },
        }
    }
}
