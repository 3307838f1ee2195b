//! Per-invocation ownership of the policy service client.

use std::ops::Deref;

use policyctl_client::{ClientConfig, GrpcPolicyClient, PolicyApi};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Owns the API client for the duration of one command.
///
/// The handler is moved into [`execute`](crate::commands::execute) and
/// dropped when the command returns, on success and failure alike, which
/// releases the underlying connection.
#[derive(Debug)]
pub struct Handler<A: PolicyApi> {
    api: A,
}

impl<A: PolicyApi> Handler<A> {
    /// Wraps an API implementation.
    pub const fn new(api: A) -> Self {
        Self { api }
    }
}

impl Handler<GrpcPolicyClient> {
    /// Builds a gRPC-backed handler. No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint, token or CA
    /// certificate is unusable.
    pub fn connect(config: &ClientConfig) -> CliResult<Self> {
        let client = GrpcPolicyClient::connect(config)
            .map_err(|e| CliError::Config(format!("cannot use {}: {e}", config.endpoint)))?;
        Ok(Self::new(client))
    }
}

impl<A: PolicyApi> Deref for Handler<A> {
    type Target = A;

    fn deref(&self) -> &A {
        &self.api
    }
}

impl<A: PolicyApi> Drop for Handler<A> {
    fn drop(&mut self) {
        debug!("Released policy service handler");
    }
}
