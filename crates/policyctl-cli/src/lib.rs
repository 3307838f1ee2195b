//! # policyctl
//!
//! Command-line management of policy objects: attribute definitions, their
//! values, and Key Access Server registrations.
//!
//! Every command runs the same pipeline:
//!
//! ```text
//! clap args ──▶ flags (validate) ──▶ Handler<PolicyApi> ──▶ output (render)
//!                                        │
//!                           confirm::gate before destructive calls
//! ```
//!
//! The binary wires this to [`GrpcPolicyClient`](policyctl_client::GrpcPolicyClient)
//! and the terminal; tests wire it to an in-memory fake and a byte buffer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod flags;
pub mod handler;
pub mod output;

pub use commands::{command_tree, execute, Cli, Commands, GlobalArgs};
pub use config::{FileConfig, Settings};
pub use confirm::{AssumeYes, Confirmer, PendingAction, TerminalConfirmer};
pub use error::{CliError, CliResult};
pub use handler::Handler;
pub use output::{Console, OutputFormat};
