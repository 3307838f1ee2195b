//! CLI commands and argument parsing.

pub mod attribute;
pub mod attribute_value;
pub mod kas_registry;
mod shared;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use policyctl_client::PolicyApi;

pub use shared::{LabelArgs, LabelUpdateArgs};

use crate::error::CliResult;
use crate::handler::Handler;
use crate::output::{Console, OutputFormat};

/// policyctl - manage attributes and the Key Access Server registry
#[derive(Debug, Parser)]
#[command(name = "policyctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Policy service endpoint [default: http://localhost:8080]
    #[arg(long, env = "POLICYCTL_HOST", global = true)]
    pub host: Option<String>,

    /// Config file [default: <config dir>/policyctl/config.toml]
    #[arg(long, env = "POLICYCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(short, long, value_enum, env = "POLICYCTL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Bearer token sent with every call
    #[arg(long, env = "POLICYCTL_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Extra CA certificate (PEM) for https endpoints
    #[arg(long, env = "POLICYCTL_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub force: bool,

    /// Debug logging on standard error
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage attribute definitions
    #[command(subcommand)]
    Attributes(attribute::AttributeCommand),

    /// Manage attribute values
    #[command(subcommand)]
    AttributeValues(attribute_value::AttributeValueCommand),

    /// Manage the Key Access Server registry
    #[command(subcommand)]
    KasRegistry(kas_registry::KasRegistryCommand),
}

/// The full command tree.
pub fn command_tree() -> clap::Command {
    Cli::command()
}

/// Runs one command to completion.
///
/// `handler` is consumed and dropped before this returns.
pub async fn execute<A, W>(
    command: Commands,
    handler: Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()>
where
    A: PolicyApi,
    W: Write,
{
    match command {
        Commands::Attributes(cmd) => attribute::run(cmd, &handler, console).await,
        Commands::AttributeValues(cmd) => attribute_value::run(cmd, &handler, console).await,
        Commands::KasRegistry(cmd) => kas_registry::run(cmd, &handler, console).await,
    }
}
