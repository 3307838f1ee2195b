//! `kas-registry` commands.
//!
//! A registration carries exactly one public key: either the key material
//! itself (`--public-key-local`) or a URI it is published at
//! (`--public-key-remote`). Passing both is rejected before any call.

use std::io::Write;

use clap::{Args, Subcommand};
use policyctl_client::{KasEntryUpdate, NewKasEntry, PolicyApi};
use policyctl_core::PublicKey;
use tracing::info;

use super::shared::{LabelArgs, LabelUpdateArgs};
use crate::confirm::{gate, PendingAction};
use crate::error::{CliError, CliResult};
use crate::flags;
use crate::handler::Handler;
use crate::output::{self, Console};

/// KAS registry subcommands.
#[derive(Debug, Subcommand)]
pub enum KasRegistryCommand {
    /// Show one registration
    Get(IdArgs),

    /// List all registrations
    List,

    /// Register a Key Access Server
    Create(CreateArgs),

    /// Update a registration
    Update(UpdateArgs),

    /// Remove a registration
    Delete(IdArgs),
}

/// Arguments naming one registration.
#[derive(Debug, Args)]
pub struct IdArgs {
    /// Registration id (required)
    #[arg(long)]
    pub id: Option<String>,
}

/// Public key flags.
#[derive(Debug, Default, Args)]
pub struct KeyArgs {
    /// Public key material
    #[arg(long)]
    pub public_key_local: Option<String>,

    /// URI the public key is published at
    #[arg(long)]
    pub public_key_remote: Option<String>,
}

impl KeyArgs {
    fn optional(&self) -> CliResult<Option<PublicKey>> {
        PublicKey::from_flags(
            &flags::optional(self.public_key_local.as_deref()),
            &flags::optional(self.public_key_remote.as_deref()),
        )
        .map_err(CliError::invalid_flag)
    }

    fn required(&self) -> CliResult<PublicKey> {
        PublicKey::require_from_flags(
            &flags::optional(self.public_key_local.as_deref()),
            &flags::optional(self.public_key_remote.as_deref()),
        )
        .map_err(CliError::invalid_flag)
    }
}

/// Arguments for `create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Key Access Server URI (required)
    #[arg(long)]
    pub uri: Option<String>,

    #[command(flatten)]
    pub key: KeyArgs,

    #[command(flatten)]
    pub labels: LabelArgs,
}

/// Arguments for `update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Registration id (required)
    #[arg(long)]
    pub id: Option<String>,

    /// New Key Access Server URI
    #[arg(long)]
    pub uri: Option<String>,

    #[command(flatten)]
    pub key: KeyArgs,

    #[command(flatten)]
    pub labels: LabelUpdateArgs,
}

/// Runs a KAS registry command.
pub async fn run<A: PolicyApi, W: Write>(
    cmd: KasRegistryCommand,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    match cmd {
        KasRegistryCommand::Get(args) => {
            let id = flags::required("id", args.id.as_deref())?;
            let entry = handler
                .get_kas_entry(&id)
                .await
                .map_err(CliError::remote(format!("Failed to get KAS registry entry ({id})")))?;
            console.render(&output::kas_entry(&entry), &entry)
        }
        KasRegistryCommand::List => {
            let entries = handler
                .list_kas_entries()
                .await
                .map_err(CliError::remote("Failed to list KAS registry entries"))?;
            console.render(&output::kas_list(&entries), &entries)
        }
        KasRegistryCommand::Create(args) => create(args, handler, console).await,
        KasRegistryCommand::Update(args) => update(args, handler, console).await,
        KasRegistryCommand::Delete(args) => delete(args, handler, console).await,
    }
}

async fn create<A: PolicyApi, W: Write>(
    args: CreateArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let uri = flags::required("uri", args.uri.as_deref())?;
    let public_key = args.key.required()?;
    let labels = flags::labels(&args.labels.labels)?;

    let created = handler
        .create_kas_entry(NewKasEntry {
            uri,
            public_key,
            labels,
        })
        .await
        .map_err(CliError::remote("Failed to create KAS registry entry"))?;
    info!(id = %created.id, uri = %created.uri, "Created KAS registry entry");

    console.render(&output::kas_entry(&created), &created)
}

async fn update<A: PolicyApi, W: Write>(
    args: UpdateArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let id = flags::required("id", args.id.as_deref())?;
    let uri = flags::optional(args.uri.as_deref());
    let update = KasEntryUpdate {
        id: id.clone(),
        uri: (!uri.trim().is_empty()).then_some(uri),
        public_key: args.key.optional()?,
        labels: args.labels.patch()?,
    };
    if update.is_empty() {
        return Err(CliError::arguments(
            "Nothing to update",
            "pass --uri, --public-key-local, --public-key-remote or --label",
        ));
    }

    let updated = handler
        .update_kas_entry(update)
        .await
        .map_err(CliError::remote(format!("Failed to update KAS registry entry ({id})")))?;
    info!(id = %updated.id, "Updated KAS registry entry");

    console.render(&output::kas_entry(&updated), &updated)
}

async fn delete<A: PolicyApi, W: Write>(
    args: IdArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let id = flags::required("id", args.id.as_deref())?;
    handler
        .get_kas_entry(&id)
        .await
        .map_err(CliError::remote(format!("Failed to get KAS registry entry ({id})")))?;

    gate(
        console.confirmer(),
        &PendingAction::new("delete", "KAS registry entry", &id),
    )?;

    let deleted = handler
        .delete_kas_entry(&id)
        .await
        .map_err(CliError::remote(format!("Failed to delete KAS registry entry ({id})")))?;
    info!(id = %deleted.id, "Deleted KAS registry entry");

    console.render(&output::kas_deleted(&deleted), &deleted)
}
