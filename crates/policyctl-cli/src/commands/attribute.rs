//! `attributes` commands.

use std::io::Write;

use clap::{Args, Subcommand};
use policyctl_client::{NewAttribute, PolicyApi};
use policyctl_core::AttributeRule;
use tracing::info;

use super::shared::{state_filter, LabelArgs, LabelUpdateArgs};
use crate::confirm::{gate, PendingAction};
use crate::error::{CliError, CliResult};
use crate::flags;
use crate::handler::Handler;
use crate::output::{self, Console};

/// Attribute subcommands.
#[derive(Debug, Subcommand)]
pub enum AttributeCommand {
    /// Show one attribute
    Get(IdArgs),

    /// List attributes
    List(ListArgs),

    /// Create an attribute
    Create(CreateArgs),

    /// Update an attribute's labels
    Update(UpdateArgs),

    /// Deactivate an attribute
    Deactivate(IdArgs),
}

/// Arguments naming one attribute.
#[derive(Debug, Args)]
pub struct IdArgs {
    /// Attribute id (required)
    #[arg(long)]
    pub id: Option<String>,
}

/// Arguments for `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// active, inactive or any [default: active]
    #[arg(long)]
    pub state: Option<String>,
}

/// Arguments for `create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Attribute name (required)
    #[arg(long)]
    pub name: Option<String>,

    /// ALL_OF, ANY_OF or HIERARCHY (required)
    #[arg(long)]
    pub rule: Option<String>,

    /// Namespace id (required)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Value to create with the attribute (repeatable, order is kept)
    #[arg(long = "value")]
    pub values: Vec<String>,

    #[command(flatten)]
    pub labels: LabelArgs,
}

/// Arguments for `update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Attribute id (required)
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub labels: LabelUpdateArgs,
}

/// Runs an attribute command.
pub async fn run<A: PolicyApi, W: Write>(
    cmd: AttributeCommand,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    match cmd {
        AttributeCommand::Get(args) => {
            let id = flags::required("id", args.id.as_deref())?;
            let attribute = handler
                .get_attribute(&id)
                .await
                .map_err(CliError::remote(format!("Failed to get attribute ({id})")))?;
            console.render(&output::attribute(&attribute), &attribute)
        }
        AttributeCommand::List(args) => {
            let state = state_filter(args.state.as_deref())?;
            let attributes = handler
                .list_attributes(state)
                .await
                .map_err(CliError::remote("Failed to list attributes"))?;
            console.render(&output::attribute_list(&attributes), &attributes)
        }
        AttributeCommand::Create(args) => create(args, handler, console).await,
        AttributeCommand::Update(args) => {
            let id = flags::required("id", args.id.as_deref())?;
            let patch = args.labels.require_patch()?;
            let updated = handler
                .update_attribute(&id, patch)
                .await
                .map_err(CliError::remote(format!("Failed to update attribute ({id})")))?;
            info!(id = %updated.id, "Updated attribute");
            console.render(&output::attribute(&updated), &updated)
        }
        AttributeCommand::Deactivate(args) => deactivate(args, handler, console).await,
    }
}

async fn create<A: PolicyApi, W: Write>(
    args: CreateArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let name = flags::required("name", args.name.as_deref())?;
    let rule: AttributeRule = flags::required("rule", args.rule.as_deref())?
        .parse()
        .map_err(CliError::invalid_flag)?;
    let namespace_id = flags::required("namespace", args.namespace.as_deref())?;
    let values = flags::string_list("value", &args.values, 0)?;
    let labels = flags::labels(&args.labels.labels)?;

    let created = handler
        .create_attribute(NewAttribute {
            namespace_id,
            name,
            rule,
            values,
            labels,
        })
        .await
        .map_err(CliError::remote("Failed to create attribute"))?;
    info!(id = %created.id, fqn = %created.fqn, "Created attribute");

    console.render(&output::attribute(&created), &created)
}

async fn deactivate<A: PolicyApi, W: Write>(
    args: IdArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let id = flags::required("id", args.id.as_deref())?;
    let attribute = handler
        .get_attribute(&id)
        .await
        .map_err(CliError::remote(format!("Failed to get attribute ({id})")))?;

    gate(
        console.confirmer(),
        &PendingAction::new("deactivate", "attribute", &attribute.name),
    )?;

    let deactivated = handler
        .deactivate_attribute(&id)
        .await
        .map_err(CliError::remote(format!("Failed to deactivate attribute ({id})")))?;
    info!(id = %deactivated.id, "Deactivated attribute");

    console.render(&output::attribute(&deactivated), &deactivated)
}
