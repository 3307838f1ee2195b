//! `attribute-values` commands.

use std::io::Write;

use clap::{Args, Subcommand};
use policyctl_client::{AttributeValueUpdate, NewAttributeValue, PolicyApi};
use policyctl_core::AttributeValue;
use tracing::info;

use super::shared::{state_filter, LabelArgs, LabelUpdateArgs};
use crate::confirm::{gate, PendingAction};
use crate::error::{CliError, CliResult};
use crate::flags;
use crate::handler::Handler;
use crate::output::{self, Console};

const RESOURCE: &str = "attribute value";

/// Attribute value subcommands.
#[derive(Debug, Subcommand)]
pub enum AttributeValueCommand {
    /// Create a value under an attribute
    Create(CreateArgs),

    /// Show one value
    Get(IdArgs),

    /// List the values of an attribute
    List(ListArgs),

    /// Update a value's labels
    Update(UpdateArgs),

    /// Deactivate a value
    Deactivate(IdArgs),

    /// Manage a value's members
    #[command(subcommand)]
    Members(MembersCommand),
}

/// Member subcommands.
#[derive(Debug, Subcommand)]
pub enum MembersCommand {
    /// Add members to a value
    Add(MembersArgs),

    /// Remove members from a value
    Remove(MembersArgs),

    /// Replace all members of a value
    Replace(MembersArgs),
}

/// Arguments naming one value.
#[derive(Debug, Args)]
pub struct IdArgs {
    /// Attribute value id (required)
    #[arg(long)]
    pub id: Option<String>,
}

/// Arguments for `create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Owning attribute id (required)
    #[arg(long)]
    pub attribute_id: Option<String>,

    /// The value (required)
    #[arg(long)]
    pub value: Option<String>,

    #[command(flatten)]
    pub labels: LabelArgs,
}

/// Arguments for `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Owning attribute id (required)
    #[arg(long)]
    pub attribute_id: Option<String>,

    /// active, inactive or any [default: active]
    #[arg(long)]
    pub state: Option<String>,
}

/// Arguments for `update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Attribute value id (required)
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub labels: LabelUpdateArgs,
}

/// Arguments for member changes.
#[derive(Debug, Args)]
pub struct MembersArgs {
    /// Attribute value id (required)
    #[arg(long)]
    pub id: Option<String>,

    /// Member value id (repeatable, at least one)
    #[arg(long = "member")]
    pub members: Vec<String>,
}

/// Runs an attribute value command.
pub async fn run<A: PolicyApi, W: Write>(
    cmd: AttributeValueCommand,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    match cmd {
        AttributeValueCommand::Create(args) => create(args, handler, console).await,
        AttributeValueCommand::Get(args) => get(args, handler, console).await,
        AttributeValueCommand::List(args) => list(args, handler, console).await,
        AttributeValueCommand::Update(args) => update(args, handler, console).await,
        AttributeValueCommand::Deactivate(args) => deactivate(args, handler, console).await,
        AttributeValueCommand::Members(cmd) => members(cmd, handler, console).await,
    }
}

async fn find<A: PolicyApi>(handler: &Handler<A>, id: &str) -> CliResult<AttributeValue> {
    handler
        .get_attribute_value(id)
        .await
        .map_err(CliError::remote(format!("Failed to find attribute value ({id})")))
}

async fn create<A: PolicyApi, W: Write>(
    args: CreateArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let attribute_id = flags::required("attribute-id", args.attribute_id.as_deref())?;
    let value = flags::required("value", args.value.as_deref())?;
    let labels = flags::labels(&args.labels.labels)?;

    handler
        .get_attribute(&attribute_id)
        .await
        .map_err(CliError::remote(format!("Failed to find attribute ({attribute_id})")))?;

    let created = handler
        .create_attribute_value(NewAttributeValue {
            attribute_id,
            value,
            labels,
        })
        .await
        .map_err(CliError::remote("Failed to create attribute value"))?;
    info!(id = %created.id, fqn = %created.fqn, "Created attribute value");

    console.render(&output::attribute_value(&created), &created)
}

async fn get<A: PolicyApi, W: Write>(
    args: IdArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let id = flags::required("id", args.id.as_deref())?;
    let value = find(handler, &id).await?;
    console.render(&output::attribute_value(&value), &value)
}

async fn list<A: PolicyApi, W: Write>(
    args: ListArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let attribute_id = flags::required("attribute-id", args.attribute_id.as_deref())?;
    let state = state_filter(args.state.as_deref())?;

    let values = handler
        .list_attribute_values(&attribute_id, state)
        .await
        .map_err(CliError::remote("Failed to list attribute values"))?;

    console.render(&output::attribute_value_list(&values), &values)
}

async fn update<A: PolicyApi, W: Write>(
    args: UpdateArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let id = flags::required("id", args.id.as_deref())?;
    let patch = args.labels.require_patch()?;

    let updated = handler
        .update_attribute_value(AttributeValueUpdate {
            id: id.clone(),
            members: None,
            labels: Some(patch),
        })
        .await
        .map_err(CliError::remote(format!("Failed to update attribute value ({id})")))?;
    info!(id = %updated.id, "Updated attribute value");

    console.render(&output::attribute_value(&updated), &updated)
}

async fn deactivate<A: PolicyApi, W: Write>(
    args: IdArgs,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let id = flags::required("id", args.id.as_deref())?;
    let value = find(handler, &id).await?;

    gate(
        console.confirmer(),
        &PendingAction::new("deactivate", RESOURCE, &value.value),
    )?;

    let deactivated = handler
        .deactivate_attribute_value(&id)
        .await
        .map_err(CliError::remote(format!("Failed to deactivate attribute value ({id})")))?;
    info!(id = %deactivated.id, "Deactivated attribute value");

    console.render(&output::attribute_value(&deactivated), &deactivated)
}

/// Member list after applying a change to `current`. Order is preserved
/// and duplicates are not introduced.
fn apply_members(command: &MembersCommand, current: &[String], given: Vec<String>) -> Vec<String> {
    match command {
        MembersCommand::Add(_) => {
            let mut members = current.to_vec();
            for member in given {
                if !members.contains(&member) {
                    members.push(member);
                }
            }
            members
        }
        MembersCommand::Remove(_) => current
            .iter()
            .filter(|m| !given.contains(m))
            .cloned()
            .collect(),
        MembersCommand::Replace(_) => {
            let mut members: Vec<String> = Vec::with_capacity(given.len());
            for member in given {
                if !members.contains(&member) {
                    members.push(member);
                }
            }
            members
        }
    }
}

async fn members<A: PolicyApi, W: Write>(
    cmd: MembersCommand,
    handler: &Handler<A>,
    console: &mut Console<W>,
) -> CliResult<()> {
    let (action, args) = match &cmd {
        MembersCommand::Add(args) => ("add members to", args),
        MembersCommand::Remove(args) => ("remove members from", args),
        MembersCommand::Replace(args) => ("replace members of", args),
    };
    let id = flags::required("id", args.id.as_deref())?;
    let given = flags::string_list("member", &args.members, 1)?;

    let value = find(handler, &id).await?;
    let members = apply_members(&cmd, &value.members, given);
    if members.is_empty() {
        return Err(CliError::arguments(
            "Invalid --member",
            "cannot remove every member of a value",
        ));
    }

    gate(
        console.confirmer(),
        &PendingAction::new(action, RESOURCE, &value.value),
    )?;

    let updated = handler
        .update_attribute_value(AttributeValueUpdate {
            id: id.clone(),
            members: Some(members),
            labels: None,
        })
        .await
        .map_err(CliError::remote(format!("Failed to update attribute value members ({id})")))?;
    info!(id = %updated.id, members = updated.members.len(), "Updated attribute value members");

    console.render(&output::attribute_value(&updated), &updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MembersArgs {
        MembersArgs {
            id: None,
            members: Vec::new(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_add_members_skips_existing() {
        let result = apply_members(
            &MembersCommand::Add(args()),
            &strings(&["a", "b"]),
            strings(&["b", "c"]),
        );
        assert_eq!(result, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_remove_members() {
        let result = apply_members(
            &MembersCommand::Remove(args()),
            &strings(&["a", "b", "c"]),
            strings(&["b", "x"]),
        );
        assert_eq!(result, strings(&["a", "c"]));
    }

    #[test]
    fn test_replace_members_dedupes() {
        let result = apply_members(
            &MembersCommand::Replace(args()),
            &strings(&["a"]),
            strings(&["c", "c", "d"]),
        );
        assert_eq!(result, strings(&["c", "d"]));
    }
}
