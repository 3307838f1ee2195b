//! Result rendering.
//!
//! Commands hand a [`View`] and the underlying object to a [`Console`]. In
//! table mode the view is drawn with `comfy-table`; in JSON mode the object
//! itself is serialized. Errors and warnings always go to standard error.

use std::io::Write;

use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use policyctl_core::{Attribute, AttributeValue, KasRegistryEntry};
use serde::{Deserialize, Serialize};

use crate::confirm::Confirmer;
use crate::error::CliResult;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// What a command shows in table mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Field/value pairs of a single object.
    Tabular(Vec<(&'static str, String)>),
    /// One row per object.
    ListTable {
        /// Column headers.
        headers: Vec<&'static str>,
        /// Rows, each as long as `headers`.
        rows: Vec<Vec<String>>,
    },
}

impl View {
    /// Value of a `Tabular` field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Tabular(fields) => fields
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.as_str()),
            Self::ListTable { .. } => None,
        }
    }

    /// Builds the table.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        match self {
            Self::Tabular(fields) => {
                for (key, value) in fields {
                    table.add_row(vec![(*key).to_string(), value.clone()]);
                }
            }
            Self::ListTable { headers, rows } => {
                table.set_header(headers.clone());
                for row in rows {
                    table.add_row(row.clone());
                }
            }
        }
        table
    }
}

/// Where command results go.
pub struct Console<W: Write> {
    out: W,
    format: OutputFormat,
    confirmer: Box<dyn Confirmer>,
}

impl<W: Write> Console<W> {
    /// Creates a console writing results to `out`.
    pub fn new(out: W, format: OutputFormat, confirmer: Box<dyn Confirmer>) -> Self {
        Self {
            out,
            format,
            confirmer,
        }
    }

    /// Source of confirmation answers.
    pub fn confirmer(&self) -> &dyn Confirmer {
        self.confirmer.as_ref()
    }

    /// Writes `view` in table mode or `data` as JSON.
    pub fn render<T: Serialize + ?Sized>(&mut self, view: &View, data: &T) -> CliResult<()> {
        match self.format {
            OutputFormat::Table => writeln!(self.out, "{}", view.to_table())?,
            OutputFormat::Json => writeln!(self.out, "{}", serde_json::to_string_pretty(data)?)?,
        }
        self.out.flush()?;
        Ok(())
    }

    /// Consumes the console, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> std::fmt::Debug for Console<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Prints an error message to standard error.
pub fn error(message: &dyn std::fmt::Display) {
    eprintln!("{} {message}", "✗".red().bold());
}

/// Prints a warning message to standard error.
pub fn warning(message: &str) {
    eprintln!("{} {message}", "⚠".yellow().bold());
}

fn join(items: &[impl AsRef<str>]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single KAS registry entry.
pub fn kas_entry(entry: &KasRegistryEntry) -> View {
    View::Tabular(vec![
        ("Id", entry.id.clone()),
        ("URI", entry.uri.clone()),
        ("PublicKey Type", entry.key_kind().to_string()),
        ("PublicKey", entry.key_value().to_string()),
    ])
}

/// A deleted KAS registry entry.
pub fn kas_deleted(entry: &KasRegistryEntry) -> View {
    View::Tabular(vec![("Id", entry.id.clone()), ("URI", entry.uri.clone())])
}

/// All KAS registry entries.
pub fn kas_list(entries: &[KasRegistryEntry]) -> View {
    View::ListTable {
        headers: vec!["Id", "URI", "PublicKey Location", "PublicKey"],
        rows: entries
            .iter()
            .map(|e| {
                vec![
                    e.id.clone(),
                    e.uri.clone(),
                    e.key_kind().to_string(),
                    e.key_value().to_string(),
                ]
            })
            .collect(),
    }
}

/// A single attribute value. Members are shown only when there are any.
pub fn attribute_value(value: &AttributeValue) -> View {
    let mut fields = vec![
        ("Id", value.id.clone()),
        ("FQN", value.fqn.clone()),
        ("Value", value.value.clone()),
    ];
    if !value.members.is_empty() {
        fields.push(("Members", join(&value.members)));
    }
    View::Tabular(fields)
}

/// Values of an attribute.
pub fn attribute_value_list(values: &[AttributeValue]) -> View {
    View::ListTable {
        headers: vec!["Id", "Fqn", "Members", "Active"],
        rows: values
            .iter()
            .map(|v| {
                vec![
                    v.id.clone(),
                    v.fqn.clone(),
                    join(&v.members),
                    v.state.is_active().to_string(),
                ]
            })
            .collect(),
    }
}

/// A single attribute.
pub fn attribute(attribute: &Attribute) -> View {
    View::Tabular(vec![
        ("Id", attribute.id.clone()),
        ("Name", attribute.name.clone()),
        ("Rule", attribute.rule.to_string()),
        ("Values", join(&attribute.value_names())),
        ("Namespace", attribute.namespace_name().to_string()),
    ])
}

/// Attributes.
pub fn attribute_list(attributes: &[Attribute]) -> View {
    View::ListTable {
        headers: vec!["Id", "Namespace", "Name", "Rule", "Values", "Active"],
        rows: attributes
            .iter()
            .map(|a| {
                vec![
                    a.id.clone(),
                    a.namespace_name().to_string(),
                    a.name.clone(),
                    a.rule.to_string(),
                    join(&a.value_names()),
                    a.state.is_active().to_string(),
                ]
            })
            .collect(),
    }
}
