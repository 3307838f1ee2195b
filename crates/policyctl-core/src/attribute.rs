//! Attributes, attribute values and their lifecycle state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;
use crate::validation::ValidationError;

/// A policy attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Service-assigned identifier.
    pub id: String,
    /// Attribute name, unique within its namespace.
    pub name: String,
    /// How the attribute's values combine during access decisions.
    pub rule: AttributeRule,
    /// Fully qualified name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fqn: String,
    /// Owning namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Namespace>,
    /// Values defined under this attribute, in service order.
    #[serde(default)]
    pub values: Vec<AttributeValue>,
    /// Lifecycle state.
    pub state: LifecycleState,
    /// Labels and other metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Attribute {
    /// Returns the raw value strings of this attribute's values.
    #[must_use]
    pub fn value_names(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.value.as_str()).collect()
    }

    /// Returns the namespace name, or an empty string.
    #[must_use]
    pub fn namespace_name(&self) -> &str {
        self.namespace.as_ref().map_or("", |ns| ns.name.as_str())
    }
}

/// Namespace that owns attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Service-assigned identifier.
    pub id: String,
    /// Namespace name (usually a domain).
    pub name: String,
    /// Fully qualified name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fqn: String,
}

/// A single value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    /// Service-assigned identifier.
    pub id: String,
    /// Fully qualified name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fqn: String,
    /// Identifier of the owning attribute.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub attribute_id: String,
    /// The value string.
    pub value: String,
    /// Identifiers of member values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    /// Lifecycle state.
    pub state: LifecycleState,
    /// Labels and other metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

/// Rule that decides how an attribute's values combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeRule {
    /// No rule set.
    #[default]
    Unspecified,
    /// Every value must be satisfied.
    AllOf,
    /// Any one value satisfies.
    AnyOf,
    /// Values are ordered; a higher value satisfies lower ones.
    Hierarchy,
}

impl AttributeRule {
    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::AllOf => "ALL_OF",
            Self::AnyOf => "ANY_OF",
            Self::Hierarchy => "HIERARCHY",
        }
    }
}

impl fmt::Display for AttributeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeRule {
    type Err = ValidationError;

    /// Accepts `ALL_OF`, `all-of`, `allof` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "allof" => Ok(Self::AllOf),
            "anyof" => Ok(Self::AnyOf),
            "hierarchy" => Ok(Self::Hierarchy),
            _ => Err(ValidationError::format(
                "rule",
                format!("unknown rule '{s}', expected one of ALL_OF, ANY_OF, HIERARCHY"),
            )),
        }
    }
}

/// Whether an entity is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Usable in policy decisions.
    #[default]
    Active,
    /// Deactivated; kept for history.
    Inactive,
}

impl LifecycleState {
    /// Maps the service's active flag.
    #[must_use]
    pub const fn from_active(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Returns true when active.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Filter applied to list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    /// Only active entities.
    #[default]
    Active,
    /// Only inactive entities.
    Inactive,
    /// Both.
    Any,
}

impl StateFilter {
    /// Lower-case name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "any" => Ok(Self::Any),
            _ => Err(ValidationError::format(
                "state",
                format!("unknown state '{s}', expected one of active, inactive, any"),
            )),
        }
    }
}
