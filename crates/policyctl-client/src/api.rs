//! The policy service contract.
//!
//! [`PolicyApi`] has one method per remote operation. Every method is a
//! single request/response round trip; nothing is cached or retried.

use async_trait::async_trait;
use policyctl_core::{
    Attribute, AttributeRule, AttributeValue, KasRegistryEntry, LabelPatch, Labels, PublicKey,
    StateFilter,
};

use crate::error::Result;

/// Fields for creating an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttribute {
    /// Owning namespace identifier.
    pub namespace_id: String,
    /// Attribute name.
    pub name: String,
    /// Value combination rule.
    pub rule: AttributeRule,
    /// Values to create together with the attribute.
    pub values: Vec<String>,
    /// Initial labels.
    pub labels: Labels,
}

/// Fields for creating an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttributeValue {
    /// Owning attribute identifier.
    pub attribute_id: String,
    /// The value string.
    pub value: String,
    /// Initial labels.
    pub labels: Labels,
}

/// A partial update of an attribute value.
///
/// `members`, when set, is the complete member list after the update. An
/// empty list leaves the members unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeValueUpdate {
    /// Value identifier.
    pub id: String,
    /// Replacement member identifiers.
    pub members: Option<Vec<String>>,
    /// Labels to apply.
    pub labels: Option<LabelPatch>,
}

/// Fields for registering a Key Access Server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewKasEntry {
    /// Server URI.
    pub uri: String,
    /// Public key, local or remote.
    pub public_key: PublicKey,
    /// Initial labels.
    pub labels: Labels,
}

/// A partial update of a KAS registry entry. Unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KasEntryUpdate {
    /// Entry identifier.
    pub id: String,
    /// New URI.
    pub uri: Option<String>,
    /// New public key.
    pub public_key: Option<PublicKey>,
    /// Labels to apply.
    pub labels: Option<LabelPatch>,
}

impl KasEntryUpdate {
    /// Returns true if no field would change.
    pub const fn is_empty(&self) -> bool {
        self.uri.is_none() && self.public_key.is_none() && self.labels.is_none()
    }
}

/// Operations offered by the policy service.
#[async_trait]
pub trait PolicyApi: Send + Sync {
    /// Fetches one attribute.
    async fn get_attribute(&self, id: &str) -> Result<Attribute>;

    /// Lists attributes in the given lifecycle state.
    async fn list_attributes(&self, state: StateFilter) -> Result<Vec<Attribute>>;

    /// Creates an attribute.
    async fn create_attribute(&self, attribute: NewAttribute) -> Result<Attribute>;

    /// Updates an attribute's labels.
    async fn update_attribute(&self, id: &str, labels: LabelPatch) -> Result<Attribute>;

    /// Deactivates an attribute.
    async fn deactivate_attribute(&self, id: &str) -> Result<Attribute>;

    /// Fetches one attribute value.
    async fn get_attribute_value(&self, id: &str) -> Result<AttributeValue>;

    /// Lists the values of an attribute in the given lifecycle state.
    async fn list_attribute_values(
        &self,
        attribute_id: &str,
        state: StateFilter,
    ) -> Result<Vec<AttributeValue>>;

    /// Creates an attribute value.
    async fn create_attribute_value(&self, value: NewAttributeValue) -> Result<AttributeValue>;

    /// Updates an attribute value's members or labels.
    async fn update_attribute_value(&self, update: AttributeValueUpdate)
        -> Result<AttributeValue>;

    /// Deactivates an attribute value.
    async fn deactivate_attribute_value(&self, id: &str) -> Result<AttributeValue>;

    /// Fetches one KAS registry entry.
    async fn get_kas_entry(&self, id: &str) -> Result<KasRegistryEntry>;

    /// Lists all KAS registry entries.
    async fn list_kas_entries(&self) -> Result<Vec<KasRegistryEntry>>;

    /// Registers a Key Access Server.
    async fn create_kas_entry(&self, entry: NewKasEntry) -> Result<KasRegistryEntry>;

    /// Updates a KAS registry entry.
    async fn update_kas_entry(&self, update: KasEntryUpdate) -> Result<KasRegistryEntry>;

    /// Removes a KAS registry entry, returning what was deleted.
    async fn delete_kas_entry(&self, id: &str) -> Result<KasRegistryEntry>;
}
