//! In-memory implementation of [`PolicyApi`].
//!
//! [`FakePolicyService`] keeps attributes, values and KAS entries in maps and
//! records every call it receives, so tests can assert both on what was
//! rendered and on what was (or was not) sent.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use policyctl_client::{
    AttributeValueUpdate, ClientError, KasEntryUpdate, NewAttribute, NewAttributeValue,
    NewKasEntry, PolicyApi, Result,
};
use policyctl_core::{
    Attribute, AttributeValue, KasRegistryEntry, LabelPatch, LifecycleState, Metadata, Namespace,
    StateFilter,
};

use crate::fixtures::{attribute_fqn, namespace, new_id, value_fqn, DEFAULT_NAMESPACE};

/// A call received by the fake, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `get_attribute`
    GetAttribute(String),
    /// `list_attributes`
    ListAttributes(StateFilter),
    /// `create_attribute`
    CreateAttribute(NewAttribute),
    /// `update_attribute`
    UpdateAttribute(String, LabelPatch),
    /// `deactivate_attribute`
    DeactivateAttribute(String),
    /// `get_attribute_value`
    GetAttributeValue(String),
    /// `list_attribute_values`
    ListAttributeValues(String, StateFilter),
    /// `create_attribute_value`
    CreateAttributeValue(NewAttributeValue),
    /// `update_attribute_value`
    UpdateAttributeValue(AttributeValueUpdate),
    /// `deactivate_attribute_value`
    DeactivateAttributeValue(String),
    /// `get_kas_entry`
    GetKasEntry(String),
    /// `list_kas_entries`
    ListKasEntries,
    /// `create_kas_entry`
    CreateKasEntry(NewKasEntry),
    /// `update_kas_entry`
    UpdateKasEntry(KasEntryUpdate),
    /// `delete_kas_entry`
    DeleteKasEntry(String),
}

#[derive(Debug, Default)]
struct State {
    namespaces: BTreeMap<String, Namespace>,
    attributes: BTreeMap<String, Attribute>,
    values: BTreeMap<String, AttributeValue>,
    kas: BTreeMap<String, KasRegistryEntry>,
    calls: Vec<Call>,
    unavailable: Option<String>,
}

impl State {
    fn attribute_with_values(&self, id: &str) -> Result<Attribute> {
        let mut attribute = self
            .attributes
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("attribute", id))?;
        attribute.values = self
            .values
            .values()
            .filter(|v| v.attribute_id == id)
            .cloned()
            .collect();
        Ok(attribute)
    }

    fn value(&self, id: &str) -> Result<AttributeValue> {
        self.values
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("attribute value", id))
    }

    fn kas(&self, id: &str) -> Result<KasRegistryEntry> {
        self.kas
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("key access server", id))
    }

    fn insert_value(
        &mut self,
        attribute: &Attribute,
        value: &str,
        metadata: Metadata,
    ) -> AttributeValue {
        let created = AttributeValue {
            id: new_id(),
            fqn: value_fqn(attribute.namespace_name(), &attribute.name, value),
            attribute_id: attribute.id.clone(),
            value: value.to_string(),
            members: Vec::new(),
            state: LifecycleState::Active,
            metadata,
        };
        self.values.insert(created.id.clone(), created.clone());
        created
    }
}

fn not_found(kind: &str, id: &str) -> ClientError {
    ClientError::NotFound {
        message: format!("{kind} '{id}' not found"),
    }
}

fn matches_state(state: LifecycleState, filter: StateFilter) -> bool {
    match filter {
        StateFilter::Active => state.is_active(),
        StateFilter::Inactive => !state.is_active(),
        StateFilter::Any => true,
    }
}

/// In-memory policy service.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect the other. Missing identifiers produce
/// [`ClientError::NotFound`], the same way the real service reports them.
///
/// # Examples
///
/// ```rust
/// use policyctl_test::{FakePolicyService, MockKasEntry};
///
/// let fake = FakePolicyService::new();
/// fake.seed_kas_entry(MockKasEntry::new("https://kas.example.com").with_id("k1").build());
///
/// assert!(fake.stored_kas_entry("k1").is_some());
/// assert!(fake.calls().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FakePolicyService {
    state: Arc<Mutex<State>>,
}

impl Default for FakePolicyService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePolicyService {
    /// Creates an empty service with the default namespace registered.
    #[must_use]
    pub fn new() -> Self {
        let fake = Self {
            state: Arc::new(Mutex::new(State::default())),
        };
        fake.seed_namespace(namespace(DEFAULT_NAMESPACE));
        fake
    }

    /// Registers a namespace.
    pub fn seed_namespace(&self, namespace: Namespace) {
        self.state
            .lock()
            .namespaces
            .insert(namespace.id.clone(), namespace);
    }

    /// Returns the identifier of a registered namespace by name.
    pub fn namespace_id(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .namespaces
            .values()
            .find(|ns| ns.name == name)
            .map(|ns| ns.id.clone())
    }

    /// Stores an attribute together with its embedded values.
    pub fn seed_attribute(&self, mut attribute: Attribute) {
        let mut state = self.state.lock();
        if let Some(ns) = &attribute.namespace {
            state.namespaces.insert(ns.id.clone(), ns.clone());
        }
        for value in attribute.values.drain(..) {
            state.values.insert(value.id.clone(), value);
        }
        state.attributes.insert(attribute.id.clone(), attribute);
    }

    /// Stores a standalone attribute value.
    pub fn seed_value(&self, value: AttributeValue) {
        self.state.lock().values.insert(value.id.clone(), value);
    }

    /// Stores a KAS registry entry.
    pub fn seed_kas_entry(&self, entry: KasRegistryEntry) {
        self.state.lock().kas.insert(entry.id.clone(), entry);
    }

    /// Makes every following call fail as if the service were unreachable.
    pub fn set_unavailable(&self, message: impl Into<String>) {
        self.state.lock().unavailable = Some(message.into());
    }

    /// Returns the calls received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Returns a stored KAS entry without recording a call.
    pub fn stored_kas_entry(&self, id: &str) -> Option<KasRegistryEntry> {
        self.state.lock().kas.get(id).cloned()
    }

    /// Returns a stored value without recording a call.
    pub fn stored_value(&self, id: &str) -> Option<AttributeValue> {
        self.state.lock().values.get(id).cloned()
    }

    /// Returns a stored attribute without recording a call.
    pub fn stored_attribute(&self, id: &str) -> Option<Attribute> {
        self.state.lock().attribute_with_values(id).ok()
    }

    fn record(&self, call: Call) -> Result<parking_lot::MutexGuard<'_, State>> {
        let mut state = self.state.lock();
        state.calls.push(call);
        if let Some(message) = &state.unavailable {
            return Err(ClientError::Unavailable {
                message: message.clone(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl PolicyApi for FakePolicyService {
    async fn get_attribute(&self, id: &str) -> Result<Attribute> {
        let state = self.record(Call::GetAttribute(id.to_string()))?;
        state.attribute_with_values(id)
    }

    async fn list_attributes(&self, filter: StateFilter) -> Result<Vec<Attribute>> {
        let state = self.record(Call::ListAttributes(filter))?;
        state
            .attributes
            .values()
            .filter(|a| matches_state(a.state, filter))
            .map(|a| state.attribute_with_values(&a.id))
            .collect()
    }

    async fn create_attribute(&self, request: NewAttribute) -> Result<Attribute> {
        let mut state = self.record(Call::CreateAttribute(request.clone()))?;
        let namespace = state
            .namespaces
            .get(&request.namespace_id)
            .cloned()
            .ok_or_else(|| not_found("namespace", &request.namespace_id))?;

        let attribute = Attribute {
            id: new_id(),
            fqn: attribute_fqn(&namespace.name, &request.name),
            name: request.name,
            rule: request.rule,
            namespace: Some(namespace),
            values: Vec::new(),
            state: LifecycleState::Active,
            metadata: Metadata::with_labels(request.labels),
        };
        for value in &request.values {
            state.insert_value(&attribute, value, Metadata::default());
        }
        state
            .attributes
            .insert(attribute.id.clone(), attribute.clone());
        state.attribute_with_values(&attribute.id)
    }

    async fn update_attribute(&self, id: &str, labels: LabelPatch) -> Result<Attribute> {
        let mut state = self.record(Call::UpdateAttribute(id.to_string(), labels.clone()))?;
        let attribute = state
            .attributes
            .get_mut(id)
            .ok_or_else(|| not_found("attribute", id))?;
        labels.apply_to(&mut attribute.metadata.labels);
        state.attribute_with_values(id)
    }

    async fn deactivate_attribute(&self, id: &str) -> Result<Attribute> {
        let mut state = self.record(Call::DeactivateAttribute(id.to_string()))?;
        let attribute = state
            .attributes
            .get_mut(id)
            .ok_or_else(|| not_found("attribute", id))?;
        attribute.state = LifecycleState::Inactive;
        state.attribute_with_values(id)
    }

    async fn get_attribute_value(&self, id: &str) -> Result<AttributeValue> {
        let state = self.record(Call::GetAttributeValue(id.to_string()))?;
        state.value(id)
    }

    async fn list_attribute_values(
        &self,
        attribute_id: &str,
        filter: StateFilter,
    ) -> Result<Vec<AttributeValue>> {
        let state = self.record(Call::ListAttributeValues(attribute_id.to_string(), filter))?;
        if !state.attributes.contains_key(attribute_id) {
            return Err(not_found("attribute", attribute_id));
        }
        Ok(state
            .values
            .values()
            .filter(|v| v.attribute_id == attribute_id && matches_state(v.state, filter))
            .cloned()
            .collect())
    }

    async fn create_attribute_value(&self, request: NewAttributeValue) -> Result<AttributeValue> {
        let mut state = self.record(Call::CreateAttributeValue(request.clone()))?;
        let attribute = state
            .attributes
            .get(&request.attribute_id)
            .cloned()
            .ok_or_else(|| not_found("attribute", &request.attribute_id))?;
        Ok(state.insert_value(
            &attribute,
            &request.value,
            Metadata::with_labels(request.labels),
        ))
    }

    async fn update_attribute_value(
        &self,
        update: AttributeValueUpdate,
    ) -> Result<AttributeValue> {
        let mut state = self.record(Call::UpdateAttributeValue(update.clone()))?;
        if let Some(missing) = update
            .members
            .iter()
            .flatten()
            .find(|m| !state.values.contains_key(*m))
        {
            return Err(not_found("attribute value", missing));
        }

        let value = state
            .values
            .get_mut(&update.id)
            .ok_or_else(|| not_found("attribute value", &update.id))?;
        // Mirrors the wire: an empty list leaves members unchanged.
        if let Some(members) = update.members.filter(|m| !m.is_empty()) {
            value.members = members;
        }
        if let Some(patch) = &update.labels {
            patch.apply_to(&mut value.metadata.labels);
        }
        Ok(value.clone())
    }

    async fn deactivate_attribute_value(&self, id: &str) -> Result<AttributeValue> {
        let mut state = self.record(Call::DeactivateAttributeValue(id.to_string()))?;
        let value = state
            .values
            .get_mut(id)
            .ok_or_else(|| not_found("attribute value", id))?;
        value.state = LifecycleState::Inactive;
        Ok(value.clone())
    }

    async fn get_kas_entry(&self, id: &str) -> Result<KasRegistryEntry> {
        let state = self.record(Call::GetKasEntry(id.to_string()))?;
        state.kas(id)
    }

    async fn list_kas_entries(&self) -> Result<Vec<KasRegistryEntry>> {
        let state = self.record(Call::ListKasEntries)?;
        Ok(state.kas.values().cloned().collect())
    }

    async fn create_kas_entry(&self, request: NewKasEntry) -> Result<KasRegistryEntry> {
        let mut state = self.record(Call::CreateKasEntry(request.clone()))?;
        let entry = KasRegistryEntry {
            id: new_id(),
            uri: request.uri,
            public_key: Some(request.public_key),
            metadata: Metadata::with_labels(request.labels),
        };
        state.kas.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn update_kas_entry(&self, update: KasEntryUpdate) -> Result<KasRegistryEntry> {
        let mut state = self.record(Call::UpdateKasEntry(update.clone()))?;
        let entry = state
            .kas
            .get_mut(&update.id)
            .ok_or_else(|| not_found("key access server", &update.id))?;
        if let Some(uri) = update.uri {
            entry.uri = uri;
        }
        if let Some(key) = update.public_key {
            entry.public_key = Some(key);
        }
        if let Some(patch) = &update.labels {
            patch.apply_to(&mut entry.metadata.labels);
        }
        Ok(entry.clone())
    }

    async fn delete_kas_entry(&self, id: &str) -> Result<KasRegistryEntry> {
        let mut state = self.record(Call::DeleteKasEntry(id.to_string()))?;
        state
            .kas
            .remove(id)
            .ok_or_else(|| not_found("key access server", id))
    }
}
