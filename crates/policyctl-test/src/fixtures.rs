//! Builders for policy objects used in tests.
//!
//! These builders offer sensible defaults and fluent APIs so tests only spell
//! out the fields they care about.
//!
//! # Examples
//!
//! ```rust
//! use policyctl_core::AttributeRule;
//! use policyctl_test::{MockAttribute, MockKasEntry};
//!
//! let attribute = MockAttribute::new("classification")
//!     .with_rule(AttributeRule::Hierarchy)
//!     .with_values(["top-secret", "secret"])
//!     .build();
//! assert_eq!(attribute.values.len(), 2);
//!
//! let kas = MockKasEntry::new("https://kas.example.com")
//!     .with_remote_key("https://kas.example.com/kas_public_key")
//!     .build();
//! assert_eq!(kas.key_kind(), "Remote");
//! ```

use policyctl_core::{
    Attribute, AttributeRule, AttributeValue, KasRegistryEntry, Labels, LifecycleState,
    Metadata, Namespace, PublicKey,
};

/// Namespace used when a builder is not given one.
pub const DEFAULT_NAMESPACE: &str = "example.com";

/// Generates a fresh identifier.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Builds a namespace with a derived FQN.
pub fn namespace(name: &str) -> Namespace {
    Namespace {
        id: new_id(),
        name: name.to_string(),
        fqn: format!("https://{name}"),
    }
}

/// Builds the FQN of an attribute.
pub fn attribute_fqn(namespace: &str, name: &str) -> String {
    format!("https://{namespace}/attr/{name}")
}

/// Builds the FQN of an attribute value.
pub fn value_fqn(namespace: &str, attribute: &str, value: &str) -> String {
    format!("{}/value/{value}", attribute_fqn(namespace, attribute))
}

/// Builder for attributes.
#[derive(Debug, Clone)]
pub struct MockAttribute {
    id: String,
    name: String,
    namespace: Namespace,
    rule: AttributeRule,
    values: Vec<String>,
    state: LifecycleState,
    labels: Labels,
}

impl MockAttribute {
    /// Starts an `anyOf` attribute in the default namespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            namespace: namespace(DEFAULT_NAMESPACE),
            rule: AttributeRule::AnyOf,
            values: Vec::new(),
            state: LifecycleState::Active,
            labels: Labels::new(),
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Sets the rule.
    #[must_use]
    pub const fn with_rule(mut self, rule: AttributeRule) -> Self {
        self.rule = rule;
        self
    }

    /// Adds values, in order.
    #[must_use]
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Marks the attribute inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.state = LifecycleState::Inactive;
        self
    }

    /// Builds the attribute with its values.
    pub fn build(self) -> Attribute {
        let values = self
            .values
            .iter()
            .map(|value| {
                MockValue::new(&self.id, value)
                    .in_attribute(&self.namespace.name, &self.name)
                    .build()
            })
            .collect();

        Attribute {
            fqn: attribute_fqn(&self.namespace.name, &self.name),
            id: self.id,
            name: self.name,
            rule: self.rule,
            namespace: Some(self.namespace),
            values,
            state: self.state,
            metadata: Metadata::with_labels(self.labels),
        }
    }
}

/// Builder for attribute values.
#[derive(Debug, Clone)]
pub struct MockValue {
    id: String,
    attribute_id: String,
    value: String,
    fqn: String,
    members: Vec<String>,
    state: LifecycleState,
    labels: Labels,
}

impl MockValue {
    /// Starts an active value of the given attribute.
    #[must_use]
    pub fn new(attribute_id: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: new_id(),
            attribute_id: attribute_id.into(),
            fqn: value_fqn(DEFAULT_NAMESPACE, "attribute", &value),
            value,
            members: Vec::new(),
            state: LifecycleState::Active,
            labels: Labels::new(),
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Derives the FQN from the owning namespace and attribute names.
    #[must_use]
    pub fn in_attribute(mut self, namespace: &str, attribute: &str) -> Self {
        self.fqn = value_fqn(namespace, attribute, &self.value);
        self
    }

    /// Adds member value identifiers.
    #[must_use]
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members.extend(members.into_iter().map(Into::into));
        self
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Marks the value inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.state = LifecycleState::Inactive;
        self
    }

    /// Builds the value.
    pub fn build(self) -> AttributeValue {
        AttributeValue {
            id: self.id,
            fqn: self.fqn,
            attribute_id: self.attribute_id,
            value: self.value,
            members: self.members,
            state: self.state,
            metadata: Metadata::with_labels(self.labels),
        }
    }
}

/// Builder for KAS registry entries.
#[derive(Debug, Clone)]
pub struct MockKasEntry {
    id: String,
    uri: String,
    public_key: Option<PublicKey>,
    labels: Labels,
}

impl MockKasEntry {
    /// Starts an entry with no public key.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            uri: uri.into(),
            public_key: None,
            labels: Labels::new(),
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Uses locally supplied key material.
    #[must_use]
    pub fn with_local_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(PublicKey::Local(key.into()));
        self
    }

    /// Uses a remotely hosted key.
    #[must_use]
    pub fn with_remote_key(mut self, uri: impl Into<String>) -> Self {
        self.public_key = Some(PublicKey::Remote(uri.into()));
        self
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Builds the entry.
    pub fn build(self) -> KasRegistryEntry {
        KasRegistryEntry {
            id: self.id,
            uri: self.uri,
            public_key: self.public_key,
            metadata: Metadata::with_labels(self.labels),
        }
    }
}
