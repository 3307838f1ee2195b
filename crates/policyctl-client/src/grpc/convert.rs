//! Conversions between wire messages and domain types.

use policyctl_core as core;

use super::types::{
    public_key, ActiveStateEnum, Attribute, AttributeRuleTypeEnum, KeyAccessServer, Metadata,
    MetadataMutable, MetadataUpdateEnum, Namespace, PublicKey, Value,
};

impl From<core::StateFilter> for ActiveStateEnum {
    fn from(value: core::StateFilter) -> Self {
        match value {
            core::StateFilter::Active => Self::Active,
            core::StateFilter::Inactive => Self::Inactive,
            core::StateFilter::Any => Self::Any,
        }
    }
}

impl From<core::LabelUpdateMode> for MetadataUpdateEnum {
    fn from(value: core::LabelUpdateMode) -> Self {
        match value {
            core::LabelUpdateMode::Extend => Self::Extend,
            core::LabelUpdateMode::Replace => Self::Replace,
        }
    }
}

impl From<core::AttributeRule> for AttributeRuleTypeEnum {
    fn from(value: core::AttributeRule) -> Self {
        match value {
            core::AttributeRule::Unspecified => Self::Unspecified,
            core::AttributeRule::AllOf => Self::AllOf,
            core::AttributeRule::AnyOf => Self::AnyOf,
            core::AttributeRule::Hierarchy => Self::Hierarchy,
        }
    }
}

impl From<AttributeRuleTypeEnum> for core::AttributeRule {
    fn from(value: AttributeRuleTypeEnum) -> Self {
        match value {
            AttributeRuleTypeEnum::Unspecified => Self::Unspecified,
            AttributeRuleTypeEnum::AllOf => Self::AllOf,
            AttributeRuleTypeEnum::AnyOf => Self::AnyOf,
            AttributeRuleTypeEnum::Hierarchy => Self::Hierarchy,
        }
    }
}

/// Decodes a wire rule, treating unknown numbers as unspecified.
fn rule_from_wire(raw: i32) -> core::AttributeRule {
    AttributeRuleTypeEnum::try_from(raw)
        .unwrap_or(AttributeRuleTypeEnum::Unspecified)
        .into()
}

impl From<Metadata> for core::Metadata {
    fn from(value: Metadata) -> Self {
        Self::with_labels(value.labels.into())
    }
}

/// Absent metadata decodes as empty.
fn metadata_from(value: Option<Metadata>) -> core::Metadata {
    value.map(Into::into).unwrap_or_default()
}

/// Builds the mutable metadata sent on create/update, `None` when there are no labels.
pub(crate) fn metadata_mutable(labels: &core::Labels) -> Option<MetadataMutable> {
    if labels.is_empty() {
        return None;
    }
    Some(MetadataMutable {
        labels: labels.clone().into(),
    })
}

impl From<Namespace> for core::Namespace {
    fn from(value: Namespace) -> Self {
        Self {
            id: value.id,
            name: value.name,
            fqn: value.fqn,
        }
    }
}

impl From<Value> for core::AttributeValue {
    fn from(value: Value) -> Self {
        Self {
            id: value.id,
            fqn: value.fqn,
            attribute_id: value.attribute.map(|a| a.id).unwrap_or_default(),
            value: value.value,
            members: value.members.into_iter().map(|m| m.id).collect(),
            state: core::LifecycleState::from_active(value.active),
            metadata: metadata_from(value.metadata),
        }
    }
}

impl From<Attribute> for core::Attribute {
    fn from(value: Attribute) -> Self {
        let id = value.id;
        Self {
            rule: rule_from_wire(value.rule),
            name: value.name,
            fqn: value.fqn,
            namespace: value.namespace.map(Into::into),
            values: value
                .values
                .into_iter()
                .map(|v| {
                    let mut converted = core::AttributeValue::from(v);
                    if converted.attribute_id.is_empty() {
                        converted.attribute_id.clone_from(&id);
                    }
                    converted
                })
                .collect(),
            state: core::LifecycleState::from_active(value.active),
            metadata: metadata_from(value.metadata),
            id,
        }
    }
}

impl From<core::PublicKey> for PublicKey {
    fn from(value: core::PublicKey) -> Self {
        let key = match value {
            core::PublicKey::Local(v) => public_key::PublicKey::Local(v),
            core::PublicKey::Remote(v) => public_key::PublicKey::Remote(v),
        };
        Self {
            public_key: Some(key),
        }
    }
}

impl From<PublicKey> for Option<core::PublicKey> {
    fn from(value: PublicKey) -> Self {
        match value.public_key? {
            public_key::PublicKey::Local(v) if !v.is_empty() => Some(core::PublicKey::Local(v)),
            public_key::PublicKey::Remote(v) if !v.is_empty() => {
                Some(core::PublicKey::Remote(v))
            }
            _ => None,
        }
    }
}

impl From<KeyAccessServer> for core::KasRegistryEntry {
    fn from(value: KeyAccessServer) -> Self {
        Self {
            id: value.id,
            uri: value.uri,
            public_key: value.public_key.and_then(Into::into),
            metadata: metadata_from(value.metadata),
        }
    }
}
