//! gRPC message definitions for the policy services.
//!
//! These types mirror the platform's `policy`, `policy.attributes`,
//! `policy.kasregistry` and `common` protobuf packages. They are declared by
//! hand with `prost` derives so the crate builds without `protoc`.

use std::collections::BTreeMap;

/// Label update behavior (`common.MetadataUpdateEnum`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MetadataUpdateEnum {
    /// Not set.
    Unspecified = 0,
    /// Merge labels.
    Extend = 1,
    /// Replace labels.
    Replace = 2,
}

/// Lifecycle filter for list calls (`common.ActiveStateEnum`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ActiveStateEnum {
    /// Not set; the service treats it as active.
    Unspecified = 0,
    /// Active only.
    Active = 1,
    /// Inactive only.
    Inactive = 2,
    /// Both.
    Any = 3,
}

/// Attribute rule (`policy.AttributeRuleTypeEnum`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AttributeRuleTypeEnum {
    /// Not set.
    Unspecified = 0,
    /// All of.
    AllOf = 1,
    /// Any of.
    AnyOf = 2,
    /// Hierarchy.
    Hierarchy = 3,
}

/// Read-only metadata (`common.Metadata`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Metadata {
    /// Labels.
    #[prost(btree_map = "string, string", tag = "3")]
    pub labels: BTreeMap<String, String>,
}

/// Caller-supplied metadata (`common.MetadataMutable`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MetadataMutable {
    /// Labels.
    #[prost(btree_map = "string, string", tag = "3")]
    pub labels: BTreeMap<String, String>,
}

/// Attribute namespace (`policy.Namespace`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Namespace {
    /// Identifier.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Name.
    #[prost(string, tag = "2")]
    pub name: String,
    /// Fully qualified name.
    #[prost(string, tag = "3")]
    pub fqn: String,
}

/// Attribute definition (`policy.Attribute`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Attribute {
    /// Identifier.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Owning namespace.
    #[prost(message, optional, tag = "2")]
    pub namespace: Option<Namespace>,
    /// Name.
    #[prost(string, tag = "3")]
    pub name: String,
    /// Rule.
    #[prost(enumeration = "AttributeRuleTypeEnum", tag = "4")]
    pub rule: i32,
    /// Values.
    #[prost(message, repeated, tag = "5")]
    pub values: Vec<Value>,
    /// Fully qualified name.
    #[prost(string, tag = "6")]
    pub fqn: String,
    /// Active flag.
    #[prost(bool, tag = "7")]
    pub active: bool,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<Metadata>,
}

/// Attribute value (`policy.Value`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Value {
    /// Identifier.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Owning attribute.
    #[prost(message, optional, boxed, tag = "2")]
    pub attribute: Option<Box<Attribute>>,
    /// Value string.
    #[prost(string, tag = "3")]
    pub value: String,
    /// Member values.
    #[prost(message, repeated, tag = "4")]
    pub members: Vec<Value>,
    /// Fully qualified name.
    #[prost(string, tag = "6")]
    pub fqn: String,
    /// Active flag.
    #[prost(bool, tag = "7")]
    pub active: bool,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<Metadata>,
}

/// KAS public key (`policy.kasregistry.PublicKey`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PublicKey {
    /// Exactly one of remote or local.
    #[prost(oneof = "public_key::PublicKey", tags = "1, 2")]
    pub public_key: Option<public_key::PublicKey>,
}

/// Nested types for [`PublicKey`].
pub mod public_key {
    /// The key variant.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum PublicKey {
        /// URI the key is published at.
        #[prost(string, tag = "1")]
        Remote(String),
        /// Key material.
        #[prost(string, tag = "2")]
        Local(String),
    }
}

/// Key Access Server registration (`policy.kasregistry.KeyAccessServer`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeyAccessServer {
    /// Identifier.
    #[prost(string, tag = "1")]
    pub id: String,
    /// URI.
    #[prost(string, tag = "2")]
    pub uri: String,
    /// Public key.
    #[prost(message, optional, tag = "3")]
    pub public_key: Option<PublicKey>,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<Metadata>,
}

// ---------------------------------------------------------------------------
// policy.attributes.AttributesService
// ---------------------------------------------------------------------------

/// Request by identifier, shared by get and deactivate calls.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdRequest {
    /// Identifier.
    #[prost(string, tag = "1")]
    pub id: String,
}

/// `ListAttributesRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListAttributesRequest {
    /// State filter.
    #[prost(enumeration = "ActiveStateEnum", tag = "1")]
    pub state: i32,
    /// Namespace filter (empty for all).
    #[prost(string, tag = "2")]
    pub namespace: String,
}

/// `CreateAttributeRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAttributeRequest {
    /// Namespace identifier.
    #[prost(string, tag = "1")]
    pub namespace_id: String,
    /// Name.
    #[prost(string, tag = "2")]
    pub name: String,
    /// Rule.
    #[prost(enumeration = "AttributeRuleTypeEnum", tag = "3")]
    pub rule: i32,
    /// Values to create.
    #[prost(string, repeated, tag = "4")]
    pub values: Vec<String>,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<MetadataMutable>,
}

/// `UpdateAttributeRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateAttributeRequest {
    /// Identifier.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<MetadataMutable>,
    /// How to apply the labels.
    #[prost(enumeration = "MetadataUpdateEnum", tag = "101")]
    pub metadata_update_behavior: i32,
}

/// Response carrying one attribute.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AttributeResponse {
    /// The attribute.
    #[prost(message, optional, tag = "1")]
    pub attribute: Option<Attribute>,
}

/// `ListAttributesResponse`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListAttributesResponse {
    /// Attributes.
    #[prost(message, repeated, tag = "1")]
    pub attributes: Vec<Attribute>,
}

/// `ListAttributeValuesRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListAttributeValuesRequest {
    /// Owning attribute.
    #[prost(string, tag = "1")]
    pub attribute_id: String,
    /// State filter.
    #[prost(enumeration = "ActiveStateEnum", tag = "2")]
    pub state: i32,
}

/// `CreateAttributeValueRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAttributeValueRequest {
    /// Owning attribute.
    #[prost(string, tag = "1")]
    pub attribute_id: String,
    /// Value string.
    #[prost(string, tag = "2")]
    pub value: String,
    /// Member value identifiers.
    #[prost(string, repeated, tag = "3")]
    pub members: Vec<String>,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<MetadataMutable>,
}

/// `UpdateAttributeValueRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateAttributeValueRequest {
    /// Identifier.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Complete member list after the update.
    #[prost(string, repeated, tag = "4")]
    pub members: Vec<String>,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<MetadataMutable>,
    /// How to apply the labels.
    #[prost(enumeration = "MetadataUpdateEnum", tag = "101")]
    pub metadata_update_behavior: i32,
}

/// Response carrying one value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValueResponse {
    /// The value.
    #[prost(message, optional, tag = "1")]
    pub value: Option<Value>,
}

/// `ListAttributeValuesResponse`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListAttributeValuesResponse {
    /// Values.
    #[prost(message, repeated, tag = "1")]
    pub values: Vec<Value>,
}

// ---------------------------------------------------------------------------
// policy.kasregistry.KeyAccessServerRegistryService
// ---------------------------------------------------------------------------

/// `ListKeyAccessServersRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListKeyAccessServersRequest {}

/// `CreateKeyAccessServerRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateKeyAccessServerRequest {
    /// URI.
    #[prost(string, tag = "1")]
    pub uri: String,
    /// Public key.
    #[prost(message, optional, tag = "2")]
    pub public_key: Option<PublicKey>,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<MetadataMutable>,
}

/// `UpdateKeyAccessServerRequest`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateKeyAccessServerRequest {
    /// Identifier.
    #[prost(string, tag = "1")]
    pub id: String,
    /// New URI (empty to keep).
    #[prost(string, tag = "2")]
    pub uri: String,
    /// New public key.
    #[prost(message, optional, tag = "3")]
    pub public_key: Option<PublicKey>,
    /// Metadata.
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<MetadataMutable>,
    /// How to apply the labels.
    #[prost(enumeration = "MetadataUpdateEnum", tag = "101")]
    pub metadata_update_behavior: i32,
}

/// Response carrying one KAS registration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeyAccessServerResponse {
    /// The registration.
    #[prost(message, optional, tag = "1")]
    pub key_access_server: Option<KeyAccessServer>,
}

/// `ListKeyAccessServersResponse`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListKeyAccessServersResponse {
    /// Registrations.
    #[prost(message, repeated, tag = "1")]
    pub key_access_servers: Vec<KeyAccessServer>,
}
