//! tonic-backed implementation of [`PolicyApi`].

use async_trait::async_trait;
use policyctl_core::{Attribute, AttributeValue, KasRegistryEntry, LabelPatch, StateFilter};
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::AsciiMetadataValue;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};
use tonic::{Code, Request};
use tracing::debug;

use super::convert::metadata_mutable;
use super::types::{
    ActiveStateEnum, AttributeResponse, AttributeRuleTypeEnum, CreateAttributeRequest,
    CreateAttributeValueRequest, CreateKeyAccessServerRequest, IdRequest,
    KeyAccessServerResponse, ListAttributeValuesRequest, ListAttributeValuesResponse,
    ListAttributesRequest, ListAttributesResponse, ListKeyAccessServersRequest,
    ListKeyAccessServersResponse, MetadataMutable, MetadataUpdateEnum, PublicKey,
    UpdateAttributeRequest, UpdateAttributeValueRequest, UpdateKeyAccessServerRequest,
    ValueResponse,
};
use crate::api::{
    AttributeValueUpdate, KasEntryUpdate, NewAttribute, NewAttributeValue, NewKasEntry,
    PolicyApi,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

const ATTRIBUTES_SERVICE: &str = "policy.attributes.AttributesService";
const KAS_REGISTRY_SERVICE: &str = "policy.kasregistry.KeyAccessServerRegistryService";

mod paths {
    pub const GET_ATTRIBUTE: &str = "/policy.attributes.AttributesService/GetAttribute";
    pub const LIST_ATTRIBUTES: &str = "/policy.attributes.AttributesService/ListAttributes";
    pub const CREATE_ATTRIBUTE: &str = "/policy.attributes.AttributesService/CreateAttribute";
    pub const UPDATE_ATTRIBUTE: &str = "/policy.attributes.AttributesService/UpdateAttribute";
    pub const DEACTIVATE_ATTRIBUTE: &str =
        "/policy.attributes.AttributesService/DeactivateAttribute";
    pub const GET_VALUE: &str = "/policy.attributes.AttributesService/GetAttributeValue";
    pub const LIST_VALUES: &str = "/policy.attributes.AttributesService/ListAttributeValues";
    pub const CREATE_VALUE: &str = "/policy.attributes.AttributesService/CreateAttributeValue";
    pub const UPDATE_VALUE: &str = "/policy.attributes.AttributesService/UpdateAttributeValue";
    pub const DEACTIVATE_VALUE: &str =
        "/policy.attributes.AttributesService/DeactivateAttributeValue";
    pub const GET_KAS: &str =
        "/policy.kasregistry.KeyAccessServerRegistryService/GetKeyAccessServer";
    pub const LIST_KAS: &str =
        "/policy.kasregistry.KeyAccessServerRegistryService/ListKeyAccessServers";
    pub const CREATE_KAS: &str =
        "/policy.kasregistry.KeyAccessServerRegistryService/CreateKeyAccessServer";
    pub const UPDATE_KAS: &str =
        "/policy.kasregistry.KeyAccessServerRegistryService/UpdateKeyAccessServer";
    pub const DELETE_KAS: &str =
        "/policy.kasregistry.KeyAccessServerRegistryService/DeleteKeyAccessServer";
}

/// Client for the attributes and KAS registry services.
///
/// The underlying channel is lazy: constructing the client performs no
/// network I/O, the first call opens the connection.
#[derive(Debug, Clone)]
pub struct GrpcPolicyClient {
    inner: tonic::client::Grpc<Channel>,
    authorization: Option<AsciiMetadataValue>,
    endpoint: String,
}

impl GrpcPolicyClient {
    /// Builds a client from configuration.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid, the token is not a valid
    /// header value, or the CA certificate cannot be read.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let url = config.endpoint_url()?;
        let tls = url.scheme() == "https";

        let mut endpoint = Endpoint::from_shared(url.to_string())
            .map_err(|e| ClientError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                reason: e.to_string(),
            })?
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())?;

        if tls {
            let mut tls_config = ClientTlsConfig::new().with_native_roots();
            if let Some(host) = url.host_str() {
                tls_config = tls_config.domain_name(host.to_string());
            }
            if let Some(path) = &config.ca_cert_path {
                let pem = std::fs::read(path)?;
                debug!(path = %path.display(), "Trusting extra CA certificate");
                tls_config = tls_config.ca_certificate(Certificate::from_pem(pem));
            }
            endpoint = endpoint.tls_config(tls_config)?;
        }

        let authorization = config
            .token
            .as_deref()
            .map(|token| {
                AsciiMetadataValue::try_from(format!("Bearer {token}"))
                    .map_err(|e| ClientError::InvalidToken(e.to_string()))
            })
            .transpose()?;

        debug!(endpoint = %url, tls, "Created policy client");

        Ok(Self {
            inner: tonic::client::Grpc::new(endpoint.connect_lazy()),
            authorization,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn unary<Req, Resp>(&self, path: &'static str, message: Req) -> Result<Resp>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|e| ClientError::Unavailable {
                message: format!("service was not ready: {e}"),
            })?;

        let mut request = Request::new(message);
        if let Some(value) = &self.authorization {
            request.metadata_mut().insert("authorization", value.clone());
        }

        debug!(method = path, "Sending request");
        let response = grpc
            .unary(
                request,
                PathAndQuery::from_static(path),
                ProstCodec::<Req, Resp>::default(),
            )
            .await
            .map_err(|status| {
                debug!(method = path, code = ?status.code(), "Request failed");
                ClientError::from(status)
            })?;

        Ok(response.into_inner())
    }
}

fn missing(service: &str, field: &str) -> ClientError {
    ClientError::Rpc {
        code: Code::Internal,
        message: format!("{service} returned no {field}"),
    }
}

fn patch_parts(patch: Option<&LabelPatch>) -> (Option<MetadataMutable>, i32) {
    match patch {
        Some(patch) => (
            metadata_mutable(&patch.labels),
            MetadataUpdateEnum::from(patch.mode) as i32,
        ),
        None => (None, MetadataUpdateEnum::Unspecified as i32),
    }
}

fn attribute_of(response: AttributeResponse) -> Result<Attribute> {
    response
        .attribute
        .map(Into::into)
        .ok_or_else(|| missing(ATTRIBUTES_SERVICE, "attribute"))
}

fn value_of(response: ValueResponse) -> Result<AttributeValue> {
    response
        .value
        .map(Into::into)
        .ok_or_else(|| missing(ATTRIBUTES_SERVICE, "value"))
}

fn kas_of(response: KeyAccessServerResponse) -> Result<KasRegistryEntry> {
    response
        .key_access_server
        .map(Into::into)
        .ok_or_else(|| missing(KAS_REGISTRY_SERVICE, "key access server"))
}

#[async_trait]
impl PolicyApi for GrpcPolicyClient {
    async fn get_attribute(&self, id: &str) -> Result<Attribute> {
        let request = IdRequest { id: id.to_string() };
        attribute_of(self.unary(paths::GET_ATTRIBUTE, request).await?)
    }

    async fn list_attributes(&self, state: StateFilter) -> Result<Vec<Attribute>> {
        let request = ListAttributesRequest {
            state: ActiveStateEnum::from(state) as i32,
            namespace: String::new(),
        };
        let response: ListAttributesResponse = self.unary(paths::LIST_ATTRIBUTES, request).await?;
        Ok(response.attributes.into_iter().map(Into::into).collect())
    }

    async fn create_attribute(&self, attribute: NewAttribute) -> Result<Attribute> {
        let request = CreateAttributeRequest {
            namespace_id: attribute.namespace_id,
            name: attribute.name,
            rule: AttributeRuleTypeEnum::from(attribute.rule) as i32,
            values: attribute.values,
            metadata: metadata_mutable(&attribute.labels),
        };
        attribute_of(self.unary(paths::CREATE_ATTRIBUTE, request).await?)
    }

    async fn update_attribute(&self, id: &str, labels: LabelPatch) -> Result<Attribute> {
        let (metadata, behavior) = patch_parts(Some(&labels));
        let request = UpdateAttributeRequest {
            id: id.to_string(),
            metadata,
            metadata_update_behavior: behavior,
        };
        attribute_of(self.unary(paths::UPDATE_ATTRIBUTE, request).await?)
    }

    async fn deactivate_attribute(&self, id: &str) -> Result<Attribute> {
        let request = IdRequest { id: id.to_string() };
        attribute_of(self.unary(paths::DEACTIVATE_ATTRIBUTE, request).await?)
    }

    async fn get_attribute_value(&self, id: &str) -> Result<AttributeValue> {
        let request = IdRequest { id: id.to_string() };
        value_of(self.unary(paths::GET_VALUE, request).await?)
    }

    async fn list_attribute_values(
        &self,
        attribute_id: &str,
        state: StateFilter,
    ) -> Result<Vec<AttributeValue>> {
        let request = ListAttributeValuesRequest {
            attribute_id: attribute_id.to_string(),
            state: ActiveStateEnum::from(state) as i32,
        };
        let response: ListAttributeValuesResponse = self.unary(paths::LIST_VALUES, request).await?;
        Ok(response.values.into_iter().map(Into::into).collect())
    }

    async fn create_attribute_value(&self, value: NewAttributeValue) -> Result<AttributeValue> {
        let request = CreateAttributeValueRequest {
            attribute_id: value.attribute_id,
            value: value.value,
            members: Vec::new(),
            metadata: metadata_mutable(&value.labels),
        };
        value_of(self.unary(paths::CREATE_VALUE, request).await?)
    }

    async fn update_attribute_value(
        &self,
        update: AttributeValueUpdate,
    ) -> Result<AttributeValue> {
        let (metadata, behavior) = patch_parts(update.labels.as_ref());
        // An empty member list on the wire leaves members unchanged.
        let request = UpdateAttributeValueRequest {
            id: update.id,
            members: update.members.unwrap_or_default(),
            metadata,
            metadata_update_behavior: behavior,
        };
        value_of(self.unary(paths::UPDATE_VALUE, request).await?)
    }

    async fn deactivate_attribute_value(&self, id: &str) -> Result<AttributeValue> {
        let request = IdRequest { id: id.to_string() };
        value_of(self.unary(paths::DEACTIVATE_VALUE, request).await?)
    }

    async fn get_kas_entry(&self, id: &str) -> Result<KasRegistryEntry> {
        let request = IdRequest { id: id.to_string() };
        kas_of(self.unary(paths::GET_KAS, request).await?)
    }

    async fn list_kas_entries(&self) -> Result<Vec<KasRegistryEntry>> {
        let response: ListKeyAccessServersResponse = self
            .unary(paths::LIST_KAS, ListKeyAccessServersRequest {})
            .await?;
        Ok(response
            .key_access_servers
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn create_kas_entry(&self, entry: NewKasEntry) -> Result<KasRegistryEntry> {
        let request = CreateKeyAccessServerRequest {
            uri: entry.uri,
            public_key: Some(PublicKey::from(entry.public_key)),
            metadata: metadata_mutable(&entry.labels),
        };
        kas_of(self.unary(paths::CREATE_KAS, request).await?)
    }

    async fn update_kas_entry(&self, update: KasEntryUpdate) -> Result<KasRegistryEntry> {
        let (metadata, behavior) = patch_parts(update.labels.as_ref());
        let request = UpdateKeyAccessServerRequest {
            id: update.id,
            uri: update.uri.unwrap_or_default(),
            public_key: update.public_key.map(PublicKey::from),
            metadata,
            metadata_update_behavior: behavior,
        };
        kas_of(self.unary(paths::UPDATE_KAS, request).await?)
    }

    async fn delete_kas_entry(&self, id: &str) -> Result<KasRegistryEntry> {
        let request = IdRequest { id: id.to_string() };
        kas_of(self.unary(paths::DELETE_KAS, request).await?)
    }
}
