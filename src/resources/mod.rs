//! Resource adapters.
//!
//! Each adapter maps one Terraform resource type onto the VPSie API: it
//! decodes the planned state into a typed model, issues the API calls and
//! encodes the resulting state. Adapters receive the API client at
//! construction time and never see the provider's configuration.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ClientError, VpsieApi};
use crate::error::ProviderError;
use crate::schema::Schema;

pub mod access_token;
pub mod dns_record;
pub mod domain;
pub mod project;
pub mod reverse_dns;
pub mod script;
pub mod server;
pub mod ssh_key;
pub mod storage;
pub mod storage_snapshot;

/// A managed resource type.
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    /// The Terraform type name, e.g. `vpsie_storage`.
    fn type_name(&self) -> &'static str;

    /// The resource schema.
    fn schema(&self) -> Schema;

    /// Create the remote object and return the full state.
    async fn create(&self, planned: Value) -> Result<Value, ProviderError>;

    /// Refresh state from the API. `None` means the object is gone.
    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError>;

    /// Apply in-place changes.
    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError>;

    /// Delete the remote object.
    async fn delete(&self, state: Value) -> Result<(), ProviderError>;

    /// Turn an import ID into the minimal state [`Resource::read`] needs.
    ///
    /// Must not call the API, so malformed IDs fail fast.
    fn import_state(&self, id: &str) -> Result<Value, ProviderError>;
}

/// Build every resource adapter around a shared API client.
pub fn catalog<A: VpsieApi>(api: Arc<A>) -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(access_token::AccessTokenResource::new(api.clone())),
        Box::new(domain::DomainResource::new(api.clone())),
        Box::new(dns_record::DnsRecordResource::new(api.clone())),
        Box::new(project::ProjectResource::new(api.clone())),
        Box::new(script::ScriptResource::new(api.clone())),
        Box::new(ssh_key::SshKeyResource::new(api.clone())),
        Box::new(storage::StorageResource::new(api.clone())),
        Box::new(storage_snapshot::StorageSnapshotResource::new(api.clone())),
        Box::new(reverse_dns::ReverseDnsResource::new(api.clone())),
        Box::new(server::ServerResource::new(api)),
    ]
}

/// Resource schemas by type name, available before the provider is
/// configured.
pub fn schemas() -> Vec<(&'static str, Schema)> {
    vec![
        (access_token::TYPE_NAME, access_token::schema()),
        (domain::TYPE_NAME, domain::schema()),
        (dns_record::TYPE_NAME, dns_record::schema()),
        (project::TYPE_NAME, project::schema()),
        (script::TYPE_NAME, script::schema()),
        (ssh_key::TYPE_NAME, ssh_key::schema()),
        (storage::TYPE_NAME, storage::schema()),
        (storage_snapshot::TYPE_NAME, storage_snapshot::schema()),
        (reverse_dns::TYPE_NAME, reverse_dns::schema()),
        (server::TYPE_NAME, server::schema()),
    ]
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ProviderError> {
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn encode<T: Serialize>(model: &T) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(model)?)
}

/// Borrow a state attribute that must be present for the operation.
pub(crate) fn require<'a>(
    value: &'a Option<String>,
    resource_type: &str,
    attribute: &str,
) -> Result<&'a str, ProviderError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProviderError::Sdk(format!("{} state is missing {}", resource_type, attribute)))
}

/// Map a fetch result for Read: not-found becomes `None`.
pub(crate) fn refreshed<T>(
    result: Result<T, ClientError>,
    context: &str,
) -> Result<Option<T>, ProviderError> {
    match result {
        Ok(entity) => Ok(Some(entity)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(ProviderError::api(context, err)),
    }
}

/// The error for a create whose result could not be found afterwards.
pub(crate) fn orphaned(resource_type: &str, key: &str, source: ClientError) -> ProviderError {
    ProviderError::Orphaned {
        resource_type: resource_type.to_string(),
        key: key.to_string(),
        source,
    }
}

/// Treat the API's empty strings as absent.
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
