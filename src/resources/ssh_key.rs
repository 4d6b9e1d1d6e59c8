//! `vpsie_sshkey`: SSH keys registered with the account.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, non_empty, orphaned, refreshed, require, Resource};
use crate::client::{CreateSshKeyRequest, SshKey, SshKeyApi};
use crate::error::ProviderError;
use crate::import::single_key;
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_sshkey";

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("An SSH key. Every attribute forces replacement.")
        .with_attribute(
            "name",
            Attribute::required_string().with_min_length(1).with_force_new(),
        )
        .with_attribute(
            "private_key",
            Attribute::required_string().sensitive().with_force_new(),
        )
        .with_attribute("id", Attribute::computed_int64().with_use_state_for_unknown())
        .with_attribute("identifier", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("created_on", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("created_by", Attribute::computed_string().with_use_state_for_unknown())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshKeyModel {
    pub name: String,
    pub private_key: Option<String>,
    pub id: Option<i64>,
    pub identifier: Option<String>,
    pub created_on: Option<String>,
    pub created_by: Option<String>,
}

impl SshKeyModel {
    // Key material is write-only and stays as configured.
    fn refresh(&mut self, key: SshKey) {
        self.name = key.name;
        self.id = Some(key.id);
        self.identifier = Some(key.identifier);
        self.created_on = non_empty(key.created_on);
        self.created_by = key.created_by;
    }
}

pub struct SshKeyResource<A> {
    api: Arc<A>,
}

impl<A: SshKeyApi> SshKeyResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: SshKeyApi + 'static> Resource for SshKeyResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: SshKeyModel = decode(planned)?;
        let req = CreateSshKeyRequest {
            name: model.name.clone(),
            private_key: model.private_key.clone().unwrap_or_default(),
        };

        debug!(name = %req.name, "Creating SSH key");
        self.api
            .create_ssh_key(&req)
            .await
            .map_err(|e| ProviderError::api("Error creating SSH key", e))?;

        let key = find_first(
            self.api.list_ssh_keys().await,
            "ssh key",
            "name",
            &model.name,
            |k| k.name == model.name,
        )
        .map_err(|e| orphaned(TYPE_NAME, &model.name, e))?;

        info!(identifier = %key.identifier, "Created SSH key");
        model.refresh(key);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: SshKeyModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?.to_string();

        let found = find_first(
            self.api.list_ssh_keys().await,
            "ssh key",
            "identifier",
            &identifier,
            |k| k.identifier == identifier,
        );
        let Some(key) = refreshed(found, "Error reading SSH key")? else {
            return Ok(None);
        };
        model.refresh(key);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: SshKeyModel = decode(prior)?;
        let planned: SshKeyModel = decode(planned)?;
        encode(&SshKeyModel {
            name: planned.name,
            private_key: planned.private_key,
            ..prior
        })
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: SshKeyModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?;
        self.api
            .delete_ssh_key(identifier)
            .await
            .map_err(|e| ProviderError::api("Error deleting SSH key", e))
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "identifier": single_key(id, "<identifier>")? }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;

    #[tokio::test]
    async fn test_private_key_survives_read() {
        let api = Arc::new(MockApi::new());
        let keys = SshKeyResource::new(api.clone());

        let state = keys
            .create(json!({"name": "laptop", "private_key": "ssh-ed25519 AAAAC3Nz"}))
            .await
            .unwrap();
        assert_eq!(state["identifier"], "key-1");

        let refreshed = keys.read(state).await.unwrap().unwrap();
        assert_eq!(refreshed["private_key"], "ssh-ed25519 AAAAC3Nz");
        assert_eq!(refreshed["created_by"], "tester");
    }

    #[tokio::test]
    async fn test_imported_key_has_no_material() {
        let api = Arc::new(MockApi::new());
        let keys = SshKeyResource::new(api.clone());
        keys.create(json!({"name": "laptop", "private_key": "k"})).await.unwrap();

        let state = keys.read(keys.import_state("key-1").unwrap()).await.unwrap().unwrap();
        assert_eq!(state["name"], "laptop");
        assert!(state["private_key"].is_null());
    }
}
