//! `vpsie_storage`: block storage volumes.
//!
//! Name and size are mutable through two separate endpoints. An update that
//! renames and resizes issues the rename first; if the resize then fails the
//! error carries the renamed state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, non_empty, orphaned, refreshed, require, Resource};
use crate::client::{CreateStorageRequest, Storage, StorageApi};
use crate::error::ProviderError;
use crate::import::single_key;
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_storage";

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("A block storage volume.")
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_min_length(1)
                .with_description("Volume name. Used to find the volume after creation."),
        )
        .with_attribute(
            "size",
            Attribute::required_int64().with_description("Size in GB. Changing it resizes the volume."),
        )
        .with_attribute("dc_identifier", Attribute::required_string().with_force_new())
        .with_attribute("storage_type", Attribute::required_string().with_force_new())
        .with_attribute("disk_format", Attribute::required_string().with_force_new())
        .with_attribute("description", Attribute::optional_string().with_force_new())
        .with_attribute("identifier", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("id", Attribute::computed_int64().with_use_state_for_unknown())
        .with_attribute("created_on", Attribute::computed_string().with_use_state_for_unknown())
}

/// State model for `vpsie_storage`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageModel {
    pub name: String,
    pub size: i64,
    pub dc_identifier: String,
    pub storage_type: String,
    pub disk_format: String,
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub id: Option<i64>,
    pub created_on: Option<String>,
}

impl StorageModel {
    fn refresh(&mut self, storage: Storage) {
        self.name = storage.name;
        self.size = storage.size;
        self.dc_identifier = storage.dc_identifier;
        self.storage_type = storage.storage_type;
        self.disk_format = storage.disk_format;
        self.description = storage.description.and_then(non_empty);
        self.identifier = Some(storage.identifier);
        self.id = Some(storage.id);
        self.created_on = non_empty(storage.created_on);
    }
}

pub struct StorageResource<A> {
    api: Arc<A>,
}

impl<A: StorageApi> StorageResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: StorageApi + 'static> Resource for StorageResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: StorageModel = decode(planned)?;
        let req = CreateStorageRequest {
            name: model.name.clone(),
            description: model.description.clone(),
            size: model.size,
            storage_type: model.storage_type.clone(),
            disk_format: model.disk_format.clone(),
            dc_identifier: model.dc_identifier.clone(),
        };

        debug!(name = %req.name, size = req.size, "Creating storage");
        self.api
            .create_storage(&req)
            .await
            .map_err(|e| ProviderError::api("Error creating storage", e))?;

        let storage = find_first(
            self.api.list_storages().await,
            "storage",
            "name",
            &model.name,
            |s| s.name == model.name,
        )
        .map_err(|e| orphaned(TYPE_NAME, &model.name, e))?;

        info!(identifier = %storage.identifier, "Created storage");
        model.refresh(storage);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: StorageModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?.to_string();

        let Some(storage) = refreshed(self.api.get_storage(&identifier).await, "Error reading storage")?
        else {
            return Ok(None);
        };
        model.refresh(storage);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: StorageModel = decode(prior)?;
        let planned: StorageModel = decode(planned)?;
        let identifier = require(&prior.identifier, TYPE_NAME, "identifier")?;
        let mut state = prior.clone();

        if planned.name != prior.name {
            debug!(identifier, name = %planned.name, "Renaming storage");
            self.api
                .rename_storage(identifier, &planned.name)
                .await
                .map_err(|e| ProviderError::api("Error renaming storage", e))?;
            state.name = planned.name.clone();
        }

        if planned.size != prior.size {
            debug!(identifier, size = planned.size, "Resizing storage");
            if let Err(e) = self.api.resize_storage(identifier, planned.size).await {
                return Err(ProviderError::partial(
                    encode(&state)?,
                    ProviderError::api("Error resizing storage", e),
                ));
            }
            state.size = planned.size;
        }

        encode(&state)
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: StorageModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?;
        self.api
            .delete_storage(identifier)
            .await
            .map_err(|e| ProviderError::api("Error deleting storage", e))?;
        info!(identifier, "Deleted storage");
        Ok(())
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "identifier": single_key(id, "<identifier>")? }))
    }
}
