//! `vpsie_storage_snapshot`: snapshots of block storage volumes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, non_empty, orphaned, refreshed, require, Resource};
use crate::client::{CreateSnapshotRequest, SnapshotApi, StorageSnapshot};
use crate::error::ProviderError;
use crate::import::single_key;
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_storage_snapshot";

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("A point-in-time snapshot of a storage volume.")
        .with_attribute(
            "storage_identifier",
            Attribute::required_string().with_min_length(1).with_force_new(),
        )
        .with_attribute("name", Attribute::required_string().with_min_length(1))
        .with_attribute("identifier", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("snapshot_size", Attribute::computed_int64().with_use_state_for_unknown())
        .with_attribute("created_on", Attribute::computed_string().with_use_state_for_unknown())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSnapshotModel {
    pub storage_identifier: String,
    pub name: String,
    pub identifier: Option<String>,
    pub snapshot_size: Option<i64>,
    pub created_on: Option<String>,
}

impl StorageSnapshotModel {
    fn refresh(&mut self, snapshot: StorageSnapshot) {
        self.storage_identifier = snapshot.storage_identifier;
        self.name = snapshot.name;
        self.identifier = Some(snapshot.identifier);
        self.snapshot_size = Some(snapshot.snapshot_size);
        self.created_on = non_empty(snapshot.created_on);
    }
}

pub struct StorageSnapshotResource<A> {
    api: Arc<A>,
}

impl<A: SnapshotApi> StorageSnapshotResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: SnapshotApi + 'static> Resource for StorageSnapshotResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: StorageSnapshotModel = decode(planned)?;
        let req = CreateSnapshotRequest {
            name: model.name.clone(),
            storage_identifier: model.storage_identifier.clone(),
        };

        debug!(name = %req.name, storage = %req.storage_identifier, "Creating storage snapshot");
        self.api
            .create_snapshot(&req)
            .await
            .map_err(|e| ProviderError::api("Error creating storage snapshot", e))?;

        let snapshot = find_first(
            self.api.list_snapshots().await,
            "storage snapshot",
            "name",
            &model.name,
            |s| s.name == model.name,
        )
        .map_err(|e| orphaned(TYPE_NAME, &model.name, e))?;

        info!(identifier = %snapshot.identifier, "Created storage snapshot");
        model.refresh(snapshot);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: StorageSnapshotModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?.to_string();

        let found = find_first(
            self.api.list_snapshots().await,
            "storage snapshot",
            "identifier",
            &identifier,
            |s| s.identifier == identifier,
        );
        let Some(snapshot) = refreshed(found, "Error reading storage snapshot")? else {
            return Ok(None);
        };
        model.refresh(snapshot);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: StorageSnapshotModel = decode(prior)?;
        let planned: StorageSnapshotModel = decode(planned)?;
        let identifier = require(&prior.identifier, TYPE_NAME, "identifier")?;

        if planned.name != prior.name {
            self.api
                .rename_snapshot(identifier, &planned.name)
                .await
                .map_err(|e| ProviderError::api("Error renaming storage snapshot", e))?;
        }

        encode(&StorageSnapshotModel {
            name: planned.name,
            ..prior
        })
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: StorageSnapshotModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?;
        self.api
            .delete_snapshot(identifier)
            .await
            .map_err(|e| ProviderError::api("Error deleting storage snapshot", e))
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "identifier": single_key(id, "<identifier>")? }))
    }
}
