//! `vpsie_storages` and `vpsie_storage_snapshots`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{list_schema, list_state, DataSource};
use crate::client::{SnapshotApi, Storage, StorageApi, StorageSnapshot};
use crate::error::ProviderError;
use crate::schema::{AttributeType, Schema};

pub const STORAGES_TYPE_NAME: &str = "vpsie_storages";
pub const SNAPSHOTS_TYPE_NAME: &str = "vpsie_storage_snapshots";
const STORAGES_ID: &str = "storages";
const SNAPSHOTS_ID: &str = "snapshots";

pub fn storages_schema() -> Schema {
    list_schema(
        "All block storage volumes.",
        STORAGES_ID,
        &[
            ("id", AttributeType::Int64),
            ("identifier", AttributeType::String),
            ("name", AttributeType::String),
            ("description", AttributeType::String),
            ("size", AttributeType::Int64),
            ("storage_type", AttributeType::String),
            ("disk_format", AttributeType::String),
            ("dc_identifier", AttributeType::String),
            ("created_on", AttributeType::String),
        ],
    )
}

pub fn snapshots_schema() -> Schema {
    list_schema(
        "All storage snapshots.",
        SNAPSHOTS_ID,
        &[
            ("identifier", AttributeType::String),
            ("name", AttributeType::String),
            ("storage_identifier", AttributeType::String),
            ("snapshot_size", AttributeType::Int64),
            ("created_on", AttributeType::String),
        ],
    )
}

#[derive(Debug, Serialize)]
struct StorageItem {
    id: i64,
    identifier: String,
    name: String,
    description: Option<String>,
    size: i64,
    storage_type: String,
    disk_format: String,
    dc_identifier: String,
    created_on: String,
}

impl From<Storage> for StorageItem {
    fn from(storage: Storage) -> Self {
        Self {
            id: storage.id,
            identifier: storage.identifier,
            name: storage.name,
            description: storage.description,
            size: storage.size,
            storage_type: storage.storage_type,
            disk_format: storage.disk_format,
            dc_identifier: storage.dc_identifier,
            created_on: storage.created_on,
        }
    }
}

#[derive(Debug, Serialize)]
struct SnapshotItem {
    identifier: String,
    name: String,
    storage_identifier: String,
    snapshot_size: i64,
    created_on: String,
}

impl From<StorageSnapshot> for SnapshotItem {
    fn from(snapshot: StorageSnapshot) -> Self {
        Self {
            identifier: snapshot.identifier,
            name: snapshot.name,
            storage_identifier: snapshot.storage_identifier,
            snapshot_size: snapshot.snapshot_size,
            created_on: snapshot.created_on,
        }
    }
}

pub struct StoragesDataSource<A> {
    api: Arc<A>,
}

impl<A: StorageApi> StoragesDataSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: StorageApi + 'static> DataSource for StoragesDataSource<A> {
    fn type_name(&self) -> &'static str {
        STORAGES_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        storages_schema()
    }

    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let storages = self
            .api
            .list_storages()
            .await
            .map_err(|e| ProviderError::api("Error listing storages", e))?;
        debug!(count = storages.len(), "Listed storages");
        list_state(STORAGES_ID, storages.into_iter().map(StorageItem::from).collect())
    }
}

pub struct SnapshotsDataSource<A> {
    api: Arc<A>,
}

impl<A: SnapshotApi> SnapshotsDataSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: SnapshotApi + 'static> DataSource for SnapshotsDataSource<A> {
    fn type_name(&self) -> &'static str {
        SNAPSHOTS_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        snapshots_schema()
    }

    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let snapshots = self
            .api
            .list_snapshots()
            .await
            .map_err(|e| ProviderError::api("Error listing storage snapshots", e))?;
        debug!(count = snapshots.len(), "Listed storage snapshots");
        list_state(SNAPSHOTS_ID, snapshots.into_iter().map(SnapshotItem::from).collect())
    }
}
