use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{segment, Client, ClientError};

/// A block storage volume.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    pub id: i64,
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub size: i64,
    #[serde(default)]
    pub storage_type: String,
    #[serde(default)]
    pub disk_format: String,
    #[serde(default)]
    pub dc_identifier: String,
    #[serde(default)]
    pub created_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStorageRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub size: i64,
    pub storage_type: String,
    pub disk_format: String,
    pub dc_identifier: String,
}

/// A point-in-time snapshot of a storage volume.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSnapshot {
    pub identifier: String,
    pub name: String,
    pub storage_identifier: String,
    #[serde(default)]
    pub snapshot_size: i64,
    #[serde(default)]
    pub created_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotRequest {
    pub name: String,
    pub storage_identifier: String,
}

#[derive(Serialize)]
struct Rename<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct Resize {
    size: i64,
}

/// Storage volume endpoints. Rename and resize are separate calls.
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn list_storages(&self) -> Result<Vec<Storage>, ClientError>;

    async fn get_storage(&self, identifier: &str) -> Result<Storage, ClientError>;

    async fn create_storage(&self, req: &CreateStorageRequest) -> Result<(), ClientError>;

    async fn rename_storage(&self, identifier: &str, name: &str) -> Result<(), ClientError>;

    async fn resize_storage(&self, identifier: &str, size: i64) -> Result<(), ClientError>;

    async fn delete_storage(&self, identifier: &str) -> Result<(), ClientError>;
}

/// Storage snapshot endpoints.
#[async_trait]
pub trait SnapshotApi: Send + Sync {
    async fn list_snapshots(&self) -> Result<Vec<StorageSnapshot>, ClientError>;

    async fn create_snapshot(&self, req: &CreateSnapshotRequest) -> Result<(), ClientError>;

    async fn rename_snapshot(&self, identifier: &str, name: &str) -> Result<(), ClientError>;

    async fn delete_snapshot(&self, identifier: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl StorageApi for Client {
    async fn list_storages(&self) -> Result<Vec<Storage>, ClientError> {
        self.list("/storages").await
    }

    async fn get_storage(&self, identifier: &str) -> Result<Storage, ClientError> {
        self.get(&format!("/storages/{}", segment(identifier))).await
    }

    async fn create_storage(&self, req: &CreateStorageRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/storages", Some(req)).await
    }

    async fn rename_storage(&self, identifier: &str, name: &str) -> Result<(), ClientError> {
        let path = format!("/storages/{}/name", segment(identifier));
        self.execute(Method::PUT, &path, Some(&Rename { name })).await
    }

    async fn resize_storage(&self, identifier: &str, size: i64) -> Result<(), ClientError> {
        let path = format!("/storages/{}/size", segment(identifier));
        self.execute(Method::PUT, &path, Some(&Resize { size })).await
    }

    async fn delete_storage(&self, identifier: &str) -> Result<(), ClientError> {
        let path = format!("/storages/{}", segment(identifier));
        self.execute::<()>(Method::DELETE, &path, None).await
    }
}

#[async_trait]
impl SnapshotApi for Client {
    async fn list_snapshots(&self) -> Result<Vec<StorageSnapshot>, ClientError> {
        self.list("/storages/snapshots").await
    }

    async fn create_snapshot(&self, req: &CreateSnapshotRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/storages/snapshots", Some(req)).await
    }

    async fn rename_snapshot(&self, identifier: &str, name: &str) -> Result<(), ClientError> {
        let path = format!("/storages/snapshots/{}", segment(identifier));
        self.execute(Method::PUT, &path, Some(&Rename { name })).await
    }

    async fn delete_snapshot(&self, identifier: &str) -> Result<(), ClientError> {
        let path = format!("/storages/snapshots/{}", segment(identifier));
        self.execute::<()>(Method::DELETE, &path, None).await
    }
}
