use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{segment, Client, ClientError};

/// An SSH key registered with the account. The key material is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKey {
    pub id: i64,
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub created_on: String,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSshKeyRequest {
    pub name: String,
    pub private_key: String,
}

/// SSH key endpoints.
#[async_trait]
pub trait SshKeyApi: Send + Sync {
    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>, ClientError>;

    async fn create_ssh_key(&self, req: &CreateSshKeyRequest) -> Result<(), ClientError>;

    async fn delete_ssh_key(&self, identifier: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl SshKeyApi for Client {
    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>, ClientError> {
        self.list("/sshKeys").await
    }

    async fn create_ssh_key(&self, req: &CreateSshKeyRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/sshKeys", Some(req)).await
    }

    async fn delete_ssh_key(&self, identifier: &str) -> Result<(), ClientError> {
        let path = format!("/sshKeys/{}", segment(identifier));
        self.execute::<()>(Method::DELETE, &path, None).await
    }
}
