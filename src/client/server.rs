use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{segment, Client, ClientError};

/// A virtual machine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub identifier: String,
    pub hostname: String,
    #[serde(default)]
    pub dc_identifier: String,
    #[serde(default)]
    pub os_identifier: String,
    #[serde(default)]
    pub resource_identifier: String,
    #[serde(default)]
    pub project_identifier: String,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub private_ip: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub initial_password: Option<String>,
    #[serde(default)]
    pub backup_enabled: bool,
    #[serde(default)]
    pub created_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServerRequest {
    pub hostname: String,
    pub dc_identifier: String,
    pub os_identifier: String,
    pub resource_identifier: String,
    pub project_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_identifier: Option<String>,
    pub backup_enabled: bool,
}

#[derive(Serialize)]
struct Rename<'a> {
    hostname: &'a str,
}

/// Virtual machine endpoints.
#[async_trait]
pub trait ServerApi: Send + Sync {
    async fn list_servers(&self) -> Result<Vec<Server>, ClientError>;

    async fn get_server(&self, identifier: &str) -> Result<Server, ClientError>;

    async fn create_server(&self, req: &CreateServerRequest) -> Result<(), ClientError>;

    async fn rename_server(&self, identifier: &str, hostname: &str) -> Result<(), ClientError>;

    async fn delete_server(&self, identifier: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl ServerApi for Client {
    async fn list_servers(&self) -> Result<Vec<Server>, ClientError> {
        self.list("/vms").await
    }

    async fn get_server(&self, identifier: &str) -> Result<Server, ClientError> {
        self.get(&format!("/vms/{}", segment(identifier))).await
    }

    async fn create_server(&self, req: &CreateServerRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/vms", Some(req)).await
    }

    async fn rename_server(&self, identifier: &str, hostname: &str) -> Result<(), ClientError> {
        let path = format!("/vms/{}/hostname", segment(identifier));
        self.execute(Method::PUT, &path, Some(&Rename { hostname })).await
    }

    async fn delete_server(&self, identifier: &str) -> Result<(), ClientError> {
        let path = format!("/vms/{}", segment(identifier));
        self.execute::<()>(Method::DELETE, &path, None).await
    }
}
