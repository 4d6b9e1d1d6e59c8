use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{segment, Client, ClientError};

/// A stored startup script.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub script: String,
    #[serde(rename = "type", default)]
    pub script_type: String,
    #[serde(default)]
    pub created_on: String,
}

/// Body for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRequest {
    pub name: String,
    pub script: String,
    #[serde(rename = "type")]
    pub script_type: String,
}

/// Script endpoints.
#[async_trait]
pub trait ScriptApi: Send + Sync {
    async fn list_scripts(&self) -> Result<Vec<Script>, ClientError>;

    async fn get_script(&self, identifier: &str) -> Result<Script, ClientError>;

    async fn create_script(&self, req: &ScriptRequest) -> Result<(), ClientError>;

    async fn update_script(&self, identifier: &str, req: &ScriptRequest) -> Result<(), ClientError>;

    async fn delete_script(&self, identifier: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl ScriptApi for Client {
    async fn list_scripts(&self) -> Result<Vec<Script>, ClientError> {
        self.list("/scripts").await
    }

    async fn get_script(&self, identifier: &str) -> Result<Script, ClientError> {
        self.get(&format!("/scripts/{}", segment(identifier))).await
    }

    async fn create_script(&self, req: &ScriptRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/scripts", Some(req)).await
    }

    async fn update_script(&self, identifier: &str, req: &ScriptRequest) -> Result<(), ClientError> {
        let path = format!("/scripts/{}", segment(identifier));
        self.execute(Method::PUT, &path, Some(req)).await
    }

    async fn delete_script(&self, identifier: &str) -> Result<(), ClientError> {
        let path = format!("/scripts/{}", segment(identifier));
        self.execute::<()>(Method::DELETE, &path, None).await
    }
}
