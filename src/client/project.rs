use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{segment, Client, ClientError};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_on: String,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Project endpoints.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;

    async fn get_project(&self, identifier: &str) -> Result<Project, ClientError>;

    async fn create_project(&self, req: &CreateProjectRequest) -> Result<(), ClientError>;

    async fn delete_project(&self, identifier: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl ProjectApi for Client {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.list("/projects").await
    }

    async fn get_project(&self, identifier: &str) -> Result<Project, ClientError> {
        self.get(&format!("/projects/{}", segment(identifier))).await
    }

    async fn create_project(&self, req: &CreateProjectRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/projects", Some(req)).await
    }

    async fn delete_project(&self, identifier: &str) -> Result<(), ClientError> {
        let path = format!("/projects/{}", segment(identifier));
        self.execute::<()>(Method::DELETE, &path, None).await
    }
}
