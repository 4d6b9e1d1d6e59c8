//! `vpsie_projects`: every project on the account.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{list_schema, list_state, DataSource};
use crate::client::{Project, ProjectApi};
use crate::error::ProviderError;
use crate::schema::{AttributeType, Schema};

pub const TYPE_NAME: &str = "vpsie_projects";
const ID: &str = "projects";

pub fn schema() -> Schema {
    list_schema(
        "All projects.",
        ID,
        &[
            ("id", AttributeType::Int64),
            ("identifier", AttributeType::String),
            ("name", AttributeType::String),
            ("description", AttributeType::String),
            ("created_on", AttributeType::String),
            ("created_by", AttributeType::String),
        ],
    )
}

#[derive(Debug, Serialize)]
struct ProjectItem {
    id: i64,
    identifier: String,
    name: String,
    description: Option<String>,
    created_on: String,
    created_by: Option<String>,
}

impl From<Project> for ProjectItem {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            identifier: project.identifier,
            name: project.name,
            description: project.description,
            created_on: project.created_on,
            created_by: project.created_by,
        }
    }
}

pub struct ProjectsDataSource<A> {
    api: Arc<A>,
}

impl<A: ProjectApi> ProjectsDataSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: ProjectApi + 'static> DataSource for ProjectsDataSource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let projects = self
            .api
            .list_projects()
            .await
            .map_err(|e| ProviderError::api("Error listing projects", e))?;
        debug!(count = projects.len(), "Listed projects");
        list_state(ID, projects.into_iter().map(ProjectItem::from).collect())
    }
}
