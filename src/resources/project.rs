//! `vpsie_project`: projects group servers, domains and volumes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, non_empty, orphaned, refreshed, require, Resource};
use crate::client::{CreateProjectRequest, Project, ProjectApi};
use crate::error::ProviderError;
use crate::import::single_key;
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_project";

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("A project. Every attribute forces replacement.")
        .with_attribute(
            "name",
            Attribute::required_string().with_min_length(1).with_force_new(),
        )
        .with_attribute("description", Attribute::optional_string().with_force_new())
        .with_attribute("identifier", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("id", Attribute::computed_int64().with_use_state_for_unknown())
        .with_attribute("created_on", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("created_by", Attribute::computed_string().with_use_state_for_unknown())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectModel {
    pub name: String,
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub id: Option<i64>,
    pub created_on: Option<String>,
    pub created_by: Option<String>,
}

impl ProjectModel {
    fn refresh(&mut self, project: Project) {
        self.name = project.name;
        self.description = project.description.and_then(non_empty);
        self.identifier = Some(project.identifier);
        self.id = Some(project.id);
        self.created_on = non_empty(project.created_on);
        self.created_by = project.created_by;
    }
}

pub struct ProjectResource<A> {
    api: Arc<A>,
}

impl<A: ProjectApi> ProjectResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: ProjectApi + 'static> Resource for ProjectResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: ProjectModel = decode(planned)?;
        let req = CreateProjectRequest {
            name: model.name.clone(),
            description: model.description.clone(),
        };

        debug!(name = %req.name, "Creating project");
        self.api
            .create_project(&req)
            .await
            .map_err(|e| ProviderError::api("Error creating project", e))?;

        let project = find_first(
            self.api.list_projects().await,
            "project",
            "name",
            &model.name,
            |p| p.name == model.name,
        )
        .map_err(|e| orphaned(TYPE_NAME, &model.name, e))?;

        info!(identifier = %project.identifier, "Created project");
        model.refresh(project);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: ProjectModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?.to_string();

        let Some(project) = refreshed(self.api.get_project(&identifier).await, "Error reading project")?
        else {
            return Ok(None);
        };
        model.refresh(project);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: ProjectModel = decode(prior)?;
        let planned: ProjectModel = decode(planned)?;
        encode(&ProjectModel {
            name: planned.name,
            description: planned.description,
            ..prior
        })
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: ProjectModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?;
        self.api
            .delete_project(identifier)
            .await
            .map_err(|e| ProviderError::api("Error deleting project", e))
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "identifier": single_key(id, "<identifier>")? }))
    }
}
