//! `vpsie_server`: virtual machines.
//!
//! Only the hostname can change in place. The initial root password is
//! returned once by the API and kept in state afterwards.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, non_empty, orphaned, refreshed, require, Resource};
use crate::client::{CreateServerRequest, Server, ServerApi};
use crate::error::ProviderError;
use crate::import::single_key;
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_server";

pub fn schema() -> Schema {
    let stable = |attr: Attribute| attr.with_use_state_for_unknown();

    Schema::v0()
        .with_description("A virtual machine.")
        .with_attribute(
            "hostname",
            Attribute::required_string()
                .with_min_length(1)
                .with_description("Hostname. Changing it renames the server in place."),
        )
        .with_attribute("dc_identifier", Attribute::required_string().with_force_new())
        .with_attribute("os_identifier", Attribute::required_string().with_force_new())
        .with_attribute("resource_identifier", Attribute::required_string().with_force_new())
        .with_attribute("project_identifier", Attribute::required_string().with_force_new())
        .with_attribute("ssh_key_identifier", Attribute::optional_string().with_force_new())
        .with_attribute("script_identifier", Attribute::optional_string().with_force_new())
        .with_attribute(
            "backup_enabled",
            Attribute::optional_computed_bool()
                .with_default(json!(false))
                .with_force_new(),
        )
        .with_attribute("identifier", stable(Attribute::computed_string()))
        .with_attribute("public_ip", stable(Attribute::computed_string()))
        .with_attribute("private_ip", stable(Attribute::computed_string()))
        .with_attribute("status", stable(Attribute::computed_string()))
        .with_attribute("created_on", stable(Attribute::computed_string()))
        .with_attribute("initial_password", stable(Attribute::computed_string().sensitive()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerModel {
    pub hostname: String,
    pub dc_identifier: String,
    pub os_identifier: String,
    pub resource_identifier: String,
    pub project_identifier: String,
    pub ssh_key_identifier: Option<String>,
    pub script_identifier: Option<String>,
    pub backup_enabled: Option<bool>,
    pub identifier: Option<String>,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub status: Option<String>,
    pub created_on: Option<String>,
    pub initial_password: Option<String>,
}

impl ServerModel {
    fn refresh(&mut self, server: Server) {
        self.hostname = server.hostname;
        self.dc_identifier = server.dc_identifier;
        self.os_identifier = server.os_identifier;
        self.resource_identifier = server.resource_identifier;
        self.project_identifier = server.project_identifier;
        self.backup_enabled = Some(server.backup_enabled);
        self.identifier = Some(server.identifier);
        self.public_ip = server.public_ip.and_then(non_empty);
        self.private_ip = server.private_ip.and_then(non_empty);
        self.status = non_empty(server.status);
        self.created_on = non_empty(server.created_on);
        if let Some(password) = server.initial_password.and_then(non_empty) {
            self.initial_password = Some(password);
        }
    }
}

pub struct ServerResource<A> {
    api: Arc<A>,
}

impl<A: ServerApi> ServerResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: ServerApi + 'static> Resource for ServerResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: ServerModel = decode(planned)?;
        let req = CreateServerRequest {
            hostname: model.hostname.clone(),
            dc_identifier: model.dc_identifier.clone(),
            os_identifier: model.os_identifier.clone(),
            resource_identifier: model.resource_identifier.clone(),
            project_identifier: model.project_identifier.clone(),
            ssh_key_identifier: model.ssh_key_identifier.clone(),
            script_identifier: model.script_identifier.clone(),
            backup_enabled: model.backup_enabled.unwrap_or(false),
        };

        debug!(hostname = %req.hostname, dc = %req.dc_identifier, "Creating server");
        self.api
            .create_server(&req)
            .await
            .map_err(|e| ProviderError::api("Error creating server", e))?;

        let server = find_first(
            self.api.list_servers().await,
            "server",
            "hostname",
            &model.hostname,
            |s| s.hostname == model.hostname,
        )
        .map_err(|e| orphaned(TYPE_NAME, &model.hostname, e))?;

        info!(identifier = %server.identifier, "Created server");
        model.refresh(server);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: ServerModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?.to_string();

        let Some(server) = refreshed(self.api.get_server(&identifier).await, "Error reading server")?
        else {
            return Ok(None);
        };
        model.refresh(server);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: ServerModel = decode(prior)?;
        let planned: ServerModel = decode(planned)?;
        let identifier = require(&prior.identifier, TYPE_NAME, "identifier")?;

        if planned.hostname != prior.hostname {
            debug!(identifier, hostname = %planned.hostname, "Renaming server");
            self.api
                .rename_server(identifier, &planned.hostname)
                .await
                .map_err(|e| ProviderError::api("Error renaming server", e))?;
        }

        encode(&ServerModel {
            hostname: planned.hostname,
            ..prior
        })
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: ServerModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?;
        self.api
            .delete_server(identifier)
            .await
            .map_err(|e| ProviderError::api("Error deleting server", e))?;
        info!(identifier, "Deleted server");
        Ok(())
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "identifier": single_key(id, "<identifier>")? }))
    }
}
