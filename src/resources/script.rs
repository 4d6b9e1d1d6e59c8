//! `vpsie_script`: stored startup scripts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, non_empty, orphaned, refreshed, require, Resource};
use crate::client::{Script, ScriptApi, ScriptRequest};
use crate::error::ProviderError;
use crate::import::single_key;
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_script";

/// Script type used when the configuration leaves it out.
pub const DEFAULT_SCRIPT_TYPE: &str = "bash";

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("A startup script that servers can run on first boot.")
        .with_attribute("name", Attribute::required_string().with_min_length(1))
        .with_attribute("script", Attribute::required_string())
        .with_attribute(
            "type",
            Attribute::optional_computed_string().with_default(json!(DEFAULT_SCRIPT_TYPE)),
        )
        .with_attribute("identifier", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("created_on", Attribute::computed_string().with_use_state_for_unknown())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptModel {
    pub name: String,
    pub script: String,
    #[serde(rename = "type")]
    pub script_type: Option<String>,
    pub identifier: Option<String>,
    pub created_on: Option<String>,
}

impl ScriptModel {
    fn request(&self) -> ScriptRequest {
        ScriptRequest {
            name: self.name.clone(),
            script: self.script.clone(),
            script_type: self
                .script_type
                .clone()
                .unwrap_or_else(|| DEFAULT_SCRIPT_TYPE.to_string()),
        }
    }

    fn refresh(&mut self, script: Script) {
        self.name = script.name;
        self.script = script.script;
        self.script_type = Some(non_empty(script.script_type).unwrap_or_else(|| DEFAULT_SCRIPT_TYPE.to_string()));
        self.identifier = Some(script.identifier);
        self.created_on = non_empty(script.created_on);
    }
}

pub struct ScriptResource<A> {
    api: Arc<A>,
}

impl<A: ScriptApi> ScriptResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: ScriptApi + 'static> Resource for ScriptResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: ScriptModel = decode(planned)?;
        let req = model.request();

        debug!(name = %req.name, script_type = %req.script_type, "Creating script");
        self.api
            .create_script(&req)
            .await
            .map_err(|e| ProviderError::api("Error creating script", e))?;

        let script = find_first(
            self.api.list_scripts().await,
            "script",
            "name",
            &model.name,
            |s| s.name == model.name,
        )
        .map_err(|e| orphaned(TYPE_NAME, &model.name, e))?;

        info!(identifier = %script.identifier, "Created script");
        model.refresh(script);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: ScriptModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?.to_string();

        let Some(script) = refreshed(self.api.get_script(&identifier).await, "Error reading script")?
        else {
            return Ok(None);
        };
        model.refresh(script);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: ScriptModel = decode(prior)?;
        let planned: ScriptModel = decode(planned)?;
        let identifier = require(&prior.identifier, TYPE_NAME, "identifier")?;

        let req = planned.request();
        if req != prior.request() {
            self.api
                .update_script(identifier, &req)
                .await
                .map_err(|e| ProviderError::api("Error updating script", e))?;
        }

        encode(&ScriptModel {
            name: req.name,
            script: req.script,
            script_type: Some(req.script_type),
            ..prior
        })
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: ScriptModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?;
        self.api
            .delete_script(identifier)
            .await
            .map_err(|e| ProviderError::api("Error deleting script", e))
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "identifier": single_key(id, "<identifier>")? }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;

    fn resource() -> (Arc<MockApi>, ScriptResource<MockApi>) {
        let api = Arc::new(MockApi::new());
        (api.clone(), ScriptResource::new(api))
    }

    #[tokio::test]
    async fn test_type_defaults_to_bash() {
        let (api, scripts) = resource();
        let state = scripts
            .create(json!({"name": "bootstrap", "script": "#!/bin/sh\necho hi"}))
            .await
            .unwrap();
        assert_eq!(state["type"], "bash");
        assert_eq!(state["identifier"], "script-1");
        assert_eq!(api.scripts.lock().unwrap()[0].script_type, "bash");
    }

    #[tokio::test]
    async fn test_update_sends_one_call() {
        let (api, scripts) = resource();
        let prior = scripts
            .create(json!({"name": "bootstrap", "script": "echo hi", "type": "bash"}))
            .await
            .unwrap();
        let mut next = prior.clone();
        next["script"] = json!("echo bye");

        let state = scripts.update(prior.clone(), next).await.unwrap();
        assert_eq!(state["script"], "echo bye");
        assert_eq!(state["identifier"], prior["identifier"]);
        assert_eq!(api.scripts.lock().unwrap()[0].script, "echo bye");
        assert_eq!(api.calls().iter().filter(|c| *c == "update_script").count(), 1);
    }

    #[tokio::test]
    async fn test_unchanged_update_makes_no_call() {
        let (api, scripts) = resource();
        let prior = scripts
            .create(json!({"name": "bootstrap", "script": "echo hi"}))
            .await
            .unwrap();
        scripts.update(prior.clone(), prior).await.unwrap();
        assert!(!api.calls().contains(&"update_script".to_string()));
    }
}
