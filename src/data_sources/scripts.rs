//! `vpsie_scripts`: every stored script.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{list_schema, list_state, DataSource};
use crate::client::{Script, ScriptApi};
use crate::error::ProviderError;
use crate::schema::{AttributeType, Schema};

pub const TYPE_NAME: &str = "vpsie_scripts";
const ID: &str = "scripts";

pub fn schema() -> Schema {
    list_schema(
        "All stored scripts.",
        ID,
        &[
            ("identifier", AttributeType::String),
            ("name", AttributeType::String),
            ("script", AttributeType::String),
            ("type", AttributeType::String),
            ("created_on", AttributeType::String),
        ],
    )
}

#[derive(Debug, Serialize)]
struct ScriptItem {
    identifier: String,
    name: String,
    script: String,
    #[serde(rename = "type")]
    script_type: String,
    created_on: String,
}

impl From<Script> for ScriptItem {
    fn from(script: Script) -> Self {
        Self {
            identifier: script.identifier,
            name: script.name,
            script: script.script,
            script_type: script.script_type,
            created_on: script.created_on,
        }
    }
}

pub struct ScriptsDataSource<A> {
    api: Arc<A>,
}

impl<A: ScriptApi> ScriptsDataSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: ScriptApi + 'static> DataSource for ScriptsDataSource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let scripts = self
            .api
            .list_scripts()
            .await
            .map_err(|e| ProviderError::api("Error listing scripts", e))?;
        debug!(count = scripts.len(), "Listed scripts");
        list_state(ID, scripts.into_iter().map(ScriptItem::from).collect())
    }
}
