//! `vpsie_sshkeys`: every SSH key on the account. Key material is not
//! returned by the API and is not part of the listing.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{list_schema, list_state, DataSource};
use crate::client::{SshKey, SshKeyApi};
use crate::error::ProviderError;
use crate::schema::{AttributeType, Schema};

pub const TYPE_NAME: &str = "vpsie_sshkeys";
const ID: &str = "sshkeys";

pub fn schema() -> Schema {
    list_schema(
        "All SSH keys.",
        ID,
        &[
            ("id", AttributeType::Int64),
            ("identifier", AttributeType::String),
            ("name", AttributeType::String),
            ("created_on", AttributeType::String),
            ("created_by", AttributeType::String),
        ],
    )
}

#[derive(Debug, Serialize)]
struct SshKeyItem {
    id: i64,
    identifier: String,
    name: String,
    created_on: String,
    created_by: Option<String>,
}

impl From<SshKey> for SshKeyItem {
    fn from(key: SshKey) -> Self {
        Self {
            id: key.id,
            identifier: key.identifier,
            name: key.name,
            created_on: key.created_on,
            created_by: key.created_by,
        }
    }
}

pub struct SshKeysDataSource<A> {
    api: Arc<A>,
}

impl<A: SshKeyApi> SshKeysDataSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: SshKeyApi + 'static> DataSource for SshKeysDataSource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let keys = self
            .api
            .list_ssh_keys()
            .await
            .map_err(|e| ProviderError::api("Error listing SSH keys", e))?;
        debug!(count = keys.len(), "Listed SSH keys");
        list_state(ID, keys.into_iter().map(SshKeyItem::from).collect())
    }
}
