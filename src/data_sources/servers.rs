//! `vpsie_servers`: every virtual machine on the account.
//!
//! The initial root password is deliberately left out of the listing.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{list_schema, list_state, DataSource};
use crate::client::{Server, ServerApi};
use crate::error::ProviderError;
use crate::schema::{AttributeType, Schema};

pub const TYPE_NAME: &str = "vpsie_servers";
const ID: &str = "servers";

pub fn schema() -> Schema {
    list_schema(
        "All servers.",
        ID,
        &[
            ("identifier", AttributeType::String),
            ("hostname", AttributeType::String),
            ("dc_identifier", AttributeType::String),
            ("os_identifier", AttributeType::String),
            ("resource_identifier", AttributeType::String),
            ("project_identifier", AttributeType::String),
            ("public_ip", AttributeType::String),
            ("private_ip", AttributeType::String),
            ("status", AttributeType::String),
            ("backup_enabled", AttributeType::Bool),
            ("created_on", AttributeType::String),
        ],
    )
}

#[derive(Debug, Serialize)]
struct ServerItem {
    identifier: String,
    hostname: String,
    dc_identifier: String,
    os_identifier: String,
    resource_identifier: String,
    project_identifier: String,
    public_ip: Option<String>,
    private_ip: Option<String>,
    status: String,
    backup_enabled: bool,
    created_on: String,
}

impl From<Server> for ServerItem {
    fn from(server: Server) -> Self {
        Self {
            identifier: server.identifier,
            hostname: server.hostname,
            dc_identifier: server.dc_identifier,
            os_identifier: server.os_identifier,
            resource_identifier: server.resource_identifier,
            project_identifier: server.project_identifier,
            public_ip: server.public_ip,
            private_ip: server.private_ip,
            status: server.status,
            backup_enabled: server.backup_enabled,
            created_on: server.created_on,
        }
    }
}

pub struct ServersDataSource<A> {
    api: Arc<A>,
}

impl<A: ServerApi> ServersDataSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: ServerApi + 'static> DataSource for ServersDataSource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let servers = self
            .api
            .list_servers()
            .await
            .map_err(|e| ProviderError::api("Error listing servers", e))?;
        debug!(count = servers.len(), "Listed servers");
        list_state(ID, servers.into_iter().map(ServerItem::from).collect())
    }
}
