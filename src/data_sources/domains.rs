//! `vpsie_domains`: every DNS zone on the account.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{list_schema, list_state, DataSource};
use crate::client::{Domain, DomainApi};
use crate::error::ProviderError;
use crate::schema::{AttributeType, Schema};

pub const TYPE_NAME: &str = "vpsie_domains";
const ID: &str = "domains";

pub fn schema() -> Schema {
    list_schema(
        "All domains.",
        ID,
        &[
            ("identifier", AttributeType::String),
            ("domain_name", AttributeType::String),
            ("project_identifier", AttributeType::String),
            ("ns_validated", AttributeType::Int64),
            ("created_on", AttributeType::String),
            ("last_check", AttributeType::String),
        ],
    )
}

#[derive(Debug, Serialize)]
struct DomainItem {
    identifier: String,
    domain_name: String,
    project_identifier: Option<String>,
    ns_validated: i64,
    created_on: String,
    last_check: Option<String>,
}

impl From<Domain> for DomainItem {
    fn from(domain: Domain) -> Self {
        Self {
            identifier: domain.identifier,
            domain_name: domain.domain_name,
            project_identifier: domain.project_identifier,
            ns_validated: domain.ns_validated,
            created_on: domain.created_on,
            last_check: domain.last_check,
        }
    }
}

pub struct DomainsDataSource<A> {
    api: Arc<A>,
}

impl<A: DomainApi> DomainsDataSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: DomainApi + 'static> DataSource for DomainsDataSource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let domains = self
            .api
            .list_domains()
            .await
            .map_err(|e| ProviderError::api("Error listing domains", e))?;
        debug!(count = domains.len(), "Listed domains");
        list_state(ID, domains.into_iter().map(DomainItem::from).collect())
    }
}
