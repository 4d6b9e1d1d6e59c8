//! `vpsie_domain`: DNS zones.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, non_empty, orphaned, refreshed, require, Resource};
use crate::client::{CreateDomainRequest, Domain, DomainApi};
use crate::error::ProviderError;
use crate::import::single_key;
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_domain";

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("A DNS zone. Every attribute forces replacement.")
        .with_attribute(
            "domain_name",
            Attribute::required_string().with_min_length(1).with_force_new(),
        )
        .with_attribute(
            "project_identifier",
            Attribute::required_string().with_min_length(1).with_force_new(),
        )
        .with_attribute("identifier", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("ns_validated", Attribute::computed_int64().with_use_state_for_unknown())
        .with_attribute("created_on", Attribute::computed_string().with_use_state_for_unknown())
        .with_attribute("last_check", Attribute::computed_string().with_use_state_for_unknown())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainModel {
    pub domain_name: String,
    pub project_identifier: String,
    pub identifier: Option<String>,
    pub ns_validated: Option<i64>,
    pub created_on: Option<String>,
    pub last_check: Option<String>,
}

impl DomainModel {
    fn refresh(&mut self, domain: Domain) {
        self.domain_name = domain.domain_name;
        if let Some(project) = domain.project_identifier {
            self.project_identifier = project;
        }
        self.identifier = Some(domain.identifier);
        self.ns_validated = Some(domain.ns_validated);
        self.created_on = non_empty(domain.created_on);
        self.last_check = domain.last_check;
    }
}

pub struct DomainResource<A> {
    api: Arc<A>,
}

impl<A: DomainApi> DomainResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: DomainApi + 'static> Resource for DomainResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: DomainModel = decode(planned)?;
        let req = CreateDomainRequest {
            domain_name: model.domain_name.clone(),
            project_identifier: model.project_identifier.clone(),
        };

        debug!(domain_name = %req.domain_name, "Creating domain");
        self.api
            .create_domain(&req)
            .await
            .map_err(|e| ProviderError::api("Error creating domain", e))?;

        let domain = find_first(
            self.api.list_domains().await,
            "domain",
            "name",
            &model.domain_name,
            |d| d.domain_name == model.domain_name,
        )
        .map_err(|e| orphaned(TYPE_NAME, &model.domain_name, e))?;

        info!(identifier = %domain.identifier, "Created domain");
        model.refresh(domain);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: DomainModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?.to_string();

        let found = find_first(
            self.api.list_domains().await,
            "domain",
            "identifier",
            &identifier,
            |d| d.identifier == identifier,
        );
        let Some(domain) = refreshed(found, "Error reading domain")? else {
            return Ok(None);
        };
        model.refresh(domain);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        // Nothing is mutable in place; carry the computed values over.
        let prior: DomainModel = decode(prior)?;
        let planned: DomainModel = decode(planned)?;
        encode(&DomainModel {
            domain_name: planned.domain_name,
            project_identifier: planned.project_identifier,
            ..prior
        })
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: DomainModel = decode(state)?;
        let identifier = require(&model.identifier, TYPE_NAME, "identifier")?;
        self.api
            .delete_domain(identifier)
            .await
            .map_err(|e| ProviderError::api("Error deleting domain", e))
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "identifier": single_key(id, "<identifier>")? }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;

    fn resource() -> (Arc<MockApi>, DomainResource<MockApi>) {
        let api = Arc::new(MockApi::new());
        (api.clone(), DomainResource::new(api))
    }

    #[tokio::test]
    async fn test_create_read_delete() {
        let (api, domains) = resource();
        let state = domains
            .create(json!({"domain_name": "example.com", "project_identifier": "project-9"}))
            .await
            .unwrap();
        assert_eq!(state["identifier"], "domain-1");
        assert_eq!(state["ns_validated"], 0);
        assert!(state["last_check"].is_null());

        let refreshed = domains.read(state.clone()).await.unwrap().unwrap();
        assert_eq!(refreshed, state);

        domains.delete(state.clone()).await.unwrap();
        assert!(api.domains.lock().unwrap().is_empty());
        assert!(domains.read(state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_import_state() {
        let (_, domains) = resource();
        assert_eq!(domains.import_state("domain-7").unwrap(), json!({"identifier": "domain-7"}));
        assert!(domains.import_state("").is_err());
    }
}
