//! `vpsie_access_token`: API access tokens.
//!
//! The token value is write-only: the API never returns it, so it is kept
//! from prior state on every read.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{decode, encode, non_empty, orphaned, refreshed, require, Resource};
use crate::client::{AccessToken, AccessTokenApi, CreateAccessTokenRequest, UpdateAccessTokenRequest};
use crate::error::ProviderError;
use crate::import::single_key;
use crate::lookup::find_first;
use crate::schema::{Attribute, Schema};

pub const TYPE_NAME: &str = "vpsie_access_token";

pub fn schema() -> Schema {
    Schema::v0()
        .with_description("An API access token.")
        .with_attribute("name", Attribute::required_string().with_min_length(1))
        .with_attribute(
            "access_token",
            Attribute::required_string()
                .sensitive()
                .with_force_new()
                .with_description("Token value. Never returned by the API."),
        )
        .with_attribute("expiration_date", Attribute::required_string())
        .with_attribute(
            "access_token_identifier",
            Attribute::computed_string().with_use_state_for_unknown(),
        )
        .with_attribute("created_on", Attribute::computed_string().with_use_state_for_unknown())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessTokenModel {
    pub name: String,
    pub access_token: Option<String>,
    pub expiration_date: String,
    pub access_token_identifier: Option<String>,
    pub created_on: Option<String>,
}

impl AccessTokenModel {
    fn refresh(&mut self, token: AccessToken) {
        self.name = token.name;
        if !token.expiration_date.is_empty() {
            self.expiration_date = token.expiration_date;
        }
        self.access_token_identifier = Some(token.access_token_identifier);
        self.created_on = non_empty(token.created_on);
    }
}

pub struct AccessTokenResource<A> {
    api: Arc<A>,
}

impl<A: AccessTokenApi> AccessTokenResource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: AccessTokenApi + 'static> Resource for AccessTokenResource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, planned: Value) -> Result<Value, ProviderError> {
        let mut model: AccessTokenModel = decode(planned)?;
        let req = CreateAccessTokenRequest {
            name: model.name.clone(),
            access_token: model.access_token.clone().unwrap_or_default(),
            expiration_date: model.expiration_date.clone(),
        };

        debug!(name = %req.name, "Creating access token");
        self.api
            .create_access_token(&req)
            .await
            .map_err(|e| ProviderError::api("Error creating access token", e))?;

        let token = find_first(
            self.api.list_access_tokens().await,
            "access token",
            "name",
            &model.name,
            |t| t.name == model.name,
        )
        .map_err(|e| orphaned(TYPE_NAME, &model.name, e))?;

        info!(identifier = %token.access_token_identifier, "Created access token");
        model.refresh(token);
        encode(&model)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let mut model: AccessTokenModel = decode(state)?;
        let identifier = require(&model.access_token_identifier, TYPE_NAME, "access_token_identifier")?
            .to_string();

        let listing = self.api.list_access_tokens().await;
        let found = find_first(listing, "access token", "identifier", &identifier, |t| {
            t.access_token_identifier == identifier
        });
        let Some(token) = refreshed(found, "Error reading access token")? else {
            return Ok(None);
        };
        model.refresh(token);
        Ok(Some(encode(&model)?))
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        let prior: AccessTokenModel = decode(prior)?;
        let planned: AccessTokenModel = decode(planned)?;
        let identifier = require(&prior.access_token_identifier, TYPE_NAME, "access_token_identifier")?;
        let mut state = prior.clone();

        if planned.name != prior.name || planned.expiration_date != prior.expiration_date {
            let req = UpdateAccessTokenRequest {
                name: planned.name.clone(),
                expiration_date: planned.expiration_date.clone(),
            };
            self.api
                .update_access_token(identifier, &req)
                .await
                .map_err(|e| ProviderError::api("Error updating access token", e))?;
            state.name = planned.name;
            state.expiration_date = planned.expiration_date;
        }

        encode(&state)
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let model: AccessTokenModel = decode(state)?;
        let identifier = require(&model.access_token_identifier, TYPE_NAME, "access_token_identifier")?;
        self.api
            .delete_access_token(identifier)
            .await
            .map_err(|e| ProviderError::api("Error deleting access token", e))
    }

    fn import_state(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(json!({ "access_token_identifier": single_key(id, "<access_token_identifier>")? }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;
    use crate::client::ClientError;

    fn planned() -> Value {
        json!({
            "name": "ci",
            "access_token": "tok-secret",
            "expiration_date": "2030-01-01",
            "access_token_identifier": null,
            "created_on": null
        })
    }

    fn resource() -> (Arc<MockApi>, AccessTokenResource<MockApi>) {
        let api = Arc::new(MockApi::new());
        (api.clone(), AccessTokenResource::new(api))
    }

    #[tokio::test]
    async fn test_create_and_read_keep_secret() {
        let (_, tokens) = resource();
        let state = tokens.create(planned()).await.unwrap();
        assert_eq!(state["access_token_identifier"], "token-1");
        assert_eq!(state["access_token"], "tok-secret");

        let refreshed = tokens.read(state).await.unwrap().unwrap();
        assert_eq!(refreshed["access_token"], "tok-secret");
        assert_eq!(refreshed["expiration_date"], "2030-01-01");
    }

    #[tokio::test]
    async fn test_read_listing_error_propagated() {
        let (api, tokens) = resource();
        let state = tokens.create(planned()).await.unwrap();
        api.fail(
            "list_access_tokens",
            ClientError::Api {
                status: 500,
                message: "api error".to_string(),
            },
        );

        let err = tokens.read(state).await.unwrap_err();
        assert!(err.to_diagnostic().detail.unwrap().contains("api error"));
    }

    #[tokio::test]
    async fn test_read_missing_is_removed() {
        let (api, tokens) = resource();
        let state = tokens.create(planned()).await.unwrap();
        api.access_tokens.lock().unwrap().clear();
        assert!(tokens.read(state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_name_and_expiration_in_one_call() {
        let (api, tokens) = resource();
        let prior = tokens.create(planned()).await.unwrap();
        let mut next = prior.clone();
        next["name"] = json!("ci-renamed");
        next["expiration_date"] = json!("2031-01-01");

        let state = tokens.update(prior, next).await.unwrap();
        assert_eq!(state["name"], "ci-renamed");
        assert_eq!(state["expiration_date"], "2031-01-01");
        let updates = api.calls().iter().filter(|c| *c == "update_access_token").count();
        assert_eq!(updates, 1);
    }

    #[tokio::test]
    async fn test_orphaned_create() {
        let (api, tokens) = resource();
        api.hide_created.store(true, std::sync::atomic::Ordering::SeqCst);
        let err = tokens.create(planned()).await.unwrap_err();
        assert!(err
            .to_diagnostic()
            .detail
            .unwrap()
            .starts_with("access token with name ci not found"));
    }
}
