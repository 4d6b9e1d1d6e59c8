//! `vpsie_access_tokens`: every access token on the account.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{list_schema, list_state, DataSource};
use crate::client::{AccessToken, AccessTokenApi};
use crate::error::ProviderError;
use crate::schema::{AttributeType, Schema};

pub const TYPE_NAME: &str = "vpsie_access_tokens";
const ID: &str = "access_tokens";

pub fn schema() -> Schema {
    list_schema(
        "All access tokens. Token values are not included.",
        ID,
        &[
            ("access_token_identifier", AttributeType::String),
            ("name", AttributeType::String),
            ("expiration_date", AttributeType::String),
            ("created_on", AttributeType::String),
        ],
    )
}

#[derive(Debug, Serialize)]
struct AccessTokenItem {
    access_token_identifier: String,
    name: String,
    expiration_date: String,
    created_on: String,
}

impl From<AccessToken> for AccessTokenItem {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token_identifier: token.access_token_identifier,
            name: token.name,
            expiration_date: token.expiration_date,
            created_on: token.created_on,
        }
    }
}

pub struct AccessTokensDataSource<A> {
    api: Arc<A>,
}

impl<A: AccessTokenApi> AccessTokensDataSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl<A: AccessTokenApi + 'static> DataSource for AccessTokensDataSource<A> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let tokens = self
            .api
            .list_access_tokens()
            .await
            .map_err(|e| ProviderError::api("Error listing access tokens", e))?;
        debug!(count = tokens.len(), "Listed access tokens");
        list_state(ID, tokens.into_iter().map(AccessTokenItem::from).collect())
    }
}
