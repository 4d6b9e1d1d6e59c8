use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{segment, Client, ClientError};

/// An API access token as returned by the listing endpoint.
///
/// The token value itself is only ever sent, never returned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token_identifier: String,
    pub name: String,
    #[serde(default)]
    pub expiration_date: String,
    #[serde(default)]
    pub created_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessTokenRequest {
    pub name: String,
    pub access_token: String,
    pub expiration_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccessTokenRequest {
    pub name: String,
    pub expiration_date: String,
}

/// Access token endpoints.
#[async_trait]
pub trait AccessTokenApi: Send + Sync {
    async fn list_access_tokens(&self) -> Result<Vec<AccessToken>, ClientError>;

    async fn create_access_token(&self, req: &CreateAccessTokenRequest) -> Result<(), ClientError>;

    async fn update_access_token(
        &self,
        identifier: &str,
        req: &UpdateAccessTokenRequest,
    ) -> Result<(), ClientError>;

    async fn delete_access_token(&self, identifier: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl AccessTokenApi for Client {
    async fn list_access_tokens(&self) -> Result<Vec<AccessToken>, ClientError> {
        self.list("/accessTokens").await
    }

    async fn create_access_token(&self, req: &CreateAccessTokenRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/accessTokens", Some(req)).await
    }

    async fn update_access_token(
        &self,
        identifier: &str,
        req: &UpdateAccessTokenRequest,
    ) -> Result<(), ClientError> {
        let path = format!("/accessTokens/{}", segment(identifier));
        self.execute(Method::PUT, &path, Some(req)).await
    }

    async fn delete_access_token(&self, identifier: &str) -> Result<(), ClientError> {
        let path = format!("/accessTokens/{}", segment(identifier));
        self.execute::<()>(Method::DELETE, &path, None).await
    }
}
