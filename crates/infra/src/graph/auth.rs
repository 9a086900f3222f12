//! Client-credentials token exchange.

use async_trait::async_trait;
use daybrief_common::resilience::policies::ClassifiedRetry;
use daybrief_common::resilience::{RetryConfig, RetryExecutor};
use daybrief_core::{AccessToken, TokenProvider};
use daybrief_domain::{Credentials, DigestConfig, DigestError, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::client::{endpoint_of, retry_config};
use super::errors::GraphError;
use super::response::read_response;
use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Obtains an application token with the OAuth2 client-credentials grant.
#[derive(Debug, Clone)]
pub struct ClientCredentialsAuthenticator {
    http: HttpClient,
    token_url: String,
    credentials: Credentials,
    scope: String,
    retry: RetryExecutor<ClassifiedRetry>,
}

impl ClientCredentialsAuthenticator {
    pub fn new(
        http: HttpClient,
        login_base_url: &str,
        credentials: Credentials,
        scope: impl Into<String>,
    ) -> Self {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            login_base_url.trim_end_matches('/'),
            credentials.tenant_id
        );
        Self {
            http,
            token_url,
            credentials,
            scope: scope.into(),
            retry: RetryExecutor::with_policy(ClassifiedRetry),
        }
    }

    pub fn from_config(config: &DigestConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.retry.request_timeout()).build()?;
        Ok(Self::new(
            http,
            &config.endpoints.login_base_url,
            config.credentials.clone(),
            config.endpoints.scope.clone(),
        )
        .with_retry(retry_config(&config.retry)?))
    }

    #[must_use]
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(config, ClassifiedRetry);
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    async fn request_token(&self, endpoint: &str) -> std::result::Result<AccessToken, GraphError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];
        let request = self.http.request(Method::POST, &self.token_url).form(&form);
        let response = self.http.send(request).await?;
        let body: TokenResponse = read_response(response, endpoint).await.into_body(endpoint)?;

        match body.access_token.filter(|token| !token.trim().is_empty()) {
            Some(token) => {
                if let Some(expires_in) = body.expires_in {
                    info!(expires_in, "access token acquired");
                }
                Ok(AccessToken::new(token))
            }
            None => Err(GraphError::parse(endpoint, "token response has no access_token")),
        }
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsAuthenticator {
    #[instrument(skip(self), fields(tenant_id = %self.credentials.tenant_id))]
    async fn acquire_token(&self) -> Result<AccessToken> {
        let endpoint = endpoint_of(&self.token_url);
        let endpoint = endpoint.as_str();

        self.retry.execute(move || self.request_token(endpoint)).await.map_err(|err| {
            let attempts = err.attempts();
            let detail = err.into_last().to_string();
            warn!(attempts, error = %detail, "token acquisition failed");
            DigestError::Authentication(format!(
                "token request failed after {attempts} attempt(s): {detail}"
            ))
        })
    }
}
