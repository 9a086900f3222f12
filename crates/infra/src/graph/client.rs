use daybrief_common::resilience::policies::ClassifiedRetry;
use daybrief_common::resilience::{RetryConfig, RetryError, RetryExecutor, RetryResult};
use daybrief_core::AccessToken;
use daybrief_domain::{DigestConfig, DigestError, RetrySettings};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use super::errors::GraphError;
use super::response::{read_response, ApiResponse};
use crate::http::HttpClient;

const USER_AGENT: &str = concat!("daybrief/", env!("CARGO_PKG_VERSION"));

/// Build the call guard described by the retry settings.
pub fn retry_config(settings: &RetrySettings) -> Result<RetryConfig, DigestError> {
    RetryConfig::builder()
        .max_attempts(settings.max_attempts)
        .exponential_backoff(settings.multiplier(), settings.min_wait(), settings.max_wait())
        .build()
        .map_err(|err| DigestError::Config(err.to_string()))
}

/// Authenticated Graph API client.
///
/// Every request goes through the call guard: transient failures (network,
/// timeout, 429, 5xx) are retried with backoff, anything else fails on the
/// first attempt.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: HttpClient,
    base_url: String,
    retry: RetryExecutor<ClassifiedRetry>,
}

impl GraphClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryExecutor::with_policy(ClassifiedRetry),
        }
    }

    pub fn from_config(config: &DigestConfig) -> Result<Self, DigestError> {
        let http = HttpClient::builder()
            .timeout(config.retry.request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::new(http, config.endpoints.graph_base_url.clone())
            .with_retry(retry_config(&config.retry)?))
    }

    /// Replace the call guard configuration.
    #[must_use]
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(config, ClassifiedRetry);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`. Absolute inputs (paging links) pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// GET a JSON document. The error is the last attempt's.
    pub async fn get<T>(&self, token: &AccessToken, path: &str) -> Result<T, GraphError>
    where
        T: DeserializeOwned,
    {
        self.get_with_prefer(token, path, None).await
    }

    /// GET a JSON document with an optional `Prefer` header.
    pub async fn get_with_prefer<T>(
        &self,
        token: &AccessToken,
        path: &str,
        prefer: Option<&str>,
    ) -> Result<T, GraphError>
    where
        T: DeserializeOwned,
    {
        let configure = move |builder: RequestBuilder| match prefer {
            Some(value) => builder.header("Prefer", value),
            None => builder,
        };
        self.execute(Method::GET, token, path, &configure, ApiResponse::into_body)
            .await
            .map_err(last_error)
    }

    /// POST a JSON body.
    pub async fn post_json<B, T>(
        &self,
        token: &AccessToken,
        path: &str,
        body: &B,
    ) -> ApiResponse<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let configure = move |builder: RequestBuilder| builder.json(body);
        self.execute(Method::POST, token, path, &configure, |response, _| response.into_result())
            .await
            .map_err(last_error)
            .into()
    }

    /// PUT raw bytes with the given content type.
    pub async fn put_bytes<T>(
        &self,
        token: &AccessToken,
        path: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        let configure = move |builder: RequestBuilder| {
            builder.header(CONTENT_TYPE, content_type).body(bytes.to_vec())
        };
        self.execute(Method::PUT, token, path, &configure, |response, _| response.into_result())
            .await
            .map_err(last_error)
            .into()
    }

    #[instrument(skip_all, fields(method = %method, endpoint = %endpoint_of(path)))]
    async fn execute<T, R>(
        &self,
        method: Method,
        token: &AccessToken,
        path: &str,
        configure: &(dyn Fn(RequestBuilder) -> RequestBuilder + Sync),
        finish: fn(ApiResponse<T>, &str) -> Result<R, GraphError>,
    ) -> RetryResult<R, GraphError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let endpoint = endpoint_of(path);
        let (url, endpoint, method) = (&url, &endpoint, &method);

        self.retry
            .execute(move || async move {
                let builder =
                    configure(self.http.request(method.clone(), url).bearer_auth(token.secret()));
                let response = self.http.send(builder).await?;
                finish(read_response::<T>(response, endpoint).await, endpoint)
            })
            .await
    }
}

fn last_error(err: RetryError<GraphError>) -> GraphError {
    err.into_last()
}

/// Path portion of a request target, without host or query string.
pub(crate) fn endpoint_of(path: &str) -> String {
    let without_scheme = path
        .strip_prefix("https://")
        .or_else(|| path.strip_prefix("http://"))
        .map_or(path, |rest| rest.find('/').map_or("/", |slash| &rest[slash..]));
    without_scheme.split('?').next().unwrap_or(without_scheme).to_string()
}

/// Fast guard for tests: same attempt count, millisecond waits.
#[cfg(test)]
pub(crate) fn quick_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig::builder()
        .max_attempts(max_attempts)
        .fixed_backoff(std::time::Duration::from_millis(5))
        .build()
        .expect("valid retry config")
}
