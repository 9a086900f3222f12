//! Response interpretation shared by every Graph call.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::errors::GraphError;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Outcome of one Graph call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse<T> {
    /// 2xx with a JSON body.
    Success(T),
    /// 2xx with no body (for example `202 Accepted` from `sendMail`).
    EmptySuccess { status: u16 },
    /// Non-2xx, transport failure, or a body that does not parse.
    Failure(GraphError),
}

impl<T> ApiResponse<T> {
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }

    /// The body, or a parse error naming `endpoint` when there was none.
    pub fn into_body(self, endpoint: &str) -> Result<T, GraphError> {
        match self {
            Self::Success(body) => Ok(body),
            Self::EmptySuccess { status } => {
                Err(GraphError::parse(endpoint, format!("HTTP {status} without a body")))
            }
            Self::Failure(err) => Err(err),
        }
    }

    /// Split off the failure case.
    pub fn into_result(self) -> Result<Self, GraphError> {
        match self {
            Self::Failure(err) => Err(err),
            other => Ok(other),
        }
    }
}

impl<T> From<Result<ApiResponse<T>, GraphError>> for ApiResponse<T> {
    fn from(result: Result<ApiResponse<T>, GraphError>) -> Self {
        result.unwrap_or_else(Self::Failure)
    }
}

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Classify a response: non-2xx becomes a [`GraphError::Status`] failure, a
/// blank 2xx body is [`ApiResponse::EmptySuccess`], anything else must parse
/// as `T`.
pub async fn read_response<T>(response: Response, endpoint: &str) -> ApiResponse<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let retry_after = parse_retry_after(&response);
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => return ApiResponse::Failure(GraphError::from_http(&err, endpoint)),
    };

    if !status.is_success() {
        return ApiResponse::Failure(GraphError::status(
            endpoint,
            status.as_u16(),
            error_message(&text),
            retry_after,
        ));
    }

    if text.trim().is_empty() {
        return ApiResponse::EmptySuccess { status: status.as_u16() };
    }

    match serde_json::from_str(&text) {
        Ok(body) => ApiResponse::Success(body),
        Err(err) => ApiResponse::Failure(GraphError::parse(endpoint, err.to_string())),
    }
}

fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<GraphErrorEnvelope>(body) {
        let GraphErrorBody { code, message } = envelope.error;
        match (code, message) {
            (Some(code), Some(message)) => return format!("{code}: {message}"),
            (Some(text), None) | (None, Some(text)) => return text,
            (None, None) => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
