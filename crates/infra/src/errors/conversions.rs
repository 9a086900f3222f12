//! Conversions from external infrastructure errors into Graph and domain
//! errors.

use daybrief_domain::DigestError;
use reqwest::Error as HttpError;

use crate::graph::errors::{GraphError, GraphErrorCategory};

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GraphError */
/* -------------------------------------------------------------------------- */

impl GraphError {
    /// Classify a transport-level failure for `endpoint`.
    pub fn from_http(err: &HttpError, endpoint: &str) -> Self {
        if err.is_timeout() {
            return Self::Timeout { endpoint: endpoint.to_string() };
        }

        if err.is_builder() {
            return Self::Config(format!("invalid request for {endpoint}: {err}"));
        }

        if let Some(status) = err.status() {
            return Self::status(
                endpoint,
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status"),
                None,
            );
        }

        if err.is_decode() {
            return Self::parse(endpoint, err.to_string());
        }

        let message = if err.is_connect() {
            format!("connection failure: {err}")
        } else {
            err.to_string()
        };
        Self::Network { endpoint: endpoint.to_string(), message }
    }
}

/* -------------------------------------------------------------------------- */
/* GraphError → DigestError */
/* -------------------------------------------------------------------------- */

impl From<GraphError> for DigestError {
    fn from(err: GraphError) -> Self {
        let message = err.to_string();
        match err.category() {
            GraphErrorCategory::RateLimit
            | GraphErrorCategory::Server
            | GraphErrorCategory::Network
            | GraphErrorCategory::Timeout => Self::TransientNetwork(message),
            GraphErrorCategory::Authentication => Self::Authentication(message),
            GraphErrorCategory::Client | GraphErrorCategory::Parse => {
                Self::PermanentRequest(message)
            }
            GraphErrorCategory::Config => Self::Config(message),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error =
            client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped = GraphError::from_http(&error, "/me");
        assert_eq!(mapped.http_status(), Some(401));
        assert!(matches!(DigestError::from(mapped), DigestError::Authentication(msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn timeout_maps_to_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client =
            Client::builder().no_proxy().timeout(Duration::from_millis(50)).build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap_err();

        let mapped = GraphError::from_http(&error, "/users");
        assert_eq!(mapped, GraphError::Timeout { endpoint: "/users".into() });
        assert!(DigestError::from(mapped).is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        let err = GraphError::status("/users/x/sendMail", 400, "ErrorInvalidRecipients", None);
        assert!(matches!(DigestError::from(err), DigestError::PermanentRequest(_)));

        let err = GraphError::parse("/chats", "response has no id");
        assert!(matches!(DigestError::from(err), DigestError::PermanentRequest(_)));
    }
}
