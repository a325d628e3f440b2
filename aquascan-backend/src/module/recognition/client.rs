//! Recognition client - uploads an image and returns ranked species guesses
//!
//! Single attempt per call; retrying is left to the caller.

use super::types::{RecognitionError, RecognitionResponse};
use crate::config::RecognitionConfig;
use aquascan_common::SpeciesGuess;
use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Duration;

const USER_AGENT: &str = concat!("aquascan-backend/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait RecognitionClient: Send + Sync {
    /// Identify the fish in `image`. Guesses may come in any order.
    async fn identify(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<Vec<SpeciesGuess>, RecognitionError>;
}

/// HTTP implementation against the configured recognition endpoint
pub struct HttpRecognitionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpRecognitionClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// `None` when no endpoint is configured
    pub fn from_config(config: &RecognitionConfig) -> Result<Option<Self>, RecognitionError> {
        let Some(endpoint) = config.endpoint.as_deref().filter(|e| !e.trim().is_empty()) else {
            return Ok(None);
        };

        let client = Self::new(
            endpoint,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Some(client))
    }
}

#[async_trait]
impl RecognitionClient for HttpRecognitionClient {
    async fn identify(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<Vec<SpeciesGuess>, RecognitionError> {
        if image.is_empty() {
            return Err(RecognitionError::EmptyImage);
        }

        tracing::debug!("Uploading {} byte image to {}", image.len(), self.endpoint);

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, content_type)
            .body(image.to_vec());
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(RecognitionError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).chars().take(200).collect(),
            });
        }

        let parsed: RecognitionResponse = serde_json::from_slice(&body)?;
        let guesses = parsed.into_ranked();

        tracing::debug!("Recognition returned {} guess(es)", guesses.len());
        Ok(guesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, api_key: Option<&str>) -> HttpRecognitionClient {
        HttpRecognitionClient::new(
            format!("{}/v1/identify", server.uri()),
            api_key.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_identify_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/identify"))
            .and(header_matcher("Authorization", "Bearer test-key"))
            .and(header_matcher("Content-Type", "image/jpeg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"scientific_name": "Salmo trutta", "common_name": "Brown Trout", "accuracy": 0.12},
                    {"scientific_name": "Sander vitreus", "common_name": "Walleye", "accuracy": 0.93}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let guesses = client(&server, Some("test-key"))
            .identify(b"\xff\xd8\xff", "image/jpeg")
            .await
            .unwrap();

        assert_eq!(guesses.len(), 2);
        assert_eq!(guesses[0].scientific_name, "Sander vitreus");
        assert_eq!(guesses[0].common_name.as_deref(), Some("Walleye"));
    }

    #[tokio::test]
    async fn test_identify_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/identify"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let result = client(&server, None).identify(b"img", "image/png").await;
        match result {
            Err(RecognitionError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identify_bad_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = client(&server, None).identify(b"img", "image/png").await;
        assert!(matches!(result, Err(RecognitionError::Decode(_))));
    }

    #[tokio::test]
    async fn test_empty_image_not_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = client(&server, None).identify(&[], "image/png").await;
        assert!(matches!(result, Err(RecognitionError::EmptyImage)));
    }

    #[test]
    fn test_from_config_without_endpoint() {
        let config = RecognitionConfig::default();
        assert!(HttpRecognitionClient::from_config(&config).unwrap().is_none());
    }
}
