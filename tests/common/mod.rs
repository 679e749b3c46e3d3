//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use ai_audio_rust::audio::AudioClient;
use ai_audio_rust::ClientConfig;
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const API_KEY: &str = "sk-test";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}/v1", server.url());
        Self { server, base_url }
    }

    /// Client pointed at the mock server, OpenAI-style routing.
    pub fn client(&self) -> AudioClient {
        AudioClient::builder()
            .api_key(API_KEY)
            .base_url(&self.base_url)
            .timeout_secs(5)
            .build()
            .expect("Failed to build client")
    }

    /// Client pointed at the mock server, Azure-style routing.
    pub fn azure_client(&self) -> AudioClient {
        let mut config = ClientConfig::azure(API_KEY, self.server.url());
        config.timeout_secs = 5;
        AudioClient::from_config(config).expect("Failed to build client")
    }

    /// Mock for a successful binary audio response
    pub async fn mock_audio(&mut self, path: &str, body_matchers: Vec<Matcher>, audio: &[u8]) -> Mock {
        self.server
            .mock("POST", path)
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .match_header("content-type", "application/json")
            .match_body(Matcher::AllOf(body_matchers))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_header("x-ratelimit-remaining-requests", "99")
            .with_body(audio)
            .create_async()
            .await
    }

    /// Mock for a multipart upload answered with `content_type`
    pub async fn mock_upload(
        &mut self,
        path: &str,
        body_matchers: Vec<Matcher>,
        content_type: &str,
        body: &str,
    ) -> Mock {
        self.server
            .mock("POST", path)
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(body_matchers))
            .with_status(200)
            .with_header("content-type", content_type)
            .with_header("x-request-id", "req_mock_1")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock for an error response
    pub async fn mock_error_response(&mut self, path: &str, status: usize, error_body: &str) -> Mock {
        self.server
            .mock("POST", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(error_body)
            .create_async()
            .await
    }
}

/// Matches a text field of a multipart body.
pub fn form_field(name: &str, value: &str) -> Matcher {
    Matcher::Regex(format!(
        "name=\"{}\"\r\n\r\n{}\r\n",
        regex::escape(name),
        regex::escape(value)
    ))
}
