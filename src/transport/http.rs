use super::{FormBuilder, ResponseHeaders, TransportError};
use crate::config::{ApiType, ClientConfig};
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Method, Proxy};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

static DEPLOYMENT_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.:]").expect("static regex"));

/// Body of an outgoing request.
#[derive(Debug)]
pub enum RequestBody {
    /// Pre-encoded JSON document.
    Json(Vec<u8>),
    Multipart(FormBuilder),
}

/// Undecoded response body with its headers.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: Bytes,
    pub headers: ResponseHeaders,
}

impl RawResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.content_type()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_source("transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for an endpoint suffix such as `/audio/speech`.
    ///
    /// Azure resources route through the model's deployment and carry the API
    /// version as a query parameter.
    pub fn full_url(&self, suffix: &str, model: &str) -> Result<String> {
        let base = self.config.base_url.trim_end_matches('/');
        let raw = if self.config.api_type.is_azure() {
            format!(
                "{}/openai/deployments/{}{}",
                base,
                self.deployment_name(model),
                suffix
            )
        } else {
            format!("{}{}", base, suffix)
        };

        let mut url = url::Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid request URL: {}", e),
                ErrorContext::new().with_details(raw.clone()),
            )
        })?;
        if self.config.api_type.is_azure() {
            if let Some(version) = self.config.api_version() {
                url.query_pairs_mut().append_pair("api-version", version);
            }
        }
        Ok(url.into())
    }

    fn deployment_name(&self, model: &str) -> String {
        match self.config.azure_model_mapping.get(model) {
            Some(deployment) => deployment.clone(),
            None => DEPLOYMENT_STRIP.replace_all(model, "").into_owned(),
        }
    }

    /// Sends the request and returns the raw body of a 2xx response.
    ///
    /// Non-2xx responses become [`Error::Api`] or [`Error::Request`].
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn send(&self, method: Method, url: &str, body: RequestBody) -> Result<RawResponse> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());
        let mut req = self
            .client
            .request(method, url)
            .header("x-request-id", &request_id);

        if let Some(key) = self.config.api_key.as_deref() {
            req = match self.config.api_type {
                ApiType::Azure => req.header("api-key", key),
                ApiType::OpenAi | ApiType::AzureAd => req.bearer_auth(key),
            };
        }
        if let Some(org) = &self.config.organization {
            req = req.header("OpenAI-Organization", org);
        }

        req = match body {
            RequestBody::Json(bytes) => req.header("Content-Type", "application/json").body(bytes),
            RequestBody::Multipart(form) => req.multipart(form.into_form()?),
        };

        debug!("sending request");
        let response = req
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        let headers = ResponseHeaders::new(response.headers().clone());
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        if !status.is_success() {
            let err = Error::from_response(status.as_u16(), &body);
            warn!(
                status = status.as_u16(),
                error = %err,
                "request failed"
            );
            return Err(err);
        }

        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            "response received"
        );
        Ok(RawResponse { body, headers })
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: RequestBody,
    ) -> Result<(T, ResponseHeaders)> {
        let raw = self.send(method, url, body).await?;
        let value = serde_json::from_slice(&raw.body)?;
        Ok((value, raw.headers))
    }

    /// Sends the request and reads the whole body as text.
    pub async fn send_text(
        &self,
        method: Method,
        url: &str,
        body: RequestBody,
    ) -> Result<(String, ResponseHeaders)> {
        let raw = self.send(method, url, body).await?;
        let text = String::from_utf8(raw.body.to_vec()).map_err(|e| {
            Error::validation_with_context(
                format!("Response body is not UTF-8: {}", e),
                ErrorContext::new().with_source("transport"),
            )
        })?;
        Ok((text, raw.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::span;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    fn transport(config: ClientConfig) -> HttpTransport {
        HttpTransport::new(config).unwrap()
    }

    #[test]
    fn test_openai_url() {
        let t = transport(ClientConfig::new("k"));
        assert_eq!(
            t.full_url("/audio/speech", "tts-1").unwrap(),
            "https://api.openai.com/v1/audio/speech"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let mut config = ClientConfig::new("k");
        config.base_url = "http://localhost:8080/v1/".into();
        let t = transport(config);
        assert_eq!(
            t.full_url("/audio/transcriptions", "whisper-1").unwrap(),
            "http://localhost:8080/v1/audio/transcriptions"
        );
    }

    #[test]
    fn test_azure_url_strips_model_punctuation() {
        let t = transport(ClientConfig::azure("k", "https://res.openai.azure.com/"));
        assert_eq!(
            t.full_url("/audio/speech", "tts-1.5:hd").unwrap(),
            "https://res.openai.azure.com/openai/deployments/tts-15hd/audio/speech?api-version=2023-05-15"
        );
    }

    #[test]
    fn test_azure_url_uses_mapping() {
        let mut config = ClientConfig::azure("k", "https://res.openai.azure.com");
        config
            .azure_model_mapping
            .insert("whisper-1".into(), "speech-prod".into());
        let t = transport(config);
        let url = t.full_url("/audio/translations", "whisper-1").unwrap();
        assert!(url.starts_with(
            "https://res.openai.azure.com/openai/deployments/speech-prod/audio/translations"
        ));
    }

    #[derive(Clone, Default)]
    struct RecordedIds(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> Layer<S> for RecordedIds {
        fn on_record(&self, _id: &span::Id, values: &span::Record<'_>, _ctx: Context<'_, S>) {
            struct Visitor<'a>(&'a Mutex<Vec<String>>);
            impl Visit for Visitor<'_> {
                fn record_str(&mut self, field: &Field, value: &str) {
                    if field.name() == "request_id" {
                        self.0.lock().unwrap().push(value.to_string());
                    }
                }
                fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
            }
            values.record(&mut Visitor(&self.0));
        }
    }

    #[tokio::test]
    async fn test_request_id_is_recorded_on_span() {
        let recorded = RecordedIds::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(recorded.clone()));

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/audio/speech")
            .match_header("x-request-id", Matcher::Any)
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let mut config = ClientConfig::new("k");
        config.base_url = format!("{}/v1", server.url());
        let t = transport(config);
        let url = t.full_url("/audio/speech", "tts-1").unwrap();
        t.send(Method::POST, &url, RequestBody::Json(b"{}".to_vec()))
            .await
            .unwrap();

        mock.assert_async().await;
        let ids = recorded.0.lock().unwrap().clone();
        assert_eq!(ids.len(), 1);
        assert!(Uuid::parse_str(&ids[0]).is_ok());
    }
}
