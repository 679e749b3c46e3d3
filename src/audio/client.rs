//! Audio endpoint client.

use super::speech::CreateSpeechRequest;
use super::transcription::{AudioRequest, AudioResponse};
use crate::config::{self, ApiType, ClientConfig};
use crate::transport::{HttpTransport, RawResponse, RequestBody};
use crate::{Error, ErrorContext, Result};
use reqwest::Method;
use tracing::{debug, instrument, warn};

const SPEECH_PATH: &str = "/audio/speech";

/// Endpoints that take an audio upload and return a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEndpoint {
    Transcriptions,
    Translations,
}

impl AudioEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Transcriptions => "/audio/transcriptions",
            Self::Translations => "/audio/translations",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Transcriptions => "transcriptions",
            Self::Translations => "translations",
        }
    }
}

/// Client for speech synthesis, transcription and translation.
pub struct AudioClient {
    transport: HttpTransport,
}

impl AudioClient {
    pub fn builder() -> AudioClientBuilder {
        AudioClientBuilder::new()
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        if config.api_key.is_none() {
            warn!("no API key configured; requests are sent without credentials");
        }
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Synthesizes speech and returns the encoded audio as sent by the server.
    #[instrument(skip(self, request), fields(model = %request.model, voice = %request.voice))]
    pub async fn create_speech(&self, request: &CreateSpeechRequest) -> Result<RawResponse> {
        request.validate()?;
        let body = serde_json::to_vec(request).map_err(|e| {
            Error::encode_with_context(e.to_string(), ErrorContext::new().with_source("speech"))
        })?;
        let url = self.transport.full_url(SPEECH_PATH, request.model.as_str())?;
        let raw = self
            .transport
            .send(Method::POST, &url, RequestBody::Json(body))
            .await?;
        debug!(
            bytes = raw.len(),
            content_type = raw.content_type().unwrap_or("-"),
            "speech synthesized"
        );
        Ok(raw)
    }

    /// Transcribes audio in its source language.
    pub async fn create_transcription(&self, request: AudioRequest) -> Result<AudioResponse> {
        self.call_audio_api(request, AudioEndpoint::Transcriptions)
            .await
    }

    /// Translates audio into English text.
    pub async fn create_translation(&self, request: AudioRequest) -> Result<AudioResponse> {
        self.call_audio_api(request, AudioEndpoint::Translations)
            .await
    }

    #[instrument(skip(self, request, endpoint), fields(endpoint = endpoint.name(), model = %request.model))]
    async fn call_audio_api(
        &self,
        request: AudioRequest,
        endpoint: AudioEndpoint,
    ) -> Result<AudioResponse> {
        let form = request.to_form().await?;
        let url = self.transport.full_url(endpoint.path(), &request.model)?;
        let body = RequestBody::Multipart(form);

        let response = if request.has_json_response() {
            let (response, headers) = self
                .transport
                .send_json::<AudioResponse>(Method::POST, &url, body)
                .await?;
            response.with_headers(headers)
        } else {
            let (text, headers) = self.transport.send_text(Method::POST, &url, body).await?;
            AudioResponse::from_text(text, headers)
        };

        debug!(
            text_len = response.text.len(),
            segments = response.segments.len(),
            "transcript received"
        );
        Ok(response)
    }
}

pub struct AudioClientBuilder {
    config: ClientConfig,
}

impl AudioClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Starts from an existing configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_type(mut self, api_type: ApiType) -> Self {
        self.config.api_type = api_type;
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = Some(version.into());
        self
    }

    pub fn organization(mut self, org: impl Into<String>) -> Self {
        self.config.organization = Some(org.into());
        self
    }

    /// Azure only: route `model` to `deployment`.
    pub fn azure_deployment(mut self, model: impl Into<String>, deployment: impl Into<String>) -> Self {
        self.config
            .azure_model_mapping
            .insert(model.into(), deployment.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(url.into());
        self
    }

    /// Builds the client; a missing API key is looked up in the keyring, then `OPENAI_API_KEY`.
    pub fn build(mut self) -> Result<AudioClient> {
        if self.config.api_key.is_none() {
            self.config.api_key = config::resolve_api_key();
        }
        AudioClient::from_config(self.config)
    }
}

impl Default for AudioClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
