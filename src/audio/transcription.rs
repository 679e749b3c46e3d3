//! Transcription and translation request/response shapes.

use crate::transport::{FormBuilder, ResponseHeaders};
use crate::{Error, ErrorContext, Result};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Whisper model name.
pub const WHISPER_1: &str = "whisper-1";

/// Response format; the server uses `json` when none is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioResponseFormat {
    Json,
    Text,
    Srt,
    VerboseJson,
    Vtt,
}

impl AudioResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Srt => "srt",
            Self::VerboseJson => "verbose_json",
            Self::Vtt => "vtt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "srt" => Some(Self::Srt),
            "verbose_json" => Some(Self::VerboseJson),
            "vtt" => Some(Self::Vtt),
            _ => None,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::VerboseJson)
    }
}

/// Timing detail requested with `verbose_json` transcriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionTimestampGranularity {
    Word,
    Segment,
}

impl TranscriptionTimestampGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Segment => "segment",
        }
    }
}

/// Where the audio comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    /// A local file, read when the request is sent.
    Path(PathBuf),
    /// In-memory audio; `file_name` is what the server sees (its extension matters).
    Bytes { data: Vec<u8>, file_name: String },
    /// Base64 audio sent as the `audio_base64` field instead of a file part.
    Base64(String),
}

impl AudioSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn bytes(data: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self::Bytes {
            data: data.into(),
            file_name: file_name.into(),
        }
    }

    pub fn base64_from_bytes(data: &[u8]) -> Self {
        Self::Base64(base64::engine::general_purpose::STANDARD.encode(data))
    }
}

/// Request for `/audio/transcriptions` and `/audio/translations`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRequest {
    pub model: String,
    pub source: AudioSource,
    pub prompt: Option<String>,
    /// Sampling temperature; zero means "server default" and is not sent.
    pub temperature: Option<f32>,
    /// Input language (ISO-639-1). Transcription only.
    pub language: Option<String>,
    pub format: Option<AudioResponseFormat>,
    /// Transcription only; requires `verbose_json`.
    pub timestamp_granularities: Vec<TranscriptionTimestampGranularity>,
}

impl AudioRequest {
    pub fn new(model: impl Into<String>, source: AudioSource) -> Self {
        Self {
            model: model.into(),
            source,
            prompt: None,
            temperature: None,
            language: None,
            format: None,
            timestamp_granularities: Vec::new(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_format(mut self, format: AudioResponseFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_timestamp_granularity(mut self, g: TranscriptionTimestampGranularity) -> Self {
        self.timestamp_granularities.push(g);
        self
    }

    /// Whether the reply is a JSON document (the default) rather than bare text.
    pub fn has_json_response(&self) -> bool {
        self.format.map_or(true, |f| f.is_json())
    }

    /// Builds the multipart form, reading the audio file if the source is a path.
    pub async fn to_form(&self) -> Result<FormBuilder> {
        let mut b = FormBuilder::new();

        match &self.source {
            AudioSource::Path(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    Error::io_with_context(
                        e,
                        ErrorContext::new()
                            .with_field_path("file")
                            .with_details(format!("opening audio file {}", path.display())),
                    )
                })?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "audio".to_string());
                b.create_form_file("file", data, file_name);
            }
            AudioSource::Bytes { data, file_name } => {
                b.create_form_file("file", data.clone(), file_name.clone());
            }
            AudioSource::Base64(encoded) => {
                b.write_field("audio_base64", encoded.clone());
            }
        }

        b.write_field("model", self.model.clone());

        if let Some(prompt) = self.prompt.as_deref().filter(|p| !p.is_empty()) {
            b.write_field("prompt", prompt);
        }
        if let Some(format) = self.format {
            b.write_field("response_format", format.as_str());
        }
        if let Some(t) = self.temperature.filter(|t| *t != 0.0) {
            b.write_field("temperature", format!("{:.2}", t));
        }
        if let Some(language) = self.language.as_deref().filter(|l| !l.is_empty()) {
            b.write_field("language", language);
        }
        for g in &self.timestamp_granularities {
            b.write_field("timestamp_granularities[]", g.as_str());
        }

        Ok(b)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Transcript returned by the transcription and translation endpoints.
///
/// Plain-text formats (`text`, `srt`, `vtt`) only fill `text`; the structured
/// fields stay empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub task: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub segments: Vec<AudioSegment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub words: Vec<AudioWord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_info: Option<TranscriptionAudioInfo>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<AudioResponseUsage>,

    #[serde(skip)]
    pub headers: ResponseHeaders,
}

impl AudioResponse {
    /// Wraps a plain-text reply.
    pub fn from_text(text: impl Into<String>, headers: ResponseHeaders) -> Self {
        Self {
            text: text.into(),
            headers,
            ..Self::default()
        }
    }

    pub(crate) fn with_headers(mut self, headers: ResponseHeaders) -> Self {
        self.headers = headers;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSegment {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub seek: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub start: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub end: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub temperature: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_logprob: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub compression_ratio: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub no_speech_prob: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub transient: bool,

    /// Speaker label (diarization extension).
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub speaker: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub sentiment: String,
    /// Translated text of the segment.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub translation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioWord {
    #[serde(deserialize_with = "null_as_default")]
    pub word: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub end: f64,
}

/// Source audio metadata reported by some servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionAudioInfo {
    /// Milliseconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioResponseUsage {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub usage_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seconds: i64,
}
