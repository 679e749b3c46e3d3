//! Speech synthesis request shapes.

use super::FloatFrac;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

open_string_enum! {
    /// Synthesis model.
    SpeechModel {
        Tts1 => "tts-1",
        Tts1Hd => "tts-1-hd",
        CanaryTts => "canary-tts",
    }
}

open_string_enum! {
    /// Built-in voice.
    SpeechVoice {
        Alloy => "alloy",
        Echo => "echo",
        Fable => "fable",
        Onyx => "onyx",
        Nova => "nova",
        Shimmer => "shimmer",
    }
}

open_string_enum! {
    /// Encoding of the returned audio. The server defaults to mp3.
    SpeechResponseFormat {
        Mp3 => "mp3",
        Opus => "opus",
        Aac => "aac",
        Flac => "flac",
        Wav => "wav",
        Pcm => "pcm",
    }
}

impl SpeechResponseFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
            Self::Pcm => "audio/pcm",
            Self::Other(_) => "application/octet-stream",
        }
    }

    pub fn extension(&self) -> &str {
        self.as_str()
    }
}

/// Body of `POST /audio/speech`.
///
/// `pitch`, `volume`, `language`, `refer_wav_path_*` and `prompt` are vendor
/// extensions for reference-audio voice cloning; OpenAI ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSpeechRequest {
    pub model: SpeechModel,
    pub input: String,
    pub voice: SpeechVoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<SpeechResponseFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<FloatFrac>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<FloatFrac>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<FloatFrac>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Reference audio the voice is cloned from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refer_wav_path_gpt: Option<String>,
    /// Reference audio paths blended into the voice, with their weights.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub refer_wav_path_sovits: BTreeMap<String, FloatFrac>,
    /// Transcript of the reference audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl CreateSpeechRequest {
    pub fn new(
        model: impl Into<SpeechModel>,
        input: impl Into<String>,
        voice: impl Into<SpeechVoice>,
    ) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            voice: voice.into(),
            response_format: None,
            speed: None,
            pitch: None,
            volume: None,
            language: None,
            refer_wav_path_gpt: None,
            refer_wav_path_sovits: BTreeMap::new(),
            prompt: None,
        }
    }

    pub fn with_response_format(mut self, format: impl Into<SpeechResponseFormat>) -> Self {
        self.response_format = Some(format.into());
        self
    }

    pub fn with_speed(mut self, speed: impl Into<FloatFrac>) -> Self {
        self.speed = Some(speed.into());
        self
    }

    pub fn with_pitch(mut self, pitch: impl Into<FloatFrac>) -> Self {
        self.pitch = Some(pitch.into());
        self
    }

    pub fn with_volume(mut self, volume: impl Into<FloatFrac>) -> Self {
        self.volume = Some(volume.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_reference_audio(mut self, path: impl Into<String>) -> Self {
        self.refer_wav_path_gpt = Some(path.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Adds (or replaces) one entry of the voice blend.
    pub fn add_blend_weight(mut self, path: impl Into<String>, weight: impl Into<FloatFrac>) -> Self {
        self.refer_wav_path_sovits.insert(path.into(), weight.into());
        self
    }

    /// Checks that every float can be encoded; the text itself is left to the server.
    pub fn validate(&self) -> Result<()> {
        let ctx = || ErrorContext::new().with_source("speech");
        let scalars = [
            ("speed", self.speed),
            ("pitch", self.pitch),
            ("volume", self.volume),
        ];
        for (field, value) in scalars {
            if let Some(v) = value {
                check_finite(v, ctx().with_field_path(field))?;
            }
        }
        for (path, weight) in &self.refer_wav_path_sovits {
            check_finite(
                *weight,
                ctx().with_field_path(format!("refer_wav_path_sovits[{}]", path)),
            )?;
        }
        Ok(())
    }
}

fn check_finite(value: FloatFrac, context: ErrorContext) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::encode_with_context("unsupported number", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_body_omits_optionals() {
        let req = CreateSpeechRequest::new(SpeechModel::Tts1, "Hello", SpeechVoice::Alloy);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "tts-1", "input": "Hello", "voice": "alloy"})
        );
    }

    #[test]
    fn test_full_body_renders_floats_with_fraction() {
        let req = CreateSpeechRequest::new("canary-tts", "你好", "nova")
            .with_response_format(SpeechResponseFormat::Wav)
            .with_speed(1.0)
            .with_pitch(0.5)
            .with_language("zh")
            .with_reference_audio("/refs/a.wav")
            .with_prompt("reference transcript")
            .add_blend_weight("/refs/a.wav", 1.0)
            .add_blend_weight("/refs/b.wav", 0.25);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""speed":1.0"#));
        assert!(json.contains(r#""pitch":0.5"#));
        assert!(json.contains(r#""refer_wav_path_sovits":{"/refs/a.wav":1.0,"/refs/b.wav":0.25}"#));
        assert!(json.contains(r#""response_format":"wav""#));
        assert!(!json.contains("volume"));
    }

    #[test]
    fn test_unknown_enum_values_pass_through() {
        let model = SpeechModel::from("gpt-4o-mini-tts");
        assert_eq!(model, SpeechModel::Other("gpt-4o-mini-tts".into()));
        assert_eq!(SpeechVoice::from("echo"), SpeechVoice::Echo);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gpt-4o-mini-tts""#);
        let back: SpeechVoice = serde_json::from_str(r#""shimmer""#).unwrap();
        assert_eq!(back, SpeechVoice::Shimmer);
    }

    #[test]
    fn test_validate_flags_non_finite_weight() {
        let req = CreateSpeechRequest::new("tts-1", "hi", "alloy")
            .add_blend_weight("x.wav", f64::INFINITY);
        let err = req.validate().unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("refer_wav_path_sovits[x.wav]")
        );
    }

    #[test]
    fn test_validate_leaves_blank_input_to_server() {
        let req = CreateSpeechRequest::new("tts-1", "  ", "alloy");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(SpeechResponseFormat::Mp3.mime_type(), "audio/mpeg");
        assert_eq!(
            SpeechResponseFormat::from("ogg").mime_type(),
            "application/octet-stream"
        );
    }
}
