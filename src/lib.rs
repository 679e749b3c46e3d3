//! # ai-audio-rust
//!
//! Typed client for OpenAI-compatible speech synthesis and audio transcription
//! APIs, including the vendor extensions some self-hosted servers add
//! (reference-audio voice cloning, speaker labels, sentiment, usage).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_audio_rust::audio::{
//!     AudioClient, AudioRequest, AudioResponseFormat, AudioSource, CreateSpeechRequest,
//!     SpeechModel, SpeechVoice, WHISPER_1,
//! };
//!
//! #[tokio::main]
//! async fn main() -> ai_audio_rust::Result<()> {
//!     let client = AudioClient::builder().api_key("your-api-key").build()?;
//!
//!     let speech = CreateSpeechRequest::new(SpeechModel::Tts1, "Hello!", SpeechVoice::Nova)
//!         .with_speed(1.25);
//!     let audio = client.create_speech(&speech).await?;
//!     std::fs::write("hello.mp3", &audio.body)?;
//!
//!     let request = AudioRequest::new(WHISPER_1, AudioSource::path("hello.mp3"))
//!         .with_format(AudioResponseFormat::VerboseJson);
//!     let transcript = client.create_transcription(request).await?;
//!     println!("{}", transcript.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`audio`] | Request/response shapes and the [`audio::AudioClient`] |
//! | [`config`] | Client configuration (code, YAML, environment) |
//! | [`transport`] | Shared HTTP helper, multipart forms, response headers |
//! | [`error`] | Error type and remote error classification |

pub mod audio;
pub mod config;
pub mod error;
pub mod transport;

pub use audio::{AudioClient, AudioClientBuilder, FloatFrac};
pub use config::{ApiType, ClientConfig};
pub use error::{Error, ErrorClass, ErrorContext};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
