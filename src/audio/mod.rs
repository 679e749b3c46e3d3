//! Speech synthesis and transcription endpoints.
//!
//! - [`AudioClient::create_speech`]: text to audio (`/audio/speech`)
//! - [`AudioClient::create_transcription`]: audio to text (`/audio/transcriptions`)
//! - [`AudioClient::create_translation`]: audio to English text (`/audio/translations`)

/// String-backed enum that tolerates values added by the server later.
macro_rules! open_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this crate does not know about.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $value, )+
                    Self::Other(s) => s.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $value => Self::$variant, )+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from(s.as_str())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                <String as serde::Deserialize>::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

mod client;
mod float_frac;
mod speech;
mod transcription;

pub use client::{AudioClient, AudioClientBuilder, AudioEndpoint};
pub use float_frac::FloatFrac;
pub use speech::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, SpeechVoice};
pub use transcription::{
    AudioRequest, AudioResponse, AudioResponseFormat, AudioResponseUsage, AudioSegment,
    AudioSource, AudioWord, TranscriptionAudioInfo, TranscriptionTimestampGranularity, WHISPER_1,
};
pub use crate::transport::RawResponse;
