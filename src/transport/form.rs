//! Multipart form assembly.
//!
//! `reqwest::multipart::Form` is write-only, so fields are collected here in
//! order and converted at send time.

use crate::{Error, ErrorContext, Result};
use reqwest::multipart::{Form, Part};

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        data: Vec<u8>,
        file_name: String,
        mime_type: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    fields: Vec<FormField>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(FormField {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
    }

    /// Adds a file part; the MIME type is guessed from the file name's extension.
    pub fn create_form_file(
        &mut self,
        name: impl Into<String>,
        data: Vec<u8>,
        file_name: impl Into<String>,
    ) {
        let file_name = file_name.into();
        let mime_type = guess_audio_mime(&file_name);
        self.fields.push(FormField {
            name: name.into(),
            value: FormValue::File {
                data,
                file_name,
                mime_type,
            },
        });
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Text value of the first field with `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FormValue::Text(v) if f.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for field in self.fields {
            form = match field.value {
                FormValue::Text(v) => form.text(field.name, v),
                FormValue::File {
                    data,
                    file_name,
                    mime_type,
                } => {
                    let part = Part::bytes(data)
                        .file_name(file_name)
                        .mime_str(&mime_type)
                        .map_err(|e| {
                            Error::validation_with_context(
                                format!("Invalid mime: {}", e),
                                ErrorContext::new()
                                    .with_field_path(field.name.clone())
                                    .with_details(mime_type.clone()),
                            )
                        })?;
                    form.part(field.name, part)
                }
            };
        }
        Ok(form)
    }
}

fn guess_audio_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_insertion_order() {
        let mut b = FormBuilder::new();
        b.create_form_file("file", vec![1, 2, 3], "clip.WAV");
        b.write_field("model", "whisper-1");
        b.write_field("timestamp_granularities[]", "word");
        b.write_field("timestamp_granularities[]", "segment");

        let names: Vec<&str> = b.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "file",
                "model",
                "timestamp_granularities[]",
                "timestamp_granularities[]"
            ]
        );
        assert_eq!(b.text("model"), Some("whisper-1"));
        match &b.fields()[0].value {
            FormValue::File { mime_type, .. } => assert!(mime_type.starts_with("audio/"), "{}", mime_type),
            other => panic!("Expected file part, got {:?}", other),
        }
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(guess_audio_mime("a.mp3"), "audio/mpeg");
        assert_eq!(guess_audio_mime("voice.note.ogg"), "audio/ogg");
        assert_eq!(guess_audio_mime("noext"), "application/octet-stream");
    }

    #[test]
    fn test_mime_guessing_covers_less_common_audio() {
        assert!(guess_audio_mime("take.flac").starts_with("audio/"));
        assert!(guess_audio_mime("memo.aiff").starts_with("audio/"));
        assert!(guess_audio_mime("call.WMA").starts_with("audio/"));
    }

    #[test]
    fn test_into_form_succeeds() {
        let mut b = FormBuilder::new();
        b.create_form_file("file", b"RIFF".to_vec(), "a.wav");
        b.write_field("model", "whisper-1");
        let form = b.into_form().unwrap();
        assert!(!form.boundary().is_empty());
    }
}
