use std::fmt;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field or form key that caused the error (e.g., "refer_wav_path_sovits", "file")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., offending path or value)
    pub details: Option<String>,
    /// Source of the error (e.g., "speech", "transcriptions", "config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse classification of a failed remote call.
///
/// Derived from the provider's error `code`/`type` when present, otherwise from
/// the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    InvalidRequest,
    Authentication,
    PermissionDenied,
    NotFound,
    RequestTooLarge,
    RateLimited,
    QuotaExhausted,
    ServerError,
    Overloaded,
    Timeout,
    Unknown,
}

impl ErrorClass {
    /// Returns the standard name (e.g., `"rate_limited"`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::RequestTooLarge => "request_too_large",
            Self::RateLimited => "rate_limited",
            Self::QuotaExhausted => "quota_exhausted",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Whether a caller may reasonably retry the same request.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Overloaded | Self::Timeout
        )
    }

    /// Maps a provider error code/type string (e.g. `"invalid_api_key"`).
    pub fn from_provider_code(code: &str) -> Option<Self> {
        let class = match code {
            "invalid_request" | "invalid_request_error" | "invalid_file_format" => {
                Self::InvalidRequest
            }
            "authentication" | "invalid_api_key" | "authentication_error" => Self::Authentication,
            "permission_denied" | "permission_error" => Self::PermissionDenied,
            "not_found" | "model_not_found" => Self::NotFound,
            "request_too_large" | "file_too_large" => Self::RequestTooLarge,
            "rate_limited" | "rate_limit_exceeded" => Self::RateLimited,
            "quota_exhausted" | "insufficient_quota" => Self::QuotaExhausted,
            "server_error" => Self::ServerError,
            "overloaded" | "engine_overloaded" => Self::Overloaded,
            "timeout" => Self::Timeout,
            _ => return None,
        };
        Some(class)
    }

    /// Maps an HTTP status code to the most likely class.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            413 => Self::RequestTooLarge,
            429 => Self::RateLimited,
            500 | 502 => Self::ServerError,
            503 => Self::Overloaded,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error envelope returned by the remote API (`{"error": {...}}`).
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: Option<String>,
}

// Some compatible servers send numeric codes.
fn code_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<serde_json::Value> = serde::Deserialize::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Unified error type for the audio client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Encoding error: {message}{}", format_context(.context))]
    Encode {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("I/O error: {source}{}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error: HTTP {status} ({class}): {}", format_api_body(.body))]
    Api {
        status: u16,
        class: ErrorClass,
        body: ApiErrorBody,
    },

    #[error("Request error: HTTP {status} ({class}): {body}")]
    Request {
        status: u16,
        class: ErrorClass,
        body: String,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_api_body(body: &ApiErrorBody) -> String {
    match &body.param {
        Some(param) => format!("{} (param: {})", body.message, param),
        None => body.message.clone(),
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            source,
            context: ErrorContext::new(),
        }
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn encode_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Encode {
            message: msg.into(),
            context,
        }
    }

    pub fn io_with_context(source: std::io::Error, context: ErrorContext) -> Self {
        Error::Io { source, context }
    }

    /// Build the error for a non-2xx response from its status and raw body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct Envelope {
            error: ApiErrorBody,
        }

        match serde_json::from_slice::<Envelope>(body) {
            Ok(Envelope { error }) => {
                let class = error
                    .code
                    .as_deref()
                    .and_then(ErrorClass::from_provider_code)
                    .or_else(|| {
                        error
                            .error_type
                            .as_deref()
                            .and_then(ErrorClass::from_provider_code)
                    })
                    .unwrap_or_else(|| ErrorClass::from_http_status(status));
                Error::Api {
                    status,
                    class,
                    body: error,
                }
            }
            Err(_) => Error::Request {
                status,
                class: ErrorClass::from_http_status(status),
                body: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Validation { context, .. }
            | Error::Encode { context, .. }
            | Error::Io { context, .. } => Some(context),
            _ => None,
        }
    }

    /// HTTP status of a remote failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classification of a remote failure.
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Error::Api { class, .. } | Error::Request { class, .. } => Some(*class),
            _ => None,
        }
    }
}
