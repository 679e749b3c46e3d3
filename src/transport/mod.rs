//! Shared HTTP plumbing used by every endpoint call.
//!
//! - [`HttpTransport`]: URL layout, auth headers, status handling
//! - [`FormBuilder`]: inspectable multipart form
//! - [`ResponseHeaders`]: response headers with rate-limit accessors

mod form;
mod headers;
mod http;

pub use form::{FormBuilder, FormField, FormValue};
pub use headers::{RateLimitHeaders, ResponseHeaders};
pub use http::{HttpTransport, RawResponse, RequestBody};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
