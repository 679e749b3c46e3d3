//! Response header access.

use reqwest::header::HeaderMap;
use std::time::Duration;

/// Headers of a completed response, kept alongside the decoded body.
#[derive(Debug, Clone, Default)]
pub struct ResponseHeaders {
    inner: HeaderMap,
}

impl ResponseHeaders {
    pub fn new(inner: HeaderMap) -> Self {
        Self { inner }
    }

    /// Header value as text; `None` when absent or not visible ASCII.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get("content-type")
    }

    /// Server-assigned request id (`x-request-id`).
    pub fn request_id(&self) -> Option<&str> {
        self.get("x-request-id")
    }

    pub fn rate_limit(&self) -> RateLimitHeaders {
        let num = |name: &str| self.get(name).and_then(|v| v.trim().parse::<u64>().ok());
        let text = |name: &str| self.get(name).map(str::to_string);
        RateLimitHeaders {
            limit_requests: num("x-ratelimit-limit-requests"),
            limit_tokens: num("x-ratelimit-limit-tokens"),
            remaining_requests: num("x-ratelimit-remaining-requests"),
            remaining_tokens: num("x-ratelimit-remaining-tokens"),
            reset_requests: text("x-ratelimit-reset-requests"),
            reset_tokens: text("x-ratelimit-reset-tokens"),
        }
    }

    pub fn as_map(&self) -> &HeaderMap {
        &self.inner
    }
}

/// `x-ratelimit-*` values reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub limit_requests: Option<u64>,
    pub limit_tokens: Option<u64>,
    pub remaining_requests: Option<u64>,
    pub remaining_tokens: Option<u64>,
    /// Raw reset value, e.g. `"1s"` or `"6m0s"`.
    pub reset_requests: Option<String>,
    pub reset_tokens: Option<String>,
}

impl RateLimitHeaders {
    pub fn reset_requests_after(&self) -> Option<Duration> {
        self.reset_requests.as_deref().and_then(parse_reset)
    }

    pub fn reset_tokens_after(&self) -> Option<Duration> {
        self.reset_tokens.as_deref().and_then(parse_reset)
    }
}

/// Parses reset values like `"20ms"`, `"1.5s"`, `"6m0s"`, `"1h2m3s"`.
fn parse_reset(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let mut total_nanos = 0f64;
    let mut rest = value;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_end == 0 {
            return None;
        }
        let amount: f64 = rest[..num_end].parse().ok()?;
        rest = &rest[num_end..];
        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_end] {
            "h" => 3_600e9,
            "m" => 60e9,
            "s" => 1e9,
            "ms" => 1e6,
            "us" | "µs" => 1e3,
            "ns" => 1.0,
            _ => return None,
        };
        total_nanos += (amount * nanos_per_unit).round();
        rest = &rest[unit_end..];
    }
    Some(Duration::from_nanos(total_nanos as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> ResponseHeaders {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        ResponseHeaders::new(map)
    }

    #[test]
    fn test_rate_limit_parsing() {
        let h = headers(&[
            ("x-ratelimit-limit-requests", "50"),
            ("x-ratelimit-remaining-requests", "49"),
            ("x-ratelimit-reset-requests", "1.2s"),
            ("x-ratelimit-reset-tokens", "6m0s"),
        ]);
        let rl = h.rate_limit();
        assert_eq!(rl.limit_requests, Some(50));
        assert_eq!(rl.remaining_requests, Some(49));
        assert_eq!(rl.limit_tokens, None);
        assert_eq!(rl.reset_requests_after(), Some(Duration::from_millis(1200)));
        assert_eq!(rl.reset_tokens_after(), Some(Duration::from_secs(360)));
    }

    #[test]
    fn test_parse_reset_units() {
        assert_eq!(parse_reset("20ms"), Some(Duration::from_millis(20)));
        assert_eq!(parse_reset("1h2m3s"), Some(Duration::from_secs(3723)));
        assert_eq!(parse_reset("soon"), None);
        assert_eq!(parse_reset("5d"), None);
        assert_eq!(parse_reset(""), None);
    }

    #[test]
    fn test_plain_lookup() {
        let h = headers(&[("x-request-id", "req_123"), ("content-type", "audio/mpeg")]);
        assert_eq!(h.request_id(), Some("req_123"));
        assert_eq!(h.content_type(), Some("audio/mpeg"));
        assert_eq!(h.get("missing"), None);
    }
}
