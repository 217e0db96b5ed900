//! HTTP transport for back office API calls

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("auditbase-backoffice/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Non-2xx answer from the back office
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiStatusError {
    pub status: StatusCode,
}

impl fmt::Display for ApiStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API request failed: {}", self.status)
    }
}

impl std::error::Error for ApiStatusError {}

/// Read-only transport the resource client issues its requests through.
///
/// Errors are whatever the implementation decides a failure is (network,
/// status, body parsing); callers receive them unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `uri` and return the decoded JSON body
    async fn get(&self, uri: &str) -> Result<Value>;
}

/// reqwest-backed transport with a fixed base URL and default headers
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`.
    ///
    /// `headers` are attached to every request; `token`, when present, is
    /// sent as a bearer token.
    pub fn new(
        base_url: &str,
        headers: &BTreeMap<String, String>,
        token: Option<String>,
    ) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported base URL scheme: {}", parsed.scheme());
        }

        let mut default_headers = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name: {}", name))?;
            let header_value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {}", name))?;
            default_headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token,
        })
    }

    /// Resolve a request URI against the base URL.
    ///
    /// Absolute URIs pass through untouched; anything else is appended to the
    /// base with exactly one slash between them. The URI itself is never
    /// re-encoded.
    pub fn resolve(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return uri.to_string();
        }

        if uri.is_empty() {
            return self.base_url.clone();
        }

        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            uri.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, uri: &str) -> Result<Value> {
        let url = self.resolve(uri);
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiStatusError { status }.into());
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Format a back office API error for display
///
/// Only the typed status and network errors raised by [`HttpTransport`] get a
/// canned message; anything else is shown sanitized.
pub fn format_api_error(error: &anyhow::Error) -> String {
    if let Some(api_error) = error.downcast_ref::<ApiStatusError>() {
        return match api_error.status.as_u16() {
            400 => "Invalid request. Check your parameters.".to_string(),
            401 => "Authentication failed. Check the configured token.".to_string(),
            403 => "Permission denied by the back office.".to_string(),
            404 => "Resource not found.".to_string(),
            500 | 503 => "Back office temporarily unavailable. Please try again.".to_string(),
            _ => "Request failed.".to_string(),
        };
    }

    if let Some(http_error) = error.downcast_ref::<reqwest::Error>() {
        if http_error.is_connect() || http_error.is_timeout() {
            return "Could not reach the back office. Check the base URL and your network."
                .to_string();
        }
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
