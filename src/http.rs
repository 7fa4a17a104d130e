//! HTTP client adapter for the backend and the analysis service
//!
//! [`HttpClient::call`] never returns an error: transport failures come back
//! as an [`HttpOutcome`] with no status and `error` populated, so steps can
//! classify them like any other outcome. There is no retry at this layer.

use crate::error::{HarnessError, HarnessResult};
use crate::logging::{log_debug, log_error};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Maximum number of body characters carried into error details.
pub const BODY_SNIPPET_CHARS: usize = 200;

/// Methods the services expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// Response payload: parsed JSON, or the raw text when it is not JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    fn parse(raw: String) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(&raw) {
            Ok(json) => Some(ResponseBody::Json(json)),
            Err(_) => Some(ResponseBody::Text(raw)),
        }
    }

    /// Body rendered as text, truncated to [`BODY_SNIPPET_CHARS`].
    pub fn snippet(&self) -> String {
        let full = match self {
            ResponseBody::Json(json) => json.to_string(),
            ResponseBody::Text(text) => text.clone(),
        };
        full.chars().take(BODY_SNIPPET_CHARS).collect()
    }
}

/// What one HTTP call produced.
#[derive(Debug, Clone)]
pub struct HttpOutcome {
    /// Absent when the call failed at the transport level.
    pub status: Option<u16>,
    pub body: Option<ResponseBody>,
    pub error: Option<String>,
    pub timed_out: bool,
    /// Parsed `retry-after` header, when the service sent one.
    pub retry_after_seconds: Option<u64>,
    pub elapsed: Duration,
}

impl HttpOutcome {
    fn transport_failure(message: String, timed_out: bool, elapsed: Duration) -> Self {
        Self {
            status: None,
            body: None,
            error: Some(message),
            timed_out,
            retry_after_seconds: None,
            elapsed,
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status.is_none()
    }

    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Some(ResponseBody::Json(json)) => Some(json),
            _ => None,
        }
    }

    /// Check the status against the documented one for the operation.
    pub fn expect_status(&self, expected: u16) -> HarnessResult<()> {
        let Some(actual) = self.status else {
            let message = self
                .error
                .clone()
                .unwrap_or_else(|| "no response received".to_string());
            return Err(HarnessError::transport_failure(message, self.timed_out));
        };

        if actual == expected {
            return Ok(());
        }

        let mut detail = self.body.as_ref().map(ResponseBody::snippet);
        if let Some(seconds) = self.retry_after_seconds {
            let note = format!("retry-after {seconds}s");
            detail = Some(match detail {
                Some(body) => format!("{note}; {body}"),
                None => note,
            });
        }
        Err(HarnessError::unexpected_status(expected, actual, detail))
    }

    /// Check the status, then require a JSON body.
    pub fn expect_json(&self, expected: u16) -> HarnessResult<&Value> {
        self.expect_status(expected)?;
        self.json()
            .ok_or_else(|| HarnessError::malformed_body("response body is not JSON"))
    }
}

/// Stateless HTTP adapter shared by every step of a run.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Perform one call and capture status, body and elapsed time.
    pub async fn call(
        &self,
        method: HttpMethod,
        url: &str,
        json_body: Option<&Value>,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> HttpOutcome {
        log_debug!(
            method = %method,
            url = %url,
            timeout_ms = timeout.as_millis() as u64,
            has_body = json_body.is_some(),
            "Sending request"
        );

        let started = Instant::now();
        let mut request = self
            .client
            .request(method.as_reqwest(), url)
            .headers(headers.clone())
            .timeout(timeout);
        if let Some(body) = json_body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log_error!(
                    method = %method,
                    url = %url,
                    error = %e,
                    timed_out = e.is_timeout(),
                    "HTTP request failed"
                );
                return HttpOutcome::transport_failure(
                    e.to_string(),
                    e.is_timeout(),
                    started.elapsed(),
                );
            }
        };

        let status = response.status().as_u16();
        let retry_after_seconds = response
            .headers()
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());

        // A body that never finishes arriving is a transport failure, even
        // though the status line was read.
        let body = match response.text().await {
            Ok(raw) => ResponseBody::parse(raw),
            Err(e) => {
                log_error!(
                    url = %url,
                    status = status,
                    error = %e,
                    timed_out = e.is_timeout(),
                    "Failed to read response body"
                );
                return HttpOutcome::transport_failure(
                    format!("Failed to read response body (status {status}): {e}"),
                    e.is_timeout(),
                    started.elapsed(),
                );
            }
        };

        let elapsed = started.elapsed();
        log_debug!(
            method = %method,
            url = %url,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Response received"
        );

        HttpOutcome {
            status: Some(status),
            body,
            error: None,
            timed_out: false,
            retry_after_seconds,
            elapsed,
        }
    }

    /// JSON headers carrying a bearer token for the backend.
    pub fn bearer_headers(token: &str) -> HarnessResult<HeaderMap> {
        let mut headers = Self::json_headers();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                HarnessError::configuration_error(format!("Invalid bearer token format: {e}"))
            })?,
        );
        Ok(headers)
    }

    /// JSON headers carrying the analysis service API key.
    pub fn api_key_headers(api_key: &str) -> HarnessResult<HeaderMap> {
        let mut headers = Self::json_headers();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| {
                HarnessError::configuration_error(format!("Invalid API key format: {e}"))
            })?,
        );
        Ok(headers)
    }

    pub fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}
