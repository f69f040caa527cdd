/// Proxy integration response returned by the counter function
///
/// Success bodies are the bare decimal count (`"1"`, `"2"`, ...) so HTTP
/// clients can `parseInt` them directly. Error bodies are plain-text messages.
use serde::Serialize;
use std::collections::BTreeMap;

/// Content-Type of every response body
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Methods the counter accepts (sent in `Allow` on 405)
pub const ALLOWED_METHODS: &str = "GET, HEAD, POST";

/// `{ statusCode, headers, isBase64Encoded, body }` as API Gateway expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub is_base64_encoded: bool,
    pub body: String,
}

impl CounterResponse {
    /// 200 with the count as body
    pub fn ok(count: u64) -> Self {
        Self::with_status(200, count.to_string())
    }

    /// Drop the body and keep status and headers (HEAD responses)
    pub fn without_body(mut self) -> Self {
        self.body.clear();
        self
    }

    /// Error response with a descriptive message
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self::with_status(status_code, message.into())
    }

    /// 405 for methods other than GET / HEAD / POST
    pub fn method_not_allowed(method: &str) -> Self {
        let mut response = Self::error(405, format!("Method not allowed: {method}"));
        response
            .headers
            .insert("Allow".to_string(), ALLOWED_METHODS.to_string());
        response
    }

    /// 500 for failures before the handler could run (e.g. missing configuration)
    pub fn internal_error() -> Self {
        Self::error(500, "Internal server error")
    }

    /// Whether the status code is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    fn with_status(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), TEXT_CONTENT_TYPE.to_string());

        Self {
            status_code,
            headers,
            is_base64_encoded: false,
            body,
        }
    }
}
