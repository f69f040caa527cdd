/// Invocation event classification
///
/// The only part of the payload that matters is the HTTP method. Both the
/// REST API proxy payload (`httpMethod`) and the HTTP API v2 / Function URL
/// payload (`requestContext.http.method`) are recognized.
use serde_json::Value;

/// What the invocation asks the counter to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    /// Atomically add 1 and return the new count (POST, or no method at all)
    Increment,
    /// Return the current count without touching it (GET)
    Read,
    /// Same lookup as `Read`, answered without a body (HEAD)
    Head,
    /// Method the counter does not serve
    Unsupported(String),
}

impl CounterAction {
    /// Classify an invocation payload
    ///
    /// A payload without a readable method falls back to `Increment`,
    /// matching the behavior of direct (non-HTTP) invocations.
    pub fn from_event(event: &Value) -> Self {
        match extract_method(event) {
            None => CounterAction::Increment,
            Some(method) => Self::from_method(method),
        }
    }

    /// Classify a bare HTTP method (case-insensitive)
    pub fn from_method(method: &str) -> Self {
        let method = method.trim().to_ascii_uppercase();
        match method.as_str() {
            "" | "POST" => CounterAction::Increment,
            "GET" => CounterAction::Read,
            "HEAD" => CounterAction::Head,
            _ => CounterAction::Unsupported(method),
        }
    }

    /// Whether this action mutates the stored count
    pub fn is_mutating(&self) -> bool {
        matches!(self, CounterAction::Increment)
    }

    /// Whether the response must carry an empty body
    pub fn omits_body(&self) -> bool {
        matches!(self, CounterAction::Head)
    }

    /// Short label for structured logs
    pub fn as_str(&self) -> &str {
        match self {
            CounterAction::Increment => "increment",
            CounterAction::Read => "read",
            CounterAction::Head => "head",
            CounterAction::Unsupported(_) => "unsupported",
        }
    }
}

/// Pull the HTTP method out of a proxy event, if any
fn extract_method(event: &Value) -> Option<&str> {
    // REST API (payload format 1.0)
    if let Some(method) = event.get("httpMethod").and_then(Value::as_str) {
        return Some(method);
    }

    // HTTP API / Function URL (payload format 2.0)
    event
        .get("requestContext")
        .and_then(|ctx| ctx.get("http"))
        .and_then(|http| http.get("method"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_event_increments() {
        assert_eq!(CounterAction::from_event(&json!({})), CounterAction::Increment);
    }

    #[test]
    fn test_non_object_event_increments() {
        assert_eq!(CounterAction::from_event(&Value::Null), CounterAction::Increment);
        assert_eq!(CounterAction::from_event(&json!("ping")), CounterAction::Increment);
        assert_eq!(CounterAction::from_event(&json!([1, 2, 3])), CounterAction::Increment);
    }

    #[test]
    fn test_rest_api_post_increments() {
        let event = json!({ "httpMethod": "POST", "path": "/lambdaddb" });
        assert_eq!(CounterAction::from_event(&event), CounterAction::Increment);
    }

    #[test]
    fn test_rest_api_get_reads() {
        let event = json!({ "httpMethod": "GET", "path": "/lambdaddb" });
        assert_eq!(CounterAction::from_event(&event), CounterAction::Read);
    }

    #[test]
    fn test_http_api_v2_methods() {
        let get = json!({
            "version": "2.0",
            "requestContext": { "http": { "method": "GET", "path": "/" } }
        });
        let post = json!({
            "version": "2.0",
            "requestContext": { "http": { "method": "POST", "path": "/" } }
        });

        assert_eq!(CounterAction::from_event(&get), CounterAction::Read);
        assert_eq!(CounterAction::from_event(&post), CounterAction::Increment);
    }

    #[test]
    fn test_rest_api_field_takes_precedence() {
        let event = json!({
            "httpMethod": "GET",
            "requestContext": { "http": { "method": "POST" } }
        });
        assert_eq!(CounterAction::from_event(&event), CounterAction::Read);
    }

    #[test]
    fn test_method_is_case_insensitive() {
        assert_eq!(CounterAction::from_method("get"), CounterAction::Read);
        assert_eq!(CounterAction::from_method("Post"), CounterAction::Increment);
        assert_eq!(CounterAction::from_method("head"), CounterAction::Head);
    }

    #[test]
    fn test_blank_method_increments() {
        assert_eq!(CounterAction::from_method(""), CounterAction::Increment);
        assert_eq!(CounterAction::from_method("  "), CounterAction::Increment);
    }

    #[test]
    fn test_non_string_method_increments() {
        let event = json!({ "httpMethod": 42 });
        assert_eq!(CounterAction::from_event(&event), CounterAction::Increment);
    }

    #[test]
    fn test_unsupported_methods() {
        assert_eq!(
            CounterAction::from_method("delete"),
            CounterAction::Unsupported("DELETE".to_string())
        );
        assert_eq!(
            CounterAction::from_event(&json!({ "httpMethod": "PUT" })),
            CounterAction::Unsupported("PUT".to_string())
        );
    }

    #[test]
    fn test_only_head_omits_body() {
        assert!(CounterAction::from_method("HEAD").omits_body());
        assert!(!CounterAction::Read.omits_body());
        assert!(!CounterAction::Increment.omits_body());
        assert!(!CounterAction::Unsupported("PUT".to_string()).omits_body());
    }

    #[test]
    fn test_is_mutating() {
        assert!(CounterAction::Increment.is_mutating());
        assert!(!CounterAction::Read.is_mutating());
        assert!(!CounterAction::Head.is_mutating());
        assert!(!CounterAction::Unsupported("PATCH".to_string()).is_mutating());
    }

    #[test]
    fn test_as_str() {
        assert_eq!(CounterAction::Increment.as_str(), "increment");
        assert_eq!(CounterAction::Read.as_str(), "read");
        assert_eq!(CounterAction::Head.as_str(), "head");
        assert_eq!(CounterAction::Unsupported("PUT".to_string()).as_str(), "unsupported");
    }
}
