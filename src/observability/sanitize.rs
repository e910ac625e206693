//! Request payload and query capture for the request log.
//!
//! # Rules
//! - Only top-level keys are masked; nested objects pass through untouched
//! - Key matching is exact and case-sensitive
//! - The original body is never modified; callers log the returned copy
//! - Repeated query keys collapse into an array of their values

use axum::http::Method;
use serde_json::{Map, Value};

/// Replacement written over sensitive values.
pub const MASK: &str = "***";

/// Decides which bodies are captured and which keys are masked.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    sensitive_fields: Vec<String>,
    methods: Vec<Method>,
}

impl Sanitizer {
    /// Method names that fail to parse are skipped; config validation
    /// rejects them before this point.
    pub fn new<F, M>(sensitive_fields: F, methods: M) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        Self {
            sensitive_fields: sensitive_fields.into_iter().map(Into::into).collect(),
            methods: methods
                .into_iter()
                .filter_map(|m| Method::from_bytes(m.as_ref().as_bytes()).ok())
                .collect(),
        }
    }

    /// Whether the body of a request with this method is logged.
    pub fn captures_body(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Shallow copy of `body` with sensitive top-level values masked.
    ///
    /// Non-object bodies have no keys to mask and are copied unchanged.
    pub fn sanitize(&self, body: &Value) -> Value {
        let Value::Object(fields) = body else {
            return body.clone();
        };

        let mut copy = fields.clone();
        for field in &self.sensitive_fields {
            if let Some(value) = copy.get_mut(field) {
                *value = Value::String(MASK.to_string());
            }
        }
        Value::Object(copy)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(
            ["password", "token", "secret", "authorization"],
            ["POST", "PUT", "PATCH"],
        )
    }
}

/// Decode a raw body into a loggable value.
///
/// JSON and form bodies are understood; anything else (or an unparseable
/// body) yields `None` and is left for the handler to reject.
pub fn decode_body(content_type: Option<&str>, bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }

    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match mime.as_deref() {
        Some("application/x-www-form-urlencoded") => {
            let fields = form_to_map(bytes);
            Some(Value::Object(fields))
        }
        Some(ct) if ct == "application/json" || ct.ends_with("+json") => {
            serde_json::from_slice(bytes).ok()
        }
        _ => None,
    }
}

/// Query parameters as a JSON mapping, or `None` when there are none.
pub fn query_params(query: Option<&str>) -> Option<Map<String, Value>> {
    let params = form_to_map(query?.as_bytes());
    (!params.is_empty()).then_some(params)
}

fn form_to_map(input: &[u8]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in url::form_urlencoded::parse(input) {
        let value = Value::String(value.into_owned());
        match map.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_masks_password() {
        let body = json!({ "username": "alice", "password": "hunter2" });
        let sanitized = Sanitizer::default().sanitize(&body);

        assert_eq!(sanitized, json!({ "username": "alice", "password": "***" }));
        // original untouched
        assert_eq!(body["password"], "hunter2");
    }

    #[test]
    fn test_masks_every_sensitive_key_and_nothing_else() {
        let body = json!({
            "password": "p",
            "token": 42,
            "secret": { "nested": true },
            "authorization": null,
            "title": "Sprint board",
            "Password": "case matters",
        });
        let sanitized = Sanitizer::default().sanitize(&body);

        assert_eq!(
            sanitized,
            json!({
                "password": "***",
                "token": "***",
                "secret": "***",
                "authorization": "***",
                "title": "Sprint board",
                "Password": "case matters",
            })
        );
    }

    #[test]
    fn test_nested_objects_not_recursed() {
        let body = json!({ "user": { "password": "hunter2" } });
        assert_eq!(Sanitizer::default().sanitize(&body), body);
    }

    #[test]
    fn test_non_object_body_copied() {
        let body = json!(["password", "token"]);
        assert_eq!(Sanitizer::default().sanitize(&body), body);
    }

    #[test]
    fn test_custom_fields() {
        let sanitizer = Sanitizer::new(["apiKey"], ["POST"]);
        let sanitized = sanitizer.sanitize(&json!({ "apiKey": "k", "password": "p" }));
        assert_eq!(sanitized, json!({ "apiKey": "***", "password": "p" }));
    }

    #[test]
    fn test_captured_methods() {
        let sanitizer = Sanitizer::default();
        assert!(sanitizer.captures_body(&Method::POST));
        assert!(sanitizer.captures_body(&Method::PUT));
        assert!(sanitizer.captures_body(&Method::PATCH));
        assert!(!sanitizer.captures_body(&Method::GET));
        assert!(!sanitizer.captures_body(&Method::DELETE));

        let post_only = Sanitizer::new(["password"], ["POST"]);
        assert!(!post_only.captures_body(&Method::PUT));
    }

    #[test]
    fn test_query_params() {
        let params = query_params(Some("status=done&limit=5")).unwrap();
        assert_eq!(Value::Object(params), json!({ "status": "done", "limit": "5" }));

        assert!(query_params(None).is_none());
        assert!(query_params(Some("")).is_none());
    }

    #[test]
    fn test_repeated_query_keys_collect() {
        let params = query_params(Some("tag=a&tag=b&tag=c&q=x%20y")).unwrap();
        assert_eq!(Value::Object(params), json!({ "tag": ["a", "b", "c"], "q": "x y" }));
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(
            decode_body(Some("application/json; charset=utf-8"), br#"{"a":1}"#),
            Some(json!({ "a": 1 }))
        );
        assert_eq!(
            decode_body(Some("application/x-www-form-urlencoded"), b"name=Todo&password=x"),
            Some(json!({ "name": "Todo", "password": "x" }))
        );
        assert_eq!(decode_body(Some("application/json"), b""), None);
        assert_eq!(decode_body(Some("application/json"), b"{oops"), None);
        assert_eq!(decode_body(Some("text/plain"), b"hello"), None);
        assert_eq!(decode_body(None, b"{}"), None);
    }
}
