//! Tests for error handling functionality
//!
//! These tests verify that backend error bodies map to the right variants and
//! that context survives wrapping.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::error::{mapping, ErrorContext, ServiceError};

    #[test]
    fn test_service_error_creation() {
        let network_err = ServiceError::network("Connection failed");
        let auth_err = ServiceError::authentication("Invalid credentials");
        let parse_err = ServiceError::parsing("missing choices");

        assert_eq!(network_err.to_string(), "Network error: Connection failed");
        assert_eq!(auth_err.to_string(), "Authentication error: Invalid credentials");
        assert_eq!(parse_err.to_string(), "Parsing error: missing choices");
    }

    #[test]
    fn test_error_context() {
        let mut context = ErrorContext::for_service("llm")
            .status_code(503)
            .endpoint("v1/chat/completions");
        context.add("attempt", 1);

        let err = ServiceError::service("overloaded").with_context(context);

        // Display passes through to the wrapped error
        assert_eq!(err.to_string(), "Service error: overloaded");
        assert_eq!(err.service_name(), Some("llm"));
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.endpoint(), Some("v1/chat/completions"));
        assert!(matches!(err.root(), ServiceError::Service(_)));

        if let ServiceError::WithContext { context, .. } = &err {
            assert_eq!(context.data.get("attempt").map(String::as_str), Some("1"));
        } else {
            panic!("expected context wrapper");
        }
    }

    #[test]
    fn test_status_code_found_through_nested_context() {
        let inner = ServiceError::timeout("slow").with_context(ErrorContext::for_service("qdrant").status_code(504));
        let outer = inner.with_context(ErrorContext::for_service("retrieval").endpoint("collections/advisor_passages"));

        assert_eq!(outer.status_code(), Some(504));
        assert_eq!(outer.endpoint(), Some("collections/advisor_passages"));
        assert!(matches!(outer.root(), ServiceError::Timeout(_)));
    }

    #[test]
    fn test_llm_error_mapping() {
        let body = json!({
            "error": {
                "message": "model not loaded",
                "type": "invalid_request_error",
                "code": 404
            }
        });
        let mut context = ErrorContext::for_service("llm");

        let err = mapping::map_http_error(StatusCode::NOT_FOUND, &body.to_string(), &mut context);

        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "model not loaded"));
        assert_eq!(context.error_code.as_deref(), Some("404"));
        assert_eq!(context.data.get("error_type").map(String::as_str), Some("invalid_request_error"));
    }

    #[test]
    fn test_qdrant_error_mapping() {
        let body = json!({"status": {"error": "Not found: Collection `missing` doesn't exist!"}, "time": 0.001});
        let mut context = ErrorContext::for_service("qdrant");

        let err = mapping::map_http_error(StatusCode::NOT_FOUND, &body.to_string(), &mut context);

        match err {
            ServiceError::NotFound(message) => assert!(message.contains("missing")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_mapping_for_plain_bodies() {
        let mut context = ErrorContext::for_service("tools");

        let cases = [
            (StatusCode::UNAUTHORIZED, "authentication"),
            (StatusCode::FORBIDDEN, "authorization"),
            (StatusCode::TOO_MANY_REQUESTS, "rate_limit"),
            (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            (StatusCode::INTERNAL_SERVER_ERROR, "service"),
        ];

        for (status, expected) in cases {
            let err = mapping::map_http_error(status, "upstream exploded", &mut context);
            let actual = match err {
                ServiceError::Authentication(_) => "authentication",
                ServiceError::Authorization(_) => "authorization",
                ServiceError::RateLimit(_) => "rate_limit",
                ServiceError::Validation(_) => "validation",
                ServiceError::Timeout(_) => "timeout",
                ServiceError::Service(_) => "service",
                _ => "other",
            };
            assert_eq!(actual, expected, "status {}", status);
        }
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let mut context = ErrorContext::for_service("tools");
        let body = "x".repeat(1000);

        let err = mapping::map_http_error(StatusCode::BAD_GATEWAY, &body, &mut context);

        assert!(err.to_string().len() < 300);
        assert!(err.to_string().ends_with("..."));
    }

    #[tokio::test]
    async fn test_unbuildable_request_is_a_configuration_error() {
        let reqwest_err = reqwest::Client::new().get("not a url").send().await.unwrap_err();
        let err: ServiceError = reqwest_err.into();

        assert!(matches!(err.root(), ServiceError::Configuration(_)));
        assert_eq!(err.service_name(), Some("http_client"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ServiceError = json_err.into();

        assert!(matches!(err.root(), ServiceError::Parsing(_)));
        assert_eq!(err.service_name(), Some("json"));
    }
}
