//
//  sonarqube-client
//  api/classify.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Failure Classification
//!
//! Maps a failed call to exactly one [`SonarQubeError`] kind.
//!
//! | Outcome | Kind |
//! |---------|------|
//! | No HTTP response, time-based cutoff | `Timeout` |
//! | No HTTP response, anything else | `Network` |
//! | 401 | `Authentication` |
//! | 403 | `Authorization` |
//! | 404 | `NotFound` |
//! | 429 | `RateLimit` (with `Retry-After`) |
//! | other 4xx | decided by the [`ClientErrorPolicy`] |
//! | 5xx | `Server` |
//! | any other non-2xx | `Api` |
//!
//! The message is the first `msg` of SonarQube's `{"errors": [...]}` body
//! when there is one. Otherwise 401/403/404 keep their kind's default
//! message and every other status gets `"HTTP <code> <reason>"`.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::{Map, Value};

use super::common::{ErrorPayload, SonarQubeError};

/// Decides how generic 4xx responses are classified.
///
/// Only statuses not covered by a dedicated kind (401, 403, 404, 429) reach
/// the policy. Install a custom one with
/// [`ClientBuilder::client_error_policy`](super::ClientBuilder::client_error_policy)
/// when a deployment's error payloads follow different conventions.
pub trait ClientErrorPolicy: Send + Sync + fmt::Debug {
    /// `payload` is `None` when the body was not a SonarQube error document.
    fn classify(
        &self,
        status: StatusCode,
        message: String,
        payload: Option<&ErrorPayload>,
    ) -> SonarQubeError;
}

/// 400 and 422 responses that carry a SonarQube error document become
/// `Validation` errors; everything else becomes `Api`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClientErrorPolicy;

impl ClientErrorPolicy for DefaultClientErrorPolicy {
    fn classify(
        &self,
        status: StatusCode,
        message: String,
        payload: Option<&ErrorPayload>,
    ) -> SonarQubeError {
        match payload {
            Some(payload)
                if status == StatusCode::BAD_REQUEST
                    || status == StatusCode::UNPROCESSABLE_ENTITY =>
            {
                SonarQubeError::validation(message, payload.first_field().map(str::to_string))
            }
            _ => generic_api_error(status, message, payload),
        }
    }
}

/// Every generic 4xx becomes an `Api` error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiOnlyClientErrorPolicy;

impl ClientErrorPolicy for ApiOnlyClientErrorPolicy {
    fn classify(
        &self,
        status: StatusCode,
        message: String,
        payload: Option<&ErrorPayload>,
    ) -> SonarQubeError {
        generic_api_error(status, message, payload)
    }
}

/// `Api` error with the status and, when the payload listed any, the
/// server's messages under `details.errors`.
pub fn generic_api_error(
    status: StatusCode,
    message: String,
    payload: Option<&ErrorPayload>,
) -> SonarQubeError {
    let details = payload.and_then(|p| {
        let messages: Vec<Value> = p.messages().map(Value::from).collect();
        if messages.is_empty() {
            return None;
        }
        let mut map = Map::new();
        map.insert("errors".to_string(), Value::Array(messages));
        Some(map)
    });
    SonarQubeError::api(message, Some(status.as_u16()), details)
}

/// Classifies a non-2xx response.
pub fn classify_status(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    policy: &dyn ClientErrorPolicy,
) -> SonarQubeError {
    let payload = ErrorPayload::parse(body);
    let extracted = payload
        .as_ref()
        .and_then(|p| p.first_message())
        .map(str::to_string);

    match status {
        StatusCode::UNAUTHORIZED => SonarQubeError::authentication(extracted),
        StatusCode::FORBIDDEN => SonarQubeError::authorization(extracted),
        StatusCode::NOT_FOUND => SonarQubeError::not_found(extracted, None),
        StatusCode::TOO_MANY_REQUESTS => SonarQubeError::rate_limit(
            extracted.unwrap_or_else(|| status_message(status)),
            parse_retry_after(headers, Utc::now()),
        ),
        s if s.is_client_error() => policy.classify(
            s,
            extracted.unwrap_or_else(|| status_message(s)),
            payload.as_ref(),
        ),
        s if s.is_server_error() => {
            SonarQubeError::server(extracted.unwrap_or_else(|| status_message(s)), Some(s.as_u16()))
        }
        s => SonarQubeError::api(
            extracted.unwrap_or_else(|| status_message(s)),
            Some(s.as_u16()),
            None,
        ),
    }
}

/// Classifies a failure that produced no HTTP response.
///
/// `timeout` is the cutoff that was in force for the call; it is reported
/// in milliseconds on `Timeout` errors.
pub fn classify_transport(err: reqwest::Error, timeout: Option<Duration>) -> SonarQubeError {
    if err.is_timeout() {
        let message = match timeout {
            Some(t) => format!("Request timed out after {}ms", t.as_millis()),
            None => "Request timed out".to_string(),
        };
        return SonarQubeError::timeout(
            Some(message),
            timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
        );
    }

    let message = if err.is_connect() {
        "Failed to connect to the SonarQube server"
    } else if err.is_body() || err.is_decode() {
        "Failed to read the response body"
    } else {
        "Request to the SonarQube server failed"
    };
    SonarQubeError::network(message, Some(Box::new(err)))
}

/// `"HTTP 502 Bad Gateway"`.
pub fn status_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Reads `Retry-After` as delay seconds or an HTTP date.
///
/// Dates in the past yield `Some(0)`; unparseable values yield `None`.
pub fn parse_retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<u64> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(secs);
    }
    let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    Some((at - now).num_seconds().max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ErrorKind;
    use chrono::TimeZone;
    use reqwest::header::HeaderValue;

    const SONAR_BODY: &str = r#"{"errors":[{"msg":"Component key 'x' not found"}]}"#;

    fn classify(status: u16, body: &str) -> SonarQubeError {
        classify_status(
            StatusCode::from_u16(status).unwrap(),
            &HeaderMap::new(),
            body,
            &DefaultClientErrorPolicy,
        )
    }

    #[test]
    fn test_dedicated_statuses() {
        assert_eq!(classify(401, "").kind(), ErrorKind::Authentication);
        assert_eq!(classify(401, "").message(), "Authentication failed");
        assert_eq!(classify(403, "").message(), "Insufficient permissions");
        assert_eq!(classify(404, "").message(), "Resource not found");
        assert_eq!(classify(429, "").kind(), ErrorKind::RateLimit);
        assert_eq!(classify(429, "").retry_after(), None);
    }

    #[test]
    fn test_message_comes_from_payload() {
        let err = classify(404, SONAR_BODY);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Component key 'x' not found");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_server_errors() {
        let err = classify(503, "<html>down</html>");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.message(), "HTTP 503 Service Unavailable");
    }

    #[test]
    fn test_bad_request_policies() {
        let body = r#"{"errors":[{"msg":"Value of parameter 'from' is invalid","field":"from"}]}"#;
        let err = classify(400, body);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), None);
        assert_eq!(
            err.details().and_then(|d| d.get("field").cloned()),
            Some(Value::from("from"))
        );

        let err = classify_status(
            StatusCode::BAD_REQUEST,
            &HeaderMap::new(),
            body,
            &ApiOnlyClientErrorPolicy,
        );
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(
            err.details().and_then(|d| d.get("errors").cloned()),
            Some(serde_json::json!(["Value of parameter 'from' is invalid"]))
        );
    }

    #[test]
    fn test_bad_request_without_payload_is_api() {
        let err = classify(400, "oops");
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.message(), "HTTP 400 Bad Request");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_other_client_errors_are_api() {
        let err = classify(409, SONAR_BODY);
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status_code(), Some(409));
    }

    #[test]
    fn test_redirect_is_api() {
        let err = classify(302, "");
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status_code(), Some(302));
    }

    #[test]
    fn test_retry_after_seconds_and_date() {
        let now = Utc.with_ymd_and_hms(2026, 1, 12, 10, 0, 0).unwrap();
        let mut headers = HeaderMap::new();

        headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));
        assert_eq!(parse_retry_after(&headers, now), Some(120));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Mon, 12 Jan 2026 10:01:30 GMT"),
        );
        assert_eq!(parse_retry_after(&headers, now), Some(90));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Mon, 12 Jan 2026 09:00:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers, now), Some(0));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers, now), None);
    }

    #[test]
    fn test_rate_limit_reads_header() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        let err = classify_status(
            StatusCode::TOO_MANY_REQUESTS,
            &headers,
            "",
            &DefaultClientErrorPolicy,
        );
        assert_eq!(err.retry_after(), Some(30));
        assert_eq!(err.status_code(), Some(429));
    }
}
