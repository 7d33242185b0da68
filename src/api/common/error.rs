//
//  sonarqube-client
//  api/common/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # SonarQube Error Taxonomy
//!
//! Every failure produced by the client ends up as exactly one
//! [`SonarQubeError`] variant. Each variant carries a fixed machine-readable
//! code (see [`ErrorKind::code`]), an optional HTTP status, and optional
//! structured details, so callers can branch without matching on messages.
//!
//! | Variant | Code | Status |
//! |---------|------|--------|
//! | `Api` | `API_ERROR` | caller-supplied |
//! | `Validation` | `VALIDATION_ERROR` | none |
//! | `RateLimit` | `RATE_LIMIT_ERROR` | 429 |
//! | `Authentication` | `AUTHENTICATION_ERROR` | 401 |
//! | `Authorization` | `AUTHORIZATION_ERROR` | 403 |
//! | `NotFound` | `NOT_FOUND_ERROR` | 404 |
//! | `Network` | `NETWORK_ERROR` | none |
//! | `Timeout` | `TIMEOUT_ERROR` | none |
//! | `Server` | `SERVER_ERROR` | caller-supplied |
//!
//! Errors can cross a serialization boundary through [`ErrorRecord`], which
//! keeps only the code, message, status and details.
//!
//! ## Example
//!
//! ```rust
//! use sonarqube_client::api::common::{ErrorKind, SonarQubeError};
//!
//! let err = SonarQubeError::rate_limit("Too many requests", Some(60));
//! assert_eq!(err.kind(), ErrorKind::RateLimit);
//! assert_eq!(err.code(), "RATE_LIMIT_ERROR");
//! assert_eq!(err.status_code(), Some(429));
//! assert_eq!(err.retry_after(), Some(60));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Boxed lower-level error wrapped by [`SonarQubeError::Network`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used by the library surface.
pub type Result<T> = std::result::Result<T, SonarQubeError>;

pub const DEFAULT_AUTHENTICATION_MESSAGE: &str = "Authentication failed";
pub const DEFAULT_AUTHORIZATION_MESSAGE: &str = "Insufficient permissions";
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const DEFAULT_TIMEOUT_MESSAGE: &str = "Request timed out";

/// The closed set of error kinds.
///
/// The serde representation is the code string, so a kind survives a trip
/// through JSON unchanged. Unknown codes are rejected on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "API_ERROR")]
    Api,
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    #[serde(rename = "RATE_LIMIT_ERROR")]
    RateLimit,
    #[serde(rename = "AUTHENTICATION_ERROR")]
    Authentication,
    #[serde(rename = "AUTHORIZATION_ERROR")]
    Authorization,
    #[serde(rename = "NOT_FOUND_ERROR")]
    NotFound,
    #[serde(rename = "NETWORK_ERROR")]
    Network,
    #[serde(rename = "TIMEOUT_ERROR")]
    Timeout,
    #[serde(rename = "SERVER_ERROR")]
    Server,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::Api,
        ErrorKind::Validation,
        ErrorKind::RateLimit,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::NotFound,
        ErrorKind::Network,
        ErrorKind::Timeout,
        ErrorKind::Server,
    ];

    /// Returns the machine-readable code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            Self::Api => "API_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::RateLimit => "RATE_LIMIT_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::Authorization => "AUTHORIZATION_ERROR",
            Self::NotFound => "NOT_FOUND_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT_ERROR",
            Self::Server => "SERVER_ERROR",
        }
    }

    /// Looks up a kind by its code string.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// The status code fixed by the kind, if any.
    ///
    /// `Api` and `Server` carry a caller-supplied status and return `None`
    /// here; use [`SonarQubeError::status_code`] for the actual value.
    pub fn fixed_status(self) -> Option<u16> {
        match self {
            Self::RateLimit => Some(429),
            Self::Authentication => Some(401),
            Self::Authorization => Some(403),
            Self::NotFound => Some(404),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown error code '{}'", s))
    }
}

/// Unified error type for all SonarQube API operations.
///
/// Optional information that was not supplied at construction stays `None`;
/// no variant ever fills in a placeholder. Messages are human-readable and
/// suitable for logs, while [`code`](Self::code), [`status_code`](Self::status_code)
/// and [`details`](Self::details) are meant for programmatic branching.
///
/// # Example
///
/// ```rust
/// use sonarqube_client::api::common::SonarQubeError;
///
/// fn describe(err: &SonarQubeError) -> &'static str {
///     match err {
///         SonarQubeError::Authentication { .. } => "log in again",
///         SonarQubeError::RateLimit { .. } => "slow down",
///         e if e.is_retryable() => "try again later",
///         _ => "give up",
///     }
/// }
///
/// assert_eq!(describe(&SonarQubeError::authentication(None)), "log in again");
/// assert_eq!(describe(&SonarQubeError::server("boom", Some(503))), "try again later");
/// ```
#[derive(Error, Debug)]
pub enum SonarQubeError {
    /// Generic non-2xx response not otherwise classified.
    #[error("{message}")]
    Api {
        message: String,
        status_code: Option<u16>,
        details: Option<Map<String, Value>>,
    },

    /// The request or a precondition was invalid.
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The server rejected the call with HTTP 429.
    ///
    /// `retry_after` is the advised wait in seconds, when the server sent one.
    #[error("{message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// HTTP 401.
    #[error("{message}")]
    Authentication { message: String },

    /// HTTP 403.
    #[error("{message}")]
    Authorization { message: String },

    /// HTTP 404.
    #[error("{message}")]
    NotFound {
        message: String,
        resource: Option<String>,
    },

    /// The request never produced an HTTP response.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },

    /// A time-based cutoff elapsed before the response arrived.
    #[error("{message}")]
    Timeout {
        message: String,
        timeout_ms: Option<u64>,
    },

    /// Server-side failure, typically 5xx.
    #[error("{message}")]
    Server {
        message: String,
        status_code: Option<u16>,
    },
}

impl SonarQubeError {
    pub fn api(
        message: impl Into<String>,
        status_code: Option<u16>,
        details: Option<Map<String, Value>>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
            details,
        }
    }

    pub fn validation(message: impl Into<String>, field: Option<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field,
        }
    }

    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Builds an authentication error, defaulting the message to
    /// `"Authentication failed"`.
    pub fn authentication(message: Option<String>) -> Self {
        Self::Authentication {
            message: message.unwrap_or_else(|| DEFAULT_AUTHENTICATION_MESSAGE.to_string()),
        }
    }

    /// Builds an authorization error, defaulting the message to
    /// `"Insufficient permissions"`.
    pub fn authorization(message: Option<String>) -> Self {
        Self::Authorization {
            message: message.unwrap_or_else(|| DEFAULT_AUTHORIZATION_MESSAGE.to_string()),
        }
    }

    /// Builds a not-found error, defaulting the message to
    /// `"Resource not found"`.
    pub fn not_found(message: Option<String>, resource: Option<String>) -> Self {
        Self::NotFound {
            message: message.unwrap_or_else(|| DEFAULT_NOT_FOUND_MESSAGE.to_string()),
            resource,
        }
    }

    pub fn network(message: impl Into<String>, cause: Option<BoxError>) -> Self {
        Self::Network {
            message: message.into(),
            cause,
        }
    }

    /// Builds a timeout error, defaulting the message to `"Request timed out"`.
    pub fn timeout(message: Option<String>, timeout_ms: Option<u64>) -> Self {
        Self::Timeout {
            message: message.unwrap_or_else(|| DEFAULT_TIMEOUT_MESSAGE.to_string()),
            timeout_ms,
        }
    }

    pub fn server(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Server {
            message: message.into(),
            status_code,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { .. } => ErrorKind::Api,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Network { .. } => ErrorKind::Network,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Server { .. } => ErrorKind::Server,
        }
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Api { message, .. }
            | Self::Validation { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Authentication { message }
            | Self::Authorization { message }
            | Self::NotFound { message, .. }
            | Self::Network { message, .. }
            | Self::Timeout { message, .. }
            | Self::Server { message, .. } => message,
        }
    }

    /// The HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } | Self::Server { status_code, .. } => *status_code,
            other => other.kind().fixed_status(),
        }
    }

    /// Structured details, keyed the same way on every kind.
    ///
    /// Returns `None` when the error carries no optional information, never
    /// an empty map.
    pub fn details(&self) -> Option<Map<String, Value>> {
        let single = |key: &str, value: Value| {
            let mut map = Map::new();
            map.insert(key.to_string(), value);
            Some(map)
        };

        match self {
            Self::Api { details, .. } => details.clone(),
            Self::Validation {
                field: Some(field), ..
            } => single("field", Value::from(field.as_str())),
            Self::RateLimit {
                retry_after: Some(secs),
                ..
            } => single("retryAfter", Value::from(*secs)),
            Self::NotFound {
                resource: Some(resource),
                ..
            } => single("resource", Value::from(resource.as_str())),
            Self::Network {
                cause: Some(cause), ..
            } => single("cause", Value::from(cause.to_string())),
            Self::Timeout {
                timeout_ms: Some(ms),
                ..
            } => single("timeout", Value::from(*ms)),
            _ => None,
        }
    }

    /// Seconds the server asked the caller to wait, for rate-limit errors.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether repeating the same call later could reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimit | ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Server
        )
    }

    /// Converts the error into its serializable form.
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            message: self.message().to_string(),
            code: self.kind(),
            status_code: self.status_code(),
            details: self.details(),
        }
    }
}

impl Serialize for SonarQubeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_record().serialize(serializer)
    }
}

/// Serializable snapshot of a [`SonarQubeError`].
///
/// ```json
/// {"message": "Too many requests", "code": "RATE_LIMIT_ERROR", "statusCode": 429, "details": {"retryAfter": 60}}
/// ```
///
/// Absent status and details are omitted from the JSON rather than written
/// as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub message: String,
    pub code: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl From<&SonarQubeError> for ErrorRecord {
    fn from(err: &SonarQubeError) -> Self {
        err.to_record()
    }
}

/// Stand-in for a transport cause that was only available as text, such as
/// a network error rehydrated from an [`ErrorRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RemoteCause(pub String);

impl From<ErrorRecord> for SonarQubeError {
    fn from(record: ErrorRecord) -> Self {
        let ErrorRecord {
            message,
            code,
            status_code,
            details,
        } = record;

        let string_detail = |key: &str| {
            details
                .as_ref()
                .and_then(|d| d.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let number_detail = |key: &str| {
            details
                .as_ref()
                .and_then(|d| d.get(key))
                .and_then(Value::as_u64)
        };

        match code {
            ErrorKind::Api => Self::Api {
                message,
                status_code,
                details,
            },
            ErrorKind::Validation => Self::Validation {
                message,
                field: string_detail("field"),
            },
            ErrorKind::RateLimit => Self::RateLimit {
                message,
                retry_after: number_detail("retryAfter"),
            },
            ErrorKind::Authentication => Self::Authentication { message },
            ErrorKind::Authorization => Self::Authorization { message },
            ErrorKind::NotFound => Self::NotFound {
                message,
                resource: string_detail("resource"),
            },
            ErrorKind::Network => Self::Network {
                message,
                cause: string_detail("cause").map(|c| Box::new(RemoteCause(c)) as BoxError),
            },
            ErrorKind::Timeout => Self::Timeout {
                message,
                timeout_ms: number_detail("timeout"),
            },
            ErrorKind::Server => Self::Server {
                message,
                status_code,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::error::Error as _;

    fn every_kind() -> Vec<SonarQubeError> {
        vec![
            SonarQubeError::api("api", Some(418), None),
            SonarQubeError::validation("bad", None),
            SonarQubeError::rate_limit("slow", None),
            SonarQubeError::authentication(None),
            SonarQubeError::authorization(None),
            SonarQubeError::not_found(None, None),
            SonarQubeError::network("down", None),
            SonarQubeError::timeout(None, None),
            SonarQubeError::server("boom", Some(500)),
        ]
    }

    #[test]
    fn test_codes_are_unique_and_round_trip() {
        let codes: HashSet<_> = ErrorKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), ErrorKind::ALL.len());

        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_code(kind.code()), Some(kind));
            assert_eq!(kind.code().parse::<ErrorKind>(), Ok(kind));
        }
        assert!(ErrorKind::from_code("SOMETHING_ELSE").is_none());
    }

    #[test]
    fn test_required_only_leaves_optionals_absent() {
        for err in every_kind() {
            assert!(err.details().is_none(), "{} has details", err.code());
            assert!(err.retry_after().is_none());
            assert!(err.source().is_none());
        }

        assert_eq!(SonarQubeError::validation("bad", None).status_code(), None);
        assert_eq!(SonarQubeError::network("down", None).status_code(), None);
        assert_eq!(SonarQubeError::timeout(None, None).status_code(), None);
        assert_eq!(SonarQubeError::api("x", None, None).status_code(), None);
        assert_eq!(SonarQubeError::server("x", None).status_code(), None);
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(
            SonarQubeError::authentication(None).message(),
            "Authentication failed"
        );
        assert_eq!(
            SonarQubeError::authorization(None).message(),
            "Insufficient permissions"
        );
        assert_eq!(
            SonarQubeError::not_found(None, None).message(),
            "Resource not found"
        );
        assert_eq!(SonarQubeError::timeout(None, None).message(), "Request timed out");
        assert_eq!(
            SonarQubeError::authentication(Some("Token expired".into())).to_string(),
            "Token expired"
        );
    }

    #[test]
    fn test_fixed_status_codes() {
        assert_eq!(SonarQubeError::authentication(None).status_code(), Some(401));
        assert_eq!(SonarQubeError::authorization(None).status_code(), Some(403));
        assert_eq!(SonarQubeError::not_found(None, None).status_code(), Some(404));
        assert_eq!(SonarQubeError::rate_limit("x", None).status_code(), Some(429));
        assert_eq!(SonarQubeError::server("x", Some(502)).status_code(), Some(502));
    }

    #[test]
    fn test_not_found_details_are_exact() {
        let err = SonarQubeError::not_found(
            Some("X not found".to_string()),
            Some("project".to_string()),
        );
        let mut expected = Map::new();
        expected.insert("resource".to_string(), Value::from("project"));
        assert_eq!(err.details(), Some(expected));
        assert_eq!(err.message(), "X not found");
    }

    #[test]
    fn test_rate_limit_retry_after() {
        let err = SonarQubeError::rate_limit("msg", Some(60));
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.retry_after(), Some(60));
        assert_eq!(
            err.details().and_then(|d| d.get("retryAfter").cloned()),
            Some(Value::from(60))
        );

        assert_eq!(SonarQubeError::rate_limit("msg", None).retry_after(), None);
    }

    #[test]
    fn test_kinds_are_disjoint() {
        for err in every_kind() {
            let matching = ErrorKind::ALL.iter().filter(|k| err.is_kind(**k)).count();
            assert_eq!(matching, 1);
        }
        let api = SonarQubeError::api("x", Some(400), None);
        assert!(!api.is_kind(ErrorKind::Authentication));
        assert!(!matches!(api, SonarQubeError::Authentication { .. }));
    }

    #[test]
    fn test_catch_all_as_std_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> =
            Box::new(SonarQubeError::authorization(None));
        let err = boxed.downcast_ref::<SonarQubeError>().unwrap();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn test_network_cause_is_source_and_detail() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SonarQubeError::network("Connection failed", Some(Box::new(io)));
        assert_eq!(err.source().map(|s| s.to_string()), Some("refused".to_string()));
        assert_eq!(
            err.details().and_then(|d| d.get("cause").cloned()),
            Some(Value::from("refused"))
        );
    }

    #[test]
    fn test_serialized_form_omits_absent_fields() {
        let json = serde_json::to_value(SonarQubeError::validation("bad", None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "bad", "code": "VALIDATION_ERROR"})
        );

        let json = serde_json::to_value(SonarQubeError::rate_limit("slow", Some(5))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "slow",
                "code": "RATE_LIMIT_ERROR",
                "statusCode": 429,
                "details": {"retryAfter": 5}
            })
        );
    }

    #[test]
    fn test_rehydrate_from_record() {
        let original = SonarQubeError::timeout(None, Some(30_000));
        let text = serde_json::to_string(&original).unwrap();
        let record: ErrorRecord = serde_json::from_str(&text).unwrap();
        let restored = SonarQubeError::from(record);

        assert_eq!(restored.kind(), ErrorKind::Timeout);
        assert_eq!(restored.message(), "Request timed out");
        assert_eq!(restored.details(), original.details());

        let network = SonarQubeError::network(
            "down",
            Some(Box::new(RemoteCause("dns failure".into()))),
        );
        let restored = SonarQubeError::from(network.to_record());
        assert_eq!(
            restored.source().map(|s| s.to_string()),
            Some("dns failure".to_string())
        );
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let result = serde_json::from_str::<ErrorRecord>(r#"{"message":"x","code":"NOPE"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(SonarQubeError::rate_limit("x", None).is_retryable());
        assert!(SonarQubeError::server("x", Some(503)).is_retryable());
        assert!(SonarQubeError::network("x", None).is_retryable());
        assert!(SonarQubeError::timeout(None, None).is_retryable());
        assert!(!SonarQubeError::authentication(None).is_retryable());
        assert!(!SonarQubeError::validation("x", None).is_retryable());
    }
}
