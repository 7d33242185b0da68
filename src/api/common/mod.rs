//
//  sonarqube-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the SonarQube Web API
//!
//! This module provides the types shared by the request executor and every
//! resource client: the error taxonomy and the shape of SonarQube's error
//! response body.
//!
//! # Overview
//!
//! - [`SonarQubeError`] - Unified error type for all API operations
//! - [`ErrorKind`] - The closed set of error kinds and their codes
//! - [`ErrorRecord`] - Serializable snapshot of an error
//! - [`ErrorPayload`] - The `{"errors": [{"msg": "..."}]}` failure body
//!
//! # Example
//!
//! ```rust
//! use sonarqube_client::api::common::{SonarQubeError, ErrorKind};
//!
//! fn handle_result<T>(result: Result<T, SonarQubeError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(SonarQubeError::Authentication { .. }) => println!("Please authenticate first"),
//!         Err(e) if e.kind() == ErrorKind::NotFound => println!("Missing: {}", e),
//!         Err(e) => println!("Error [{}]: {}", e.code(), e),
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

mod error;

pub use error::*;

/// Failure body returned by the SonarQube Web API.
///
/// ```json
/// {"errors": [{"msg": "The 'component' parameter is missing"}]}
/// ```
///
/// Entries may carry extra keys (`field` or `param` on some endpoints); they
/// are kept so a [`ClientErrorPolicy`](crate::api::ClientErrorPolicy) can
/// inspect them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub errors: Vec<ErrorMessage>,
}

/// A single entry of an [`ErrorPayload`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(default)]
    pub msg: Option<String>,

    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub param: Option<String>,
}

impl ErrorPayload {
    /// Parses a response body, returning `None` unless it is a JSON object
    /// with an `errors` array.
    pub fn parse(body: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        if !value.get("errors").is_some_and(|e| e.is_array()) {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// The first non-empty `msg`, if any.
    pub fn first_message(&self) -> Option<&str> {
        self.messages().next()
    }

    /// All non-empty messages in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter_map(|e| e.msg.as_deref())
            .filter(|m| !m.trim().is_empty())
    }

    /// The first field or parameter named by any entry.
    pub fn first_field(&self) -> Option<&str> {
        self.errors
            .iter()
            .find_map(|e| e.field.as_deref().or(e.param.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sonar_error_body() {
        let payload =
            ErrorPayload::parse(r#"{"errors":[{"msg":"Project key is missing"},{"msg":"other"}]}"#)
                .unwrap();
        assert_eq!(payload.first_message(), Some("Project key is missing"));
        assert_eq!(payload.messages().count(), 2);
        assert_eq!(payload.first_field(), None);
    }

    #[test]
    fn test_parse_field_and_param() {
        let payload =
            ErrorPayload::parse(r#"{"errors":[{"msg":"bad"},{"msg":"worse","param":"from"}]}"#)
                .unwrap();
        assert_eq!(payload.first_field(), Some("from"));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(ErrorPayload::parse("not json").is_none());
        assert!(ErrorPayload::parse(r#"{"message":"nope"}"#).is_none());
        assert!(ErrorPayload::parse(r#"[1,2]"#).is_none());
    }

    #[test]
    fn test_blank_messages_are_skipped() {
        let payload = ErrorPayload::parse(r#"{"errors":[{"msg":"  "},{}]}"#).unwrap();
        assert_eq!(payload.first_message(), None);
    }
}
