//
//  sonarqube-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Per-call request options.
//!
//! A [`RequestOptions`] value describes everything about one call besides
//! the method and path: query parameters, an optional body, extra headers
//! and a timeout override.
//!
//! ```rust
//! use std::time::Duration;
//! use sonarqube_client::api::RequestOptions;
//!
//! let options = RequestOptions::new()
//!     .query("project", "my-app")
//!     .form([("name", "My App")])
//!     .timeout(Duration::from_secs(5));
//! assert!(options.body.is_some());
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use super::common::{Result, SonarQubeError};

/// Request body and how it is encoded on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as `application/json`.
    Json(Value),
    /// Serialized as `application/x-www-form-urlencoded`, the encoding most
    /// SonarQube `POST` endpoints expect.
    Form(Vec<(String, String)>),
    /// Raw text with an explicit content type, e.g. CSV uploads.
    Text { content_type: String, body: String },
}

impl RequestBody {
    pub fn content_type(&self) -> &str {
        match self {
            Self::Json(_) => "application/json",
            Self::Form(_) => "application/x-www-form-urlencoded",
            Self::Text { content_type, .. } => content_type,
        }
    }

    /// Encodes the body into bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Self::Json(value) => serde_json::to_vec(value).map_err(|e| {
                SonarQubeError::validation(format!("Failed to encode JSON body: {}", e), None)
            }),
            Self::Form(pairs) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    .finish();
                Ok(encoded.into_bytes())
            }
            Self::Text { body, .. } => Ok(body.clone().into_bytes()),
        }
    }
}

/// Options for a single call through the executor.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub headers: HeaderMap,
    /// Overrides the client-wide timeout for this call only.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets a JSON body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            SonarQubeError::validation(format!("Failed to encode JSON body: {}", e), None)
        })?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body = Some(RequestBody::Form(pairs));
        self
    }

    pub fn text(mut self, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text {
            content_type: content_type.into(),
            body: body.into(),
        });
        self
    }

    /// Adds an extra header.
    ///
    /// # Errors
    ///
    /// Returns [`SonarQubeError::Validation`] if the name or value is not a
    /// valid HTTP header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let invalid = |what: &str| {
            SonarQubeError::validation(
                format!("Invalid header {} for '{}'", what, name),
                Some(name.to_string()),
            )
        };
        let header_name =
            HeaderName::from_bytes(name.trim().as_bytes()).map_err(|_| invalid("name"))?;
        let header_value = HeaderValue::from_str(value.trim()).map_err(|_| invalid("value"))?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the initial header collection for the call.
    ///
    /// Starts empty, adds `Content-Type` only when a body is present, then
    /// layers the caller's extra headers on top.
    pub(crate) fn base_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(body) = &self.body {
            let value = HeaderValue::from_str(body.content_type()).map_err(|_| {
                SonarQubeError::validation(
                    format!("Invalid content type '{}'", body.content_type()),
                    Some("content_type".to_string()),
                )
            })?;
            headers.insert(CONTENT_TYPE, value);
        }
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }
}
