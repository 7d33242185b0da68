//
//  sonarqube-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module provides the authentication strategies used by the SonarQube
//! client, plus credential storage helpers for the command-line front end.
//!
//! ## Supported Authentication Methods
//!
//! - **None**: Anonymous access, no credentials attached.
//! - **Token**: User or project analysis token sent as `Authorization: Bearer <token>`.
//! - **Basic**: Username/password sent as HTTP Basic authentication.
//! - **Passcode**: Monitoring passcode sent as `X-Sonar-Passcode`, accepted by
//!   the system health endpoint.
//!
//! ## Module Structure
//!
//! - [`token`]: Token input and format validation
//! - [`keyring`]: Secure credential storage using the system keyring
//!
//! ## Example
//!
//! ```rust
//! use reqwest::header::{HeaderMap, AUTHORIZATION};
//! use sonarqube_client::auth::{AuthProvider, AuthType};
//!
//! let provider = AuthProvider::token("squ_1234");
//! assert_eq!(provider.auth_type(), AuthType::Token);
//!
//! let headers = provider.apply_auth(HeaderMap::new())?;
//! assert_eq!(headers[AUTHORIZATION], "Bearer squ_1234");
//! # Ok::<(), sonarqube_client::api::common::SonarQubeError>(())
//! ```

mod keyring;
mod token;

pub use keyring::*;
pub use token::*;

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use crate::api::common::{Result, SonarQubeError};

/// Header carrying the monitoring passcode.
pub const PASSCODE_HEADER: &str = "x-sonar-passcode";

/// Identifying tag of an [`AuthProvider`].
///
/// The lowercase string form (`none`, `token`, `basic`, `passcode`) is what
/// the configuration file stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[default]
    None,
    Token,
    Basic,
    Passcode,
}

impl AuthType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Token => "token",
            Self::Basic => "basic",
            Self::Passcode => "passcode",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "token" | "bearer" => Ok(Self::Token),
            "basic" => Ok(Self::Basic),
            "passcode" => Ok(Self::Passcode),
            other => Err(format!(
                "unknown auth type '{}'. Valid values: none, token, basic, passcode",
                other
            )),
        }
    }
}

/// Authentication strategy attached to a client at construction time.
///
/// Each variant carries only the credential material it needs. Applying a
/// provider only ever touches the header it owns, so reapplying it with the
/// same credential yields the same header collection.
///
/// `Debug` output redacts every secret.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AuthProvider {
    /// Anonymous access.
    #[default]
    None,
    /// Bearer token. An empty token means anonymous access.
    Token { token: String },
    /// HTTP Basic credentials.
    Basic { username: String, password: String },
    /// Monitoring passcode (`X-Sonar-Passcode`).
    Passcode { passcode: String },
}

impl AuthProvider {
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token {
            token: token.into(),
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn passcode(passcode: impl Into<String>) -> Self {
        Self::Passcode {
            passcode: passcode.into(),
        }
    }

    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::None => AuthType::None,
            Self::Token { .. } => AuthType::Token,
            Self::Basic { .. } => AuthType::Basic,
            Self::Passcode { .. } => AuthType::Passcode,
        }
    }

    /// Adds this provider's credentials to `headers`.
    ///
    /// Unrelated headers pass through untouched. [`AuthProvider::None`] and
    /// empty credentials return the collection exactly as given, including
    /// any `Authorization` header the caller set explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`SonarQubeError::Validation`] naming the credential field when
    /// it cannot be encoded as an HTTP header value.
    pub fn apply_auth(&self, mut headers: HeaderMap) -> Result<HeaderMap> {
        match self {
            Self::None => {}
            Self::Token { token } => {
                if !token.is_empty() {
                    let value = header_value(&format!("Bearer {}", token), "token")?;
                    headers.insert(AUTHORIZATION, value);
                }
            }
            Self::Basic { username, password } => {
                if !username.is_empty() || !password.is_empty() {
                    let encoded = STANDARD.encode(format!("{}:{}", username, password));
                    let value = header_value(&format!("Basic {}", encoded), "username")?;
                    headers.insert(AUTHORIZATION, value);
                }
            }
            Self::Passcode { passcode } => {
                if !passcode.is_empty() {
                    let value = header_value(passcode, "passcode")?;
                    headers.insert(HeaderName::from_static(PASSCODE_HEADER), value);
                }
            }
        }
        Ok(headers)
    }
}

fn header_value(raw: &str, field: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(raw).map_err(|_| {
        SonarQubeError::validation(
            format!("The {} contains characters not allowed in an HTTP header", field),
            Some(field.to_string()),
        )
    })?;
    value.set_sensitive(true);
    Ok(value)
}

impl fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Token { token } => f
                .debug_struct("Token")
                .field("token", &redact(token))
                .finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Passcode { passcode } => f
                .debug_struct("Passcode")
                .field("passcode", &redact(passcode))
                .finish(),
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-custom", HeaderValue::from_static("v"));
        headers
    }

    #[test]
    fn test_none_leaves_headers_untouched() {
        let headers = AuthProvider::None.apply_auth(custom_headers()).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["x-custom"], "v");
        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(headers.get(PASSCODE_HEADER).is_none());
    }

    #[test]
    fn test_none_keeps_existing_authorization() {
        let mut headers = custom_headers();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer caller"));
        let headers = AuthProvider::None.apply_auth(headers).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer caller");
    }

    #[test]
    fn test_token_sets_bearer() {
        let headers = AuthProvider::token("abc").apply_auth(custom_headers()).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert_eq!(headers["x-custom"], "v");
    }

    #[test]
    fn test_empty_token_adds_no_authorization() {
        let headers = AuthProvider::token("").apply_auth(custom_headers()).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_basic_encodes_credentials() {
        let headers = AuthProvider::basic("admin", "secret")
            .apply_auth(HeaderMap::new())
            .unwrap();
        assert_eq!(headers[AUTHORIZATION], "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_passcode_header() {
        let headers = AuthProvider::passcode("monitor")
            .apply_auth(custom_headers())
            .unwrap();
        assert_eq!(headers[PASSCODE_HEADER], "monitor");
        assert!(headers.get(AUTHORIZATION).is_none());

        let headers = AuthProvider::passcode("").apply_auth(HeaderMap::new()).unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_apply_is_idempotent() {
        for provider in [
            AuthProvider::None,
            AuthProvider::token("abc"),
            AuthProvider::basic("u", "p"),
            AuthProvider::passcode("pc"),
        ] {
            let once = provider.apply_auth(custom_headers()).unwrap();
            let twice = provider.apply_auth(once.clone()).unwrap();
            assert_eq!(once, twice, "{:?}", provider.auth_type());
        }
    }

    #[test]
    fn test_invalid_header_value_is_validation_error() {
        let err = AuthProvider::token("bad\ntoken")
            .apply_auth(HeaderMap::new())
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(
            err.details().and_then(|d| d.get("field").cloned()),
            Some(serde_json::Value::from("token"))
        );
    }

    #[test]
    fn test_auth_type_tags() {
        assert_eq!(AuthProvider::None.auth_type(), AuthType::None);
        assert_eq!(AuthProvider::token("x").auth_type(), AuthType::Token);
        assert_eq!(AuthProvider::basic("u", "p").auth_type(), AuthType::Basic);
        assert_eq!(AuthProvider::passcode("p").auth_type(), AuthType::Passcode);
        assert_eq!("Bearer".parse::<AuthType>(), Ok(AuthType::Token));
        assert!("oauth".parse::<AuthType>().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", AuthProvider::basic("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
        assert!(!format!("{:?}", AuthProvider::token("squ_secret")).contains("squ_secret"));
    }
}
