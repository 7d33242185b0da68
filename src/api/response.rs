//
//  sonarqube-client
//  api/response.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Decoded success responses.
//!
//! The executor turns every 2xx response into an [`ApiResponse`]. A response
//! without a body is [`ApiResponse::NoContent`]; it is never coerced into an
//! empty JSON object.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::common::{Result, SonarQubeError};

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The server answered without a body (e.g. 204).
    NoContent,
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
}

impl ApiResponse {
    /// Decodes a successful response body according to its content type.
    ///
    /// - 204/205 or an empty body → [`NoContent`](Self::NoContent)
    /// - `*/json` or `*+json` → [`Json`](Self::Json)
    /// - `text/*` → [`Text`](Self::Text)
    /// - no content type → JSON if it parses, text otherwise
    /// - anything else → [`Binary`](Self::Binary)
    pub(crate) fn decode(status: StatusCode, headers: &HeaderMap, body: Vec<u8>) -> Result<Self> {
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT || body.is_empty()
        {
            return Ok(Self::NoContent);
        }

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());

        match content_type.as_deref() {
            Some(ct) if is_json(ct) => serde_json::from_slice(&body).map(Self::Json).map_err(|e| {
                SonarQubeError::api(
                    format!("Failed to decode JSON response: {}", e),
                    Some(status.as_u16()),
                    None,
                )
            }),
            Some(ct) if ct.starts_with("text/") => match String::from_utf8(body) {
                Ok(text) => Ok(Self::Text(text)),
                Err(e) => Ok(Self::Binary(e.into_bytes())),
            },
            Some(_) => Ok(Self::Binary(body)),
            None => {
                if let Ok(value) = serde_json::from_slice::<Value>(&body) {
                    return Ok(Self::Json(value));
                }
                match String::from_utf8(body) {
                    Ok(text) => Ok(Self::Text(text)),
                    Err(e) => Ok(Self::Binary(e.into_bytes())),
                }
            }
        }
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    /// Returns the JSON value, if this is a JSON response.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Deserializes a JSON response into `T`.
    ///
    /// # Errors
    ///
    /// [`SonarQubeError::Api`] when the response has no body, is not JSON, or
    /// does not match the shape of `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Json(value) => serde_json::from_value(value).map_err(|e| {
                SonarQubeError::api(format!("Unexpected response shape: {}", e), None, None)
            }),
            Self::NoContent => Err(SonarQubeError::api(
                "Expected a JSON response but the server returned no content",
                None,
                None,
            )),
            Self::Text(_) | Self::Binary(_) => Err(SonarQubeError::api(
                "Expected a JSON response but the server returned a non-JSON body",
                None,
                None,
            )),
        }
    }

    /// Returns the body as text.
    ///
    /// JSON responses are rendered back to their compact string form.
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Json(value) => Ok(value.to_string()),
            Self::Binary(bytes) => String::from_utf8(bytes).map_err(|_| {
                SonarQubeError::api("Response body is not valid UTF-8 text", None, None)
            }),
            Self::NoContent => Err(SonarQubeError::api(
                "Expected a text response but the server returned no content",
                None,
                None,
            )),
        }
    }

    /// Returns the raw body bytes. `NoContent` yields an empty vector.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::NoContent => Vec::new(),
            Self::Json(value) => value.to_string().into_bytes(),
            Self::Text(text) => text.into_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.ends_with("/json") || essence.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_no_content() {
        let response =
            ApiResponse::decode(StatusCode::NO_CONTENT, &HeaderMap::new(), Vec::new()).unwrap();
        assert!(response.is_no_content());

        let response =
            ApiResponse::decode(StatusCode::OK, &headers("application/json"), Vec::new()).unwrap();
        assert_eq!(response, ApiResponse::NoContent);
    }

    #[test]
    fn test_json_with_charset() {
        let response = ApiResponse::decode(
            StatusCode::OK,
            &headers("application/json;charset=utf-8"),
            br#"{"status":"UP"}"#.to_vec(),
        )
        .unwrap();
        assert_eq!(response.as_json().unwrap()["status"], "UP");
    }

    #[test]
    fn test_plain_text_version() {
        let response =
            ApiResponse::decode(StatusCode::OK, &headers("text/plain"), b"10.4.1.88267".to_vec())
                .unwrap();
        assert_eq!(response, ApiResponse::Text("10.4.1.88267".to_string()));
    }

    #[test]
    fn test_binary_and_missing_content_type() {
        let response = ApiResponse::decode(
            StatusCode::OK,
            &headers("application/zip"),
            vec![0x50, 0x4b, 0x03, 0x04],
        )
        .unwrap();
        assert!(matches!(response, ApiResponse::Binary(_)));

        let response =
            ApiResponse::decode(StatusCode::OK, &HeaderMap::new(), b"[1,2]".to_vec()).unwrap();
        assert!(response.as_json().unwrap().is_array());

        let response =
            ApiResponse::decode(StatusCode::OK, &HeaderMap::new(), b"pong".to_vec()).unwrap();
        assert_eq!(response.into_text().unwrap(), "pong");
    }

    #[test]
    fn test_malformed_json_is_api_error() {
        let err = ApiResponse::decode(StatusCode::OK, &headers("application/json"), b"{".to_vec())
            .unwrap_err();
        assert_eq!(err.code(), "API_ERROR");
        assert_eq!(err.status_code(), Some(200));
    }

    #[test]
    fn test_no_content_is_not_an_empty_object() {
        let err = ApiResponse::NoContent
            .into_json::<serde_json::Map<String, Value>>()
            .unwrap_err();
        assert_eq!(err.code(), "API_ERROR");
        assert!(ApiResponse::NoContent.into_bytes().is_empty());
    }
}
