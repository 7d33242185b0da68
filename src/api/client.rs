//
//  sonarqube-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the SonarQube Web API
//!
//! This module provides the request executor every resource client goes
//! through. It guarantees that authentication is applied and failures are
//! classified the same way for every endpoint.
//!
//! ## Call Flow
//!
//! ```text
//! build URL + headers → apply auth → send → network failure  → Network / Timeout
//!                                         → non-2xx          → classified error
//!                                         → 2xx              → ApiResponse
//! ```
//!
//! The executor keeps no cache and never retries. One logical call in, one
//! classified result or error out. Wrap calls with
//! [`with_retry`](super::retry::with_retry) when retries are wanted.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::classify::{classify_status, classify_transport, ClientErrorPolicy, DefaultClientErrorPolicy};
use super::common::{Result, SonarQubeError};
use super::request::RequestOptions;
use super::response::ApiResponse;
use crate::auth::AuthProvider;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`SonarQubeClient`].
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use sonarqube_client::api::SonarQubeClient;
/// use sonarqube_client::auth::AuthProvider;
///
/// let client = SonarQubeClient::builder("https://sonar.example.com")
///     .auth(AuthProvider::token("squ_abc"))
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok::<(), sonarqube_client::api::common::SonarQubeError>(())
/// ```
pub struct ClientBuilder {
    base_url: String,
    auth: AuthProvider,
    timeout: Option<Duration>,
    user_agent: String,
    policy: Arc<dyn ClientErrorPolicy>,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: AuthProvider::None,
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: format!("sq/{}", crate::VERSION),
            policy: Arc::new(DefaultClientErrorPolicy),
        }
    }

    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    /// Client-wide timeout. `None` disables the cutoff; callers then rely on
    /// dropping the future to cancel.
    pub fn timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replaces the rule used for generic 4xx responses.
    pub fn client_error_policy(mut self, policy: Arc<dyn ClientErrorPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the configuration and creates the client.
    ///
    /// # Errors
    ///
    /// - [`SonarQubeError::Validation`] with field `base_url` if the URL is not
    ///   an absolute `http`/`https` URL.
    /// - [`SonarQubeError::Network`] if the HTTP stack cannot be initialized.
    pub fn build(self) -> Result<SonarQubeClient> {
        let base_url = parse_base_url(&self.base_url)?;

        let mut http = Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(|e| {
            SonarQubeError::network("Failed to initialize the HTTP client", Some(Box::new(e)))
        })?;

        Ok(SonarQubeClient {
            http,
            base_url,
            auth: self.auth,
            timeout: self.timeout,
            policy: self.policy,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let invalid = |reason: String| {
        SonarQubeError::validation(
            format!("Invalid base URL '{}': {}", raw, reason),
            Some("base_url".to_string()),
        )
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// The request executor for a SonarQube server.
///
/// Holds only immutable configuration, so it can be shared across tasks
/// (clone it or wrap it in an `Arc`) and used for concurrent calls without
/// locking.
///
/// # Example
///
/// ```rust,no_run
/// use reqwest::Method;
/// use sonarqube_client::api::{RequestOptions, SonarQubeClient};
/// use sonarqube_client::auth::AuthProvider;
///
/// # async fn example() -> sonarqube_client::api::common::Result<()> {
/// let client = SonarQubeClient::new("https://sonar.example.com", AuthProvider::token("squ_abc"))?;
///
/// let response = client
///     .execute(Method::GET, "api/system/status", RequestOptions::new())
///     .await?;
/// println!("{:?}", response.as_json());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SonarQubeClient {
    http: Client,
    base_url: Url,
    auth: AuthProvider,
    timeout: Option<Duration>,
    policy: Arc<dyn ClientErrorPolicy>,
}

impl fmt::Debug for SonarQubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonarQubeClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .field("timeout", &self.timeout)
            .field("policy", &self.policy)
            .finish()
    }
}

impl SonarQubeClient {
    /// Creates a client with default settings.
    pub fn new(base_url: impl Into<String>, auth: AuthProvider) -> Result<Self> {
        ClientBuilder::new(base_url).auth(auth).build()
    }

    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthProvider {
        &self.auth
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolves `path` (and `query`) against the base URL.
    ///
    /// A context path on the base URL is preserved and a leading `/` on
    /// `path` is optional: `https://host/sonar` + `/api/system/status` →
    /// `https://host/sonar/api/system/status`.
    pub fn endpoint_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, path)).map_err(|e| {
            SonarQubeError::validation(
                format!("Invalid request path '{}': {}", path, e),
                Some("path".to_string()),
            )
        })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    /// Issues one HTTP call and classifies its outcome.
    ///
    /// # Errors
    ///
    /// Every failure is returned as exactly one [`SonarQubeError`] kind:
    /// `Network`/`Timeout` when no response arrived, a status-derived kind for
    /// non-2xx responses, `Api` when a 2xx JSON body cannot be decoded, and
    /// `Validation` when the request itself cannot be built.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        let url = self.endpoint_url(path, &options.query)?;
        let headers = self.auth.apply_auth(options.base_headers()?)?;

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.encode()?);
        }
        let timeout = options.timeout.or(self.timeout);
        if let Some(per_call) = options.timeout {
            request = request.timeout(per_call);
        }

        tracing::debug!(%method, url = %url, "sending request");
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%method, url = %url, error = %e, "request failed without response");
                return Err(classify_transport(e, timeout));
            }
        };

        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport(e, timeout))?;

        tracing::debug!(
            %method,
            url = %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received response"
        );

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(classify_status(
                status,
                &response_headers,
                &text,
                self.policy.as_ref(),
            ));
        }

        ApiResponse::decode(status, &response_headers, body.to_vec())
    }

    /// `GET` returning a deserialized JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.execute(Method::GET, path, with_query(query))
            .await?
            .into_json()
    }

    /// `GET` returning the body as text.
    pub async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        self.execute(Method::GET, path, with_query(query))
            .await?
            .into_text()
    }

    /// `POST` with a form-encoded body.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<ApiResponse> {
        let options = RequestOptions::new().form(form.iter().copied());
        self.execute(Method::POST, path, options).await
    }

    /// `POST` with a JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse> {
        let options = RequestOptions::new().json(body)?;
        self.execute(Method::POST, path, options).await
    }

    /// `DELETE` the given path.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.execute(Method::DELETE, path, RequestOptions::new())
            .await
    }

    /// The headers that a call with `options` would carry, auth included.
    ///
    /// Useful for diagnostics such as `sq api --dry-run`.
    pub fn prepared_headers(&self, options: &RequestOptions) -> Result<HeaderMap> {
        self.auth.apply_auth(options.base_headers()?)
    }
}

fn with_query(query: &[(&str, &str)]) -> RequestOptions {
    query
        .iter()
        .fold(RequestOptions::new(), |options, (k, v)| options.query(*k, *v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_paths() {
        let client = SonarQubeClient::new("https://sonar.example.com", AuthProvider::None).unwrap();
        assert_eq!(
            client.endpoint_url("api/system/status", &[]).unwrap().as_str(),
            "https://sonar.example.com/api/system/status"
        );
        assert_eq!(
            client.endpoint_url("/api/system/status", &[]).unwrap().as_str(),
            "https://sonar.example.com/api/system/status"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_context_path_and_encodes_query() {
        let client = SonarQubeClient::new("http://host:9000/sonar/", AuthProvider::None).unwrap();
        let url = client
            .endpoint_url(
                "api/audit_logs/download",
                &[("from".to_string(), "2026-01-01T00:00:00+00:00".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://host:9000/sonar/api/audit_logs/download?from=2026-01-01T00%3A00%3A00%2B00%3A00"
        );
    }

    #[test]
    fn test_invalid_base_urls() {
        for raw in ["not a url", "ftp://sonar.example.com", "sonar.example.com"] {
            let err = SonarQubeClient::new(raw, AuthProvider::None).unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR", "{}", raw);
            assert_eq!(
                err.details().and_then(|d| d.get("field").cloned()),
                Some(serde_json::Value::from("base_url"))
            );
        }
    }

    #[test]
    fn test_prepared_headers_with_empty_token() {
        let client =
            SonarQubeClient::new("https://sonar.example.com", AuthProvider::token("")).unwrap();
        let headers = client.prepared_headers(&RequestOptions::new()).unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_debug_hides_token() {
        let client =
            SonarQubeClient::new("https://sonar.example.com", AuthProvider::token("squ_secret"))
                .unwrap();
        assert!(!format!("{:?}", client).contains("squ_secret"));
    }
}
