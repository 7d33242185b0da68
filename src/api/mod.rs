//
//  sonarqube-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the request execution pipeline for the SonarQube
//! Web API and the thin resource clients built on it.
//!
//! ## Architecture
//!
//! - [`client`]: The request executor ([`SonarQubeClient`]) and its builder
//! - [`request`]: Per-call options (query, body, headers, timeout)
//! - [`response`]: Decoded success responses
//! - [`classify`]: Status-to-error mapping and the client error policy
//! - [`retry`]: Optional retry decorator
//! - [`resources`]: One wrapper per API area
//! - [`common`]: Error taxonomy and SonarQube's error body
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sonarqube_client::api::SonarQubeClient;
//! use sonarqube_client::auth::AuthProvider;
//!
//! # async fn example() -> sonarqube_client::api::common::Result<()> {
//! let client = SonarQubeClient::new("https://sonar.example.com", AuthProvider::token("squ_abc"))?;
//! println!("Server version {}", client.server().version().await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`SonarQubeError`](common::SonarQubeError):
//!
//! - `Authentication`: 401 Unauthorized
//! - `Authorization`: 403 Forbidden
//! - `NotFound`: 404 Not Found
//! - `RateLimit`: 429 Too Many Requests
//! - `Validation` / `Api`: other 4xx, per [`ClientErrorPolicy`]
//! - `Server`: 5xx Server Errors
//! - `Network` / `Timeout`: no response received

/// Core HTTP request executor.
pub mod client;

/// Request options and body encodings.
pub mod request;

/// Success response decoding.
pub mod response;

/// Failure classification.
pub mod classify;

/// Retry decorator layered outside the executor.
pub mod retry;

/// Per-area endpoint wrappers.
pub mod resources;

/// Error taxonomy and shared payload types.
pub mod common;

pub use classify::{ApiOnlyClientErrorPolicy, ClientErrorPolicy, DefaultClientErrorPolicy};
pub use client::{ClientBuilder, SonarQubeClient, DEFAULT_TIMEOUT};
pub use request::{RequestBody, RequestOptions};
pub use response::ApiResponse;
pub use retry::{with_retry, RetryPolicy};

/// Re-export of common API types.
pub use common::{ErrorKind, SonarQubeError};
