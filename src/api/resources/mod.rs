//
//  sonarqube-client
//  api/resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # SonarQube Web API Resources
//!
//! Thin per-area wrappers over the request executor. Each method maps to
//! exactly one endpoint and adds nothing beyond the path, verb and response
//! shape; authentication and error classification come from
//! [`SonarQubeClient::execute`].
//!
//! - [`server`] - `api/server/*`
//! - [`system`] - `api/system/*`
//! - [`authentication`] - `api/authentication/*`
//! - [`audit_logs`] - `api/audit_logs/*`
//!
//! ## Example
//!
//! ```rust,no_run
//! use sonarqube_client::api::SonarQubeClient;
//! use sonarqube_client::auth::AuthProvider;
//!
//! # async fn example() -> sonarqube_client::api::common::Result<()> {
//! let client = SonarQubeClient::new("https://sonar.example.com", AuthProvider::token("squ_abc"))?;
//! let status = client.system().status().await?;
//! println!("SonarQube {} is {}", status.version, status.status);
//! # Ok(())
//! # }
//! ```

pub mod audit_logs;
pub mod authentication;
pub mod server;
pub mod system;

pub use audit_logs::{AuditLog, AuditLogs, AuditLogsApi};
pub use authentication::AuthenticationApi;
pub use server::ServerApi;
pub use system::{HealthCause, SystemApi, SystemHealth, SystemStatus};

use super::SonarQubeClient;

impl SonarQubeClient {
    pub fn server(&self) -> ServerApi<'_> {
        ServerApi::new(self)
    }

    pub fn system(&self) -> SystemApi<'_> {
        SystemApi::new(self)
    }

    pub fn authentication(&self) -> AuthenticationApi<'_> {
        AuthenticationApi::new(self)
    }

    pub fn audit_logs(&self) -> AuditLogsApi<'_> {
        AuditLogsApi::new(self)
    }
}
