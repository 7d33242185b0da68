//
//  sonarqube-client
//  api/resources/audit_logs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Audit Log API
//!
//! `GET api/audit_logs/download` returns the security audit trail recorded
//! between two instants. Requires a system administrator and an Enterprise
//! edition server; other callers get `Authorization` or `NotFound` errors
//! from the executor.
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! # async fn example(client: &sonarqube_client::api::SonarQubeClient) -> sonarqube_client::api::common::Result<()> {
//! let to = Utc::now();
//! let logs = client.audit_logs().download(to - Duration::days(7), to).await?;
//! for entry in &logs.audit_logs {
//!     println!("{} {} {:?}", entry.category, entry.action, entry.user_login);
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::common::{Result, SonarQubeError};
use crate::api::SonarQubeClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogs {
    #[serde(default)]
    pub audit_logs: Vec<AuditLog>,
}

/// A single audit entry.
///
/// Fields beyond the common ones differ between categories and are kept in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub action: String,

    #[serde(default)]
    pub record_created_at: Option<String>,

    #[serde(default)]
    pub user_uuid: Option<String>,

    #[serde(default)]
    pub user_login: Option<String>,

    #[serde(default)]
    pub new_value: Option<Value>,

    #[serde(default)]
    pub previous_value: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct AuditLogsApi<'a> {
    client: &'a SonarQubeClient,
}

impl<'a> AuditLogsApi<'a> {
    pub(crate) fn new(client: &'a SonarQubeClient) -> Self {
        Self { client }
    }

    /// Downloads audit entries recorded in `[from, to]`.
    ///
    /// # Errors
    ///
    /// [`SonarQubeError::Validation`] with field `from` if the range is
    /// reversed; otherwise whatever the executor classifies.
    pub async fn download(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<AuditLogs> {
        if from > to {
            return Err(SonarQubeError::validation(
                "The 'from' date must not be after the 'to' date",
                Some("from".to_string()),
            ));
        }

        let from = from.to_rfc3339_opts(SecondsFormat::Secs, false);
        let to = to.to_rfc3339_opts(SecondsFormat::Secs, false);
        self.client
            .get_json(
                "api/audit_logs/download",
                &[("from", from.as_str()), ("to", to.as_str())],
            )
            .await
    }
}
