//
//  sonarqube-client
//  api/resources/system.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `api/system` endpoints.
//!
//! `status` and `ping` are public. `health` requires either a system
//! administrator token or the monitoring passcode
//! ([`AuthProvider::Passcode`](crate::auth::AuthProvider::Passcode)).
//!
//! ```text
//! GET api/system/status  → {"id": "...", "version": "10.4.1.88267", "status": "UP"}
//! GET api/system/health  → {"health": "GREEN", "causes": []}
//! GET api/system/ping    → pong
//! ```

use serde::{Deserialize, Serialize};

use crate::api::common::Result;
use crate::api::SonarQubeClient;

/// Response of `api/system/status`.
///
/// `status` is one of `STARTING`, `UP`, `DOWN`, `RESTARTING`,
/// `DB_MIGRATION_NEEDED` or `DB_MIGRATION_RUNNING`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub id: Option<String>,
    pub version: String,
    pub status: String,
}

impl SystemStatus {
    pub fn is_up(&self) -> bool {
        self.status == "UP"
    }
}

/// Response of `api/system/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    /// `GREEN`, `YELLOW` or `RED`.
    pub health: String,

    #[serde(default)]
    pub causes: Vec<HealthCause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCause {
    pub message: String,
}

pub struct SystemApi<'a> {
    client: &'a SonarQubeClient,
}

impl<'a> SystemApi<'a> {
    pub(crate) fn new(client: &'a SonarQubeClient) -> Self {
        Self { client }
    }

    pub async fn status(&self) -> Result<SystemStatus> {
        self.client.get_json("api/system/status", &[]).await
    }

    pub async fn health(&self) -> Result<SystemHealth> {
        self.client.get_json("api/system/health", &[]).await
    }

    pub async fn ping(&self) -> Result<String> {
        let pong = self.client.get_text("api/system/ping", &[]).await?;
        Ok(pong.trim().to_string())
    }
}
