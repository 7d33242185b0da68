//
//  sonarqube-client
//  api/resources/server.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `api/server` endpoints.

use crate::api::common::Result;
use crate::api::SonarQubeClient;

pub struct ServerApi<'a> {
    client: &'a SonarQubeClient,
}

impl<'a> ServerApi<'a> {
    pub(crate) fn new(client: &'a SonarQubeClient) -> Self {
        Self { client }
    }

    /// `GET api/server/version`, returned as plain text (e.g. `10.4.1.88267`).
    pub async fn version(&self) -> Result<String> {
        let version = self.client.get_text("api/server/version", &[]).await?;
        Ok(version.trim().to_string())
    }
}
