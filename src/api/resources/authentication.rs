//
//  sonarqube-client
//  api/resources/authentication.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `api/authentication` endpoints.

use reqwest::Method;
use serde::Deserialize;

use crate::api::common::Result;
use crate::api::{RequestOptions, SonarQubeClient};

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
}

pub struct AuthenticationApi<'a> {
    client: &'a SonarQubeClient,
}

impl<'a> AuthenticationApi<'a> {
    pub(crate) fn new(client: &'a SonarQubeClient) -> Self {
        Self { client }
    }

    /// `GET api/authentication/validate`.
    ///
    /// The endpoint answers 200 for anonymous callers too, so `false` means
    /// the configured credentials were not recognized.
    pub async fn validate(&self) -> Result<bool> {
        let response: ValidateResponse = self
            .client
            .get_json("api/authentication/validate", &[])
            .await?;
        Ok(response.valid)
    }

    /// `POST api/authentication/logout`.
    pub async fn logout(&self) -> Result<()> {
        self.client
            .execute(Method::POST, "api/authentication/logout", RequestOptions::new())
            .await?;
        Ok(())
    }
}
