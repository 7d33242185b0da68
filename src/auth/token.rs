//
//  sonarqube-client
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Token Handling Module
//!
//! Helpers for reading and sanity-checking SonarQube tokens before they are
//! stored or attached to a client.
//!
//! SonarQube 9.5+ issues prefixed tokens:
//!
//! | Prefix | Token type |
//! |--------|------------|
//! | `squ_` | User token |
//! | `sqp_` | Project analysis token |
//! | `sqa_` | Global analysis token |
//!
//! Older servers issue bare hexadecimal tokens, which are still accepted.
//!
//! ## Example
//!
//! ```rust
//! use sonarqube_client::auth::{validate_token, TokenType};
//!
//! assert!(validate_token("squ_0123456789abcdef"));
//! assert_eq!(TokenType::detect("sqp_abc"), TokenType::ProjectAnalysis);
//! ```

use anyhow::Result;

/// Reads a token from standard input.
///
/// Only the first line is read and surrounding whitespace is trimmed, so
/// `echo "$SONAR_TOKEN" | sq auth login --with-token` works.
pub fn read_token_from_stdin() -> Result<String> {
    use std::io::{self, BufRead};

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;

    Ok(line.trim().to_string())
}

/// Validates the format of a token string.
///
/// This does not contact the server; it only rejects values that can never
/// be a token (empty, or containing whitespace).
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

/// Kind of token, inferred from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    User,
    ProjectAnalysis,
    GlobalAnalysis,
    /// Unprefixed token from an older server.
    Legacy,
}

impl TokenType {
    pub fn detect(token: &str) -> Self {
        if token.starts_with("squ_") {
            Self::User
        } else if token.starts_with("sqp_") {
            Self::ProjectAnalysis
        } else if token.starts_with("sqa_") {
            Self::GlobalAnalysis
        } else {
            Self::Legacy
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::User => "user token",
            Self::ProjectAnalysis => "project analysis token",
            Self::GlobalAnalysis => "global analysis token",
            Self::Legacy => "token",
        }
    }
}
