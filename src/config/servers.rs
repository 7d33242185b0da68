//
//  sonarqube-client
//  config/servers.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Server Profile Helpers
//!
//! URL normalization and profile naming for configured SonarQube servers.
//!
//! ```rust
//! use sonarqube_client::config::{normalize_server_url, server_name_from_url};
//!
//! assert_eq!(normalize_server_url("sonar.example.com/"), "https://sonar.example.com");
//! assert_eq!(server_name_from_url("https://SONAR.example.com:9000/sonar"), "sonar.example.com");
//! ```

/// Default URL of a local SonarQube installation.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:9000";

/// Trims whitespace and trailing slashes, and assumes `https://` when no
/// scheme is given.
pub fn normalize_server_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Derives a profile name from a server URL: its lowercase host.
pub fn server_name_from_url(url: &str) -> String {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let authority = rest.split('/').next().unwrap_or(rest);
    let host = authority.split(':').next().unwrap_or(authority);
    host.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_server_url() {
        assert_eq!(normalize_server_url(" http://localhost:9000/ "), "http://localhost:9000");
        assert_eq!(normalize_server_url("sonar.example.com"), "https://sonar.example.com");
        assert_eq!(
            normalize_server_url("https://host/sonarqube//"),
            "https://host/sonarqube"
        );
    }

    #[test]
    fn test_server_name_from_url() {
        assert_eq!(server_name_from_url(DEFAULT_SERVER_URL), "localhost");
        assert_eq!(server_name_from_url("sonar.example.com"), "sonar.example.com");
    }
}
