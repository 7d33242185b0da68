//
//  sonarqube-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # SonarQube Client Library
//!
//! A typed client core for the SonarQube Web API, plus the `sq` command-line
//! tool built on it.
//!
//! ## Overview
//!
//! Every call goes through a single request executor that attaches
//! credentials, enforces a timeout, decodes the response by content type and
//! turns every failure into one [`SonarQubeError`] with a stable kind.
//!
//! ## Features
//!
//! - **Closed Error Taxonomy**: nine kinds, each serializable and rehydratable
//! - **Pluggable Authentication**: bearer token, basic, passcode or none
//! - **Per-Call Options**: query, JSON/form/text bodies, headers and timeouts
//! - **Retry Decorator**: opt-in backoff honoring `Retry-After`
//! - **Resource Clients**: server, system, authentication and audit logs
//!
//! ## Module Structure
//!
//! - [`api`]: Request executor, error taxonomy and resource clients
//! - [`auth`]: Credential providers and keyring storage
//! - [`config`]: Configuration file management for the CLI
//! - [`cli`]: Command-line interface definitions using clap
//! - [`interactive`]: Terminal prompts
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sonarqube_client::{AuthProvider, SonarQubeClient, SonarQubeError};
//!
//! # async fn example() -> Result<(), SonarQubeError> {
//! let client = SonarQubeClient::new("https://sonar.example.com", AuthProvider::token("squ_abc"))?;
//!
//! match client.system().status().await {
//!     Ok(status) => println!("{} ({})", status.status, status.version),
//!     Err(e) if e.is_retryable() => eprintln!("try again later: {}", e),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains the `sq` commands, arguments and subcommands defined using the
/// clap derive API.
pub mod cli;

/// SonarQube Web API client.
///
/// The request executor, the error taxonomy it produces and the resource
/// clients layered on top of it.
pub mod api;

/// Authentication and credential management.
///
/// - Bearer tokens, HTTP basic and system passcodes
/// - Secure credential storage via the system keyring
pub mod auth;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/sq/config.toml`
/// - macOS: `~/Library/Application Support/sq/config.toml`
/// - Windows: `%APPDATA%\sq\config.toml`
pub mod config;

/// Interactive terminal prompts.
pub mod interactive;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use sonarqube_client::Cli;
///
/// let cli = Cli::parse();
/// // Handle cli.command...
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Re-export of the request executor.
pub use api::SonarQubeClient;

/// Re-export of the error taxonomy.
pub use api::{ErrorKind, SonarQubeError};

/// Re-export of the credential provider.
pub use auth::AuthProvider;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
///
/// # Value
///
/// `"sq"`
pub const APP_NAME: &str = "sq";

/// Application version constant.
///
/// Derived from Cargo.toml at compile time. Also used in the default
/// `User-Agent` header.
///
/// # Example
///
/// ```rust
/// use sonarqube_client::VERSION;
///
/// println!("sq version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `16-31`: Operation-related issues
/// - `32+`: External service issues
///
/// # Example
///
/// ```rust
/// use sonarqube_client::{exit_codes, ErrorKind};
///
/// assert_eq!(exit_codes::for_kind(ErrorKind::Authentication), exit_codes::AUTH_ERROR);
/// assert_eq!(exit_codes::for_kind(ErrorKind::Validation), exit_codes::USAGE);
/// assert_eq!(exit_codes::for_kind(ErrorKind::Server), exit_codes::ERROR);
/// ```
pub mod exit_codes {
    use crate::api::ErrorKind;

    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    pub const USAGE: i32 = 2;

    /// Authentication required or failed.
    ///
    /// The credentials are missing, invalid or lack the required permission.
    /// Run `sq auth login` to authenticate.
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found.
    pub const NOT_FOUND: i32 = 8;

    /// API rate limit exceeded.
    ///
    /// The server answered 429. Wait before retrying.
    pub const RATE_LIMIT: i32 = 32;

    /// Maps an error kind to the process exit code.
    pub fn for_kind(kind: ErrorKind) -> i32 {
        match kind {
            ErrorKind::Authentication | ErrorKind::Authorization => AUTH_ERROR,
            ErrorKind::NotFound => NOT_FOUND,
            ErrorKind::RateLimit => RATE_LIMIT,
            ErrorKind::Validation => USAGE,
            _ => ERROR,
        }
    }

}
