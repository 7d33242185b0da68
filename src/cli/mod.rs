//
//  sonarqube-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod auth;
mod server;
mod system;
mod audit_logs;
mod api;
mod config;
mod completion;

pub use auth::AuthCommand;
pub use server::ServerCommand;
pub use system::SystemCommand;
pub use audit_logs::AuditLogsCommand;
pub use api::ApiCommand;
pub use config::ConfigCommand;
pub use completion::CompletionCommand;

use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::api::SonarQubeClient;
use crate::auth::{AuthProvider, AuthType, KeyringStore, SecretKind};
use crate::config::{Config, ResolvedServer, ENV_PASSCODE, ENV_TOKEN};

/// sq - Work with SonarQube from the command line
#[derive(Parser, Debug)]
#[command(
    name = "sq",
    version,
    about = "Work with SonarQube from the command line",
    long_about = "sq is a CLI for the SonarQube Web API.\n\n\
                  It checks server status and health, validates credentials, \
                  downloads audit logs and makes raw API calls.",
    propagate_version = true,
    after_help = "Use 'sq <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Configured server profile to use
    #[arg(long, short = 's', global = true, env = "SQ_SERVER")]
    pub server: Option<String>,

    /// SonarQube base URL, overriding the profile's
    #[arg(long, global = true, env = "SONAR_HOST_URL")]
    pub url: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with a SonarQube server
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// Server information
    Server(ServerCommand),

    /// System status and health
    #[command(visible_alias = "sys")]
    System(SystemCommand),

    /// Download audit logs (Enterprise edition)
    #[command(name = "audit-logs")]
    AuditLogs(AuditLogsCommand),

    /// Make API requests
    Api(ApiCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}

/// Credential sources consulted when building a client, in order.
#[derive(Debug, Default, Clone)]
pub(crate) struct CredentialSources {
    pub env_token: Option<String>,
    pub env_passcode: Option<String>,
}

impl CredentialSources {
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            env_token: non_empty(ENV_TOKEN),
            env_passcode: non_empty(ENV_PASSCODE),
        }
    }
}

/// Chooses the credential for `server`.
///
/// `SONAR_TOKEN` wins, then `SONAR_PASSCODE`, then the keyring entry matching
/// the profile's auth type. `stored` looks a secret up in the keyring.
pub(crate) fn resolve_auth<F>(
    server: &ResolvedServer,
    sources: &CredentialSources,
    stored: F,
) -> Result<AuthProvider>
where
    F: Fn(&str, SecretKind) -> Result<Option<String>>,
{
    if let Some(token) = &sources.env_token {
        return Ok(AuthProvider::token(token.clone()));
    }
    if let Some(passcode) = &sources.env_passcode {
        return Ok(AuthProvider::passcode(passcode.clone()));
    }

    let missing = || {
        anyhow::anyhow!(
            "No credentials stored for '{}'. Run 'sq auth login --server {}' or set {}.",
            server.name,
            server.name,
            ENV_TOKEN
        )
    };

    match server.config.auth {
        AuthType::None => Ok(AuthProvider::None),
        AuthType::Token => {
            let token = stored(&server.name, SecretKind::Primary)?.ok_or_else(missing)?;
            Ok(AuthProvider::token(token))
        }
        AuthType::Basic => {
            let Some(username) = server.config.username.clone() else {
                bail!("Server '{}' uses basic auth but has no username", server.name);
            };
            let password = stored(&server.name, SecretKind::Primary)?.ok_or_else(missing)?;
            Ok(AuthProvider::basic(username, password))
        }
        AuthType::Passcode => {
            let passcode = stored(&server.name, SecretKind::Passcode)?.ok_or_else(missing)?;
            Ok(AuthProvider::passcode(passcode))
        }
    }
}

/// Builds a client for the server selected by the global options.
pub(crate) fn connect(global: &GlobalOptions) -> Result<SonarQubeClient> {
    let config = Config::load()?;
    let server = config.resolve_server(global.server.as_deref(), global.url.as_deref())?;

    let keyring = KeyringStore::new();
    let auth = resolve_auth(&server, &CredentialSources::from_env(), |name, kind| {
        keyring.get(name, kind)
    })?;

    tracing::debug!(
        server = %server.name,
        url = %server.config.url,
        auth = %auth.auth_type(),
        "connecting"
    );

    let mut builder = config.client_builder(&server.config).auth(auth);
    if let Some(secs) = global.timeout {
        builder = builder.timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    Ok(builder.build()?)
}

/// Prints `value` as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
