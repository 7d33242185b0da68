//
//  sonarqube-client
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands for the SonarQube CLI.
//!
//! `sq auth login` checks a credential against the server before storing it
//! in the keyring and recording the server profile in the configuration file.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::api::SonarQubeClient;
use crate::auth::{
    read_token_from_stdin, validate_token, AuthProvider, AuthType, KeyringStore, SecretKind,
    TokenType,
};
use crate::config::{
    normalize_server_url, server_name_from_url, Config, ServerConfig, DEFAULT_SERVER_URL,
};
use crate::interactive::{
    prompt_confirm_with_default, prompt_input, prompt_input_with_default, prompt_password,
};

use super::{print_json, resolve_auth, CredentialSources, GlobalOptions};

/// Authenticate with a SonarQube server.
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in to a SonarQube server
    Login(LoginArgs),

    /// Log out of a SonarQube server
    Logout(LogoutArgs),

    /// View authentication status
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Authentication type: token, basic, passcode or none
    #[arg(long, short = 'a', default_value = "token")]
    pub auth: AuthType,

    /// Login for basic authentication
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the token, password or passcode from standard input
    #[arg(long)]
    pub with_token: bool,

    /// Make this the default server
    #[arg(long)]
    pub default: bool,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Log out of all servers
    #[arg(long)]
    pub all: bool,

    /// Also end the session on the server
    #[arg(long)]
    pub remote: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show the stored secret (masked)
    #[arg(long, short = 't')]
    pub show_token: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout(args) => logout(args, global).await,
            AuthSubcommand::Status(args) => status(args, global).await,
        }
    }
}

/// Performs the login flow.
async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let keyring = KeyringStore::new();
    let mut config = Config::load()?;

    let url = match &global.url {
        Some(url) => url.clone(),
        None => match global.server.as_deref().and_then(|s| config.server_config(s)) {
            Some(existing) => existing.url.clone(),
            None => prompt_input_with_default("SonarQube URL:", DEFAULT_SERVER_URL)?,
        },
    };
    let url = normalize_server_url(&url);
    let name = global
        .server
        .clone()
        .unwrap_or_else(|| server_name_from_url(&url));

    if let Some(existing) = config.server_config(&name) {
        if existing.url == url && keyring.get(&name, secret_kind(args.auth))?.is_some() {
            println!("Already logged in to {} ({})", name, url);
            if !prompt_confirm_with_default("Re-authenticate?", false)? {
                return Ok(());
            }
        }
    }

    let username = match args.auth {
        AuthType::Basic => Some(match &args.username {
            Some(username) => username.clone(),
            None => prompt_input("Username:")?,
        }),
        _ => None,
    };

    let secret = match args.auth {
        AuthType::None => None,
        _ if args.with_token => Some(read_token_from_stdin()?),
        AuthType::Token => {
            println!();
            println!("To create a token:");
            println!("  1. Go to {}/account/security", url);
            println!("  2. Generate a User token");
            println!("  3. Copy the generated token");
            println!();
            Some(prompt_password("Token:")?)
        }
        AuthType::Basic => Some(prompt_password("Password:")?),
        AuthType::Passcode => Some(prompt_password("System passcode:")?),
    };

    if let Some(secret) = &secret {
        if !validate_token(secret) {
            bail!("Invalid {} format", args.auth);
        }
        if args.auth == AuthType::Token {
            tracing::debug!(kind = TokenType::detect(secret).description(), "token type");
        }
    }

    let auth = match (args.auth, secret.clone()) {
        (AuthType::Token, Some(token)) => AuthProvider::token(token),
        (AuthType::Basic, Some(password)) => {
            AuthProvider::basic(username.clone().unwrap_or_default(), password)
        }
        (AuthType::Passcode, Some(passcode)) => AuthProvider::passcode(passcode),
        _ => AuthProvider::None,
    };

    println!("Validating credentials...");
    let client = SonarQubeClient::builder(url.clone()).auth(auth).build()?;
    verify(&client, args.auth).await?;

    if let Some(secret) = &secret {
        keyring.store(&name, secret_kind(args.auth), secret)?;
    }

    config.servers.insert(
        name.clone(),
        ServerConfig {
            url: url.clone(),
            auth: args.auth,
            username: username.clone(),
        },
    );
    if args.default || config.core.default_server.is_none() {
        config.core.default_server = Some(name.clone());
    }
    config.save()?;

    match username {
        Some(user) => println!(
            "{} Logged in to {} ({}) as {}",
            style("✓").green(),
            name,
            url,
            user
        ),
        None => println!("{} Logged in to {} ({})", style("✓").green(), name, url),
    }

    Ok(())
}

/// Checks that the server accepts the credential.
///
/// `api/authentication/validate` answers 200 even for bad credentials, so
/// token and basic logins inspect its `valid` flag. A passcode only grants
/// access to monitoring endpoints, so it is checked against system health.
async fn verify(client: &SonarQubeClient, auth: AuthType) -> Result<()> {
    match auth {
        AuthType::Token | AuthType::Basic => {
            if !client.authentication().validate().await? {
                bail!("The server did not accept the credentials");
            }
        }
        AuthType::Passcode => {
            client.system().health().await?;
        }
        AuthType::None => {
            client.system().status().await?;
        }
    }
    Ok(())
}

fn secret_kind(auth: AuthType) -> SecretKind {
    match auth {
        AuthType::Passcode => SecretKind::Passcode,
        _ => SecretKind::Primary,
    }
}

/// Performs logout.
async fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let keyring = KeyringStore::new();
    let mut config = Config::load()?;

    let names: Vec<String> = if args.all {
        config.servers.keys().cloned().collect()
    } else {
        vec![config.resolve_server(global.server.as_deref(), None)?.name]
    };

    if names.is_empty() {
        println!("Not logged in to any servers");
        return Ok(());
    }

    for name in &names {
        if args.remote {
            let server = config.resolve_server(Some(name.as_str()), None)?;
            let auth = resolve_auth(&server, &CredentialSources::default(), |n, kind| {
                keyring.get(n, kind)
            });
            if let Ok(auth) = auth {
                let client = config.client_builder(&server.config).auth(auth).build()?;
                if let Err(e) = client.authentication().logout().await {
                    eprintln!(
                        "{} Could not end the session on {}: {}",
                        style("!").yellow(),
                        name,
                        e
                    );
                }
            }
        }

        keyring.delete(name, SecretKind::Primary)?;
        keyring.delete(name, SecretKind::Passcode)?;
        config.servers.remove(name);
        if config.core.default_server.as_deref() == Some(name.as_str()) {
            config.core.default_server = None;
        }
    }
    config.save()?;

    if names.len() == 1 {
        println!("{} Logged out of {}", style("✓").green(), names[0]);
    } else {
        println!("{} Logged out of {} server(s)", style("✓").green(), names.len());
    }

    Ok(())
}

/// Shows authentication status.
async fn status(args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
    let keyring = KeyringStore::new();
    let config = Config::load()?;

    if config.servers.is_empty() {
        if global.json {
            return print_json(&serde_json::json!([]));
        }
        println!("Not logged in to any SonarQube servers");
        println!();
        println!("Run 'sq auth login' to authenticate");
        return Ok(());
    }

    let mut names: Vec<&String> = config.servers.keys().collect();
    names.sort();

    let mut report = Vec::new();
    for name in names {
        let server = config.resolve_server(Some(name.as_str()), None)?;
        let secret = keyring.get(name, secret_kind(server.config.auth))?;

        let valid = match resolve_auth(&server, &CredentialSources::default(), |n, kind| {
            keyring.get(n, kind)
        }) {
            Ok(auth) => match config.client_builder(&server.config).auth(auth).build() {
                Ok(client) => verify(&client, server.config.auth).await.is_ok(),
                Err(_) => false,
            },
            Err(_) => false,
        };

        if global.json {
            report.push(serde_json::json!({
                "server": name,
                "url": server.config.url,
                "auth": server.config.auth,
                "username": server.config.username,
                "default": config.core.default_server.as_deref() == Some(name.as_str()),
                "valid": valid,
            }));
            continue;
        }

        let marker = if config.core.default_server.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", style(name).bold(), marker);
        println!("  URL: {}", server.config.url);
        println!("  Auth: {}", server.config.auth);
        if let Some(ref user) = server.config.username {
            println!("  Logged in as: {}", user);
        }
        println!(
            "  Status: {}",
            if valid {
                style("Active").green()
            } else {
                style("Invalid/Unreachable").red()
            }
        );
        if args.show_token {
            if let Some(ref secret) = secret {
                println!("  Secret: {}", mask_token(secret));
            }
        }
        println!();
    }

    if global.json {
        print_json(&report)?;
    }

    Ok(())
}

/// Masks a secret for display (shows first and last 4 characters).
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "*****");
        assert_eq!(mask_token("squ_0123456789abcdef"), "squ_...cdef");
    }

    #[test]
    fn test_secret_kind() {
        assert_eq!(secret_kind(AuthType::Passcode), SecretKind::Passcode);
        assert_eq!(secret_kind(AuthType::Basic), SecretKind::Primary);
    }
}
